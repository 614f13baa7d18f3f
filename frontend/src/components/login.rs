use crate::auth::{login, register, use_auth};
use crate::components::icons::ShieldCheck;
use cn19::shared::validation::validate_new_password;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Login,
    Register,
}

/// 登录 / 注册页
///
/// 成功后不需要手动导航：会话变化会让路由守卫把用户送到对应页面。
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (tab, set_tab) = signal(Tab::Login);
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let switch_tab = move |next: Tab| {
        set_tab.set(next);
        set_error_msg.set(None);
        set_password.set(String::new());
        set_confirm.set(String::new());
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let user = username.get().trim().to_string();
        let pw = password.get();
        if user.is_empty() || pw.is_empty() {
            set_error_msg.set(Some("Preencha todos os campos".to_string()));
            return;
        }

        let current = tab.get();
        if current == Tab::Register {
            if let Err(e) = validate_new_password(&pw, &confirm.get()) {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let outcome = match current {
                Tab::Login => login(&auth, user, pw).await,
                Tab::Register => register(&auth, user, pw).await,
            };
            if let Some(error) = outcome.error() {
                set_error_msg.set(Some(error.to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    let tab_class = move |t: Tab| {
        if tab.get() == t { "tab tab-active" } else { "tab" }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Gerenciador CN19"</h1>
                        <p class="text-base-content/70">
                            "Sistema de Gerenciamento de informações do CN19"
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div role="tablist" class="tabs tabs-boxed m-4 mb-0">
                        <a role="tab" class=move || tab_class(Tab::Login) on:click=move |_| switch_tab(Tab::Login)>"Login"</a>
                        <a role="tab" class=move || tab_class(Tab::Register) on:click=move |_| switch_tab(Tab::Register)>"Cadastro"</a>
                    </div>
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.with(Option::is_some)>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Usuário"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Senha"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <Show when=move || tab.get() == Tab::Register>
                            <div class="form-control">
                                <label class="label" for="confirm">
                                    <span class="label-text">"Confirmar senha"</span>
                                </label>
                                <input
                                    id="confirm"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                    prop:value=confirm
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                        </Show>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), tab.get()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "Aguarde..." }.into_any(),
                                    (false, Tab::Login) => "Entrar".into_any(),
                                    (false, Tab::Register) => "Criar conta".into_any(),
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
