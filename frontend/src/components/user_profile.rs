use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::components::layout::AppShell;
use crate::components::notice::{Notifier, Toast};
use cn19::shared::protocol::{ChangePasswordRequest, UserStatsRequest};
use cn19::shared::validation::validate_new_password;
use cn19::shared::{Role, UserStats};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 个人资料：账号信息、本月统计、修改密码
#[component]
pub fn UserProfilePage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();
    let (stats, set_stats) = signal(Option::<UserStats>::None);
    let (current, set_current) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (saving, set_saving) = signal(false);

    spawn_local(async move {
        match call(&auth, UserStatsRequest).await {
            Ok(s) => set_stats.set(Some(s)),
            Err(e) => notifier.api_error(&e, "Erro ao carregar estatísticas"),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let current_password = current.get();
        let password = new_password.get();
        if current_password.is_empty() {
            notifier.error("Informe a senha atual");
            return;
        }
        if let Err(e) = validate_new_password(&password, &confirm.get()) {
            notifier.error(e.to_string());
            return;
        }
        set_saving.set(true);
        spawn_local(async move {
            let req = ChangePasswordRequest {
                current_password,
                new_password: password,
            };
            match call(&auth, req).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    set_current.set(String::new());
                    set_new_password.set(String::new());
                    set_confirm.set(String::new());
                }
                Err(e) => notifier.api_error(&e, "Erro ao alterar senha"),
            }
            set_saving.set(false);
        });
    };

    let username = move || auth.user().map(|u| u.username).unwrap_or_default();
    let initial = move || auth.user().map(|u| u.initial()).unwrap_or_default();
    let role = move || match auth.user().map(|u| u.role) {
        Some(Role::Admin) => "Administrador",
        _ => "Usuário",
    };

    view! {
        <AppShell>
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow">
                <div class="card-body flex-row items-center gap-4">
                    <div class="avatar placeholder">
                        <div class="bg-primary text-primary-content rounded-full w-16">
                            <span class="text-2xl">{initial}</span>
                        </div>
                    </div>
                    <div>
                        <h1 class="text-2xl font-bold">{username}</h1>
                        <span class="badge badge-outline gap-1"><UserIcon attr:class="h-3 w-3" /> {role}</span>
                    </div>
                </div>
            </div>

            {move || stats.get().map(|s| view! {
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">{format!("Criadas em {} {}", s.month, s.year)}</div>
                        <div class="stat-value text-primary">{s.created_count}</div>
                        <div class="stat-desc">{format!("{} aprovadas", s.approved_created_count)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Finalizadas"</div>
                        <div class="stat-value text-success">{s.finished_count}</div>
                        <div class="stat-desc">{format!("{} aprovadas", s.approved_finished_count)}</div>
                    </div>
                </div>
            })}

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title gap-2"><Key attr:class="h-5 w-5" /> "Alterar senha"</h2>
                    <form class="space-y-3 max-w-md" on:submit=on_submit>
                        <input type="password" class="input input-bordered w-full" placeholder="Senha atual"
                            prop:value=current on:input=move |ev| set_current.set(event_target_value(&ev)) />
                        <input type="password" class="input input-bordered w-full" placeholder="Nova senha"
                            prop:value=new_password on:input=move |ev| set_new_password.set(event_target_value(&ev)) />
                        <input type="password" class="input input-bordered w-full" placeholder="Confirmar nova senha"
                            prop:value=confirm on:input=move |ev| set_confirm.set(event_target_value(&ev)) />
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() { "Salvando..." } else { "Alterar senha" }}
                        </button>
                    </form>
                </div>
            </div>
        </AppShell>
    }
}
