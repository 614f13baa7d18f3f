use crate::auth::{logout, use_auth};
use crate::components::icons::{Ban, LogOut};
use leptos::prelude::*;

/// 账号被拒绝后的唯一可见页面
#[component]
pub fn AccessDeniedPage() -> impl IntoView {
    let auth = use_auth();
    let username = move || auth.user().map(|u| u.username).unwrap_or_default();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card w-full shadow-xl bg-base-100">
                    <div class="card-body items-center text-center gap-4">
                        <div class="p-4 bg-error/20 rounded-full text-error">
                            <Ban attr:class="h-8 w-8" />
                        </div>
                        <h2 class="card-title">"Acesso negado"</h2>
                        <p class="text-base-content/70">
                            "O cadastro de " <span class="font-semibold">{username}</span>
                            " foi rejeitado por um administrador. Entre em contato com a administração do CN19 se acredita que isso é um engano."
                        </p>
                        <button class="btn btn-outline btn-error w-full gap-2" on:click=move |_| logout(&auth)>
                            <LogOut attr:class="h-4 w-4" /> "Sair"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
