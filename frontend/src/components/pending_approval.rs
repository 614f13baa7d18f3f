use crate::auth::{logout, refresh_status, use_auth};
use crate::components::icons::*;
use cn19::shared::UserStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;

const STILL_PENDING: &str = "Sua conta ainda está aguardando aprovação.";

/// 检查结果对应的提示
///
/// 服务端对未批准账号的 `/me` 返回 403，所以拿不到用户也按仍在等待处理；
/// 其他状态由守卫直接跳转，不需要提示。
fn refresh_notice(status: Option<UserStatus>) -> Option<&'static str> {
    match status {
        None | Some(UserStatus::Pending) => Some(STILL_PENDING),
        Some(UserStatus::Approved | UserStatus::Rejected) => None,
    }
}

/// 等待管理员审批
///
/// "检查状态" 成功拿到 APPROVED 后，会话更新会直接触发守卫跳转。
#[component]
pub fn PendingApprovalPage() -> impl IntoView {
    let auth = use_auth();
    let (checking, set_checking) = signal(false);
    let (message, set_message) = signal(Option::<String>::None);

    let username = move || auth.user().map(|u| u.username).unwrap_or_default();
    let initial = move || auth.user().map(|u| u.initial()).unwrap_or_default();

    let on_refresh = move |_| {
        set_checking.set(true);
        set_message.set(None);
        spawn_local(async move {
            let status = refresh_status(&auth).await.map(|u| u.status);
            set_message.set(refresh_notice(status).map(str::to_string));
            set_checking.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card w-full shadow-xl bg-base-100">
                    <div class="card-body items-center text-center gap-4">
                        <div class="p-4 bg-warning/20 rounded-full text-warning">
                            <Clock attr:class="h-8 w-8" />
                        </div>
                        <h2 class="card-title">"Cadastro realizado com sucesso!"</h2>
                        <p class="text-base-content/70">"Sua conta foi criada e está pendente de aprovação."</p>

                        <div class="flex items-center gap-3 bg-base-200 rounded-box p-3 w-full">
                            <div class="avatar placeholder">
                                <div class="bg-info text-info-content rounded-full w-10">
                                    <span>{initial}</span>
                                </div>
                            </div>
                            <div class="text-left">
                                <p class="font-medium">{username}</p>
                                <span class="badge badge-warning badge-sm">"Aguardando aprovação"</span>
                            </div>
                        </div>

                        <ul class="text-sm text-left list-disc list-inside text-base-content/70">
                            <li>"Sua solicitação foi enviada para o administrador"</li>
                            <li>"Aguarde a aprovação para ter acesso ao sistema"</li>
                        </ul>

                        <Show when=move || message.with(Option::is_some)>
                            <div class="alert alert-info text-sm py-2">
                                <span>{move || message.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <button class="btn btn-primary w-full gap-2" disabled=move || checking.get() on:click=on_refresh>
                            <RefreshCw attr:class=move || if checking.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                            "Verificar status"
                        </button>
                        <button class="btn btn-outline w-full gap-2" on:click=move |_| logout(&auth)>
                            <LogOut attr:class="h-4 w-4" /> "Sair"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_check_reads_as_still_pending() {
        assert_eq!(refresh_notice(None), Some(STILL_PENDING));
        assert_eq!(refresh_notice(Some(UserStatus::Pending)), Some(STILL_PENDING));
    }

    #[test]
    fn decided_accounts_need_no_notice() {
        assert_eq!(refresh_notice(Some(UserStatus::Approved)), None);
        assert_eq!(refresh_notice(Some(UserStatus::Rejected)), None);
    }
}
