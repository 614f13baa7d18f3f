//! CN19 前端应用
//!
//! - `web::router`: 路由服务，守卫判定来自 `cn19::guard`
//! - `auth`: 会话状态接入 Leptos
//! - `components`: 页面与通用组件

mod auth;
pub mod logging;
mod photo;
mod components {
    pub mod access_denied;
    pub mod admin_panel;
    pub mod create_pendencia;
    pub mod dashboard;
    pub mod icons;
    pub mod layout;
    pub mod locations_map;
    pub mod login;
    pub mod notice;
    pub mod pendencia_modals;
    pub mod pending_approval;
    pub mod reports;
    pub mod user_profile;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::access_denied::AccessDeniedPage;
use crate::components::admin_panel::AdminPanelPage;
use crate::components::create_pendencia::CreatePendenciaPage;
use crate::components::dashboard::DashboardPage;
use crate::components::locations_map::LocationsMapPage;
use crate::components::login::LoginPage;
use crate::components::pending_approval::PendingApprovalPage;
use crate::components::reports::ReportsPage;
use crate::components::user_profile::UserProfilePage;

use cn19::{AppRoute, ClientConfig};
use leptos::prelude::*;

// 浏览器平台适配：核心层三个接口的实现与路由服务
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::FetchClient;
    pub use storage::BrowserCredentialStore;
    pub use timer::BrowserTimer;
}

use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 只会收到守卫放行的路由；`Root` 总是被重定向，这里按未找到处理。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::CreatePendencia => view! { <CreatePendenciaPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminPanelPage /> }.into_any(),
        AppRoute::Profile => view! { <UserProfilePage /> }.into_any(),
        AppRoute::Locations => view! { <LocationsMapPage /> }.into_any(),
        AppRoute::Reports => view! { <ReportsPage /> }.into_any(),
        AppRoute::PendingApproval => view! { <PendingApprovalPage /> }.into_any(),
        AppRoute::AccessDenied => view! { <AccessDeniedPage /> }.into_any(),
        AppRoute::Root | AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Página não encontrada"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary">"Voltar ao início"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 编译期注入的配置；后端地址缺省时与页面同源
fn backend_config() -> ClientConfig {
    ClientConfig::from_lookup(|name| match name {
        "CN19_BACKEND_URL" => option_env!("CN19_BACKEND_URL")
            .map(str::to_string)
            .or_else(|| web_sys::window().and_then(|w| w.location().origin().ok())),
        "CN19_TOKEN_KEY" => option_env!("CN19_TOKEN_KEY").map(str::to_string),
        "CN19_RESTORE_TIMEOUT_SECS" => option_env!("CN19_RESTORE_TIMEOUT_SECS").map(str::to_string),
        _ => None,
    })
}

#[component]
pub fn App() -> impl IntoView {
    let config = backend_config();
    tracing::info!(api_base = %config.api_base, "starting CN19 client");

    let auth_ctx = AuthContext::new(config);
    provide_context(auth_ctx);

    // 恢复上次的会话；完成前守卫返回 Wait
    init_auth(&auth_ctx);

    view! {
        <Router phase=auth_ctx.phase_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
