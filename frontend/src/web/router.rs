//! 路由服务模块 - 核心引擎
//!
//! 所有对 window.history 的操作都集中在此模块。
//! 每次导航和每次会话变化都经过 `cn19::guard` 判定后才更新界面。

use cn19::guard::{GuardDecision, resolve};
use cn19::{AppRoute, SessionPhase};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 重定向使用 replaceState，避免后退时再次触发
fn replace_history_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

fn set_document_title(route: AppRoute) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(&format!("{} · CN19", route.title()));
    }
}

/// 路由器服务
///
/// `requested` 是地址栏对应的路由，`decision` 是守卫对它的判定。
#[derive(Clone, Copy)]
pub struct RouterService {
    requested: ReadSignal<AppRoute>,
    set_requested: WriteSignal<AppRoute>,
    phase: Signal<SessionPhase>,
    decision: Memo<GuardDecision>,
}

impl RouterService {
    fn new(phase: Signal<SessionPhase>) -> Self {
        let (requested, set_requested) = signal(AppRoute::from_path(&current_path()));
        let decision = Memo::new(move |_| resolve(phase.get(), requested.get()));

        Self {
            requested,
            set_requested,
            phase,
            decision,
        }
    }

    pub fn decision(&self) -> Memo<GuardDecision> {
        self.decision
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.requested
    }

    /// 导航：请求 -> 守卫 -> 写入 History -> 更新界面
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        match resolve(self.phase.get_untracked(), target) {
            GuardDecision::Redirect(next) => {
                tracing::info!(from = %target, to = %next, "guard redirect");
                push_history_state(next.to_path());
                self.set_requested.set(next);
            }
            GuardDecision::Render(_) | GuardDecision::Wait => {
                push_history_state(target.to_path());
                self.set_requested.set(target);
            }
        }
    }

    /// 浏览器后退/前进
    fn init_popstate_listener(&self) {
        let set_requested = self.set_requested;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_requested.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 判定为重定向时同步地址栏，放行时更新页面标题
    ///
    /// 会话变化（登录、登出、审批结果）与地址变化都会经过这里。
    fn setup_guard_redirect(&self) {
        let decision = self.decision;
        let requested = self.requested;
        let set_requested = self.set_requested;

        Effect::new(move |_| match decision.get() {
            GuardDecision::Redirect(next) => {
                let from = requested.get_untracked();
                tracing::info!(from = %from, to = %next, "guard redirect");
                replace_history_state(next.to_path());
                set_requested.set(next);
            }
            GuardDecision::Render(route) => set_document_title(route),
            GuardDecision::Wait => {}
        });
    }
}

fn provide_router(phase: Signal<SessionPhase>) -> RouterService {
    let router = RouterService::new(phase);
    router.init_popstate_listener();
    router.setup_guard_redirect();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话阶段信号
    phase: Signal<SessionPhase>,
    children: Children,
) -> impl IntoView {
    provide_router(phase);
    children()
}

/// 路由出口组件
///
/// 恢复会话期间只显示加载指示；重定向尚未落地时不渲染任何页面。
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || match router.decision().get() {
        GuardDecision::Render(route) => matcher(route),
        GuardDecision::Wait => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
        GuardDecision::Redirect(_) => ().into_any(),
    }
}

/// 站内链接
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
