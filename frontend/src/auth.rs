//! 认证模块
//!
//! 把核心层的 `SessionStore` 接入 Leptos：会话每次变更都会同步写入信号，
//! 路由服务据此重新执行守卫，不会出现过期判断。

use crate::web::{BrowserCredentialStore, BrowserTimer, FetchClient};
use cn19::shared::User;
use cn19::shared::protocol::ApiRequest;
use cn19::{ApiResult, AuthOutcome, ClientConfig, SessionPhase, SessionState, SessionStore};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

pub type Session = SessionStore<FetchClient, BrowserCredentialStore, BrowserTimer>;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub state: ReadSignal<SessionState>,
    store: StoredValue<Rc<Session>, LocalStorage>,
}

impl AuthContext {
    pub fn new(config: ClientConfig) -> Self {
        let (state, set_state) = signal(SessionState::default());
        let session = Session::new(FetchClient, BrowserCredentialStore, BrowserTimer, config);
        session.subscribe(move |s| set_state.set(s.clone()));

        Self {
            state,
            store: StoredValue::new_local(Rc::new(session)),
        }
    }

    pub fn session(&self) -> Rc<Session> {
        self.store.get_value()
    }

    /// 守卫使用的会话阶段信号
    pub fn phase_signal(&self) -> Signal<SessionPhase> {
        let state = self.state;
        Signal::derive(move || SessionPhase::of(&state.get()))
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.state.with(SessionState::is_admin)
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动时恢复上次的会话
pub fn init_auth(ctx: &AuthContext) {
    let session = ctx.session();
    spawn_local(async move {
        session.restore().await;
    });
}

pub async fn login(ctx: &AuthContext, username: String, password: String) -> AuthOutcome {
    ctx.session().login(&username, &password).await
}

pub async fn register(ctx: &AuthContext, username: String, password: String) -> AuthOutcome {
    ctx.session().register(&username, &password).await
}

/// 注销
///
/// 导航由路由服务监听会话变化自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.session().logout();
}

pub async fn refresh_status(ctx: &AuthContext) -> Option<User> {
    ctx.session().refresh_status().await
}

/// 以当前凭据发送业务请求
pub async fn call<R: ApiRequest>(ctx: &AuthContext, req: R) -> ApiResult<R::Response> {
    ctx.session().call(&req).await
}
