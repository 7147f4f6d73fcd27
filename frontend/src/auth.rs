//! 认证模块
//!
//! - [`AuthGateway`]: 登录/注册请求，登录成功后把解码出的会话写入会话存储
//! - [`AuthContext`]: 把会话存储的变更流桥接为 leptos 信号，供路由与组件读取

use crate::api::ApiClient;
use crate::error::AuthError;
use crate::session::{Session, SessionStore};
use crate::web::{FetchHttpClient, HttpClient, KeyValueStorage, LocalStorage};
use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use movielist_shared::protocol::{SignIn, SignUp};
use movielist_shared::{SignInRequest, SignUpRequest};
use std::sync::Arc;

// =========================================================
// AuthGateway
// =========================================================

pub struct AuthGateway<C, S: KeyValueStorage> {
    api: ApiClient<C, S>,
}

impl<C, S: KeyValueStorage> Clone for AuthGateway<C, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStorage> AuthGateway<C, S> {
    pub fn new(api: ApiClient<C, S>) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Arc<SessionStore<S>> {
        self.api.session()
    }

    /// 登录
    ///
    /// 任何失败都不会改动会话存储；不做重试。
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let request = SignIn(SignInRequest {
            username: username.to_string(),
            password: password.to_string(),
        });

        let response = self.api.send(&request).await.map_err(|e| {
            log::error!("Login error: {}", e);
            AuthError::BackendRejected(e)
        })?;

        let token = response.bearer().ok_or_else(|| {
            log::error!("Login error: token not found in response");
            AuthError::MissingToken
        })?;

        let session = Session::from_token(token).map_err(|e| {
            log::error!("Error decoding token: {}", e);
            AuthError::MalformedToken(e)
        })?;

        self.session().set_session(session.clone());
        log::info!("Signed in as {}", session.username);
        Ok(session)
    }

    /// 注册，后端错误原样透出
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let request = SignUp(SignUpRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        self.api.send(&request).await?;
        Ok(())
    }

    pub fn logout(&self) {
        self.session().logout();
    }
}

// =========================================================
// AuthContext (leptos)
// =========================================================

pub type BrowserAuthGateway = AuthGateway<FetchHttpClient, LocalStorage>;

/// 认证上下文
///
/// 包含只读的身份信号与网关，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前身份（只读）
    pub identity: ReadSignal<Option<Session>>,
    gateway: StoredValue<BrowserAuthGateway>,
}

impl AuthContext {
    /// 创建认证上下文，并开始监听会话存储的变更
    pub fn new(gateway: BrowserAuthGateway) -> Self {
        let store = Arc::clone(gateway.session());
        let (identity, set_identity) = signal(store.current_identity());

        let mut changes = store.subscribe();
        spawn_local(async move {
            while let Some(session) = changes.next().await {
                set_identity.set(session);
            }
        });

        Self {
            identity,
            gateway: StoredValue::new(gateway),
        }
    }

    pub fn gateway(&self) -> BrowserAuthGateway {
        self.gateway.get_value()
    }

    /// 获取认证状态信号（用于路由服务注入）
    ///
    /// 身份变化时重新计算，判断本身交给会话存储，每次读取都重新检查过期时间。
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let identity = self.identity;
        let gateway = self.gateway;
        Signal::derive(move || {
            identity.track();
            gateway.with_value(|g| g.session().is_authenticated())
        })
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.gateway().logout();
}
