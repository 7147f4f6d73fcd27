//! MovieList 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session` / `auth`: 会话存储与认证网关
//! - `api`: 片单与外部目录网关
//! - `views`: 各页面的视图状态（与 DOM 无关，可单元测试）
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod error;
mod session;
mod token;
mod components {
    pub mod detail;
    pub mod discover;
    pub mod edit;
    pub mod login;
    pub mod movie_list;
    pub mod nav;
    pub mod register;
}
mod views {
    pub mod detail;
    pub mod discover;
    pub mod edit;
    pub mod movie_list;
}

pub use config::AppConfig;
pub use web::init_logging;

use crate::api::{ApiClient, CatalogContext, CatalogGateway};
use crate::auth::{AuthContext, AuthGateway};
use crate::components::detail::DetailPage;
use crate::components::discover::DiscoverPage;
use crate::components::edit::EditPage;
use crate::components::login::LoginPage;
use crate::components::movie_list::MovieListPage;
use crate::components::nav::NavBar;
use crate::components::register::RegisterPage;
use crate::session::SessionStore;
use crate::views::movie_list::ListScope;

use leptos::prelude::*;
use std::sync::Arc;

// 原生 Web API 封装模块
// 浏览器相关的能力都藏在特性之后，测试中替换为内存实现。
pub(crate) mod web {
    mod console;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use console::init_logging;
    pub use http::{FetchHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse};
    pub use storage::{KeyValueStorage, LocalStorage};

    #[cfg(test)]
    pub use http::MockHttpClient;
    #[cfg(test)]
    pub use storage::MemoryStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::{FetchHttpClient, LocalStorage};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Wishlist => view! { <MovieListPage scope=ListScope::Wishlist /> }.into_any(),
        AppRoute::Watched => view! { <MovieListPage scope=ListScope::Watched /> }.into_any(),
        AppRoute::AllMovies => view! { <MovieListPage scope=ListScope::All /> }.into_any(),
        AppRoute::Discover => view! { <DiscoverPage /> }.into_any(),
        AppRoute::Detail(id) => view! { <DetailPage id=id /> }.into_any(),
        AppRoute::Edit(id) => view! { <EditPage id=id /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 会话存储：从 localStorage 恢复一次
    let config = AppConfig::from_env();
    let session = Arc::new(SessionStore::hydrate(LocalStorage));
    let api = ApiClient::new(config.api_base_url, Arc::new(FetchHttpClient), session);

    // 2. 认证与目录网关通过 Context 共享
    let auth_ctx = AuthContext::new(AuthGateway::new(api.clone()));
    provide_context(auth_ctx);
    provide_context(CatalogContext::new(CatalogGateway::new(api)));

    // 3. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <NavBar />
            <main>
                <RouterOutlet matcher=route_matcher />
            </main>
        </Router>
    }
}
