//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 注册页面
    Register,
    /// 想看列表 (默认路由，需要认证)
    #[default]
    Wishlist,
    /// 已看列表 (需要认证)
    Watched,
    /// 全部电影 (需要认证)
    AllMovies,
    /// 发现页 (需要认证)
    Discover,
    /// 电影详情 (需要认证)
    Detail(i64),
    /// 编辑电影 (需要认证)
    Edit(i64),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// `/`、`/discover` 等别名与未知路径都会落到对应的规范路由上。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["auth", "login"] => Self::Login,
            ["auth", "register"] => Self::Register,
            ["discover"] | ["movies", "discover"] => Self::Discover,
            ["movies", "watched"] => Self::Watched,
            ["movies", "all"] => Self::AllMovies,
            ["movies", "detail", id] => id.parse().map(Self::Detail).unwrap_or_default(),
            ["movies", "edit", id] => id.parse().map(Self::Edit).unwrap_or_default(),
            _ => Self::Wishlist,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/auth/login".to_string(),
            Self::Register => "/auth/register".to_string(),
            Self::Wishlist => "/movies/wishlist".to_string(),
            Self::Watched => "/movies/watched".to_string(),
            Self::AllMovies => "/movies/all".to_string(),
            Self::Discover => "/movies/discover".to_string(),
            Self::Detail(id) => format!("/movies/detail/{}", id),
            Self::Edit(id) => format!("/movies/edit/{}", id),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Wishlist
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
