use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod catalog;
pub mod protocol;

pub use catalog::{CatalogGenre, CatalogPage, CatalogResult, POSTER_BASE_URL};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 电影在用户片单中的状态
///
/// 一部电影在任意时刻只属于「想看」或「已看」其中之一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovieStatus {
    #[default]
    Wishlist,
    Watched,
}

impl MovieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieStatus::Wishlist => "WISHLIST",
            MovieStatus::Watched => "WATCHED",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 后端返回的电影记录
///
/// 字段命名与后端 JSON (camelCase) 保持一致。后端可能对任意可选列返回 `null`，
/// 因此非 Option 字段统一通过 `nullable` 回落到默认值。
/// 更新接口是整条记录替换，未声明的字段存放在 `extra` 中并原样回传。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// 由服务端分配，新建时为 0
    #[serde(default, deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub poster_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: MovieStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub genre: String,
    #[serde(default, deserialize_with = "nullable")]
    pub runtime: u32,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable")]
    pub likes_count: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub comments_count: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub user_liked: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    /// 返回状态被替换后的副本（整条记录替换语义）
    pub fn with_status(&self, status: MovieStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// 返回点赞状态翻转后的副本
    pub fn with_like(&self, liked: bool) -> Self {
        let delta = if liked { 1 } else { -1 };
        Self {
            user_liked: liked,
            likes_count: self.likes_count + delta,
            ..self.clone()
        }
    }
}

/// 电影评论
///
/// 除 `content` 外的字段均由服务端生成，未知字段原样保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 当前登录用户的资料 (`GET /users/me`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =========================================================
// 认证请求/响应 (Auth Payloads)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 登录响应
///
/// 不同版本的后端分别使用 `accessToken` 或 `token` 字段返回令牌。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AuthResponse {
    /// 取出令牌，优先 `accessToken`，空字符串视为缺失
    pub fn bearer(&self) -> Option<&str> {
        [&self.access_token, &self.token]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .find(|t| !t.is_empty())
    }
}

// =========================================================
// Serde 辅助
// =========================================================

/// 将 JSON `null` 视为字段类型的默认值
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
