//! JWT 载荷解码
//!
//! **安全边界**：这里只解码令牌载荷，不校验签名。客户端信任传输层与后端的签发，
//! 签名由后端在每次请求时校验。客户端只会因为字段缺失、无法解析或已过期而
//! 拒绝令牌，绝不会因为签名不符而拒绝。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token must have three dot-separated segments, found {0}")]
    Segments(usize),
    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// 令牌载荷中客户端关心的声明
///
/// 不同后端版本对 id/用户名使用了不同的声明名，两种都接受。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    /// 过期时间（Unix 秒）
    #[serde(default)]
    pub exp: Option<f64>,
}

impl TokenClaims {
    /// 解码 `header.payload.signature` 中的载荷
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::Segments(segments.len()));
        }

        // 兼容标准 base64 字符集与填充
        let payload: String = segments[1]
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 用户 id：`id`，其次 `userId`；接受数字或数字字符串
    pub fn identity(&self) -> Option<i64> {
        [&self.id, &self.user_id]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
    }

    /// 用户名：`sub`，其次 `username`
    pub fn subject(&self) -> Option<&str> {
        [&self.sub, &self.username]
            .into_iter()
            .filter_map(|claim| claim.as_deref())
            .find(|s| !s.is_empty())
    }

    /// 过期时间；没有 `exp` 声明的令牌永不过期
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|secs| DateTime::from_timestamp(secs.trunc() as i64, 0))
    }

    /// 令牌在 `now` 时刻是否已过期（过期时间等于当前时间也视为过期）
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}
