use crate::token::TokenError;
use crate::web::{HttpError, HttpResponse};

// =========================================================
// 目录网关错误
// =========================================================

/// 统一的请求失败类型
///
/// - `ClientSide`: 请求未能完成（网络错误、请求构建失败、响应无法解析）
/// - `ServerSide`: 后端返回了非 2xx 状态码
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Error: {0}")]
    ClientSide(String),
    #[error("Error Code: {0}\nMessage: {1}")]
    ServerSide(u16, String),
}

impl CatalogError {
    /// 由非 2xx 响应构造错误
    ///
    /// 后端的错误响应形如 `{ "message": "..." }`，取不到时使用通用描述。
    pub fn from_response(url: &str, resp: &HttpResponse) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&resp.body)
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Http failure response for {}: {}", url, resp.status));
        CatalogError::ServerSide(resp.status, message)
    }

    /// 服务端状态码（仅 ServerSide）
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::ServerSide(status, _) => Some(*status),
            CatalogError::ClientSide(_) => None,
        }
    }
}

impl From<HttpError> for CatalogError {
    fn from(e: HttpError) -> Self {
        CatalogError::ClientSide(e.to_string())
    }
}

// =========================================================
// 认证网关错误
// =========================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// 登录响应中既没有 `accessToken` 也没有 `token`
    #[error("Token not found in response")]
    MissingToken,
    /// 令牌载荷无法解码
    #[error("Invalid token format: {0}")]
    MalformedToken(#[source] TokenError),
    /// 后端拒绝或请求失败，原样透出
    #[error(transparent)]
    BackendRejected(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shapes() {
        let client = CatalogError::ClientSide("offline".to_string());
        assert_eq!(client.to_string(), "Error: offline");

        let server = CatalogError::ServerSide(404, "Movie not found".to_string());
        assert_eq!(server.to_string(), "Error Code: 404\nMessage: Movie not found");
    }

    #[test]
    fn test_from_response_prefers_backend_message() {
        let resp = HttpResponse {
            status: 500,
            body: r#"{"success":false,"message":"Failed to delete movie"}"#.to_string(),
        };
        let err = CatalogError::from_response("http://api/movies/1", &resp);
        assert_eq!(
            err,
            CatalogError::ServerSide(500, "Failed to delete movie".to_string())
        );
    }

    #[test]
    fn test_from_response_falls_back_to_generic_message() {
        let resp = HttpResponse {
            status: 404,
            body: "Not Found".to_string(),
        };
        let err = CatalogError::from_response("http://api/movies/1", &resp);
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Error Code: 404\nMessage: Http failure response for http://api/movies/1: 404"
        );
    }
}
