//! 后端 API 访问层
//!
//! - [`ApiClient`]: 拼接地址、附加 Bearer 令牌、统一错误并记录日志
//! - [`CatalogGateway`]: 片单/评论/外部目录的类型化接口

use crate::error::CatalogError;
use crate::session::SessionStore;
use crate::web::{FetchHttpClient, HttpClient, HttpRequest, KeyValueStorage, LocalStorage};
use leptos::prelude::{GetValue, StoredValue, use_context};
use movielist_shared::protocol::{
    AddComment, CatalogDetails, CatalogListing, CatalogRecommendations, CreateMovie,
    CurrentProfile, DeleteMovie, Endpoint, GetMovie, LikeMovie, ListComments, ListMovies,
    SearchCatalog, UnlikeMovie, UpdateMovie,
};
use movielist_shared::{CatalogPage, Comment, HEADER_AUTHORIZATION, Movie, MovieStatus, UserProfile};
use std::sync::Arc;

// =========================================================
// ApiClient
// =========================================================

pub struct ApiClient<C, S: KeyValueStorage> {
    base_url: String,
    client: Arc<C>,
    session: Arc<SessionStore<S>>,
}

impl<C, S: KeyValueStorage> Clone for ApiClient<C, S> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: Arc::clone(&self.client),
            session: Arc::clone(&self.session),
        }
    }
}

impl<C: HttpClient, S: KeyValueStorage> ApiClient<C, S> {
    pub fn new(base_url: impl Into<String>, client: Arc<C>, session: Arc<SessionStore<S>>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore<S>> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个端点请求
    ///
    /// 失败时先记录日志，再把统一后的错误返回给调用方。不做重试。
    pub async fn send<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, CatalogError> {
        let url = self.url(&endpoint.path());
        let result = self.exchange(&url, endpoint).await;
        if let Err(e) = &result {
            log::error!("{} {} failed: {}", E::METHOD, url, e);
        }
        result
    }

    async fn exchange<E: Endpoint>(
        &self,
        url: &str,
        endpoint: &E,
    ) -> Result<E::Response, CatalogError> {
        let mut req = HttpRequest::new(url, E::METHOD).with_header("Accept", "application/json");

        if E::AUTHENTICATED {
            if let Some(token) = self.session.bearer_token() {
                req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
            }
        }

        let body = endpoint
            .body()
            .map_err(|e| CatalogError::ClientSide(e.to_string()))?;
        if let Some(body) = body {
            req = req
                .with_header("Content-Type", "application/json")
                .with_body(body.to_string());
        }

        let resp = self.client.send(req).await?;
        if !resp.ok() {
            return Err(CatalogError::from_response(url, &resp));
        }

        resp.json::<E::Response>()
            .map_err(|e| CatalogError::ClientSide(e.to_string()))
    }
}

// =========================================================
// CatalogGateway
// =========================================================

/// 片单与外部目录网关
///
/// 无状态门面：每个方法对应一次请求/响应往返，不缓存、不分页。
pub struct CatalogGateway<C, S: KeyValueStorage> {
    api: ApiClient<C, S>,
}

impl<C, S: KeyValueStorage> Clone for CatalogGateway<C, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStorage> CatalogGateway<C, S> {
    pub fn new(api: ApiClient<C, S>) -> Self {
        Self { api }
    }

    /// 获取片单，`status` 为空时返回全部
    pub async fn list(&self, status: Option<MovieStatus>) -> Result<Vec<Movie>, CatalogError> {
        self.api.send(&ListMovies { status }).await
    }

    pub async fn wishlist(&self) -> Result<Vec<Movie>, CatalogError> {
        self.list(Some(MovieStatus::Wishlist)).await
    }

    pub async fn watched(&self) -> Result<Vec<Movie>, CatalogError> {
        self.list(Some(MovieStatus::Watched)).await
    }

    pub async fn get(&self, id: i64) -> Result<Movie, CatalogError> {
        self.api.send(&GetMovie { id }).await
    }

    pub async fn create(&self, movie: &Movie) -> Result<Movie, CatalogError> {
        self.api.send(&CreateMovie { movie }).await
    }

    /// 整条记录替换
    pub async fn update(&self, id: i64, movie: &Movie) -> Result<Movie, CatalogError> {
        self.api.send(&UpdateMovie { id, movie }).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        self.api.send(&DeleteMovie { id }).await.map(drop)
    }

    pub async fn like(&self, id: i64) -> Result<(), CatalogError> {
        self.api.send(&LikeMovie { id }).await.map(drop)
    }

    pub async fn unlike(&self, id: i64) -> Result<(), CatalogError> {
        self.api.send(&UnlikeMovie { id }).await.map(drop)
    }

    pub async fn add_comment(&self, id: i64, content: &str) -> Result<Comment, CatalogError> {
        self.api.send(&AddComment { id, content }).await
    }

    pub async fn list_comments(&self, id: i64) -> Result<Vec<Comment>, CatalogError> {
        self.api.send(&ListComments { id }).await
    }

    /// 外部目录搜索
    pub async fn search(&self, query: &str) -> Result<CatalogPage, CatalogError> {
        self.api.send(&SearchCatalog { query }).await
    }

    pub async fn trending(&self) -> Result<CatalogPage, CatalogError> {
        self.api.send(&CatalogListing::Trending).await
    }

    pub async fn popular(&self) -> Result<CatalogPage, CatalogError> {
        self.api.send(&CatalogListing::Popular).await
    }

    pub async fn top_rated(&self) -> Result<CatalogPage, CatalogError> {
        self.api.send(&CatalogListing::TopRated).await
    }

    pub async fn upcoming(&self) -> Result<CatalogPage, CatalogError> {
        self.api.send(&CatalogListing::Upcoming).await
    }

    /// 外部影片详情（后端已转换为电影记录）
    pub async fn external_details(&self, tmdb_id: i64) -> Result<Movie, CatalogError> {
        self.api.send(&CatalogDetails { tmdb_id }).await
    }

    pub async fn recommendations(&self, tmdb_id: i64) -> Result<CatalogPage, CatalogError> {
        self.api.send(&CatalogRecommendations { tmdb_id }).await
    }

    pub async fn current_profile(&self) -> Result<UserProfile, CatalogError> {
        self.api.send(&CurrentProfile).await
    }
}

// =========================================================
// CatalogContext (leptos)
// =========================================================

pub type BrowserCatalogGateway = CatalogGateway<FetchHttpClient, LocalStorage>;

/// 目录网关上下文
#[derive(Clone, Copy)]
pub struct CatalogContext(StoredValue<BrowserCatalogGateway>);

impl CatalogContext {
    pub fn new(gateway: BrowserCatalogGateway) -> Self {
        Self(StoredValue::new(gateway))
    }
}

/// 从 Context 获取目录网关
pub fn use_catalog() -> BrowserCatalogGateway {
    use_context::<CatalogContext>()
        .expect("CatalogContext should be provided")
        .0
        .get_value()
}

#[cfg(test)]
mod tests;
