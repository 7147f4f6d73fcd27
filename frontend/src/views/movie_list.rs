//! 片单视图状态
//!
//! 每个列表视图持有一份自己的电影副本。变更动作成功后直接修补本地副本，
//! 不重新拉取；失败时只记录日志，列表保持原样。

use crate::api::CatalogGateway;
use crate::error::CatalogError;
use crate::web::{HttpClient, KeyValueStorage};
use movielist_shared::{CatalogResult, Movie, MovieStatus};

/// 列表视图当前展示的范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Wishlist,
    Watched,
    All,
    Discover,
}

impl ListScope {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Wishlist => "My Wishlist",
            Self::Watched => "Watched Movies",
            Self::All => "All Movies",
            Self::Discover => "Discover",
        }
    }
}

/// 对本地列表的一次修补
#[derive(Debug, Clone, PartialEq)]
pub enum ListChange {
    Removed(i64),
    Replaced(Movie),
    Appended(Movie),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieList {
    scope: ListScope,
    movies: Vec<Movie>,
}

impl MovieList {
    pub fn new(scope: ListScope, movies: Vec<Movie>) -> Self {
        Self { scope, movies }
    }

    pub fn empty(scope: ListScope) -> Self {
        Self::new(scope, Vec::new())
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn apply(&mut self, change: ListChange) {
        match change {
            ListChange::Removed(id) => self.movies.retain(|m| m.id != id),
            ListChange::Replaced(movie) => {
                if let Some(slot) = self.movies.iter_mut().find(|m| m.id == movie.id) {
                    *slot = movie;
                }
            }
            ListChange::Appended(movie) => self.movies.push(movie),
        }
    }
}

/// 按视图范围拉取列表；发现页不持有自己的片单
pub async fn load<C: HttpClient, S: KeyValueStorage>(
    gateway: &CatalogGateway<C, S>,
    scope: ListScope,
) -> Result<MovieList, CatalogError> {
    let movies = match scope {
        ListScope::Wishlist => gateway.wishlist().await?,
        ListScope::Watched => gateway.watched().await?,
        ListScope::All => gateway.list(None).await?,
        ListScope::Discover => Vec::new(),
    };
    Ok(MovieList::new(scope, movies))
}

// =========================================================
// 变更动作
// =========================================================

/// 列表变更动作
///
/// 流程：在本地列表中按 id 查找目标（找不到则什么也不做）-> 调用网关 ->
/// 成功后返回需要应用的修补。返回 `Ok(None)` 表示目标不在列表中。
pub struct ListActions<'a, C, S: KeyValueStorage> {
    gateway: &'a CatalogGateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStorage> ListActions<'a, C, S> {
    pub fn new(gateway: &'a CatalogGateway<C, S>) -> Self {
        Self { gateway }
    }

    pub async fn delete(
        &self,
        list: &MovieList,
        id: i64,
    ) -> Result<Option<ListChange>, CatalogError> {
        if list.find(id).is_none() {
            return Ok(None);
        }
        self.gateway.delete(id).await?;
        Ok(Some(ListChange::Removed(id)))
    }

    /// 标记为已看：想看列表中移除，其余视图原地替换
    pub async fn mark_watched(
        &self,
        list: &MovieList,
        id: i64,
    ) -> Result<Option<ListChange>, CatalogError> {
        self.change_status(list, id, MovieStatus::Watched, ListScope::Wishlist)
            .await
    }

    /// 移回想看：已看列表中移除，其余视图原地替换
    pub async fn move_to_wishlist(
        &self,
        list: &MovieList,
        id: i64,
    ) -> Result<Option<ListChange>, CatalogError> {
        self.change_status(list, id, MovieStatus::Wishlist, ListScope::Watched)
            .await
    }

    async fn change_status(
        &self,
        list: &MovieList,
        id: i64,
        status: MovieStatus,
        leaves: ListScope,
    ) -> Result<Option<ListChange>, CatalogError> {
        let Some(movie) = list.find(id) else {
            return Ok(None);
        };
        let updated = movie.with_status(status);
        self.gateway.update(id, &updated).await?;
        if list.scope() == leaves {
            Ok(Some(ListChange::Removed(id)))
        } else {
            Ok(Some(ListChange::Replaced(updated)))
        }
    }

    /// 点赞/取消点赞，取决于当前的 `userLiked`
    pub async fn toggle_like(
        &self,
        list: &MovieList,
        id: i64,
    ) -> Result<Option<ListChange>, CatalogError> {
        let Some(movie) = list.find(id) else {
            return Ok(None);
        };
        if movie.user_liked {
            self.gateway.unlike(id).await?;
        } else {
            self.gateway.like(id).await?;
        }
        Ok(Some(ListChange::Replaced(movie.with_like(!movie.user_liked))))
    }

    /// 把外部目录条目加入想看
    ///
    /// 只有想看列表会把新建的电影追加进来。
    pub async fn add_from_catalog(
        &self,
        list: &MovieList,
        result: &CatalogResult,
    ) -> Result<Option<ListChange>, CatalogError> {
        let created = self.gateway.create(&result.to_new_movie()).await?;
        log::info!("Added \"{}\" to wishlist", created.title);
        match list.scope() {
            ListScope::Wishlist => Ok(Some(ListChange::Appended(created))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::session::SessionStore;
    use crate::web::{MemoryStorage, MockHttpClient};
    use movielist_shared::protocol::HttpMethod;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://api.test/api";

    fn gateway() -> (Arc<MockHttpClient>, CatalogGateway<MockHttpClient, MemoryStorage>) {
        let client = Arc::new(MockHttpClient::new());
        let session = Arc::new(SessionStore::hydrate(MemoryStorage::default()));
        let api = ApiClient::new(BASE, Arc::clone(&client), session);
        (client, CatalogGateway::new(api))
    }

    fn movie(id: i64, status: MovieStatus) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            status,
            genre: "Drama".to_string(),
            runtime: 95,
            likes_count: 3,
            ..Default::default()
        }
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    #[tokio::test]
    async fn test_load_uses_scope_filter() {
        let (client, gateway) = gateway();
        let listed = serde_json::to_value(vec![movie(1, MovieStatus::Watched)]).unwrap();
        client.mock_response(HttpMethod::Get, &url("/movies?status=WATCHED"), 200, listed.clone());
        client.mock_response(HttpMethod::Get, &url("/movies"), 200, listed);

        let watched = load(&gateway, ListScope::Watched).await.unwrap();
        assert_eq!(watched.scope(), ListScope::Watched);
        assert_eq!(watched.movies().len(), 1);

        let all = load(&gateway, ListScope::All).await.unwrap();
        assert_eq!(all.movies().len(), 1);
        assert_eq!(client.last_request().unwrap().url, url("/movies"));

        let discover = load(&gateway, ListScope::Discover).await.unwrap();
        assert!(discover.is_empty());
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test]
    async fn test_mark_watched_removes_from_wishlist() {
        let (client, gateway) = gateway();
        let mut list = MovieList::new(
            ListScope::Wishlist,
            vec![movie(1, MovieStatus::Wishlist), movie(2, MovieStatus::Wishlist)],
        );
        let watched = movie(1, MovieStatus::Watched);
        client.mock_response(
            HttpMethod::Put,
            &url("/movies/1"),
            200,
            serde_json::to_value(&watched).unwrap(),
        );

        let change = ListActions::new(&gateway).mark_watched(&list, 1).await.unwrap();
        list.apply(change.unwrap());

        assert!(list.find(1).is_none());
        assert_eq!(list.movies().len(), 1);
        let sent: serde_json::Value =
            serde_json::from_str(client.last_request().unwrap().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["status"], "WATCHED");
    }

    #[tokio::test]
    async fn test_mark_watched_replaces_in_combined_list() {
        let (client, gateway) = gateway();
        let mut list = MovieList::new(
            ListScope::All,
            vec![movie(1, MovieStatus::Wishlist), movie(2, MovieStatus::Watched)],
        );
        client.mock_response(
            HttpMethod::Put,
            &url("/movies/1"),
            200,
            serde_json::to_value(movie(1, MovieStatus::Watched)).unwrap(),
        );

        let change = ListActions::new(&gateway).mark_watched(&list, 1).await.unwrap();
        list.apply(change.unwrap());

        assert_eq!(list.movies().len(), 2);
        assert_eq!(list.movies()[0].id, 1);
        assert_eq!(list.movies()[0].status, MovieStatus::Watched);
    }

    #[tokio::test]
    async fn test_move_to_wishlist_removes_from_watched() {
        let (client, gateway) = gateway();
        let mut list = MovieList::new(ListScope::Watched, vec![movie(5, MovieStatus::Watched)]);
        client.mock_response(
            HttpMethod::Put,
            &url("/movies/5"),
            200,
            serde_json::to_value(movie(5, MovieStatus::Wishlist)).unwrap(),
        );

        let change = ListActions::new(&gateway)
            .move_to_wishlist(&list, 5)
            .await
            .unwrap();
        list.apply(change.unwrap());

        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_like_then_unlike_adjusts_counter() {
        let (client, gateway) = gateway();
        let mut list = MovieList::new(ListScope::Wishlist, vec![movie(1, MovieStatus::Wishlist)]);
        client.mock_raw(HttpMethod::Post, &url("/movies/1/like"), 200, "");
        client.mock_raw(HttpMethod::Delete, &url("/movies/1/like"), 200, "");
        let actions = ListActions::new(&gateway);

        let change = actions.toggle_like(&list, 1).await.unwrap();
        list.apply(change.unwrap());
        assert_eq!(list.find(1).unwrap().likes_count, 4);
        assert!(list.find(1).unwrap().user_liked);

        let change = actions.toggle_like(&list, 1).await.unwrap();
        list.apply(change.unwrap());
        assert_eq!(list.find(1).unwrap().likes_count, 3);
        assert!(!list.find(1).unwrap().user_liked);

        let methods: Vec<HttpMethod> = client.requests.borrow().iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Delete]);
    }

    #[tokio::test]
    async fn test_delete_server_error_leaves_list_unmodified() {
        let (client, gateway) = gateway();
        let mut list = MovieList::new(ListScope::Wishlist, vec![movie(404, MovieStatus::Wishlist)]);
        let before = list.clone();
        client.mock_response(
            HttpMethod::Delete,
            &url("/movies/404"),
            404,
            json!({"message": "Movie not found"}),
        );

        let result = ListActions::new(&gateway).delete(&list, 404).await;

        match &result {
            Err(CatalogError::ServerSide(status, _)) => assert_eq!(*status, 404),
            other => panic!("unexpected result: {:?}", other),
        }
        if let Ok(Some(change)) = result {
            list.apply(change);
        }
        assert_eq!(list, before);
    }

    #[tokio::test]
    async fn test_delete_removes_on_success() {
        let (client, gateway) = gateway();
        let mut list = MovieList::new(
            ListScope::Watched,
            vec![movie(1, MovieStatus::Watched), movie(2, MovieStatus::Watched)],
        );
        client.mock_response(HttpMethod::Delete, &url("/movies/2"), 200, json!({"success": true}));

        let change = ListActions::new(&gateway).delete(&list, 2).await.unwrap();
        list.apply(change.unwrap());

        assert_eq!(list.movies().iter().map(|m| m.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_absent_target_is_noop_without_request() {
        let (client, gateway) = gateway();
        let list = MovieList::new(ListScope::Wishlist, vec![movie(1, MovieStatus::Wishlist)]);
        let actions = ListActions::new(&gateway);

        assert_eq!(actions.delete(&list, 99).await.unwrap(), None);
        assert_eq!(actions.mark_watched(&list, 99).await.unwrap(), None);
        assert_eq!(actions.toggle_like(&list, 99).await.unwrap(), None);
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_add_from_catalog_appends_only_on_wishlist() {
        let (client, gateway) = gateway();
        let result: CatalogResult = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "poster_path": "/matrix.jpg",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "runtime": 136
        }))
        .unwrap();
        client.mock_response(
            HttpMethod::Post,
            &url("/movies"),
            201,
            serde_json::to_value(Movie {
                id: 10,
                ..result.to_new_movie()
            })
            .unwrap(),
        );
        let actions = ListActions::new(&gateway);

        let mut wishlist = MovieList::empty(ListScope::Wishlist);
        let change = actions.add_from_catalog(&wishlist, &result).await.unwrap();
        wishlist.apply(change.unwrap());
        assert_eq!(wishlist.movies()[0].id, 10);
        assert_eq!(wishlist.movies()[0].genre, "Action, Science Fiction");

        let discover = MovieList::empty(ListScope::Discover);
        assert_eq!(actions.add_from_catalog(&discover, &result).await.unwrap(), None);

        let sent: serde_json::Value =
            serde_json::from_str(client.last_request().unwrap().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["status"], "WISHLIST");
        assert_eq!(sent["releaseYear"], 1999);
        assert_eq!(sent["posterUrl"], "https://image.tmdb.org/t/p/w500/matrix.jpg");
    }

    #[test]
    fn test_replace_of_missing_item_is_ignored() {
        let mut list = MovieList::new(ListScope::All, vec![movie(1, MovieStatus::Wishlist)]);
        list.apply(ListChange::Replaced(movie(2, MovieStatus::Watched)));
        assert_eq!(list.movies().len(), 1);
        assert_eq!(list.movies()[0].id, 1);
    }
}
