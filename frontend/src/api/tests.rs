use super::*;
use crate::session::Session;
use crate::token::tests::make_token;
use crate::views::movie_list::{ListActions, ListChange, ListScope, MovieList};
use crate::web::{MemoryStorage, MockHttpClient};
use movielist_shared::protocol::HttpMethod;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://api.test/api";

struct Fixture {
    client: Arc<MockHttpClient>,
    session: Arc<SessionStore<MemoryStorage>>,
    gateway: CatalogGateway<MockHttpClient, MemoryStorage>,
}

fn fixture() -> Fixture {
    let client = Arc::new(MockHttpClient::new());
    let session = Arc::new(SessionStore::hydrate(MemoryStorage::default()));
    let api = ApiClient::new(format!("{}/", BASE), Arc::clone(&client), Arc::clone(&session));
    Fixture {
        client,
        session,
        gateway: CatalogGateway::new(api),
    }
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn movie_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Movie {}", id),
        "releaseYear": 2001,
        "posterUrl": "",
        "status": status,
        "genre": "Drama",
        "runtime": 100,
        "rating": null,
        "review": null,
        "userId": 1,
        "username": "alice",
        "likesCount": 0,
        "commentsCount": 0,
        "userLiked": false
    })
}

// =========================================================
// 请求构造测试
// =========================================================

#[tokio::test]
async fn test_list_by_status_returns_body_unmodified() {
    let fx = fixture();
    let body = json!([movie_json(1, "WISHLIST"), movie_json(2, "WISHLIST")]);
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/movies?status=WISHLIST"),
        200,
        body.clone(),
    );

    let movies = fx.gateway.list(Some(MovieStatus::Wishlist)).await.unwrap();

    let req = fx.client.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, url("/movies?status=WISHLIST"));
    assert_eq!(serde_json::to_value(&movies).unwrap(), body);
}

#[tokio::test]
async fn test_list_without_status_hits_collection() {
    let fx = fixture();
    fx.client.mock_response(HttpMethod::Get, &url("/movies"), 200, json!([]));

    let movies = fx.gateway.list(None).await.unwrap();

    assert!(movies.is_empty());
    assert_eq!(fx.client.last_request().unwrap().url, url("/movies"));
}

#[tokio::test]
async fn test_watched_shorthand() {
    let fx = fixture();
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/movies?status=WATCHED"),
        200,
        json!([movie_json(3, "WATCHED")]),
    );

    let movies = fx.gateway.watched().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].status, MovieStatus::Watched);
}

#[tokio::test]
async fn test_bearer_token_attached_when_signed_in() {
    let fx = fixture();
    let token = make_token(json!({"sub": "alice", "id": 1}));
    fx.session.set_session(Session::from_token(&token).unwrap());
    fx.client
        .mock_response(HttpMethod::Get, &url("/movies/5"), 200, movie_json(5, "WATCHED"));

    let movie = fx.gateway.get(5).await.unwrap();

    assert_eq!(movie.id, 5);
    let req = fx.client.last_request().unwrap();
    assert_eq!(
        req.header("Authorization"),
        Some(format!("Bearer {}", token).as_str())
    );
}

#[tokio::test]
async fn test_no_authorization_header_when_signed_out() {
    let fx = fixture();
    fx.client
        .mock_response(HttpMethod::Get, &url("/tmdb/trending"), 200, json!({"results": []}));

    fx.gateway.trending().await.unwrap();

    assert!(fx.client.last_request().unwrap().header("Authorization").is_none());
}

#[tokio::test]
async fn test_create_sends_json_body() {
    let fx = fixture();
    fx.client
        .mock_response(HttpMethod::Post, &url("/movies"), 201, movie_json(9, "WISHLIST"));

    let draft = Movie {
        title: "Movie 9".to_string(),
        ..Default::default()
    };
    let created = fx.gateway.create(&draft).await.unwrap();

    assert_eq!(created.id, 9);
    let req = fx.client.last_request().unwrap();
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["title"], "Movie 9");
    assert_eq!(sent["status"], "WISHLIST");
}

#[tokio::test]
async fn test_update_uses_put_with_full_record() {
    let fx = fixture();
    fx.client
        .mock_response(HttpMethod::Put, &url("/movies/4"), 200, movie_json(4, "WATCHED"));

    let movie: Movie = serde_json::from_value(movie_json(4, "WISHLIST")).unwrap();
    let updated = fx
        .gateway
        .update(4, &movie.with_status(MovieStatus::Watched))
        .await
        .unwrap();

    assert_eq!(updated.status, MovieStatus::Watched);
    let req = fx.client.last_request().unwrap();
    let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["status"], "WATCHED");
    assert_eq!(sent["genre"], "Drama");
}

#[tokio::test]
async fn test_mark_watched_sends_back_unknown_fields() {
    let fx = fixture();
    let mut listed = movie_json(4, "WISHLIST");
    listed["tmdbId"] = json!(949);
    listed["createdAt"] = json!("2024-01-01T10:00:00");
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/movies?status=WISHLIST"),
        200,
        json!([listed]),
    );
    fx.client
        .mock_response(HttpMethod::Put, &url("/movies/4"), 200, movie_json(4, "WATCHED"));

    let movies = fx.gateway.wishlist().await.unwrap();
    let list = MovieList::new(ListScope::Wishlist, movies);
    let change = ListActions::new(&fx.gateway)
        .mark_watched(&list, 4)
        .await
        .unwrap();

    assert_eq!(change, Some(ListChange::Removed(4)));
    let req = fx.client.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Put);
    let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["status"], "WATCHED");
    assert_eq!(sent["tmdbId"], 949);
    assert_eq!(sent["createdAt"], "2024-01-01T10:00:00");
}

#[tokio::test]
async fn test_delete_accepts_api_response_body() {
    let fx = fixture();
    fx.client.mock_response(
        HttpMethod::Delete,
        &url("/movies/4"),
        200,
        json!({"success": true, "message": "Movie deleted successfully"}),
    );

    fx.gateway.delete(4).await.unwrap();
}

#[tokio::test]
async fn test_like_and_unlike_share_path() {
    let fx = fixture();
    fx.client.mock_raw(HttpMethod::Post, &url("/movies/4/like"), 200, "");
    fx.client.mock_raw(HttpMethod::Delete, &url("/movies/4/like"), 204, "");

    fx.gateway.like(4).await.unwrap();
    fx.gateway.unlike(4).await.unwrap();

    let requests = fx.client.requests.borrow();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].body.as_deref(), Some("{}"));
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert!(requests[1].body.is_none());
}

#[tokio::test]
async fn test_comments_round_trip() {
    let fx = fixture();
    fx.client.mock_response(
        HttpMethod::Post,
        &url("/movies/4/comments"),
        201,
        json!({"id": 11, "content": "loved it", "username": "alice"}),
    );
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/movies/4/comments"),
        200,
        json!([{"id": 11, "content": "loved it"}]),
    );

    let comment = fx.gateway.add_comment(4, "loved it").await.unwrap();
    assert_eq!(comment.id, Some(11));
    let sent = fx.client.last_request().unwrap().body.unwrap();
    assert_eq!(sent, r#"{"content":"loved it"}"#);

    let comments = fx.gateway.list_comments(4).await.unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn test_search_encodes_query() {
    let fx = fixture();
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/tmdb/search?query=the%20thing%3F"),
        200,
        json!({"page": 1, "results": [{"title": "The Thing", "release_date": "1982-06-25"}]}),
    );

    let page = fx.gateway.search("the thing?").await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].release_year(), Some(1982));
}

#[tokio::test]
async fn test_supplementary_catalog_listings() {
    let fx = fixture();
    fx.client
        .mock_response(HttpMethod::Get, &url("/tmdb/popular"), 200, json!({"results": []}));
    fx.client
        .mock_response(HttpMethod::Get, &url("/tmdb/top-rated"), 200, json!({"results": []}));
    fx.client
        .mock_response(HttpMethod::Get, &url("/tmdb/upcoming"), 200, json!({"results": []}));
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/tmdb/movie/603/recommendations"),
        200,
        json!({"page": 1, "results": [{"id": 604, "title": "The Matrix Reloaded"}]}),
    );
    fx.client
        .mock_response(HttpMethod::Get, &url("/tmdb/movie/603"), 200, movie_json(0, "WISHLIST"));
    fx.client.mock_response(
        HttpMethod::Get,
        &url("/users/me"),
        200,
        json!({"id": 1, "username": "alice", "email": "a@example.com", "bio": null}),
    );

    fx.gateway.popular().await.unwrap();
    fx.gateway.top_rated().await.unwrap();
    fx.gateway.upcoming().await.unwrap();
    let similar = fx.gateway.recommendations(603).await.unwrap();
    assert_eq!(similar.results[0].id, Some(604));
    assert_eq!(fx.gateway.external_details(603).await.unwrap().title, "Movie 0");
    assert_eq!(fx.gateway.current_profile().await.unwrap().username, "alice");
}

// =========================================================
// 错误映射测试
// =========================================================

#[tokio::test]
async fn test_server_error_maps_to_server_side() {
    let fx = fixture();
    fx.client.mock_response(
        HttpMethod::Delete,
        &url("/movies/404"),
        404,
        json!({"message": "Movie not found with id : '404'"}),
    );

    let err = fx.gateway.delete(404).await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::ServerSide(404, "Movie not found with id : '404'".to_string())
    );
}

#[tokio::test]
async fn test_unmocked_route_is_server_side_404() {
    let fx = fixture();
    let err = fx.gateway.get(1).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_network_failure_maps_to_client_side() {
    let fx = fixture();
    fx.client.mock_network_failure(&url("/tmdb/trending"));

    let err = fx.gateway.trending().await.unwrap_err();
    assert!(matches!(err, CatalogError::ClientSide(_)));
    assert!(err.to_string().starts_with("Error: "));
}

#[tokio::test]
async fn test_malformed_success_body_maps_to_client_side() {
    let fx = fixture();
    fx.client.mock_raw(HttpMethod::Get, &url("/movies/1"), 200, "<html>oops</html>");

    let err = fx.gateway.get(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::ClientSide(_)));
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let fx = fixture();
    fx.client.mock_raw(HttpMethod::Get, &url("/movies"), 500, "");

    assert!(fx.gateway.list(None).await.is_err());
    assert_eq!(fx.client.request_count(), 1);
}
