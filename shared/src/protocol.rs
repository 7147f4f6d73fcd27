use crate::{
    AuthResponse, CatalogPage, Comment, Movie, MovieStatus, SignInRequest, SignUpRequest,
    UserProfile,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::{Value, json};
use std::fmt;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths are relative to the configured API base (e.g. `http://host/api`).
pub trait Endpoint {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request carries the session's bearer token.
    const AUTHENTICATED: bool = true;

    /// The URL path including any query string.
    fn path(&self) -> String;

    /// JSON body, if the endpoint sends one.
    fn body(&self) -> serde_json::Result<Option<Value>> {
        Ok(None)
    }
}

// =========================================================
// Auth
// =========================================================

pub struct SignIn(pub SignInRequest);

impl Endpoint for SignIn {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/signin".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(&self.0).map(Some)
    }
}

pub struct SignUp(pub SignUpRequest);

impl Endpoint for SignUp {
    // 后端返回 { success, message }，客户端不关心内容
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/signup".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(&self.0).map(Some)
    }
}

// =========================================================
// Movies
// =========================================================

/// List movies, optionally filtered by status
pub struct ListMovies {
    pub status: Option<MovieStatus>,
}

impl Endpoint for ListMovies {
    type Response = Vec<Movie>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.status {
            Some(status) => format!("/movies?status={}", status),
            None => "/movies".to_string(),
        }
    }
}

pub struct GetMovie {
    pub id: i64,
}

impl Endpoint for GetMovie {
    type Response = Movie;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/movies/{}", self.id)
    }
}

/// Create a movie; the server assigns the id
pub struct CreateMovie<'a> {
    pub movie: &'a Movie,
}

impl Endpoint for CreateMovie<'_> {
    type Response = Movie;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/movies".to_string()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.movie).map(Some)
    }
}

/// Replace a movie record
pub struct UpdateMovie<'a> {
    pub id: i64,
    pub movie: &'a Movie,
}

impl Endpoint for UpdateMovie<'_> {
    type Response = Movie;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/movies/{}", self.id)
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.movie).map(Some)
    }
}

pub struct DeleteMovie {
    pub id: i64,
}

impl Endpoint for DeleteMovie {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/movies/{}", self.id)
    }
}

pub struct LikeMovie {
    pub id: i64,
}

impl Endpoint for LikeMovie {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/movies/{}/like", self.id)
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        Ok(Some(json!({})))
    }
}

pub struct UnlikeMovie {
    pub id: i64,
}

impl Endpoint for UnlikeMovie {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/movies/{}/like", self.id)
    }
}

pub struct AddComment<'a> {
    pub id: i64,
    pub content: &'a str,
}

impl Endpoint for AddComment<'_> {
    type Response = Comment;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/movies/{}/comments", self.id)
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        Ok(Some(json!({ "content": self.content })))
    }
}

pub struct ListComments {
    pub id: i64,
}

impl Endpoint for ListComments {
    type Response = Vec<Comment>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/movies/{}/comments", self.id)
    }
}

// =========================================================
// External catalog (TMDB passthrough)
// =========================================================

pub struct SearchCatalog<'a> {
    pub query: &'a str,
}

impl Endpoint for SearchCatalog<'_> {
    type Response = CatalogPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/tmdb/search?query={}", encode_query_component(self.query))
    }
}

/// Parameterless catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogListing {
    Trending,
    Popular,
    TopRated,
    Upcoming,
}

impl Endpoint for CatalogListing {
    type Response = CatalogPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self {
            CatalogListing::Trending => "/tmdb/trending",
            CatalogListing::Popular => "/tmdb/popular",
            CatalogListing::TopRated => "/tmdb/top-rated",
            CatalogListing::Upcoming => "/tmdb/upcoming",
        }
        .to_string()
    }
}

/// Details of an external title, already converted to a movie by the backend
pub struct CatalogDetails {
    pub tmdb_id: i64,
}

impl Endpoint for CatalogDetails {
    type Response = Movie;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/tmdb/movie/{}", self.tmdb_id)
    }
}

/// Titles the external catalog recommends alongside another title
pub struct CatalogRecommendations {
    pub tmdb_id: i64,
}

impl Endpoint for CatalogRecommendations {
    type Response = CatalogPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/tmdb/movie/{}/recommendations", self.tmdb_id)
    }
}

// =========================================================
// Users
// =========================================================

pub struct CurrentProfile;

impl Endpoint for CurrentProfile {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users/me".to_string()
    }
}

/// Percent-encode a query component with `encodeURIComponent` rules.
pub fn encode_query_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    out
}
