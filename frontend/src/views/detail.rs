//! 详情页视图状态：单部电影及其评论

use crate::api::CatalogGateway;
use crate::error::CatalogError;
use crate::web::{HttpClient, KeyValueStorage};
use movielist_shared::{Comment, Movie};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub movie: Option<Movie>,
    pub comments: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// 电影加载失败时整页报错；评论加载失败只记录日志
    pub fn finish_load(
        &mut self,
        movie: Result<Movie, CatalogError>,
        comments: Result<Vec<Comment>, CatalogError>,
    ) {
        self.loading = false;
        match movie {
            Ok(movie) => self.movie = Some(movie),
            Err(e) => {
                log::error!("Error loading movie: {}", e);
                self.error = Some(e.to_string());
            }
        }
        match comments {
            Ok(comments) => self.comments = comments,
            Err(e) => log::error!("Error loading comments: {}", e),
        }
    }

    /// 追加服务端返回的新评论并同步评论计数
    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
        if let Some(movie) = self.movie.as_mut() {
            movie.comments_count += 1;
        }
    }

    pub fn set_movie(&mut self, movie: Movie) {
        self.movie = Some(movie);
    }
}

/// 并发拉取电影与评论
pub async fn load<C: HttpClient, S: KeyValueStorage>(
    gateway: &CatalogGateway<C, S>,
    id: i64,
) -> (Result<Movie, CatalogError>, Result<Vec<Comment>, CatalogError>) {
    futures::join!(gateway.get(id), gateway.list_comments(id))
}
