//! 编辑页表单状态
//!
//! 输入框里的值都是字符串，提交时才解析并合并回原记录（整条记录替换）。

use movielist_shared::{Movie, MovieStatus};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("Title is required")]
    MissingTitle,
    #[error("{0} must be a whole number")]
    NotANumber(&'static str),
    #[error("Rating must be between 1 and 10")]
    RatingOutOfRange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub release_year: String,
    pub genre: String,
    pub runtime: String,
    pub status: MovieStatus,
    pub rating: String,
    pub review: String,
}

fn parse_optional<T: std::str::FromStr>(
    raw: &str,
    field: &'static str,
) -> Result<Option<T>, DraftError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| DraftError::NotANumber(field))
}

impl MovieDraft {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            release_year: movie.release_year.map(|y| y.to_string()).unwrap_or_default(),
            genre: movie.genre.clone(),
            runtime: movie.runtime.to_string(),
            status: movie.status,
            rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
            review: movie.review.clone().unwrap_or_default(),
        }
    }

    /// 把表单合并到 `base` 上；计数与归属字段保持不变
    pub fn apply_to(&self, base: &Movie) -> Result<Movie, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        let rating = parse_optional::<i32>(&self.rating, "Rating")?;
        if rating.is_some_and(|r| !(1..=10).contains(&r)) {
            return Err(DraftError::RatingOutOfRange);
        }
        let review = self.review.trim();

        Ok(Movie {
            title: title.to_string(),
            release_year: parse_optional(&self.release_year, "Release year")?,
            genre: self.genre.trim().to_string(),
            runtime: parse_optional(&self.runtime, "Runtime")?.unwrap_or(0),
            status: self.status,
            rating,
            review: (!review.is_empty()).then(|| review.to_string()),
            ..base.clone()
        })
    }
}
