//! 外部影片目录 (TMDB 透传) 的数据结构
//!
//! 外部接口返回的对象字段并不稳定，这里统一用全可选字段承接，
//! 只有在用户明确「加入想看」时才转换为严格的 [`Movie`]。

use crate::{Movie, MovieStatus, nullable};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 海报图片 CDN 前缀
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogGenre {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// 外部目录中的单条影片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogResult {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<CatalogGenre>>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CatalogResult {
    /// 上映年份；日期缺失或无法解析时为 `None`
    pub fn release_year(&self) -> Option<i32> {
        let raw = self.release_date.as_deref()?.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.year());
        }
        // 部分条目只有年份
        if raw.len() == 4 {
            return raw.parse().ok();
        }
        None
    }

    /// 完整的海报地址，没有海报时为空字符串
    pub fn poster_url(&self) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", POSTER_BASE_URL, path),
            _ => String::new(),
        }
    }

    /// 以 `", "` 连接的类型名
    pub fn genre_names(&self) -> String {
        self.genres
            .as_ref()
            .map(|genres| {
                genres
                    .iter()
                    .map(|g| g.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }

    /// 转换为待创建的想看条目
    ///
    /// id 与归属用户由服务端分配，这里保持为默认值。
    pub fn to_new_movie(&self) -> Movie {
        Movie {
            id: 0,
            title: self.title.clone().unwrap_or_default(),
            release_year: self.release_year(),
            poster_url: self.poster_url(),
            status: MovieStatus::Wishlist,
            genre: self.genre_names(),
            runtime: self.runtime.unwrap_or(0),
            rating: None,
            review: None,
            user_id: 0,
            username: String::new(),
            likes_count: 0,
            comments_count: 0,
            user_liked: false,
            extra: serde_json::Map::new(),
        }
    }
}

/// 搜索 / 热门接口返回的分页结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub results: Vec<CatalogResult>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_new_movie_from_full_result() {
        let result: CatalogResult = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "poster_path": "/matrix.jpg",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "runtime": 136,
            "popularity": 83.1
        }))
        .unwrap();

        let movie = result.to_new_movie();
        assert_eq!(movie.id, 0);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.release_year, Some(1999));
        assert_eq!(movie.poster_url, "https://image.tmdb.org/t/p/w500/matrix.jpg");
        assert_eq!(movie.genre, "Action, Science Fiction");
        assert_eq!(movie.runtime, 136);
        assert_eq!(movie.status, MovieStatus::Wishlist);
        assert!(result.extra.contains_key("popularity"));
    }

    #[test]
    fn test_to_new_movie_from_sparse_result() {
        let result: CatalogResult = serde_json::from_value(json!({
            "title": "Untitled",
            "release_date": "",
            "poster_path": null,
            "genre_ids": [18]
        }))
        .unwrap();

        let movie = result.to_new_movie();
        assert_eq!(movie.release_year, None);
        assert_eq!(movie.poster_url, "");
        assert_eq!(movie.genre, "");
        assert_eq!(movie.runtime, 0);
    }

    #[test]
    fn test_page_results_default_to_empty() {
        let page: CatalogPage = serde_json::from_value(json!({"page": 1})).unwrap();
        assert!(page.results.is_empty());

        let page: CatalogPage = serde_json::from_value(json!({"results": null})).unwrap();
        assert!(page.results.is_empty());
    }
}
