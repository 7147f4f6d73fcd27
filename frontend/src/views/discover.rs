//! 发现页视图状态
//!
//! 榜单与搜索结果分开存放。榜单加载与搜索各自维护一个代数，每次发起请求都会递增，
//! 只有代数仍然是最新的响应才会被写入，后发起的请求总是胜出。

use crate::api::CatalogGateway;
use crate::error::CatalogError;
use crate::web::{HttpClient, KeyValueStorage};
use movielist_shared::{CatalogPage, CatalogResult, Movie};

pub const TRENDING_LOAD_FAILED: &str = "Failed to load trending movies. Please try again later.";
pub const SEARCH_FAILED: &str = "Failed to search movies. Please try again later.";

/// 一次已发起的搜索
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// 一次已发起的榜单加载
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingTicket(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverState {
    pub query: String,
    pub results: Vec<CatalogResult>,
    pub trending: Vec<CatalogResult>,
    pub loading: bool,
    pub search_loading: bool,
    pub error: Option<String>,
    /// 最近一次成功搜索的查询词；结果为空时也保留，以便展示空结果
    searched: Option<String>,
    search_generation: u64,
    listing_generation: u64,
}

impl DiscoverState {
    pub fn begin_trending(&mut self) -> ListingTicket {
        self.listing_generation += 1;
        self.loading = true;
        self.error = None;
        ListingTicket(self.listing_generation)
    }

    /// 写入榜单；已有更新的榜单请求在途时丢弃并返回 `false`
    pub fn finish_trending(
        &mut self,
        ticket: ListingTicket,
        outcome: Result<CatalogPage, CatalogError>,
    ) -> bool {
        if ticket.0 != self.listing_generation {
            log::debug!("Dropping stale listing response #{}", ticket.0);
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(page) => self.trending = page.results,
            Err(e) => {
                log::error!("Error loading trending movies: {}", e);
                self.error = Some(TRENDING_LOAD_FAILED.to_string());
            }
        }
        true
    }

    /// 以当前 `query` 发起搜索；查询为空白时不做任何事
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        self.search_generation += 1;
        self.search_loading = true;
        self.error = None;
        Some(SearchTicket {
            generation: self.search_generation,
            query: query.to_string(),
        })
    }

    /// 写入搜索结果；票据已过期时丢弃并返回 `false`
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<CatalogPage, CatalogError>,
    ) -> bool {
        if ticket.generation != self.search_generation {
            log::debug!("Dropping stale search response for \"{}\"", ticket.query);
            return false;
        }
        self.search_loading = false;
        match outcome {
            Ok(page) => {
                self.results = page.results;
                self.searched = Some(ticket.query.clone());
            }
            Err(e) => {
                log::error!("Error searching movies: {}", e);
                self.error = Some(SEARCH_FAILED.to_string());
            }
        }
        true
    }

    /// 清空搜索；仍在途中的搜索响应随之作废
    pub fn clear_search(&mut self) {
        self.search_generation += 1;
        self.query.clear();
        self.results.clear();
        self.searched = None;
        self.search_loading = false;
    }

    /// 是否展示搜索结果而不是榜单
    pub fn is_searching(&self) -> bool {
        self.search_loading || self.searched.is_some()
    }

    pub fn searched_query(&self) -> Option<&str> {
        self.searched.as_deref()
    }
}

// =========================================================
// 目录条目预览
// =========================================================

/// 外部条目详情及其相似推荐
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPreview {
    pub movie: Movie,
    pub similar: Vec<CatalogResult>,
}

/// 并发拉取详情与推荐；推荐失败只记录日志
pub async fn load_preview<C: HttpClient, S: KeyValueStorage>(
    gateway: &CatalogGateway<C, S>,
    tmdb_id: i64,
) -> Result<CatalogPreview, CatalogError> {
    let (details, similar) =
        futures::join!(gateway.external_details(tmdb_id), gateway.recommendations(tmdb_id));
    let similar = match similar {
        Ok(page) => page.results,
        Err(e) => {
            log::error!("Error loading recommendations for {}: {}", tmdb_id, e);
            Vec::new()
        }
    };
    Ok(CatalogPreview {
        movie: details?,
        similar,
    })
}
