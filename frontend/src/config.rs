//! 运行时配置
//!
//! WASM 中没有进程环境变量，配置在编译期通过 `option_env!` 注入：
//! `MOVIELIST_API_URL=https://api.example.com/api trunk build`

use log::LevelFilter;
use std::str::FromStr;

/// 这些是默认值，构建时未设置对应环境变量则使用它们
const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 后端 API 根地址（不含末尾斜杠）
    pub api_base_url: String,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("MOVIELIST_API_URL"),
            option_env!("MOVIELIST_LOG_LEVEL"),
        )
    }

    fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .and_then(|level| LevelFilter::from_str(level.trim()).ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            api_base_url,
            log_level,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}
