//! Course-catalog search: concurrent cache-backed fetches of per-semester
//! JSON catalogs, criteria filtering, selectable sorting, and query-string
//! state that makes every search a shareable deep link.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{profile::ProfileConfig, Settings};

pub use crate::adapters::http::HttpFetcher;
pub use crate::adapters::state::QueryStateStore;
pub use crate::core::cache::FetchCache;
pub use crate::core::loader::CatalogLoader;
pub use crate::core::search::{ResultBoard, SearchEngine};
pub use crate::core::sort::{sort_results, SortMethod};
pub use crate::domain::model::{CourseInfo, Match, SearchCriteria, SearchResult, Semester};
pub use crate::domain::ports::{ConfigProvider, Fetch, StateStore};
pub use crate::utils::error::{Result, SearchError};
