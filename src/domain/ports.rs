use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Transport boundary: resolve a URL to a parsed JSON document.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    /// Explicit year list; empty means "derive from catalog metadata".
    fn years(&self) -> &[String];
    fn concurrent_requests(&self) -> usize;
}

/// Key-value store for persisted UI state. The original app keeps this in
/// the browser query string; the search core only sees this contract.
pub trait StateStore {
    /// Stored value, falling back to the default given at registration.
    fn get(&self, name: &str) -> String;
    /// Setting a value equal to its default removes the parameter.
    fn set(&mut self, name: &str, value: &str);
}
