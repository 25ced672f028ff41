use crate::domain::ports::Fetch;
use crate::utils::error::{Result, SearchError};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type SharedFetch = Shared<BoxFuture<'static, std::result::Result<Arc<Value>, Arc<SearchError>>>>;

/// Memoizing fetch cache keyed by exact URL string.
///
/// The first caller for a URL triggers one network fetch; concurrent and
/// later callers for the same URL await the same shared future. Once
/// resolved, the parsed document is kept for the life of the process (no
/// eviction, no TTL). A failed fetch leaves nothing behind, so the next
/// caller retries the network.
pub struct FetchCache<F: Fetch + 'static> {
    fetcher: Arc<F>,
    ready: Mutex<HashMap<String, Arc<Value>>>,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
}

impl<F: Fetch + 'static> FetchCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            ready: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, url: &str) -> Result<Arc<Value>> {
        if let Some(value) = self.ready.lock().unwrap().get(url) {
            return Ok(value.clone());
        }

        // Join an in-flight fetch for this URL, or start one. The lock is
        // released before awaiting.
        let fut = {
            let mut in_flight = self.in_flight.lock().unwrap();
            match in_flight.get(url) {
                Some(fut) => fut.clone(),
                None => {
                    let fetcher = Arc::clone(&self.fetcher);
                    let target = url.to_string();
                    let fut = async move {
                        fetcher
                            .fetch_json(&target)
                            .await
                            .map(Arc::new)
                            .map_err(Arc::new)
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(url.to_string(), fut.clone());
                    fut
                }
            }
        };

        match fut.await {
            Ok(value) => {
                // First writer wins; duplicate waiters are no-ops.
                self.ready
                    .lock()
                    .unwrap()
                    .entry(url.to_string())
                    .or_insert_with(|| value.clone());
                self.in_flight.lock().unwrap().remove(url);
                Ok(value)
            }
            Err(err) => {
                self.in_flight.lock().unwrap().remove(url);
                Err(SearchError::Fetch {
                    url: url.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Resolved value for a URL, if one is already cached.
    pub fn cached(&self, url: &str) -> Option<Arc<Value>> {
        self.ready.lock().unwrap().get(url).cloned()
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.ready.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
