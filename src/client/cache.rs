//! Two-strategy response cache used in front of every client GET.
//!
//! Images are served cache-first. Every other GET goes to the network first and
//! falls back to the last stored copy when the request fails. Non-GET requests
//! pass straight through.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use reqwest::Method;

use super::error::ClientError;

const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".webp", ".gif", ".svg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    CacheFirst,
    NetworkFirst,
}

/// Pick the strategy for a request, `None` when it must not be intercepted.
pub fn strategy_for(method: &Method, url: &str) -> Option<Strategy> {
    if method != Method::GET {
        return None;
    }
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    if path.contains("/storage/") || IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        Some(Strategy::CacheFirst)
    } else {
        Some(Strategy::NetworkFirst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub from_cache: bool,
}

impl CachedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Default)]
pub struct OfflineCache {
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl OfflineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<CachedResponse> {
        let entries = self.entries.lock().ok()?;
        entries.get(url).cloned().map(|mut hit| {
            hit.from_cache = true;
            hit
        })
    }

    fn store(&self, url: &str, response: &CachedResponse) {
        if !response.is_success() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(url.to_string(), response.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `network` under the strategy for `method`/`url`.
    pub async fn fetch<F, Fut>(
        &self,
        method: &Method,
        url: &str,
        network: F,
    ) -> Result<CachedResponse, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedResponse, ClientError>>,
    {
        match strategy_for(method, url) {
            None => network().await,
            Some(Strategy::CacheFirst) => {
                if let Some(hit) = self.get(url) {
                    return Ok(hit);
                }
                let response = network().await?;
                self.store(url, &response);
                Ok(response)
            }
            Some(Strategy::NetworkFirst) => match network().await {
                Ok(response) => {
                    self.store(url, &response);
                    Ok(response)
                }
                Err(err) => {
                    tracing::debug!(url, error = %err, "network failed, trying cache");
                    self.get(url).ok_or(ClientError::Offline)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> CachedResponse {
        CachedResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: body.as_bytes().to_vec(),
            from_cache: false,
        }
    }

    #[test]
    fn strategy_depends_on_method_and_asset_type() {
        assert_eq!(strategy_for(&Method::POST, "/api/visits"), None);
        assert_eq!(
            strategy_for(&Method::GET, "/storage/products/a.webp?v=1"),
            Some(Strategy::CacheFirst)
        );
        assert_eq!(
            strategy_for(&Method::GET, "https://cdn.test/logo.PNG"),
            Some(Strategy::CacheFirst)
        );
        assert_eq!(
            strategy_for(&Method::GET, "/api/menu?q=png"),
            Some(Strategy::NetworkFirst)
        );
    }

    #[tokio::test]
    async fn network_first_falls_back_to_last_good_copy() {
        let cache = OfflineCache::new();
        let first = cache
            .fetch(&Method::GET, "/api/menu", || async { Ok(ok("[1]")) })
            .await
            .unwrap();
        assert!(!first.from_cache);

        let second = cache
            .fetch(&Method::GET, "/api/menu", || async { Err(ClientError::Offline) })
            .await
            .unwrap();
        assert!(second.from_cache);
        assert_eq!(second.body, b"[1]");
    }

    #[tokio::test]
    async fn network_first_without_copy_reports_offline() {
        let cache = OfflineCache::new();
        let result = cache
            .fetch(&Method::GET, "/api/menu", || async {
                Err(ClientError::Api {
                    status: 503,
                    message: "down".into(),
                })
            })
            .await;
        assert!(matches!(result, Err(ClientError::Offline)));
    }

    #[tokio::test]
    async fn cache_first_skips_network_on_hit() {
        let cache = OfflineCache::new();
        let url = "/storage/products/x.png";
        cache
            .fetch(&Method::GET, url, || async { Ok(ok("img")) })
            .await
            .unwrap();

        let mut called = false;
        let hit = cache
            .fetch(&Method::GET, url, || {
                called = true;
                async { Ok(ok("other")) }
            })
            .await
            .unwrap();
        assert!(!called);
        assert!(hit.from_cache);
        assert_eq!(hit.body, b"img");
    }

    #[tokio::test]
    async fn errors_and_non_get_are_not_stored() {
        let cache = OfflineCache::new();
        let mut failed = ok("oops");
        failed.status = 500;
        cache
            .fetch(&Method::GET, "/api/menu", || async move { Ok(failed) })
            .await
            .unwrap();
        cache
            .fetch(&Method::POST, "/api/visits", || async { Ok(ok("{}")) })
            .await
            .unwrap();
        assert!(cache.is_empty());
    }
}
