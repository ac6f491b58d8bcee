use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

use super::{api::MenuApiClient, debounce::Debouncer, store::MenuStore};

/// Search box binding: typed text is debounced, then the menu is refetched
/// for the query and the store's current category.
pub struct MenuSearch {
    debouncer: Debouncer<String>,
    handle: JoinHandle<()>,
}

impl MenuSearch {
    pub fn spawn(api: Arc<MenuApiClient>, store: Arc<Mutex<MenuStore>>, delay: Duration) -> Self {
        let (debouncer, handle) = Debouncer::spawn(delay, move |query: String| {
            let api = api.clone();
            let store = store.clone();
            async move {
                let category = store.lock().await.category().map(str::to_owned);
                let result = api.menu(Some(&query), category.as_deref()).await;
                let mut store = store.lock().await;
                match result {
                    Ok(products) => store.set_products(products),
                    // keep the last list, the local filter still applies
                    Err(err) => warn!(%query, error = %err, "menu search failed"),
                }
                store.set_query(query);
            }
        });
        Self { debouncer, handle }
    }

    /// Feed the latest text of the search box.
    pub fn input(&self, text: impl Into<String>) -> bool {
        self.debouncer.push(text.into())
    }

    /// Stop accepting input and wait for a pending search to land.
    pub async fn close(self) {
        let Self { debouncer, handle } = self;
        drop(debouncer);
        if let Err(err) = handle.await {
            warn!(error = %err, "menu search task ended abnormally");
        }
    }
}
