//! Client core: the state, caching and guard logic a storefront or admin UI
//! binds to. Nothing in here renders anything.

pub mod api;
pub mod cache;
pub mod debounce;
pub mod error;
pub mod local_store;
pub mod search;
pub mod session;
pub mod store;

pub use api::MenuApiClient;
pub use cache::{CachedResponse, OfflineCache, Strategy};
pub use debounce::Debouncer;
pub use error::ClientError;
pub use local_store::LocalStore;
pub use search::MenuSearch;
pub use session::{ReviewThrottle, VisitTracker};
pub use store::{FlagChange, InventoryStore, MenuStore, Notice, NoticeLevel};
