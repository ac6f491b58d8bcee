//! Per-device guards kept in local storage: the review rate limit and the
//! visit cooldown. Both are advisory and only protect against accidental
//! repeats from the same device.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{error::ClientError, local_store::LocalStore};

pub const CLIENT_ID_KEY: &str = "client_id";
pub const LAST_VISIT_KEY: &str = "last_visit_at";

fn review_key(product_id: Uuid) -> String {
    format!("review_at:{product_id}")
}

/// One review per product per device inside a rolling window.
#[derive(Debug, Clone, Copy)]
pub struct ReviewThrottle {
    window: Duration,
}

impl Default for ReviewThrottle {
    fn default() -> Self {
        Self::new(Duration::hours(12))
    }
}

impl ReviewThrottle {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn check(&self, store: &LocalStore, product_id: Uuid, now: DateTime<Utc>) -> Result<(), ClientError> {
        match store.get_json::<DateTime<Utc>>(&review_key(product_id)) {
            Some(last) if now < last + self.window => Err(ClientError::Throttled {
                retry_at: last + self.window,
            }),
            _ => Ok(()),
        }
    }

    pub fn record(&self, store: &mut LocalStore, product_id: Uuid, now: DateTime<Utc>) -> Result<(), ClientError> {
        store.set_json(review_key(product_id), &now)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VisitTracker {
    cooldown: Duration,
}

impl Default for VisitTracker {
    fn default() -> Self {
        Self::new(Duration::minutes(30))
    }
}

impl VisitTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub fn client_id(&self, store: &LocalStore) -> Option<Uuid> {
        store.get(CLIENT_ID_KEY).and_then(|raw| raw.parse().ok())
    }

    pub fn is_due(&self, store: &LocalStore, now: DateTime<Utc>) -> bool {
        store.get_json::<DateTime<Utc>>(LAST_VISIT_KEY).is_none_or(|last| now >= last + self.cooldown)
    }

    /// Remember the server-assigned client id and when the visit was sent.
    pub fn remember(&self, store: &mut LocalStore, client_id: Uuid, now: DateTime<Utc>) -> Result<(), ClientError> {
        store.set(CLIENT_ID_KEY, client_id.to_string())?;
        store.set_json(LAST_VISIT_KEY, &now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn review_blocked_inside_window_only() {
        let mut store = LocalStore::in_memory();
        let throttle = ReviewThrottle::default();
        let product = Uuid::new_v4();

        throttle.check(&store, product, at(8, 0)).unwrap();
        throttle.record(&mut store, product, at(8, 0)).unwrap();

        match throttle.check(&store, product, at(19, 59)) {
            Err(ClientError::Throttled { retry_at }) => assert_eq!(retry_at, at(20, 0)),
            other => panic!("expected throttle, got {other:?}"),
        }
        assert!(throttle.check(&store, product, at(20, 0)).is_ok());
        assert!(throttle.check(&store, Uuid::new_v4(), at(9, 0)).is_ok());
    }

    #[test]
    fn unreadable_timestamp_does_not_block() {
        let mut store = LocalStore::in_memory();
        let product = Uuid::new_v4();
        store.set(review_key(product), "yesterday").unwrap();
        assert!(ReviewThrottle::default().check(&store, product, at(8, 0)).is_ok());
    }

    #[test]
    fn visit_cooldown() {
        let mut store = LocalStore::in_memory();
        let tracker = VisitTracker::new(Duration::minutes(30));
        assert!(tracker.is_due(&store, at(10, 0)));
        assert_eq!(tracker.client_id(&store), None);

        let id = Uuid::new_v4();
        tracker.remember(&mut store, id, at(10, 0)).unwrap();
        assert_eq!(tracker.client_id(&store), Some(id));
        assert!(!tracker.is_due(&store, at(10, 29)));
        assert!(tracker.is_due(&store, at(10, 30)));
        assert_eq!(store.get(LAST_VISIT_KEY), Some("\"2025-03-14T10:00:00Z\""));
    }
}
