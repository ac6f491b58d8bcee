use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces bursts of input into one action fired after `delay` of quiet.
///
/// Only the most recent value of a burst reaches the action. Actions run one
/// after another on the debouncer task and are never cancelled, so a slow
/// response can still land after a newer one.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F, Fut>(delay: Duration, mut action: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let handle = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => {
                                    // flush the last burst on shutdown
                                    action(value).await;
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(delay) => action(value).await,
                        }
                    }
                }
            }
        });

        (Self { tx }, handle)
    }

    /// Queue a value. Returns false once the debouncer task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}
