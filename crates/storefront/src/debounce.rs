//! Trailing-edge debounce.
//!
//! Calls made within the quiet window collapse into one: only the most
//! recent value is delivered, once the window passes with no further call.
//! Dropping the [`Debouncer`] discards a pending value; deliveries that
//! already started run to completion.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Delivers the last value of each burst of calls to an async callback.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    window: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn a debouncer on the current Tokio runtime.
    ///
    /// Each delivery is spawned as its own task so a slow callback never
    /// delays the next window.
    pub fn new<F, Fut>(window: Duration, callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;

            loop {
                let Some(value) = pending.take() else {
                    match rx.recv().await {
                        Some(value) => {
                            pending = Some(value);
                            continue;
                        }
                        None => break,
                    }
                };

                tokio::select! {
                    next = rx.recv() => match next {
                        Some(next) => {
                            trace!("Debounce window restarted");
                            pending = Some(next);
                        }
                        None => {
                            debug!("Debouncer dropped with a pending call");
                            break;
                        }
                    },
                    () = tokio::time::sleep(window) => {
                        tokio::spawn(callback(value));
                    }
                }
            }
        });

        Self { tx, window }
    }

    /// Schedule `value`, replacing any value still waiting for its window.
    pub fn call(&self, value: T) {
        if self.tx.send(value).is_err() {
            debug!("Debouncer task has stopped; call ignored");
        }
    }

    /// The quiet period.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, Debouncer<&'static str>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let debouncer = Debouncer::new(Duration::from_millis(300), move |value| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(value);
            }
        });
        (calls, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_call() {
        let (calls, debouncer) = recorder();

        for query in ["r", "ro", "ros", "rose"] {
            debouncer.call(query);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["rose"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_window() {
        let (calls, debouncer) = recorder();

        debouncer.call("serum");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["serum"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (calls, debouncer) = recorder();

        debouncer.call("toner");
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.call("mask");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["toner", "mask"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_call() {
        let (calls, debouncer) = recorder();

        debouncer.call("cleanser");
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert!(calls.lock().unwrap().is_empty());
    }
}
