//! Cancellable repeating tick task.
//!
//! State machines in this crate never spawn anything themselves. A
//! [`Ticker`] owns the one periodic task that drives a shared
//! [`Tickable`] and forwards whatever it emits. The task is aborted on
//! [`Ticker::cancel`] and on drop, so replacing or discarding a ticker
//! always stops the previous loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time;

use crate::events::Event;
use crate::timer::Tickable;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Tick `target` every `period`, sending its events to `events`.
    ///
    /// The first tick happens one full period after spawning. The task
    /// ends by itself once the receiving side is dropped.
    pub fn spawn<T>(
        target: Arc<Mutex<T>>,
        period: Duration,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self
    where
        T: Tickable + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                // Sent under the lock so events stay in tick order; an
                // unbounded send never waits.
                let mut guard = target.lock().await;
                for event in guard.tick() {
                    if events.send(event).is_err() {
                        tracing::debug!("event receiver closed, stopping ticker");
                        return;
                    }
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn every_second<T>(target: Arc<Mutex<T>>, events: mpsc::UnboundedSender<Event>) -> Self
    where
        T: Tickable + Send + 'static,
    {
        Self::spawn(target, TICK_PERIOD, events)
    }

    /// Stop the task. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
