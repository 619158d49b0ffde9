//! Periodic stats refresh.

use crate::api::NewsApi;
use crate::controller::PageController;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Background task reloading the stats counters every `period`, starting
/// immediately. Stopped with [`StatsPoller::stop`]; aborted if dropped.
pub struct StatsPoller {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StatsPoller {
    pub fn start<A: NewsApi>(controller: Arc<PageController<A>>, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => controller.load_stats().await,
                }
            }
            debug!("stats poller exited");
        });

        info!(period_secs = period.as_secs(), "stats refresh scheduled");
        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signals the loop and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<A: NewsApi> PageController<A> {
    /// Loads stats now and every `period` after, for as long as the returned poller lives.
    pub fn initialize(self: &Arc<Self>, period: Duration) -> StatsPoller {
        StatsPoller::start(Arc::clone(self), period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::FakeApi;
    use crate::models::Stats;

    fn stats(stored: u64) -> Stats {
        Stats {
            total_articles_stored: stored,
            total_articles_in_vectordb: stored,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loads_immediately_then_every_period() {
        let api = FakeApi::default();
        {
            let mut queue = api.stats.lock().unwrap();
            queue.push_back(Ok(stats(1)));
            queue.push_back(Ok(stats(2)));
            queue.push_back(Ok(stats(3)));
        }
        let controller = Arc::new(PageController::new(api));
        let poller = controller.initialize(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.snapshot().stats.total_articles_stored, 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(controller.snapshot().stats.total_articles_stored, 2);

        assert!(poller.is_running());
        poller.stop().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(controller.snapshot().stats.total_articles_stored, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_polls_keep_running() {
        let api = FakeApi::default();
        {
            let mut queue = api.stats.lock().unwrap();
            queue.push_back(Err(crate::errors::ClientError::Http { status: 500 }));
            queue.push_back(Ok(stats(4)));
        }
        let controller = Arc::new(PageController::new(api));
        let poller = controller.initialize(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.snapshot().stats.total_articles_stored, 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(controller.snapshot().stats.total_articles_stored, 4);
        drop(poller);
    }
}
