//! Crawl orchestration.
//!
//! Every scheduled URL gets its own task, which waits out its stagger delay, fetches, and
//! reports back over a channel. The session loop is the only owner of the pending counter
//! and the dataset: it scrapes each reported page, schedules the children before counting
//! the parent as done, and stops the moment the counter drains.

use nhs_core::{dispatch, Assembler, Dataset, Error, Result, DEFAULT_DATASET_FILE, HUB_URL};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::Transport;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub root_url: String,
    /// Child `i` of a page is fetched `base_delay * (i + 1)` after that page was scraped.
    pub base_delay: Duration,
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub output: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: HUB_URL.to_string(),
            base_delay: Duration::from_millis(2000),
            timeout: Some(Duration::from_secs(30)),
            user_agent: "load-nhs-data".to_string(),
            output: DEFAULT_DATASET_FILE.to_string(),
        }
    }
}

/// Number of fetches scheduled but not yet finished.
#[derive(Debug, Default)]
pub struct PendingCounter {
    count: usize,
}

impl PendingCounter {
    pub fn schedule(&mut self) { self.count += 1; }

    /// Records one finished fetch (success or failure). Returns true exactly when this
    /// completion brings the counter back to zero.
    pub fn complete(&mut self) -> bool {
        debug_assert!(self.count > 0, "completion without a scheduled fetch");
        self.count = self.count.saturating_sub(1);
        self.count == 0
    }

    pub fn get(&self) -> usize { self.count }
}

#[derive(Debug)]
pub struct CrawlReport {
    pub dataset: Dataset,
    pub fetched: usize,
    pub failed: usize,
    /// Subpages dropped because their condition was never scraped.
    pub dropped: usize,
}

struct Fetched {
    url: String,
    body: Result<String>,
}

pub struct CrawlSession<T: Transport> {
    transport: Arc<T>,
    root_url: String,
    base_delay: Duration,
    pending: PendingCounter,
    seen: HashSet<String>,
    assembler: Assembler,
    tx: mpsc::UnboundedSender<Fetched>,
    rx: mpsc::UnboundedReceiver<Fetched>,
}

impl<T: Transport> CrawlSession<T> {
    pub fn new(transport: T, config: &CrawlConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport: Arc::new(transport),
            root_url: config.root_url.clone(),
            base_delay: config.base_delay,
            pending: PendingCounter::default(),
            seen: HashSet::new(),
            assembler: Assembler::new(),
            tx,
            rx,
        }
    }

    /// Runs the crawl to completion and hands back everything assembled, including
    /// partial results when some fetches failed.
    pub async fn crawl(mut self) -> CrawlReport {
        let root = self.root_url.clone();
        self.schedule_fetch(root, None);

        let (mut fetched, mut failed) = (0usize, 0usize);
        while let Some(Fetched { url, body }) = self.rx.recv().await {
            match body {
                Ok(html) => {
                    fetched += 1;
                    let scraped = dispatch(&url, &html);
                    for (i, child) in scraped.children.into_iter().enumerate() {
                        self.schedule_fetch(child, Some(i));
                    }
                    if let Some(mutation) = scraped.mutation {
                        self.assembler.apply(mutation);
                    }
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(%err, "dropping request");
                }
            }
            if self.pending.complete() {
                break;
            }
            if (fetched + failed) % 50 == 0 {
                tracing::info!(fetched, failed, pending = self.pending.get(), "progress");
            }
        }

        let (dataset, dropped) = self.assembler.finish();
        tracing::info!(
            fetched,
            failed,
            conditions = dataset.len(),
            subpages = dataset.subpage_count(),
            dropped = dropped.len(),
            "crawl complete"
        );
        CrawlReport { dataset, fetched, failed, dropped: dropped.len() }
    }

    /// `order` is the URL's position among its siblings; `None` fetches immediately.
    fn schedule_fetch(&mut self, url: String, order: Option<usize>) {
        if !self.seen.insert(url.clone()) {
            tracing::debug!(%url, "already scheduled");
            return;
        }
        self.pending.schedule();

        let delay = match order {
            Some(i) => self.base_delay.saturating_mul(u32::try_from(i + 1).unwrap_or(u32::MAX)),
            None => Duration::ZERO,
        };
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            tracing::debug!(%url, "fetching");
            let target = url.clone();
            // A panicking transport must still report, or the pending count never drains.
            let body = match tokio::spawn(async move { transport.get(&target).await }).await {
                Ok(body) => body,
                Err(err) => Err(Error::transport(&url, format!("fetch task failed: {err}"))),
            };
            // The session only stops listening once every fetch has reported.
            let _ = tx.send(Fetched { url, body });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_drains_once() {
        let mut pending = PendingCounter::default();
        pending.schedule();
        pending.schedule();
        assert!(!pending.complete());
        pending.schedule();
        assert!(!pending.complete());
        assert!(pending.complete());
        assert_eq!(pending.get(), 0);
    }
}
