//! Consumer side of the external market-data feed.
//!
//! The feed itself (sockets, polling) lives outside this crate; it hands over a
//! `Stream` of [`MarketEvent`]s which is drained into the workspace one event
//! at a time, so each event is applied within a single borrow.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};

use crate::domain::errors::DomainError;
use crate::domain::logging::LogComponent;
use crate::domain::market::MarketEvent;
use crate::{log_debug, log_warn};

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Events that updated at least one display.
    pub applied: u64,
    /// Valid events for symbols nobody is watching yet.
    pub unmatched: u64,
    pub rejected: u64,
}

/// Drain `events` into `apply` until the stream ends.
pub async fn consume<S, F>(mut events: S, mut apply: F) -> PipelineStats
where
    S: Stream<Item = MarketEvent> + Unpin,
    F: FnMut(MarketEvent) -> Result<usize, DomainError>,
{
    let mut stats = PipelineStats::default();
    while let Some(event) = events.next().await {
        let symbol = event.symbol().clone();
        match apply(event) {
            Ok(0) => stats.unmatched += 1,
            Ok(_) => stats.applied += 1,
            Err(e) => {
                log_warn!(LogComponent::Application("DataPipeline"), "rejected {} event: {}", symbol, e);
                stats.rejected += 1;
            }
        }
    }
    log_debug!(LogComponent::Application("DataPipeline"), "stream ended: {:?}", stats);
    stats
}

/// Push side handed to the feed; the receiver goes to [`consume`].
pub fn channel() -> (MarketFeed, UnboundedReceiver<MarketEvent>) {
    let (tx, rx) = mpsc::unbounded();
    (MarketFeed { tx }, rx)
}

#[derive(Clone)]
pub struct MarketFeed {
    tx: UnboundedSender<MarketEvent>,
}

impl MarketFeed {
    /// `false` once the consumer has gone away.
    pub fn push(&self, event: MarketEvent) -> bool {
        self.tx.unbounded_send(event).is_ok()
    }

    pub fn close(&self) {
        self.tx.close_channel();
    }
}
