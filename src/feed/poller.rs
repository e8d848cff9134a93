use tokio::sync::mpsc;

use super::FeedClient;
use crate::event::{AppEvent, Event};
use crate::{log_debug, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A flap cycle is still animating.
    Busy,
    /// The previous request has not answered yet.
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Started,
    Skipped(SkipReason),
}

/// Fire-and-forget feed fetcher. Results come back as [`AppEvent::FeedLoaded`].
#[derive(Debug)]
pub struct Poller {
    client: FeedClient,
    sender: mpsc::UnboundedSender<Event>,
    in_flight: bool,
}

impl Poller {
    pub fn new(client: FeedClient, sender: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            client,
            sender,
            in_flight: false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start one fetch unless the board is animating or a fetch is pending.
    /// A skipped tick is dropped; the next interval tries again.
    pub fn poll(&mut self, board_busy: bool) -> PollDecision {
        if board_busy {
            log_debug!("poll skipped: board busy");
            return PollDecision::Skipped(SkipReason::Busy);
        }
        if self.in_flight {
            log_debug!("poll skipped: request in flight");
            return PollDecision::Skipped(SkipReason::InFlight);
        }

        self.in_flight = true;
        let client = self.client.clone();
        let sender = self.sender.clone();

        tokio::spawn(async move {
            let outcome = client.fetch().await.map_err(|e| {
                log_warn!("feed fetch from {} failed: {}", client.url(), e);
                e.to_string()
            });
            let _ = sender.send(Event::App(AppEvent::FeedLoaded(outcome)));
        });

        PollDecision::Started
    }

    /// Called when the [`AppEvent::FeedLoaded`] for the pending fetch arrives.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }
}
