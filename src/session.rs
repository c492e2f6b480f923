//! Event-driven tracking session.
//!
//! A session wires the card store, the coordinator, the ticker and the
//! gateway together and realizes the control flow: a user action is validated
//! by the coordinator, applied to the local store first, and only then issued
//! to the remote store as a spawned, fire-and-forget network call. Spawned
//! calls log their failures and are otherwise discarded; nothing retries and
//! the session never waits on them.
//!
//! Deletion is the one confirmed mutation: the card leaves the local store
//! only when the spawned delete reports success, so a 404 keeps it visible.
//! In-flight updates for a deleted card are not cancelled; they may still
//! land at the remote store after the card is gone.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::warn;

use crate::card::{Card, Urgency};
use crate::coordinator::{Coordinator, Flush};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::store::CardStore;
use crate::ticker::Ticker;

/// Completion of a spawned network call
#[derive(Debug)]
enum NetOutcome {
    /// Fire-and-forget call finished; any failure was already logged
    Settled,
    /// Remote delete confirmed for this card
    Removed(u64),
}

/// What a session loop iteration produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The running card's timer advanced to this many seconds
    Tick(u64),
    /// A card was removed after its remote delete was confirmed
    Removed(u64),
    /// A network call settled without changing local state
    NetSettled,
}

/// One interactive tracking session over a remote card store
pub struct Session {
    store: CardStore,
    coordinator: Coordinator,
    ticker: Ticker,
    gateway: Arc<Gateway>,
    inflight: JoinSet<NetOutcome>,
}

impl Session {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            store: CardStore::new(),
            coordinator: Coordinator::new(),
            ticker: Ticker::new(0),
            gateway: Arc::new(gateway),
            inflight: JoinSet::new(),
        }
    }

    /// Fetch the card list from the remote store. Any fetch error degrades
    /// to an empty visible list. A running card in the fetched state is
    /// adopted and its timer resumes from its accumulated time.
    pub async fn load(&mut self) {
        let cards = match self.gateway.fetch_cards().await {
            Ok(cards) => cards,
            Err(err) => {
                warn!(error = %err, "could not fetch cards, starting with an empty list");
                Vec::new()
            }
        };

        self.store = CardStore::from_cards(cards);
        self.coordinator.adopt(&mut self.store);
        if let Some(id) = self.coordinator.active_card() {
            let time = self.store.get(id).map(|card| card.time).unwrap_or(0);
            self.ticker.arm(time);
        }
    }

    pub fn cards(&self) -> &[Card] {
        self.store.cards()
    }

    /// Cards in display order: running card first, then newest first
    pub fn display_order(&self) -> Vec<&Card> {
        self.store.display_order()
    }

    pub fn card(&self, id: u64) -> Option<&Card> {
        self.store.get(id)
    }

    pub fn active_card(&self) -> Option<u64> {
        self.coordinator.active_card()
    }

    /// Seconds to display for a card: the live ticker value for the running
    /// card, the flushed accumulated time for everything else.
    pub fn displayed_time(&self, card: &Card) -> u64 {
        if self.coordinator.active_card() == Some(card.id) && self.ticker.is_armed() {
            self.ticker.elapsed()
        } else {
            card.time
        }
    }

    /// Create a card and persist it. The card starts idle; starting its
    /// timer is a separate, explicit action.
    pub fn create(&mut self, description: &str, urgency: Urgency) -> Result<u64> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::InvalidArgument(
                "card description cannot be empty".to_string(),
            ));
        }

        let mut card = Card::new(description);
        card.urgency = urgency;
        // Ids are creation milliseconds; bump on same-millisecond creation.
        while self.store.get(card.id).is_some() {
            card.id += 1;
        }
        let id = card.id;
        self.store.append(card.clone());

        let gateway = Arc::clone(&self.gateway);
        self.inflight.spawn(async move {
            if let Err(err) = gateway.create(&card).await {
                warn!(card = card.id, error = %err, "card was not persisted remotely");
            }
            NetOutcome::Settled
        });

        Ok(id)
    }

    /// Start a card's timer. Issues no network call; the accumulated time is
    /// only flushed on pause, stop or teardown.
    pub fn start(&mut self, id: u64) -> Result<()> {
        self.coordinator.start(&mut self.store, id)?;
        let time = self.store.get(id).map(|card| card.time).unwrap_or(0);
        self.ticker.arm(time);
        Ok(())
    }

    /// Pause the running card and flush its elapsed time
    pub fn pause(&mut self, id: u64) -> Result<()> {
        let elapsed = self.ticker.elapsed();
        let flush = self.coordinator.pause(&mut self.store, id, elapsed)?;
        self.ticker.disarm();
        self.spawn_flush(flush);
        Ok(())
    }

    /// Stop the running card: flush and mark it terminal
    pub fn stop(&mut self, id: u64) -> Result<()> {
        let elapsed = self.ticker.elapsed();
        let flush = self.coordinator.stop(&mut self.store, id, elapsed)?;
        self.ticker.disarm();
        self.spawn_flush(flush);
        Ok(())
    }

    /// Reassign a card's urgency; rejected once the card is stopped
    pub fn set_urgency(&mut self, id: u64, urgency: Urgency) -> Result<()> {
        let card = self.store.get_mut(id).ok_or(Error::CardNotFound(id))?;
        if card.stopped {
            return Err(Error::CardStopped(id));
        }
        card.urgency = urgency;

        let gateway = Arc::clone(&self.gateway);
        self.inflight.spawn(async move {
            if let Err(err) = gateway.update_urgency(id, urgency).await {
                warn!(card = id, error = %err, "urgency change was not persisted remotely");
            }
            NetOutcome::Settled
        });
        Ok(())
    }

    /// Request deletion. The card stays in the local store until the remote
    /// delete is confirmed via [`SessionEvent::Removed`].
    pub fn request_delete(&mut self, id: u64) -> Result<()> {
        if self.store.get(id).is_none() {
            return Err(Error::CardNotFound(id));
        }

        let gateway = Arc::clone(&self.gateway);
        self.inflight.spawn(async move {
            match gateway.delete(id).await {
                Ok(()) => NetOutcome::Removed(id),
                Err(err) => {
                    warn!(card = id, error = %err, "card was not deleted remotely, keeping it");
                    NetOutcome::Settled
                }
            }
        });
        Ok(())
    }

    /// Wait for the next session event: a timer tick or a settled network
    /// call. Pends while the timer is disarmed and nothing is in flight.
    pub async fn next_event(&mut self) -> SessionEvent {
        tokio::select! {
            elapsed = self.ticker.tick() => SessionEvent::Tick(elapsed),
            Some(joined) = self.inflight.join_next() => self.settle(joined),
        }
    }

    /// Await every in-flight network call, applying confirmed deletions
    pub async fn drain(&mut self) {
        while let Some(joined) = self.inflight.join_next().await {
            self.settle(joined);
        }
    }

    /// Tear the session down: flush the running timer like a pause, wait for
    /// that flush to reach the remote store, then drain in-flight calls.
    pub async fn shutdown(&mut self) {
        let elapsed = self.ticker.disarm();
        if let Some(flush) = self.coordinator.flush_on_unload(&mut self.store, elapsed) {
            if let Err(err) = self
                .gateway
                .update_status(flush.id, flush.time, false)
                .await
            {
                warn!(card = flush.id, error = %err, "final flush was not persisted remotely");
            }
        }
        self.drain().await;
    }

    fn spawn_flush(&mut self, flush: Flush) {
        let gateway = Arc::clone(&self.gateway);
        self.inflight.spawn(async move {
            let result = if flush.stopped {
                gateway.update_stopped(flush.id, flush.time).await
            } else {
                gateway.update_status(flush.id, flush.time, false).await
            };
            if let Err(err) = result {
                warn!(card = flush.id, error = %err, "time flush was not persisted remotely");
            }
            NetOutcome::Settled
        });
    }

    fn settle(
        &mut self,
        joined: std::result::Result<NetOutcome, tokio::task::JoinError>,
    ) -> SessionEvent {
        match joined {
            Ok(NetOutcome::Removed(id)) => {
                if self.coordinator.active_card() == Some(id) {
                    self.ticker.disarm();
                }
                self.coordinator.forget(id);
                self.store.remove(id);
                SessionEvent::Removed(id)
            }
            Ok(NetOutcome::Settled) => SessionEvent::NetSettled,
            Err(err) => {
                warn!(error = %err, "network task aborted");
                SessionEvent::NetSettled
            }
        }
    }
}
