//! Single-active-timer coordinator.
//!
//! At most one card's timer runs at a time within a session. The coordinator
//! owns that invariant: it validates every timer transition against the
//! currently active card, applies the resulting flag changes to the card
//! store, and hands back a [`Flush`] directive whenever accumulated time must
//! be written through to the remote store.
//!
//! # Transitions
//!
//! - `Idle -> Running`: only while no other card runs; no flush
//! - `Running -> Idle` (pause): flushes elapsed time, clears the marker
//! - `Running -> Stopped`: flushes elapsed time, terminal
//! - `Idle -> Stopped`, or starting while another card runs: rejected, both
//!   cards unchanged, no flush
//! - session teardown while running: flushed like a pause
//!
//! The marker lives in client memory only; the remote store has no guard, so
//! a second session can race it. That is accepted behavior.

use tracing::warn;

use crate::card::CardState;
use crate::error::{Error, Result};
use crate::store::CardStore;

/// Write-through directive produced by a flushing transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flush {
    pub id: u64,
    /// Accumulated elapsed seconds at flush time
    pub time: u64,
    /// Whether the card reached its terminal state with this flush
    pub stopped: bool,
}

/// Owner of the single-active-timer invariant
#[derive(Debug, Default)]
pub struct Coordinator {
    active: Option<u64>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the card whose timer is currently armed, if any
    pub fn active_card(&self) -> Option<u64> {
        self.active
    }

    /// Reconcile with cards freshly fetched from the remote store: adopt at
    /// most one running card (the first in display order) as active. Any
    /// further running cards would break the invariant locally, so they are
    /// demoted to idle in the cache; no network call is issued for them.
    pub fn adopt(&mut self, store: &mut CardStore) {
        let mut running: Vec<u64> = store
            .display_order()
            .iter()
            .filter(|card| card.state() == CardState::Running)
            .map(|card| card.id)
            .collect();

        self.active = if running.is_empty() {
            None
        } else {
            Some(running.remove(0))
        };

        for id in running {
            warn!(card = id, "demoting extra running card from remote state");
            if let Some(card) = store.get_mut(id) {
                card.is_running = false;
            }
        }
    }

    /// `Idle -> Running`. Rejected while another card runs or once the card
    /// is stopped. Starting the already-active card is a no-op.
    pub fn start(&mut self, store: &mut CardStore, id: u64) -> Result<()> {
        let card = store.get(id).ok_or(Error::CardNotFound(id))?;
        if card.stopped {
            return Err(Error::CardStopped(id));
        }
        match self.active {
            Some(active) if active == id => Ok(()),
            Some(active) => Err(Error::TimerConflict {
                requested: id,
                active,
            }),
            None => {
                let card = store.get_mut(id).ok_or(Error::CardNotFound(id))?;
                card.is_running = true;
                self.active = Some(id);
                Ok(())
            }
        }
    }

    /// `Running -> Idle`. Writes `elapsed` into the card and clears the
    /// active marker. Only valid for the card that is actually running.
    pub fn pause(&mut self, store: &mut CardStore, id: u64, elapsed: u64) -> Result<Flush> {
        self.require_active(store, id)?;
        let card = store.get_mut(id).ok_or(Error::CardNotFound(id))?;
        card.time = elapsed;
        card.is_running = false;
        self.active = None;
        Ok(Flush {
            id,
            time: elapsed,
            stopped: false,
        })
    }

    /// `Running -> Stopped`. Flushes like a pause and marks the card
    /// terminal. `Idle -> Stopped` is rejected.
    pub fn stop(&mut self, store: &mut CardStore, id: u64, elapsed: u64) -> Result<Flush> {
        self.require_active(store, id)?;
        let card = store.get_mut(id).ok_or(Error::CardNotFound(id))?;
        card.time = elapsed;
        card.is_running = false;
        card.stopped = true;
        self.active = None;
        Ok(Flush {
            id,
            time: elapsed,
            stopped: true,
        })
    }

    /// Session teardown while a timer runs: flush the current elapsed time
    /// exactly like a pause. Returns `None` when nothing was running.
    pub fn flush_on_unload(&mut self, store: &mut CardStore, elapsed: u64) -> Option<Flush> {
        let id = self.active?;
        self.pause(store, id, elapsed).ok()
    }

    /// Forget a card that is being removed. Clears the marker when the card
    /// was the active one; its in-flight updates are left to land or fail on
    /// their own.
    pub fn forget(&mut self, id: u64) {
        if self.active == Some(id) {
            self.active = None;
        }
    }

    fn require_active(&self, store: &CardStore, id: u64) -> Result<()> {
        let card = store.get(id).ok_or(Error::CardNotFound(id))?;
        if card.stopped {
            return Err(Error::CardStopped(id));
        }
        match self.active {
            Some(active) if active == id => Ok(()),
            Some(active) => Err(Error::TimerConflict {
                requested: id,
                active,
            }),
            None => Err(Error::InvalidArgument(format!(
                "card {id} has no running timer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn store_with(ids: &[u64]) -> CardStore {
        CardStore::from_cards(
            ids.iter()
                .map(|id| Card {
                    id: *id,
                    description: format!("task {id}"),
                    created: "2024-06-01".to_string(),
                    time: 0,
                    is_running: false,
                    stopped: false,
                    urgency: Default::default(),
                })
                .collect(),
        )
    }

    fn running_count(store: &CardStore) -> usize {
        store.cards().iter().filter(|card| card.is_running).count()
    }

    #[test]
    fn start_arms_a_single_card() {
        let mut store = store_with(&[1, 2]);
        let mut coordinator = Coordinator::new();

        coordinator.start(&mut store, 1).expect("start");
        assert_eq!(coordinator.active_card(), Some(1));
        assert!(store.get(1).expect("card").is_running);
        assert_eq!(running_count(&store), 1);
    }

    #[test]
    fn second_start_is_rejected_and_changes_nothing() {
        let mut store = store_with(&[1, 2]);
        let mut coordinator = Coordinator::new();
        coordinator.start(&mut store, 1).expect("start");

        let err = coordinator.start(&mut store, 2).expect_err("conflict");
        assert!(matches!(
            err,
            Error::TimerConflict {
                requested: 2,
                active: 1
            }
        ));
        assert!(store.get(1).expect("card").is_running);
        assert!(!store.get(2).expect("card").is_running);
        assert_eq!(coordinator.active_card(), Some(1));
    }

    #[test]
    fn restarting_the_active_card_is_a_no_op() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        coordinator.start(&mut store, 1).expect("start");
        coordinator.start(&mut store, 1).expect("restart");
        assert_eq!(coordinator.active_card(), Some(1));
    }

    #[test]
    fn pause_flushes_and_clears_marker() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        coordinator.start(&mut store, 1).expect("start");

        let flush = coordinator.pause(&mut store, 1, 65).expect("pause");
        assert_eq!(
            flush,
            Flush {
                id: 1,
                time: 65,
                stopped: false
            }
        );
        let card = store.get(1).expect("card");
        assert_eq!(card.time, 65);
        assert!(!card.is_running);
        assert_eq!(coordinator.active_card(), None);
    }

    #[test]
    fn pause_of_idle_card_is_rejected() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        let err = coordinator.pause(&mut store, 1, 5).expect_err("idle");
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(store.get(1).expect("card").time, 0);
    }

    #[test]
    fn stop_is_terminal() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        coordinator.start(&mut store, 1).expect("start");

        let flush = coordinator.stop(&mut store, 1, 30).expect("stop");
        assert!(flush.stopped);
        let card = store.get(1).expect("card");
        assert!(card.stopped);
        assert!(!card.is_running);
        assert_eq!(card.time, 30);

        let err = coordinator.start(&mut store, 1).expect_err("restart");
        assert!(matches!(err, Error::CardStopped(1)));
        let err = coordinator.pause(&mut store, 1, 31).expect_err("pause");
        assert!(matches!(err, Error::CardStopped(1)));
    }

    #[test]
    fn stop_of_idle_card_is_rejected() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        let err = coordinator.stop(&mut store, 1, 5).expect_err("idle stop");
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!store.get(1).expect("card").stopped);
    }

    #[test]
    fn unknown_card_is_reported() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        let err = coordinator.start(&mut store, 9).expect_err("missing");
        assert!(matches!(err, Error::CardNotFound(9)));
    }

    #[test]
    fn unload_flush_pauses_the_running_card() {
        let mut store = store_with(&[1, 2]);
        let mut coordinator = Coordinator::new();
        assert!(coordinator.flush_on_unload(&mut store, 10).is_none());

        coordinator.start(&mut store, 2).expect("start");
        let flush = coordinator.flush_on_unload(&mut store, 10).expect("flush");
        assert_eq!(flush.id, 2);
        assert_eq!(flush.time, 10);
        assert!(!store.get(2).expect("card").is_running);
        assert_eq!(coordinator.active_card(), None);
    }

    #[test]
    fn forget_clears_only_the_matching_marker() {
        let mut store = store_with(&[1, 2]);
        let mut coordinator = Coordinator::new();
        coordinator.start(&mut store, 1).expect("start");

        coordinator.forget(2);
        assert_eq!(coordinator.active_card(), Some(1));
        coordinator.forget(1);
        assert_eq!(coordinator.active_card(), None);
    }

    #[test]
    fn adopt_keeps_at_most_one_running_card() {
        let mut store = store_with(&[1, 2, 3]);
        store.get_mut(1).expect("card").is_running = true;
        store.get_mut(3).expect("card").is_running = true;

        let mut coordinator = Coordinator::new();
        coordinator.adopt(&mut store);

        // Display order puts the newest running card first.
        assert_eq!(coordinator.active_card(), Some(3));
        assert_eq!(running_count(&store), 1);
        assert!(!store.get(1).expect("card").is_running);
    }

    #[test]
    fn adopt_without_running_cards_clears_marker() {
        let mut store = store_with(&[1]);
        let mut coordinator = Coordinator::new();
        coordinator.start(&mut store, 1).expect("start");
        coordinator.pause(&mut store, 1, 1).expect("pause");

        coordinator.adopt(&mut store);
        assert_eq!(coordinator.active_card(), None);
    }
}
