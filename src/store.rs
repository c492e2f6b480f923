//! In-memory card collection, the client-side cache of the remote store.
//!
//! Mutations are applied here first (optimistically); the corresponding
//! network call is issued afterwards by the session. Removal is the one
//! exception: a card leaves the store only after the remote delete has been
//! confirmed.

use crate::card::Card;

/// Ordered collection of cards for a session
#[derive(Debug, Default)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with cards fetched from the remote store
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: u64) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    /// Append a newly created card
    pub fn append(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replace the card with the same id, returning whether one was found
    pub fn replace(&mut self, card: Card) -> bool {
        match self.get_mut(card.id) {
            Some(existing) => {
                *existing = card;
                true
            }
            None => false,
        }
    }

    /// Remove a card by id after its remote deletion was confirmed
    pub fn remove(&mut self, id: u64) -> Option<Card> {
        let idx = self.cards.iter().position(|card| card.id == id)?;
        Some(self.cards.remove(idx))
    }

    /// Cards in display order (see [`sort_cards`]), borrowed
    pub fn display_order(&self) -> Vec<&Card> {
        let mut ordered: Vec<&Card> = self.cards.iter().collect();
        ordered.sort_by(|left, right| {
            running_rank(left)
                .cmp(&running_rank(right))
                .then_with(|| right.id.cmp(&left.id))
        });
        ordered
    }
}

/// Sort cards for display: the running card, if any, comes first; everything
/// else is newest-created first. Card ids are creation timestamps, so the
/// descending id order is the creation order.
pub fn sort_cards(cards: &mut [Card]) {
    cards.sort_by(|left, right| {
        running_rank(left)
            .cmp(&running_rank(right))
            .then_with(|| right.id.cmp(&left.id))
    });
}

fn running_rank(card: &Card) -> usize {
    if card.is_running {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u64) -> Card {
        Card {
            id,
            description: format!("task {id}"),
            created: "2024-06-01".to_string(),
            time: 0,
            is_running: false,
            stopped: false,
            urgency: Default::default(),
        }
    }

    #[test]
    fn lookup_and_replace_by_id() {
        let mut store = CardStore::from_cards(vec![card(1), card(2)]);
        assert_eq!(store.len(), 2);
        assert!(store.get(2).is_some());
        assert!(store.get(3).is_none());

        let mut updated = card(2);
        updated.time = 30;
        assert!(store.replace(updated));
        assert_eq!(store.get(2).expect("card").time, 30);

        assert!(!store.replace(card(9)));
    }

    #[test]
    fn remove_returns_the_card() {
        let mut store = CardStore::from_cards(vec![card(1), card(2)]);
        let removed = store.remove(1).expect("removed");
        assert_eq!(removed.id, 1);
        assert!(store.remove(1).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn display_order_is_newest_first() {
        let store = CardStore::from_cards(vec![card(10), card(30), card(20)]);
        let ids: Vec<u64> = store.display_order().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![30, 20, 10]);
    }

    #[test]
    fn running_card_sorts_to_the_front() {
        let mut oldest = card(10);
        oldest.is_running = true;
        let mut cards = vec![card(30), oldest, card(20)];
        sort_cards(&mut cards);
        let ids: Vec<u64> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 30, 20]);
    }
}
