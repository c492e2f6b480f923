//! Invariant checks for the single-active-timer coordinator: whatever the
//! sequence of start/pause/stop across multiple cards, at most one card is
//! running at any observation point.

use trackify::card::Card;
use trackify::coordinator::Coordinator;
use trackify::store::CardStore;

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

fn assert_at_most_one_running(store: &CardStore, coordinator: &Coordinator) {
    let running: Vec<u64> = store
        .cards()
        .iter()
        .filter(|card| card.is_running)
        .map(|card| card.id)
        .collect();
    assert!(
        running.len() <= 1,
        "invariant violated, running cards: {running:?}"
    );
    match coordinator.active_card() {
        Some(active) => assert_eq!(running, vec![active]),
        None => assert!(running.is_empty()),
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start(u64),
    Pause(u64),
    Stop(u64),
}

#[test]
fn arbitrary_sequences_keep_at_most_one_timer_running() {
    use Op::*;

    // Mixed valid and rejected operations over three cards.
    let script = [
        Start(1),
        Start(2), // rejected: 1 is running
        Pause(1),
        Start(2),
        Start(2), // no-op: already the active card
        Stop(2),  // terminal
        Start(2), // rejected: stopped
        Start(3),
        Pause(3),
        Pause(3), // rejected: no running timer
        Stop(3),  // rejected: idle -> stopped is not allowed
        Start(1),
        Stop(1),
        Start(9), // rejected: unknown card
    ];

    let mut store = store_with(&[1, 2, 3]);
    let mut coordinator = Coordinator::new();
    let mut elapsed = 0;

    for op in script {
        elapsed += 1;
        let _ = match op {
            Start(id) => coordinator.start(&mut store, id).map(|_| ()),
            Pause(id) => coordinator.pause(&mut store, id, elapsed).map(|_| ()),
            Stop(id) => coordinator.stop(&mut store, id, elapsed).map(|_| ()),
        };
        assert_at_most_one_running(&store, &coordinator);
    }

    // Terminal states stick.
    assert!(store.get(1).expect("card").stopped);
    assert!(store.get(2).expect("card").stopped);
    assert!(!store.get(3).expect("card").stopped);
}

#[test]
fn rejected_start_leaves_both_cards_untouched() {
    let mut store = store_with(&[1, 2]);
    let mut coordinator = Coordinator::new();

    coordinator.start(&mut store, 1).expect("start");
    let before_a = store.get(1).expect("card").clone();
    let before_b = store.get(2).expect("card").clone();

    coordinator.start(&mut store, 2).expect_err("conflict");

    let after_a = store.get(1).expect("card");
    let after_b = store.get(2).expect("card");
    assert_eq!(after_a.is_running, before_a.is_running);
    assert_eq!(after_a.time, before_a.time);
    assert_eq!(after_b.is_running, before_b.is_running);
    assert_eq!(after_b.time, before_b.time);
    assert_eq!(coordinator.active_card(), Some(1));
}

#[test]
fn accumulated_time_is_monotonic_across_pauses() {
    let mut store = store_with(&[1]);
    let mut coordinator = Coordinator::new();

    let mut last = 0;
    for elapsed in [10, 25, 310] {
        coordinator.start(&mut store, 1).expect("start");
        let flush = coordinator.pause(&mut store, 1, elapsed).expect("pause");
        assert!(flush.time >= last);
        last = flush.time;
        assert_eq!(store.get(1).expect("card").time, elapsed);
    }
}
