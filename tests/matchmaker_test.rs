//! Tests for FIFO matchmaking.

use gridlock::{ConnectionId, ConnectionRegistry, Mark, Matchmaker, MatchmakingError};

fn ids(n: usize) -> Vec<ConnectionId> {
    let mut registry = ConnectionRegistry::new(64);
    (0..n).map(|_| registry.on_connect().unwrap()).collect()
}

#[test]
fn pairing_needs_two_waiting() {
    let mut mm = Matchmaker::new();
    assert!(mm.try_pair().is_none());

    let ids = ids(1);
    mm.enqueue(ids[0]).unwrap();
    assert!(mm.try_pair().is_none());
    assert!(mm.is_waiting(ids[0]));
}

#[test]
fn pairing_is_fifo_and_first_dequeued_takes_x() {
    let ids = ids(4);
    let mut mm = Matchmaker::new();
    for &id in &ids {
        mm.enqueue(id).unwrap();
    }

    let first = mm.try_pair().unwrap();
    assert_eq!(first.players(), (ids[0], ids[1]));
    assert_eq!(first.role_of(ids[0]), Some(Mark::X));
    assert_eq!(first.role_of(ids[1]), Some(Mark::O));

    let second = mm.try_pair().unwrap();
    assert_eq!(second.players(), (ids[2], ids[3]));

    assert!(mm.try_pair().is_none());
    assert_eq!(mm.waiting_len(), 0);
}

#[test]
fn match_ids_are_unique() {
    let ids = ids(4);
    let mut mm = Matchmaker::new();
    for &id in &ids {
        mm.enqueue(id).unwrap();
    }
    let first = mm.try_pair().unwrap();
    let second = mm.try_pair().unwrap();
    assert_ne!(first.id(), second.id());
}

#[test]
fn double_enqueue_rejected() {
    let ids = ids(1);
    let mut mm = Matchmaker::new();
    mm.enqueue(ids[0]).unwrap();
    assert_eq!(mm.enqueue(ids[0]), Err(MatchmakingError::AlreadyMatched));
    assert_eq!(mm.waiting_len(), 1);
}

#[test]
fn remove_is_idempotent() {
    let ids = ids(2);
    let mut mm = Matchmaker::new();
    mm.enqueue(ids[0]).unwrap();
    mm.enqueue(ids[1]).unwrap();

    mm.remove(ids[0]);
    assert!(!mm.is_waiting(ids[0]));
    // Removing again, or removing an id that was never queued, is fine.
    mm.remove(ids[0]);
    assert_eq!(mm.waiting_len(), 1);
}

#[test]
fn removed_connection_is_skipped_in_pairing() {
    let ids = ids(3);
    let mut mm = Matchmaker::new();
    for &id in &ids {
        mm.enqueue(id).unwrap();
    }
    mm.remove(ids[1]);

    let paired = mm.try_pair().unwrap();
    assert_eq!(paired.players(), (ids[0], ids[2]));
}
