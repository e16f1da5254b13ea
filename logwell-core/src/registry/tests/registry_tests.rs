use crate::registry::{Registry, SocketHandle};
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::{Instant, advance};

fn peer(port: u16) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 7], port))
}

#[test]
fn insert_keeps_one_record_per_peer() {
    // Arrange
    let registry = Registry::new();
    let first = SocketHandle::new();
    let second = SocketHandle::new();

    // Act
    registry.insert(peer(5000), first);
    registry.insert(peer(5000), second.clone());
    registry.insert(peer(5001), SocketHandle::new());

    // Assert
    assert_eq!(registry.len(), 2);
    let record = registry.get(&peer(5000)).unwrap();
    second.close();
    assert!(record.handle.is_closed(), "later insert should win");
}

#[test]
fn remove_is_idempotent() {
    // Arrange
    let registry = Registry::new();
    registry.insert(peer(5000), SocketHandle::new());

    // Act
    let first = registry.remove(&peer(5000));
    let second = registry.remove(&peer(5000));
    let third = registry.remove(&peer(5000));

    // Assert
    assert!(first);
    assert!(!second);
    assert!(!third);
    assert!(registry.is_empty());
}

#[test]
fn touch_on_absent_peer_is_a_noop() {
    let registry = Registry::new();

    registry.touch(&peer(5000));

    assert!(!registry.contains(&peer(5000)));
}

#[tokio::test(start_paused = true)]
async fn insert_sets_both_timestamps_to_now() {
    let registry = Registry::new();
    let before = Instant::now();

    registry.insert(peer(5000), SocketHandle::new());

    let record = registry.get(&peer(5000)).unwrap();
    assert_eq!(record.connected_at, before);
    assert_eq!(record.last_activity, before);
}

#[tokio::test(start_paused = true)]
async fn touch_advances_last_activity_only() {
    // Arrange
    let registry = Registry::new();
    registry.insert(peer(5000), SocketHandle::new());
    let before = registry.get(&peer(5000)).unwrap();

    // Act
    advance(Duration::from_secs(3)).await;
    registry.touch(&peer(5000));

    // Assert
    let after = registry.get(&peer(5000)).unwrap();
    assert!(after.last_activity > before.last_activity);
    assert_eq!(after.last_activity - before.last_activity, Duration::from_secs(3));
    assert_eq!(after.connected_at, before.connected_at);
}

#[test]
fn each_touch_counts_one_receive() {
    let registry = Registry::new();
    registry.insert(peer(5000), SocketHandle::new());
    assert_eq!(registry.get(&peer(5000)).unwrap().receives, 0);

    registry.touch(&peer(5000));
    registry.touch(&peer(5000));

    assert_eq!(registry.get(&peer(5000)).unwrap().receives, 2);
}

#[tokio::test(start_paused = true)]
async fn touch_never_moves_activity_backwards() {
    let registry = Registry::new();
    registry.insert(peer(5000), SocketHandle::new());
    let before = registry.get(&peer(5000)).unwrap().last_activity;

    registry.touch(&peer(5000));

    let after = registry.get(&peer(5000)).unwrap().last_activity;
    assert!(after >= before);
}

#[test]
fn snapshot_is_detached_from_the_table() {
    // Arrange
    let registry = Registry::new();
    registry.insert(peer(5000), SocketHandle::new());
    registry.insert(peer(5001), SocketHandle::new());

    // Act
    let snapshot = registry.snapshot();
    registry.remove(&peer(5000));
    registry.insert(peer(5002), SocketHandle::new());

    // Assert
    let mut peers: Vec<_> = snapshot.iter().map(|r| r.peer).collect();
    peers.sort();
    assert_eq!(peers, vec![peer(5000), peer(5001)]);
    assert_eq!(registry.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn remove_if_idle_rechecks_under_the_lock() {
    // Arrange
    let registry = Registry::new();
    let idle_timeout = Duration::from_secs(30);
    registry.insert(peer(5000), SocketHandle::new());
    advance(Duration::from_secs(31)).await;
    let stale_view = registry.snapshot();
    assert!(stale_view[0].is_idle(Instant::now(), idle_timeout));

    // Act: the handler receives data between snapshot and eviction
    registry.touch(&peer(5000));
    let evicted = registry.remove_if_idle(&peer(5000), idle_timeout, Instant::now());

    // Assert
    assert!(evicted.is_none());
    assert!(registry.contains(&peer(5000)));
}

#[tokio::test(start_paused = true)]
async fn remove_if_idle_returns_the_stale_record() {
    let registry = Registry::new();
    let idle_timeout = Duration::from_secs(30);
    registry.insert(peer(5000), SocketHandle::new());
    advance(Duration::from_secs(31)).await;

    let evicted = registry.remove_if_idle(&peer(5000), idle_timeout, Instant::now());

    assert_eq!(evicted.map(|r| r.peer), Some(peer(5000)));
    assert!(registry.is_empty());
    assert!(
        registry
            .remove_if_idle(&peer(5000), idle_timeout, Instant::now())
            .is_none()
    );
}

#[tokio::test(start_paused = true)]
async fn exactly_the_timeout_is_not_idle() {
    let registry = Registry::new();
    let idle_timeout = Duration::from_secs(30);
    registry.insert(peer(5000), SocketHandle::new());
    advance(idle_timeout).await;

    let evicted = registry.remove_if_idle(&peer(5000), idle_timeout, Instant::now());

    assert!(evicted.is_none());
}

#[test]
fn drain_empties_the_table() {
    let registry = Registry::new();
    registry.insert(peer(5000), SocketHandle::new());
    registry.insert(peer(5001), SocketHandle::new());

    let drained = registry.drain();

    assert_eq!(drained.len(), 2);
    assert!(registry.is_empty());
    assert!(!registry.remove(&peer(5000)));
}

#[test]
fn concurrent_inserts_of_one_peer_leave_a_single_record() {
    use std::sync::Arc;
    use std::thread;

    // Arrange
    let registry = Arc::new(Registry::new());

    // Act
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for port in 0..50u16 {
                    registry.insert(peer(6000 + port), SocketHandle::new());
                    registry.touch(&peer(6000 + port));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Assert
    assert_eq!(registry.len(), 50);
}
