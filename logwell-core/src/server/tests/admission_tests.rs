use crate::server::AdmissionControl;
use std::sync::Arc;

#[test]
fn limit_rejects_once_full() {
    // Arrange
    let admission = Arc::new(AdmissionControl::new(Some(2)));

    // Act
    let first = admission.try_acquire();
    let second = admission.try_acquire();
    let third = admission.try_acquire();

    // Assert
    assert!(first.is_some());
    assert!(second.is_some());
    assert!(third.is_none());
    assert_eq!(admission.active(), 2);
}

#[test]
fn dropping_a_guard_frees_its_slot() {
    let admission = Arc::new(AdmissionControl::new(Some(1)));

    let slot = admission.try_acquire().unwrap();
    assert!(admission.try_acquire().is_none());
    drop(slot);

    assert_eq!(admission.active(), 0);
    assert!(admission.try_acquire().is_some());
}

#[test]
fn unlimited_always_admits() {
    let admission = Arc::new(AdmissionControl::new(None));

    let slots: Vec<_> = (0..100).filter_map(|_| admission.try_acquire()).collect();

    assert_eq!(slots.len(), 100);
    assert_eq!(admission.active(), 100);
    assert_eq!(admission.max(), None);
}
