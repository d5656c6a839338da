//! Idle auto-lock as part of the reload cycle.

use boxsync_core::error::ErrorKind;
use boxsync_core::types::ContainerId;
use boxsync_entity::container::{ContainerRecord, LockState};
use boxsync_service::ContainerEvent;

use crate::helpers::{TestSync, hdd, ids};

/// Locked HDD(1) holding the open chain A(30) -> B(31) -> C(32), plus an
/// open sibling D(33).
fn chain() -> Vec<ContainerRecord> {
    vec![hdd(1, "HDD").with_locked(LockState::On).with_children(vec![
        hdd(30, "A").with_children(vec![hdd(31, "B").with_children(vec![hdd(32, "C")])]),
        hdd(33, "D"),
    ])]
}

#[tokio::test]
async fn test_locking_ancestor_excludes_descendants() {
    let sync = TestSync::new(chain());
    sync.controller.start().await;
    let mut events = sync.controller.subscribe();

    sync.controller.load().await;

    assert_eq!(sync.remote.lock_calls(), ids(&[30, 33]));
    assert!(sync.controller.container(ContainerId(30)).unwrap().is_locked());
    assert!(!sync.controller.container(ContainerId(31)).unwrap().is_locked());
    assert!(!sync.controller.container(ContainerId(32)).unwrap().is_locked());

    match events.try_recv().unwrap() {
        ContainerEvent::ContainerChanged(c) => assert_eq!(c.id(), ContainerId(30)),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_visiting_a_container_stamps_its_ancestors() {
    let sync = TestSync::new(chain());
    sync.controller.start().await;

    sync.controller.record_access(ContainerId(31)).await.unwrap();

    assert!(sync.access.last_access(ContainerId(31)).await > 0);
    assert!(sync.access.last_access(ContainerId(30)).await > 0);
    assert!(sync.access.last_access(ContainerId(1)).await > 0);
    assert_eq!(sync.access.last_access(ContainerId(32)).await, 0);

    sync.controller.load().await;

    assert_eq!(sync.remote.lock_calls(), ids(&[32, 33]));
}

#[tokio::test]
async fn test_recently_used_tree_is_left_alone() {
    let sync = TestSync::started(chain()).await;

    sync.controller.load().await;

    assert!(sync.remote.lock_calls().is_empty());
}

#[tokio::test]
async fn test_failed_auto_lock_skips_fetch_of_that_cycle() {
    let sync = TestSync::new(chain());
    sync.controller.start().await;
    sync.remote.fail_lock(30, None);
    sync.remote.remove(33);

    sync.controller.load().await;

    assert_eq!(sync.remote.lock_calls(), ids(&[30]));
    assert_eq!(sync.reporter.contexts(), vec!["auto-lock sweep".to_string()]);
    assert_eq!(sync.reporter.kinds(), vec![ErrorKind::Remote]);
    assert_eq!(sync.remote.fetch_count(), 1);
    assert!(sync.controller.container(ContainerId(33)).is_some());
    assert!(!sync.controller.is_loading());
    assert!(sync.controller.is_poll_scheduled());
}

#[tokio::test]
async fn test_access_map_is_cleared_on_start() {
    let sync = TestSync::new(chain());
    sync.access
        .record_access(&[ContainerId(30)])
        .await
        .unwrap();

    sync.controller.start().await;

    assert_eq!(sync.access.last_access(ContainerId(30)).await, 0);
}
