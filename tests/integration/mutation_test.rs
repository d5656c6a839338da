//! Locally initiated mutations.

use boxsync_core::error::ErrorKind;
use boxsync_core::types::ContainerId;
use boxsync_service::ContainerEvent;

use crate::helpers::{FIRST_CREATED_ID, TestSync, device_tree, ids};

#[tokio::test]
async fn test_lock_updates_tree_and_reloads() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();

    sync.controller.lock(ContainerId(12)).await.unwrap();

    assert_eq!(sync.remote.lock_calls(), ids(&[12]));
    assert_eq!(sync.remote.fetch_count(), 2);
    assert!(sync.controller.container(ContainerId(12)).unwrap().is_locked());
    match events.try_recv().unwrap() {
        ContainerEvent::ContainerChanged(c) => {
            assert_eq!(c.id(), ContainerId(12));
            assert!(c.is_locked());
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_lock_failure_composes_user_message() {
    let sync = TestSync::started(device_tree()).await;
    sync.remote.fail_lock(12, Some("Box is in use"));
    let mut events = sync.controller.subscribe();

    let err = sync
        .controller
        .lock_with_error_handling(ContainerId(12))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Remote);
    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::LockFailed {
            id: ContainerId(12),
            message: "Locking the container failed.\nBox is in use".to_string(),
        }
    );
    assert_eq!(sync.reporter.contexts(), vec!["lock container".to_string()]);
    assert!(!sync.controller.container(ContainerId(12)).unwrap().is_locked());
}

#[tokio::test]
async fn test_lock_failure_without_detail() {
    let sync = TestSync::started(device_tree()).await;
    sync.remote.fail_lock(12, None);
    let mut events = sync.controller.subscribe();

    let _ = sync.controller.lock_with_error_handling(ContainerId(12)).await;

    match events.try_recv().unwrap() {
        ContainerEvent::LockFailed { message, .. } => {
            assert_eq!(message, "Locking the container failed.")
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_unlock_records_access_for_ancestry() {
    let sync = TestSync::started(device_tree()).await;
    sync.access.reset().await.unwrap();

    let unlocked = sync.controller.unlock(ContainerId(20), "secret").await.unwrap();

    assert!(unlocked);
    assert!(!sync.controller.container(ContainerId(20)).unwrap().is_locked());
    assert!(sync.access.last_access(ContainerId(20)).await > 0);
    assert!(sync.access.last_access(ContainerId(2)).await > 0);
    assert_eq!(sync.access.last_access(ContainerId(1)).await, 0);
}

#[tokio::test]
async fn test_wrong_password_still_counts_as_visit() {
    let sync = TestSync::started(device_tree()).await;
    sync.remote.set_unlock_verdict(false);
    sync.access.reset().await.unwrap();

    let unlocked = sync.controller.unlock(ContainerId(20), "wrong").await.unwrap();

    assert!(!unlocked);
    assert!(sync.controller.container(ContainerId(20)).unwrap().is_locked());
    assert_eq!(sync.remote.unlock_calls(), ids(&[20]));
    assert!(sync.access.last_access(ContainerId(20)).await > 0);
}

#[tokio::test]
async fn test_create_returns_and_announces_new_container() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();

    let created = sync
        .controller
        .create_container(ContainerId(11), "Invoices", Some("pw"))
        .await
        .unwrap()
        .expect("created container visible after reload");

    assert_eq!(created.id(), ContainerId(FIRST_CREATED_ID));
    assert_eq!(created.parent(), Some(ContainerId(11)));
    assert_eq!(
        sync.remote.create_calls(),
        vec![(ContainerId(11), "Invoices".to_string())]
    );

    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::ContainerListChanged { unconditional: false }
    );
    assert_eq!(events.try_recv().unwrap(), ContainerEvent::ContainerCreated(created));
}

#[tokio::test]
async fn test_create_with_empty_name_is_rejected_locally() {
    let sync = TestSync::started(device_tree()).await;

    let err = sync
        .controller
        .create_container(ContainerId(11), "", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(sync.remote.create_calls().is_empty());
}

#[tokio::test]
async fn test_public_folder_rename_is_short_circuited() {
    let sync = TestSync::started(device_tree()).await;

    sync.controller
        .rename_container(ContainerId(10), "Shared")
        .await
        .unwrap();

    assert!(sync.remote.rename_calls().is_empty());
    assert_eq!(sync.remote.fetch_count(), 1);
    assert_eq!(sync.controller.container(ContainerId(10)).unwrap().name(), "Public");
}

#[tokio::test]
async fn test_rename_reloads_and_announces() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();

    sync.controller
        .rename_container(ContainerId(12), "Quarterly")
        .await
        .unwrap();

    assert_eq!(
        sync.remote.rename_calls(),
        vec![(ContainerId(12), "Quarterly".to_string())]
    );
    match events.try_recv().unwrap() {
        ContainerEvent::ContainerChanged(c) => assert_eq!(c.name(), "Quarterly"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::ContainerListChanged { unconditional: false }
    );
    match events.try_recv().unwrap() {
        ContainerEvent::ContainerRenamed(c) => assert_eq!(c.name(), "Quarterly"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_reloads_tree() {
    let sync = TestSync::started(device_tree()).await;

    sync.controller.delete_container(ContainerId(12)).await.unwrap();

    assert_eq!(sync.remote.delete_calls(), ids(&[12]));
    assert!(sync.controller.container(ContainerId(12)).is_none());
    assert!(sync.controller.children(ContainerId(11)).is_empty());
}

#[tokio::test]
async fn test_set_password_is_passed_through() {
    let sync = TestSync::started(device_tree()).await;

    sync.controller
        .set_password(ContainerId(20), "old", "new")
        .await
        .unwrap();

    assert_eq!(sync.remote.password_calls(), ids(&[20]));
    assert_eq!(sync.remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_unknown_container_is_not_found() {
    let sync = TestSync::started(device_tree()).await;

    let lock = sync.controller.lock(ContainerId(404)).await.unwrap_err();
    let rename = sync
        .controller
        .rename_container(ContainerId(404), "x")
        .await
        .unwrap_err();
    let access = sync.controller.record_access(ContainerId(404)).await.unwrap_err();

    assert_eq!(lock.kind, ErrorKind::NotFound);
    assert_eq!(rename.kind, ErrorKind::NotFound);
    assert_eq!(access.kind, ErrorKind::NotFound);
    assert!(sync.remote.lock_calls().is_empty());
}
