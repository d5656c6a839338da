//! Full reload: coalescing, polling, change detection, session triggers.

use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;

use boxsync_core::events::SessionEvent;
use boxsync_core::types::ContainerId;
use boxsync_entity::container::ContainerChangePush;
use boxsync_service::ContainerEvent;

use crate::helpers::{TestSync, device_tree, hdd, ids};

const POLL: Duration = Duration::from_millis(10_000);

#[tokio::test]
async fn test_start_builds_sorted_tree() {
    let sync = TestSync::started(device_tree()).await;

    // roots keep device order; "alice" sorts before "Public"
    assert_eq!(sync.order(), ids(&[1, 11, 12, 10, 2, 20, 3, 4, 5, 6]));
    assert_eq!(sync.remote.fetch_count(), 1);

    let public = sync.controller.container(ContainerId(10)).unwrap();
    assert_eq!(public.name(), "Public");
    assert_eq!(public.parent(), Some(ContainerId(1)));
    assert!(sync.controller.with_registry(|reg| reg.consistency_errors().is_empty()));
}

#[tokio::test]
async fn test_well_known_getters() {
    let sync = TestSync::started(device_tree()).await;

    assert_eq!(sync.controller.active_container().unwrap().name(), "Active");
    assert_eq!(sync.controller.editable_active_container().unwrap().name(), "Editable");
    assert_eq!(sync.controller.hold_container().unwrap().name(), "Hold");
    assert_eq!(sync.controller.finished_container().unwrap().name(), "Finished");
    assert_eq!(
        sync.controller
            .children(ContainerId(1))
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>(),
        vec!["alice", "Public"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_loads_share_one_fetch() {
    let sync = TestSync::started(device_tree()).await;
    sync.remote.set_fetch_delay(Duration::from_millis(200));

    let first = sync.controller.load();
    let second = sync.controller.load();
    assert!(sync.controller.is_loading());

    tokio::join!(first, second);

    assert_eq!(sync.remote.fetch_count(), 2);
    assert!(!sync.controller.is_loading());

    sync.controller.load().await;
    assert_eq!(sync.remote.fetch_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_poll_timer_reloads() {
    let sync = TestSync::started(device_tree()).await;
    assert!(sync.controller.is_poll_scheduled());

    tokio::time::sleep(POLL - Duration::from_millis(1)).await;
    assert_eq!(sync.remote.fetch_count(), 1);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(sync.remote.fetch_count(), 2);

    tokio::time::sleep(POLL).await;
    assert_eq!(sync.remote.fetch_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_is_reported_and_polling_continues() {
    let sync = TestSync::started(device_tree()).await;
    sync.remote.set_fail_fetch(true);

    sync.controller.load().await;

    assert_eq!(sync.reporter.contexts(), vec!["reload containers".to_string()]);
    assert!(sync.controller.is_poll_scheduled());
    assert_eq!(sync.controller.containers().len(), 10);

    sync.remote.set_fail_fetch(false);
    sync.remote.remove(12);
    tokio::time::sleep(POLL + Duration::from_millis(1)).await;

    assert_eq!(sync.remote.fetch_count(), 3);
    assert!(sync.controller.container(ContainerId(12)).is_none());
}

#[tokio::test]
async fn test_pure_deletion_emits_list_changed() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();
    sync.remote.remove(10);

    sync.controller.load().await;

    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::ContainerListChanged { unconditional: false }
    );
    assert!(sync.controller.container(ContainerId(10)).is_none());
    assert_eq!(sync.controller.children(ContainerId(1)).len(), 1);
}

#[tokio::test]
async fn test_field_change_announces_container_then_list() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();
    sync.remote.edit(|records| {
        records[0].container_list[1].container_list[0].job_count = 5;
    });

    sync.controller.load().await;

    match events.try_recv().unwrap() {
        ContainerEvent::ContainerChanged(c) => {
            assert_eq!(c.id(), ContainerId(12));
            assert_eq!(c.job_count(), 5);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::ContainerListChanged { unconditional: false }
    );
    assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn test_identical_reload_emits_nothing() {
    let sync = TestSync::started(device_tree()).await;
    let before = sync.controller.containers();
    let mut events = sync.controller.subscribe();

    sync.controller.load().await;

    assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    assert_eq!(sync.controller.containers(), before);
}

#[tokio::test]
async fn test_moved_container_follows_snapshot() {
    let sync = TestSync::started(device_tree()).await;
    sync.remote.edit(|records| {
        let hdd_root = &mut records[0];
        let mut alice = hdd_root.container_list.remove(1);
        let reports = alice.container_list.remove(0);
        hdd_root.container_list.push(alice);
        hdd_root.container_list[0].container_list.push(reports);
    });

    sync.controller.load().await;

    let reports = sync.controller.container(ContainerId(12)).unwrap();
    assert_eq!(reports.parent(), Some(ContainerId(10)));
    assert!(sync.controller.children(ContainerId(11)).is_empty());
    assert!(sync.controller.with_registry(|reg| reg.consistency_errors().is_empty()));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_polling() {
    let sync = TestSync::started(device_tree()).await;

    sync.controller.shutdown();
    assert!(!sync.controller.is_poll_scheduled());
    tokio::time::sleep(POLL * 3).await;

    assert_eq!(sync.remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_session_events_trigger_reload() {
    let sync = TestSync::started(device_tree()).await;

    for event in [SessionEvent::Login, SessionEvent::Logout, SessionEvent::SocketClosed] {
        sync.controller
            .on_session_event(&event)
            .expect("reload triggered")
            .await;
    }
    sync.controller.on_db_initialization_ready().await;

    assert_eq!(sync.remote.fetch_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_job_list_change_is_debounced_after_push() {
    let sync = TestSync::started(device_tree()).await;
    let pushed_jobs = SessionEvent::JobListChanged {
        container_id: Some(ContainerId(12)),
        from_push: true,
    };
    let local_jobs = SessionEvent::JobListChanged {
        container_id: Some(ContainerId(12)),
        from_push: false,
    };

    assert!(sync.controller.on_session_event(&pushed_jobs).is_none());
    sync.controller
        .on_session_event(&local_jobs)
        .expect("no push seen yet")
        .await;
    assert_eq!(sync.remote.fetch_count(), 2);

    sync.controller.apply_push(&ContainerChangePush::default());
    assert!(sync.controller.on_session_event(&local_jobs).is_none());

    tokio::time::advance(Duration::from_millis(5_001)).await;
    assert!(sync.controller.on_session_event(&local_jobs).is_some());
}

#[tokio::test]
async fn test_duplicate_ids_in_snapshot_keep_first() {
    let sync = TestSync::started(vec![
        hdd(1, "A").with_children(vec![hdd(3, "dup")]),
        hdd(2, "B").with_children(vec![hdd(3, "dup")]),
    ])
    .await;

    assert_eq!(sync.order(), ids(&[1, 3, 2]));
    assert_eq!(
        sync.controller.container(ContainerId(3)).unwrap().parent(),
        Some(ContainerId(1))
    );
}
