//! Pushed incremental changes and their interplay with full reloads.

use boxsync_core::types::ContainerId;
use boxsync_entity::container::{
    AddedContainer, BoxType, ContainerChangePush, ContainerPatch, ContainerRef, LockState,
};
use boxsync_realtime::EventBridge;
use boxsync_service::ContainerEvent;

use crate::helpers::{TestSync, device_tree, hdd, ids};

fn added(id: u32, parent: u32, name: &str) -> AddedContainer {
    AddedContainer {
        parent_container_id: Some(ContainerId(parent)),
        record: hdd(id, name).with_box_type(BoxType::Box),
    }
}

#[tokio::test]
async fn test_push_of_existing_container_does_not_duplicate() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();

    let outcome = sync.controller.apply_push(&ContainerChangePush {
        new: vec![added(12, 11, "Reports 2024")],
        ..Default::default()
    });

    assert!(outcome.added_ids.is_empty());
    assert_eq!(outcome.changed_ids, ids(&[12]));
    assert_eq!(sync.controller.containers().len(), 10);
    assert_eq!(
        sync.controller.container(ContainerId(12)).unwrap().name(),
        "Reports 2024"
    );
    match events.try_recv().unwrap() {
        ContainerEvent::ContainerChanged(c) => assert_eq!(c.name(), "Reports 2024"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::ContainerListChanged { unconditional: true }
    );
}

#[tokio::test]
async fn test_pushed_change_announces_container_before_list() {
    let sync = TestSync::started(device_tree()).await;
    let mut events = sync.controller.subscribe();
    let mut jobs = ContainerPatch::new(ContainerId(12));
    jobs.job_count = Some(9);

    sync.controller.apply_push(&ContainerChangePush {
        changed: vec![jobs],
        ..Default::default()
    });

    match events.try_recv().unwrap() {
        ContainerEvent::ContainerChanged(c) => {
            assert_eq!(c.id(), ContainerId(12));
            assert_eq!(c.job_count(), 9);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        events.try_recv().unwrap(),
        ContainerEvent::ContainerListChanged { unconditional: true }
    );
}

#[tokio::test]
async fn test_push_add_change_delete_in_one_message() {
    let sync = TestSync::started(device_tree()).await;
    let mut lock_reports = ContainerPatch::new(ContainerId(12));
    lock_reports.locked = Some(LockState::On);

    sync.controller.apply_push(&ContainerChangePush {
        new: vec![added(40, 11, "Archive")],
        changed: vec![lock_reports],
        deleted: vec![ContainerRef {
            container_id: ContainerId(10),
        }],
    });

    // "Archive" sorts before "Reports" below alice
    assert_eq!(sync.order(), ids(&[1, 11, 40, 12, 2, 20, 3, 4, 5, 6]));
    assert!(sync.controller.container(ContainerId(12)).unwrap().is_locked());
    assert!(sync.controller.with_registry(|reg| reg.consistency_errors().is_empty()));
}

#[tokio::test]
async fn test_deleting_folder_removes_its_boxes() {
    let sync = TestSync::started(device_tree()).await;

    let outcome = sync.controller.apply_push(&ContainerChangePush {
        deleted: vec![ContainerRef {
            container_id: ContainerId(11),
        }],
        ..Default::default()
    });

    assert_eq!(outcome.removed_ids, ids(&[11, 12]));
    assert!(sync.controller.container(ContainerId(12)).is_none());
    assert_eq!(sync.controller.children(ContainerId(1)).len(), 1);
}

#[tokio::test]
async fn test_early_push_is_repaired_by_reload() {
    let sync = TestSync::started(device_tree()).await;

    // the parent is not known yet, so the box lands at the root
    sync.controller.apply_push(&ContainerChangePush {
        new: vec![added(41, 99, "Early")],
        ..Default::default()
    });
    assert!(sync.controller.container(ContainerId(41)).unwrap().is_root());
    sync.touch_all().await;

    sync.remote.edit(|records| {
        records[0].container_list[1].container_list.push(hdd(41, "Early"));
    });
    sync.controller.load().await;

    let early = sync.controller.container(ContainerId(41)).unwrap();
    assert_eq!(early.parent(), Some(ContainerId(11)));
    assert_eq!(early.box_type(), BoxType::None);
    assert!(sync.controller.with_registry(|reg| reg.consistency_errors().is_empty()));
}

#[tokio::test]
async fn test_bridge_frames_reach_the_tree() {
    let sync = TestSync::started(device_tree()).await;
    let bridge = EventBridge::new(sync.controller.clone());

    bridge.on_frame(r#"{"event":"container_change","changed":[{"containerId":12,"jobCount":7}]}"#);

    assert_eq!(sync.controller.container(ContainerId(12)).unwrap().job_count(), 7);
    assert_eq!(sync.remote.fetch_count(), 1);
}
