use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use notify::EventKind;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::debouncer::{GateDecision, TriggerGate};
use super::filter::{EventFilter, Rejection};
use super::router::{ChangeRouter, Routed};
use super::types::{ChangeEvent, ChangeKind};
use super::FsActor;
use crate::actor::messages::{LifecycleMsg, TriggerCause};
use crate::status::{Status, StatusSink};
use crate::utils::walk::collect_watch_dirs;

const QUIET: Duration = Duration::from_secs(1);
const ROOT: &str = "/src/app";

fn make_event(paths: Vec<&str>, kind: EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn write(path: &str) -> ChangeEvent {
    ChangeEvent::new(path, ChangeKind::Write)
}

fn go_filter() -> EventFilter {
    EventFilter::new(vec!["go".to_string()])
}

type Recorded = Arc<Mutex<Vec<Status>>>;

/// Router wired to a single-slot channel and a recording sink.
fn make_router() -> (
    ChangeRouter,
    Arc<TriggerGate>,
    mpsc::Receiver<LifecycleMsg>,
    Recorded,
) {
    let gate = Arc::new(TriggerGate::new(QUIET));
    let (tx, rx) = mpsc::channel(1);
    let seen: Recorded = Arc::default();
    let captured = Arc::clone(&seen);
    let sink: Arc<dyn StatusSink> = Arc::new(move |s: Status| captured.lock().push(s));

    let router = ChangeRouter::new(
        &PathBuf::from(ROOT),
        go_filter(),
        Arc::clone(&gate),
        tx,
        sink,
    );
    (router, gate, rx, seen)
}

/// Drain queued triggers the way the lifecycle actor would, releasing the
/// gate after each completed cycle.
fn drain_cycles(rx: &mut mpsc::Receiver<LifecycleMsg>, gate: &TriggerGate) -> usize {
    let mut cycles = 0;
    while let Ok(msg) = rx.try_recv() {
        assert!(matches!(msg, LifecycleMsg::Trigger(_)));
        cycles += 1;
        gate.release();
    }
    cycles
}

// =============================================================================
// notify → ChangeEvent
// =============================================================================

#[test]
fn test_notify_kind_mapping() {
    let cases = [
        (EventKind::Modify(ModifyKind::Data(DataChange::Content)), ChangeKind::Write),
        (EventKind::Modify(ModifyKind::Any), ChangeKind::Write),
        (EventKind::Create(CreateKind::File), ChangeKind::Create),
        (EventKind::Remove(RemoveKind::File), ChangeKind::Remove),
        (EventKind::Modify(ModifyKind::Name(RenameMode::From)), ChangeKind::Rename),
        (EventKind::Modify(ModifyKind::Name(RenameMode::To)), ChangeKind::Create),
    ];

    for (kind, expected) in cases {
        let changes = ChangeEvent::from_notify(&make_event(vec!["/a.go"], kind));
        assert_eq!(changes, vec![ChangeEvent::new("/a.go", expected)], "{kind:?}");
    }
}

#[test]
fn test_metadata_and_access_dropped() {
    let chmod = make_event(
        vec!["/a.go"],
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
    );
    assert!(ChangeEvent::from_notify(&chmod).is_empty());

    let open = make_event(vec!["/a.go"], EventKind::Access(notify::event::AccessKind::Any));
    assert!(ChangeEvent::from_notify(&open).is_empty());
}

#[test]
fn test_rename_both_splits_source_and_destination() {
    let event = make_event(
        vec!["/a.go.tmp", "/a.go"],
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
    );
    assert_eq!(
        ChangeEvent::from_notify(&event),
        vec![
            ChangeEvent::new("/a.go.tmp", ChangeKind::Rename),
            ChangeEvent::new("/a.go", ChangeKind::Create),
        ]
    );
}

#[test]
fn test_multi_path_event() {
    let event = make_event(
        vec!["/a.go", "/b.go"],
        EventKind::Create(CreateKind::Any),
    );
    assert_eq!(ChangeEvent::from_notify(&event).len(), 2);
}

// =============================================================================
// EventFilter
// =============================================================================

#[test]
fn test_filter_operation_gate() {
    let filter = go_filter();
    assert_eq!(
        filter.check(&ChangeEvent::new("/a.go", ChangeKind::Remove)),
        Err(Rejection::Operation)
    );
    assert_eq!(
        filter.check(&ChangeEvent::new("/a.go", ChangeKind::Rename)),
        Err(Rejection::Operation)
    );
    assert_eq!(filter.check(&ChangeEvent::new("/a.go", ChangeKind::Create)), Ok(()));
    assert_eq!(filter.check(&write("/a.go")), Ok(()));
}

#[test]
fn test_filter_extension_gate() {
    let filter = go_filter();
    for path in ["/a.go.swp", "/a.txt", "/Makefile", "/.go", "/a.GO", "/go"] {
        assert_eq!(filter.check(&write(path)), Err(Rejection::Extension), "{path}");
    }
}

#[test]
fn test_filter_operation_checked_first() {
    // A removed non-source file fails on the operation, not the extension.
    assert_eq!(
        go_filter().check(&ChangeEvent::new("/a.txt", ChangeKind::Remove)),
        Err(Rejection::Operation)
    );
}

#[test]
fn test_filter_multiple_extensions() {
    let filter = EventFilter::new(vec!["go".to_string(), "tmpl".to_string()]);
    assert!(filter.check(&write("/views/index.tmpl")).is_ok());
    assert!(filter.check(&write("/main.go")).is_ok());
    assert!(filter.check(&write("/README.md")).is_err());
}

// =============================================================================
// TriggerGate
// =============================================================================

#[test]
fn test_gate_first_trigger_accepted() {
    let gate = TriggerGate::new(QUIET);
    assert!(!gate.is_in_flight());
    assert_eq!(gate.try_acquire(Instant::now()), GateDecision::Accepted);
    assert!(gate.is_in_flight());
}

#[test]
fn test_gate_drops_while_in_flight() {
    let gate = TriggerGate::new(QUIET);
    let t0 = Instant::now();

    assert_eq!(gate.try_acquire(t0), GateDecision::Accepted);
    // Even long after the quiet period, an unfinished cycle blocks.
    assert_eq!(gate.try_acquire(t0 + QUIET * 10), GateDecision::InFlight);
}

#[test]
fn test_gate_quiet_period_from_last_accepted() {
    let gate = TriggerGate::new(QUIET);
    let t0 = Instant::now();

    assert_eq!(gate.try_acquire(t0), GateDecision::Accepted);
    gate.release();

    // Rejected attempts do not move the window.
    assert_eq!(gate.try_acquire(t0 + Duration::from_millis(400)), GateDecision::TooSoon);
    assert_eq!(gate.try_acquire(t0 + Duration::from_millis(800)), GateDecision::TooSoon);
    assert_eq!(gate.try_acquire(t0 + QUIET), GateDecision::Accepted);
}

#[test]
fn test_gate_force_acquire() {
    let gate = TriggerGate::new(QUIET);
    let t0 = Instant::now();

    assert!(gate.force_acquire(t0));
    assert!(!gate.force_acquire(t0));
    gate.release();

    // Startup counts as an accepted trigger for the quiet period.
    assert_eq!(gate.try_acquire(t0 + Duration::from_millis(10)), GateDecision::TooSoon);
}

#[test]
fn test_gate_concurrent_acquire_single_winner() {
    let gate = Arc::new(TriggerGate::new(QUIET));
    let now = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || gate.try_acquire(now))
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|d| *d == GateDecision::Accepted)
        .count();
    assert_eq!(accepted, 1);
}

// =============================================================================
// ChangeRouter
// =============================================================================

#[test]
fn test_remove_and_rename_never_trigger() {
    let (router, gate, mut rx, seen) = make_router();
    let now = Instant::now();

    for kind in [ChangeKind::Remove, ChangeKind::Rename] {
        let routed = router.route(ChangeEvent::new("/src/app/main.go", kind), now);
        assert_eq!(routed, Routed::Ignored(Rejection::Operation));
    }

    assert_eq!(drain_cycles(&mut rx, &gate), 0);
    assert!(!gate.is_in_flight());
    assert!(seen.lock().is_empty());
}

#[test]
fn test_foreign_extension_never_triggers() {
    let (router, gate, mut rx, _) = make_router();
    let routed = router.route(write("/src/app/.main.go.swp"), Instant::now());

    assert_eq!(routed, Routed::Ignored(Rejection::Extension));
    assert_eq!(drain_cycles(&mut rx, &gate), 0);
}

#[test]
fn test_single_write_triggers_one_cycle() {
    let (router, gate, mut rx, seen) = make_router();

    assert_eq!(router.route(write("/src/app/main.go"), Instant::now()), Routed::Triggered);

    match rx.try_recv() {
        Ok(LifecycleMsg::Trigger(TriggerCause::Change(path))) => {
            assert_eq!(path, PathBuf::from("/src/app/main.go"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
    gate.release();

    assert_eq!(
        *seen.lock(),
        vec![Status::Changed {
            path: PathBuf::from("main.go")
        }]
    );
}

#[test]
fn test_burst_within_quiet_period_coalesces() {
    let (router, gate, mut rx, _) = make_router();
    let t0 = Instant::now();

    // Cycle completes quickly, burst keeps going inside the window.
    let mut triggered = 0;
    for i in 0..20u64 {
        let at = t0 + Duration::from_millis(i * 40);
        if router.route(write("/src/app/main.go"), at) == Routed::Triggered {
            triggered += 1;
        }
        drain_cycles(&mut rx, &gate);
    }

    assert_eq!(triggered, 1);
}

#[test]
fn test_two_files_100ms_apart_one_cycle() {
    let (router, gate, mut rx, _) = make_router();
    let t0 = Instant::now();

    router.route(write("/src/app/main.go"), t0);
    router.route(write("/src/app/handler.go"), t0 + Duration::from_millis(100));

    assert_eq!(drain_cycles(&mut rx, &gate), 1);
}

#[test]
fn test_two_writes_1500ms_apart_two_cycles() {
    let (router, gate, mut rx, _) = make_router();
    let t0 = Instant::now();

    assert_eq!(router.route(write("/src/app/main.go"), t0), Routed::Triggered);
    assert_eq!(drain_cycles(&mut rx, &gate), 1);

    let later = t0 + Duration::from_millis(1500);
    assert_eq!(router.route(write("/src/app/main.go"), later), Routed::Triggered);
    assert_eq!(drain_cycles(&mut rx, &gate), 1);
}

#[test]
fn test_change_during_build_is_not_queued() {
    let (router, gate, mut rx, _) = make_router();
    let t0 = Instant::now();

    assert_eq!(router.route(write("/src/app/main.go"), t0), Routed::Triggered);
    // Lifecycle actor picks up the trigger and starts building.
    assert!(rx.try_recv().is_ok());

    // Edits during a long build, well past the quiet period.
    for secs in [2, 3, 4] {
        let routed = router.route(write("/src/app/main.go"), t0 + Duration::from_secs(secs));
        assert_eq!(routed, Routed::Dropped(GateDecision::InFlight));
    }

    // Build finishes: nothing was queued behind it.
    gate.release();
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_closed_lifecycle_releases_gate() {
    let (router, gate, rx, seen) = make_router();
    drop(rx);

    assert_eq!(router.route(write("/src/app/main.go"), Instant::now()), Routed::Closed);
    assert!(!gate.is_in_flight());
    assert!(seen.lock().is_empty());
}

#[test]
fn test_full_slot_reports_nothing_and_releases_gate() {
    let (router, gate, mut rx, seen) = make_router();
    let t0 = Instant::now();

    assert_eq!(router.route(write("/src/app/main.go"), t0), Routed::Triggered);
    // The gate reopens while the first trigger is still unconsumed.
    gate.release();

    let later = t0 + Duration::from_millis(1500);
    assert_eq!(
        router.route(write("/src/app/handler.go"), later),
        Routed::Dropped(GateDecision::InFlight)
    );
    assert!(!gate.is_in_flight());
    assert_eq!(
        *seen.lock(),
        vec![Status::Changed {
            path: PathBuf::from("main.go")
        }]
    );

    // Only the first change is waiting.
    match rx.try_recv() {
        Ok(LifecycleMsg::Trigger(TriggerCause::Change(path))) => {
            assert_eq!(path, PathBuf::from("/src/app/main.go"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

// =============================================================================
// FsActor (real watcher)
// =============================================================================

fn scratch() -> tempfile::TempDir {
    tempfile::Builder::new().prefix("hotrun-").tempdir().unwrap()
}

#[tokio::test]
async fn test_watcher_write_triggers_cycle() {
    let temp = scratch();
    let root = crate::utils::path::normalize_path(temp.path());
    let main = root.join("main.go");
    std::fs::write(&main, "package main\n").unwrap();

    let gate = Arc::new(TriggerGate::new(QUIET));
    let (tx, mut rx) = mpsc::channel(1);
    let seen: Recorded = Arc::default();
    let captured = Arc::clone(&seen);
    let sink: Arc<dyn StatusSink> = Arc::new(move |s: Status| captured.lock().push(s));

    let actor = FsActor::new(
        &root,
        &collect_watch_dirs(&root),
        go_filter(),
        Arc::clone(&gate),
        tx,
        sink,
    )
    .unwrap();
    let handle = tokio::spawn(actor.run());

    std::fs::write(&main, "package main\n\nfunc main() {}\n").unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no trigger within 5s");
    match msg {
        Some(LifecycleMsg::Trigger(TriggerCause::Change(path))) => {
            assert_eq!(path.file_name(), main.file_name());
        }
        other => panic!("unexpected message: {other:?}"),
    }

    // The same burst (write + close events) produced no second trigger.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err());

    assert!(matches!(
        seen.lock().first(),
        Some(Status::Watching { directories: 1, .. })
    ));

    // Dropping the receiver ends the event loop on the next relevant change.
    drop(rx);
    gate.release();
    tokio::time::sleep(QUIET + Duration::from_millis(100)).await;
    std::fs::write(&main, "package main\n").unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("event loop did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_watcher_missing_subdirectory_reported() {
    let temp = scratch();
    let root = crate::utils::path::normalize_path(temp.path());

    let mut set = collect_watch_dirs(&root);
    set.insert(root.join("vanished"));

    let seen: Recorded = Arc::default();
    let captured = Arc::clone(&seen);
    let sink: Arc<dyn StatusSink> = Arc::new(move |s: Status| captured.lock().push(s));
    let (tx, _rx) = mpsc::channel(1);

    let actor = FsActor::new(&root, &set, go_filter(), Arc::new(TriggerGate::new(QUIET)), tx, sink);
    assert!(actor.is_ok());

    let seen = seen.lock();
    assert!(matches!(seen[0], Status::WatchError { .. }));
    assert!(matches!(seen[1], Status::Watching { directories: 1, .. }));
}

#[tokio::test]
async fn test_watcher_missing_root_fails() {
    let temp = scratch();
    let root = temp.path().join("gone");
    let (tx, _rx) = mpsc::channel(1);
    let sink: Arc<dyn StatusSink> = Arc::new(|_: Status| {});

    let mut set = crate::utils::walk::WatchSet::default();
    set.insert(root.clone());

    let actor = FsActor::new(&root, &set, go_filter(), Arc::new(TriggerGate::new(QUIET)), tx, sink);
    assert!(actor.is_err());
}
