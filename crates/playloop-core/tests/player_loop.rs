use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use playloop_core::config::FrameConfig;
use playloop_core::phase::{self, FramePhase, SCRIPT_RUN_FIXED_UPDATE, SCRIPT_RUN_UPDATE};
use playloop_core::{
    editor, handler, ExitSignal, FixedRateOverride, LoopConfig, NodeId, PlayerLoop, UpdateNode,
};

struct BeforeUpdate;
struct AfterFixedScripts;

fn config(fixed_hz: u32, period_sec: f32) -> LoopConfig {
    let mut cfg = LoopConfig::default();
    cfg.frame = FrameConfig {
        fixed_hz,
        max_dt_ms: 1000,
        target_fps: 1000,
        ..FrameConfig::default()
    };
    cfg.rate_override.period_sec = period_sec;
    cfg
}

/// Default tree with a counting handler on the fixed script runner.
fn tree_with_fixed_scripts(calls: Arc<AtomicU32>) -> UpdateNode {
    let mut tree = phase::default_tree();
    let scripts = UpdateNode::leaf(SCRIPT_RUN_FIXED_UPDATE, move |_| {
        calls.fetch_add(1, Ordering::Relaxed);
    });
    assert!(editor::replace(&mut tree, SCRIPT_RUN_FIXED_UPDATE, scripts).is_some());
    tree
}

#[test]
fn override_fires_at_its_own_period_and_forwards_every_step() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut pl = PlayerLoop::new(&config(4, 0.5), tree_with_fixed_scripts(calls.clone()));

    assert!(pl.rate_override().is_installed());
    assert!(!editor::contains(pl.tree(), SCRIPT_RUN_FIXED_UPDATE));
    assert!(editor::contains(pl.tree(), FixedRateOverride::node_id()));

    let fired_at = Arc::new(Mutex::new(Vec::new()));
    let sink = fired_at.clone();
    pl.rate_override()
        .set_on_period(move |ev| sink.lock().push(ev.fixed_tick_index));

    for _ in 0..9 {
        let frame = pl.frame(Duration::from_millis(250)).unwrap();
        assert_eq!(frame.fixed_steps, 1);
    }

    assert_eq!(calls.load(Ordering::Relaxed), 9);
    assert_eq!(*fired_at.lock(), vec![3, 5, 7, 9]);
}

#[test]
fn one_long_step_catches_up() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut pl = PlayerLoop::new(&config(1, 0.4), tree_with_fixed_scripts(calls.clone()));

    pl.frame(Duration::from_secs(1)).unwrap();
    assert_eq!(pl.rate_override().fired(), 2);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn period_toggle_applies_without_reset() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut pl = PlayerLoop::new(&config(4, 0.5), tree_with_fixed_scripts(calls));

    pl.frame(Duration::from_millis(250)).unwrap();
    pl.set_update_period(1.5);
    assert_eq!(pl.rate_override().period(), 1.5);
    assert_eq!(pl.rate_override().accumulator(), 0.25);

    for _ in 0..5 {
        pl.frame(Duration::from_millis(250)).unwrap();
    }
    assert_eq!(pl.rate_override().fired(), 0);

    pl.frame(Duration::from_millis(250)).unwrap();
    assert_eq!(pl.rate_override().fired(), 1);
}

#[test]
fn unknown_target_runs_in_degraded_mode() {
    let mut cfg = config(4, 0.5);
    cfg.rate_override.target = "NoSuchNode".to_string();

    let calls = Arc::new(AtomicU32::new(0));
    let tree = tree_with_fixed_scripts(calls.clone());
    let mut pl = PlayerLoop::new(&cfg, tree.clone());

    assert!(!pl.rate_override().is_installed());
    assert_eq!(pl.tree(), &tree);

    for _ in 0..4 {
        pl.frame(Duration::from_millis(250)).unwrap();
    }
    assert_eq!(calls.load(Ordering::Relaxed), 4);
    assert_eq!(pl.rate_override().fired(), 0);
}

#[test]
fn inserted_systems_run_in_tree_order() {
    let mut cfg = config(4, 0.5);
    cfg.rate_override.enabled = false;

    let order = Arc::new(Mutex::new(Vec::new()));
    let log = |name: &'static str| {
        let order = order.clone();
        handler(move |_| order.lock().push(name))
    };

    let mut tree = phase::default_tree();
    editor::replace(&mut tree, SCRIPT_RUN_UPDATE, UpdateNode::with_handler(SCRIPT_RUN_UPDATE, log("update")));
    editor::replace(
        &mut tree,
        SCRIPT_RUN_FIXED_UPDATE,
        UpdateNode::with_handler(SCRIPT_RUN_FIXED_UPDATE, log("fixed")),
    );

    let mut pl = PlayerLoop::new(&cfg, tree);
    assert!(pl.insert_system_before(NodeId::of::<BeforeUpdate>(), log("before-update"), FramePhase::Update.id()));
    assert!(pl.insert_system_after(NodeId::of::<AfterFixedScripts>(), log("after-fixed"), SCRIPT_RUN_FIXED_UPDATE));

    pl.frame(Duration::from_millis(250)).unwrap();
    assert_eq!(*order.lock(), vec!["fixed", "after-fixed", "before-update", "update"]);

    order.lock().clear();
    pl.frame(Duration::from_millis(100)).unwrap();
    assert_eq!(*order.lock(), vec!["before-update", "update"]);
}

#[test]
fn shutdown_removes_only_inserted_systems() {
    let mut cfg = config(60, 0.5);
    cfg.rate_override.enabled = false;

    let mut pl = PlayerLoop::with_default_tree(&cfg);
    let pristine = pl.tree().clone();

    assert!(pl.insert_system_before(NodeId::of::<BeforeUpdate>(), handler(|_| {}), FramePhase::Update.id()));
    assert!(pl.insert_system_after(NodeId::of::<AfterFixedScripts>(), handler(|_| {}), SCRIPT_RUN_FIXED_UPDATE));
    assert!(!pl.insert_system_after(NodeId::new("Orphan"), handler(|_| {}), NodeId::new("Missing")));
    assert_eq!(pl.tree().node_count(), pristine.node_count() + 2);

    assert_eq!(pl.shutdown(), 2);
    assert_eq!(pl.tree(), &pristine);
    assert!(pl.systems().inserted().is_empty());
}

#[test]
fn shutdown_tolerates_systems_removed_elsewhere() {
    let mut cfg = config(60, 0.5);
    cfg.rate_override.enabled = false;

    let mut pl = PlayerLoop::with_default_tree(&cfg);
    assert!(pl.insert_system_before(NodeId::of::<BeforeUpdate>(), handler(|_| {}), FramePhase::Update.id()));

    // Someone edits the host tree directly, bypassing the registry.
    let mut tree = playloop_core::LoopHost::current_tree(&pl);
    assert!(editor::remove(&mut tree, NodeId::of::<BeforeUpdate>()));
    playloop_core::LoopHost::set_tree(&mut pl, tree);

    assert_eq!(pl.shutdown(), 0);
}

#[test]
fn fixed_steps_are_capped_per_frame() {
    let mut cfg = config(60, 0.5);
    cfg.frame.max_fixed_steps_per_frame = 8;

    let mut pl = PlayerLoop::with_default_tree(&cfg);
    let frame = pl.frame(Duration::from_secs(1)).unwrap();

    assert_eq!(frame.fixed_steps, 8);
    assert_eq!(frame.fixed_alpha, 0.0);
    assert_eq!(pl.time().fixed_tick_index, 8);
}

#[test]
fn run_stops_on_exit_signal_and_shuts_down() {
    let mut cfg = config(60, 0.5);
    cfg.rate_override.enabled = false;

    let mut pl = PlayerLoop::with_default_tree(&cfg);
    assert!(pl.insert_system_before(NodeId::of::<BeforeUpdate>(), handler(|_| {}), FramePhase::Update.id()));

    let exit = ExitSignal::new();
    let remote = exit.clone();
    let mut frames = 0u32;
    pl.run(&exit, |_, _| {
        frames += 1;
        if frames == 3 {
            remote.request_exit();
        }
    })
    .unwrap();

    assert_eq!(frames, 3);
    assert!(pl.is_shut_down());
    assert!(!editor::contains(pl.tree(), NodeId::of::<BeforeUpdate>()));
}

#[test]
fn override_targeting_fixed_phase_still_runs_per_fixed_step() {
    let mut cfg = config(4, 0.5);
    cfg.rate_override.target = "FixedUpdate".to_string();

    let calls = Arc::new(AtomicU32::new(0));
    let mut pl = PlayerLoop::new(&cfg, tree_with_fixed_scripts(calls.clone()));
    assert!(pl.rate_override().is_installed());

    for _ in 0..10 {
        let frame = pl.frame(Duration::from_millis(10)).unwrap();
        assert_eq!(frame.fixed_steps, 0);
    }
    assert_eq!(calls.load(Ordering::Relaxed), 0);
    assert_eq!(pl.rate_override().accumulator(), 0.0);

    pl.frame(Duration::from_millis(250)).unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert_eq!(pl.rate_override().accumulator(), 0.25);
}
