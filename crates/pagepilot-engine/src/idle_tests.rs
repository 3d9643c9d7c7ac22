use std::sync::Arc;
use std::time::Duration;

use pagepilot_dom::{InputKind, MemoryDom, NodeId, NodeKind};

use super::*;
use crate::config::EngineConfig;

struct Fixture {
    dom: Arc<MemoryDom>,
    watcher: IdleWatcher,
    strip: NodeId,
    tabs: Vec<NodeId>,
}

fn fixture_with_tabs(tab_count: usize) -> Fixture {
    let dom = Arc::new(MemoryDom::new());
    let root = dom.add_root(NodeKind::Block);
    let pane = dom.add(root, NodeKind::ConversationPane, "");
    let strip = dom.add(pane, NodeKind::TabStrip, "");
    let tabs: Vec<NodeId> = (0..tab_count)
        .map(|i| dom.add(strip, NodeKind::Tab, &format!("Tab {}", i + 1)))
        .collect();

    let config = EngineConfig::default();
    let watcher = IdleWatcher::new(
        dom.clone(),
        Arc::new(ScopeResolver::new(dom.clone() as Arc<dyn Dom>)),
        Notifier::new(dom.clone(), config.toast.clone()),
        Arc::new(Diagnostics::default()),
        config.idle,
        &config.preview,
    );
    Fixture {
        dom,
        watcher,
        strip,
        tabs,
    }
}

#[tokio::test(start_paused = true)]
async fn escalates_through_notice_warning_and_cycle() {
    let f = fixture_with_tabs(3);

    tokio::time::sleep(Duration::from_secs(10)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::IdleNoticed);
    assert_eq!(f.dom.toasts()[0].0, "No recent activity detected");

    tokio::time::sleep(Duration::from_secs(20)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::PreCycleWarned);
    assert_eq!(f.dom.toasts()[0].0, "Still idle, tab cycling starts soon");
    assert_eq!(f.dom.highlighted(), vec![f.strip]);

    // The strip cue clears on its own after 3 s.
    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert!(f.dom.highlighted().is_empty());

    tokio::time::sleep(Duration::from_millis(26_900)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::Cycling);

    // Three tabs, 1 s preview each, 15 s dwell each.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(f.dom.clicks(), vec![f.tabs[0]]);

    tokio::time::sleep(Duration::from_secs(45)).await;
    assert_eq!(f.dom.clicks(), f.tabs);
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
    assert_eq!(f.dom.toasts()[0].0, "Tab cycle complete");
}

#[tokio::test(start_paused = true)]
async fn notices_are_monotonic_without_an_input_reset() {
    let f = fixture_with_tabs(1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::PreCycleWarned);

    // A later tick inside the warned window never regresses to IdleNoticed.
    tokio::time::sleep(Duration::from_secs(5)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::PreCycleWarned);
    assert_eq!(f.dom.toasts().len(), 1);
    assert_eq!(f.dom.toasts()[0].0, "Still idle, tab cycling starts soon");
}

#[tokio::test(start_paused = true)]
async fn trusted_input_resets_notices_and_prevents_cycling() {
    let f = fixture_with_tabs(3);

    tokio::time::sleep(Duration::from_secs(30)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::PreCycleWarned);

    tokio::time::sleep(Duration::from_secs(15)).await;
    f.watcher.note_trusted_input();
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
    assert_eq!(f.dom.toasts()[0].0, "Activity detected, idle timers reset");

    // The initial 60 s mark passes without a cycle.
    tokio::time::sleep(Duration::from_secs(15)).await;
    f.watcher.tick();
    assert_ne!(f.watcher.phase(), IdlePhase::Cycling);
    assert!(f.dom.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelling_mid_cycle_stops_remaining_steps() {
    let f = fixture_with_tabs(3);

    tokio::time::sleep(Duration::from_secs(60)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::Cycling);

    // First tab is clicked, then the user comes back during its dwell.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(f.dom.clicks(), vec![f.tabs[0]]);
    f.watcher.note_trusted_input();
    assert_eq!(f.dom.toasts()[0].0, "Tab cycling cancelled");

    // Give the cycle task a chance to observe the cancellation, then make
    // sure steps 2..n never fire.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(f.dom.clicks(), vec![f.tabs[0]]);
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
}

#[tokio::test(start_paused = true)]
async fn cancelling_during_preview_suppresses_that_click_too() {
    let f = fixture_with_tabs(2);

    tokio::time::sleep(Duration::from_secs(60)).await;
    f.watcher.tick();

    // Cancel inside the first tab's 1 s preview window.
    tokio::time::sleep(Duration::from_millis(500)).await;
    f.watcher.note_trusted_input();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(f.dom.clicks().is_empty());
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
}

#[tokio::test(start_paused = true)]
async fn tick_is_a_no_op_while_cycling() {
    let f = fixture_with_tabs(2);

    tokio::time::sleep(Duration::from_secs(60)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::Cycling);

    // Another tick during the cycle must not start a second sequence.
    tokio::time::sleep(Duration::from_secs(10)).await;
    f.watcher.tick();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(f.dom.clicks(), f.tabs, "each tab clicked exactly once");
}

#[tokio::test(start_paused = true)]
async fn empty_tab_strip_aborts_with_a_diagnostic() {
    let f = fixture_with_tabs(0);

    tokio::time::sleep(Duration::from_secs(60)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
    assert_eq!(f.dom.toasts()[0].0, "No tabs found to cycle");

    // The abort restarted the idle clock: no immediate re-toast.
    tokio::time::sleep(Duration::from_secs(5)).await;
    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
}

#[tokio::test(start_paused = true)]
async fn hidden_tabs_are_skipped() {
    let f = fixture_with_tabs(3);
    f.dom.set_visible(f.tabs[1], false);

    tokio::time::sleep(Duration::from_secs(60)).await;
    f.watcher.tick();
    tokio::time::sleep(Duration::from_secs(40)).await;
    assert_eq!(f.dom.clicks(), vec![f.tabs[0], f.tabs[2]]);
}

#[tokio::test(start_paused = true)]
async fn no_op_without_conversation_scope() {
    let dom = Arc::new(MemoryDom::new());
    dom.add_root(NodeKind::Block);
    let config = EngineConfig::default();
    let watcher = IdleWatcher::new(
        dom.clone(),
        Arc::new(ScopeResolver::new(dom.clone() as Arc<dyn Dom>)),
        Notifier::new(dom.clone(), config.toast.clone()),
        Arc::new(Diagnostics::default()),
        config.idle,
        &config.preview,
    );

    tokio::time::sleep(Duration::from_secs(120)).await;
    watcher.tick();
    assert_eq!(watcher.phase(), IdlePhase::Active);
    assert!(dom.toasts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn synthetic_clicks_never_reset_the_idle_clock() {
    let f = fixture_with_tabs(1);
    let stop = CancellationToken::new();
    f.watcher.spawn_input_listener(stop.clone());
    tokio::task::yield_now().await;

    tokio::time::sleep(Duration::from_secs(9)).await;
    // Synthetic activation right before the notice threshold.
    f.dom.click(f.tabs[0]);
    tokio::time::sleep(Duration::from_secs(1)).await;

    f.watcher.tick();
    assert_eq!(
        f.watcher.phase(),
        IdlePhase::IdleNoticed,
        "synthetic click did not reset idleness"
    );
    stop.cancel();
}

#[tokio::test(start_paused = true)]
async fn listener_feeds_trusted_events_into_the_clock() {
    let f = fixture_with_tabs(1);
    let stop = CancellationToken::new();
    f.watcher.spawn_input_listener(stop.clone());
    tokio::task::yield_now().await;

    tokio::time::sleep(Duration::from_secs(9)).await;
    f.dom.emit_trusted(InputKind::Key);
    tokio::time::sleep(Duration::from_secs(1)).await;

    f.watcher.tick();
    assert_eq!(f.watcher.phase(), IdlePhase::Active);
    assert!(f.dom.toasts().is_empty());
    stop.cancel();
}
