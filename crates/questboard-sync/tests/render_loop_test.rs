//! Integration tests for the render loop against in-memory event sources.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use questboard_core::clock::Clock;
use questboard_core::event::{EventBatch, InteractionEvent};
use questboard_core::response::ResponseValue;
use questboard_core::rng::DeterministicRng;
use questboard_rewards::application::event_handlers::QuestRewardHandler;
use questboard_sync::error::SyncError;
use questboard_sync::render_loop::{LoopState, RenderLoop};
use questboard_sync::session::{SessionContext, SessionKey};
use questboard_test_support::{
    FailingHandler, FixedClock, RecordingHandler, ScriptedEventSource, SequenceRng,
    WidgetSimulator,
};

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

fn session() -> SessionContext {
    SessionContext::new(
        SessionKey::parse("quest-board-component").unwrap(),
        fixed_clock().now(),
    )
}

fn clicks(ids: &[(&str, &str)]) -> EventBatch {
    let events: Vec<InteractionEvent> = ids
        .iter()
        .map(|(id, quest)| InteractionEvent::activated(*id, *quest))
        .collect();
    EventBatch::from_events(&events)
}

#[tokio::test]
async fn test_three_quests_resolve_in_one_cycle_with_one_rerender() {
    // Arrange
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SequenceRng::new(vec![5])));
    let handler = Arc::new(QuestRewardHandler::new(rng));
    let render_loop = RenderLoop::new(handler, fixed_clock());
    let mut ctx = session();
    let mut widget = WidgetSimulator::new();
    widget.click("u1", "A");
    widget.click("u2", "BB");
    widget.click("u3", "CCC");

    // Act
    let summary = render_loop.drive(&mut ctx, &mut widget).await.unwrap();

    // Assert
    assert_eq!(summary.rerenders, 1);
    assert_eq!(summary.dispatched(), 3);
    assert_eq!(summary.cycles[0].committed, 3);

    let mut ledger: Vec<&str> = ctx.ledger().iter().collect();
    ledger.sort_unstable();
    assert_eq!(ledger, vec!["u1", "u2", "u3"]);

    assert_eq!(ctx.channel().len(), 3);
    for (id, expected) in [("u1", "500"), ("u2", "1000"), ("u3", "1500")] {
        let record = ctx.channel().get(id).unwrap();
        assert_eq!(record.value, ResponseValue::Text(expected.to_owned()));
    }

    assert!(widget.pending_ids().is_empty());
    assert_eq!(
        widget.reward_for("CCC"),
        Some(&ResponseValue::Text("1500".to_owned()))
    );
    assert_eq!(ctx.state(), LoopState::Idle);
}

#[tokio::test]
async fn test_repeatedly_reported_event_is_handled_at_most_once() {
    // Arrange
    let handler = Arc::new(RecordingHandler::new());
    let render_loop = RenderLoop::new(handler.clone(), fixed_clock());
    let mut ctx = session();
    let batch = clicks(&[("u1", "A")]);

    // Act
    for _ in 0..5 {
        render_loop.run_cycle(&mut ctx, Some(&batch)).await;
    }

    // Assert
    assert_eq!(handler.calls_for("u1"), 1);
    assert_eq!(ctx.ledger().len(), 1);
}

#[tokio::test]
async fn test_no_new_events_means_no_invocations_and_no_rerender() {
    let handler = Arc::new(RecordingHandler::new());
    let render_loop = RenderLoop::new(handler.clone(), fixed_clock());
    let mut ctx = session();
    let mut source = ScriptedEventSource::new(vec![None]);

    let summary = render_loop.drive(&mut ctx, &mut source).await.unwrap();

    assert_eq!(summary.rerenders, 0);
    assert_eq!(summary.cycles.len(), 1);
    assert!(handler.received().is_empty());
    assert_eq!(source.renders().len(), 1);
}

#[tokio::test]
async fn test_batch_of_n_successes_grows_ledger_by_n() {
    let handler = Arc::new(RecordingHandler::new());
    let render_loop = RenderLoop::new(handler, fixed_clock());
    let mut ctx = session();
    ctx_seed(&render_loop, &mut ctx).await;
    let before = ctx.ledger().len();

    let report = render_loop
        .run_cycle(
            &mut ctx,
            Some(&clicks(&[("n1", "W"), ("n2", "X"), ("n3", "Y"), ("n4", "Z")])),
        )
        .await;

    assert_eq!(report.committed, 4);
    assert_eq!(ctx.channel().len(), 4);
    assert_eq!(ctx.ledger().len(), before + 4);
}

async fn ctx_seed(render_loop: &RenderLoop, ctx: &mut SessionContext) {
    render_loop
        .run_cycle(ctx, Some(&clicks(&[("seed", "S")])))
        .await;
}

#[tokio::test]
async fn test_one_failure_grows_ledger_by_n_minus_one_and_retries_later() {
    // Arrange
    let handler = Arc::new(RecordingHandler::failing_on(&["BB"]));
    let render_loop = RenderLoop::new(handler.clone(), fixed_clock());
    let mut ctx = session();
    let batch = clicks(&[("u1", "A"), ("u2", "BB"), ("u3", "CCC")]);

    // Act
    let first = render_loop.run_cycle(&mut ctx, Some(&batch)).await;
    handler.recover();
    let retry = render_loop.run_cycle(&mut ctx, Some(&batch)).await;

    // Assert
    assert_eq!(first.committed, 2);
    assert_eq!(first.failed, vec!["u2"]);
    assert_eq!(retry.dispatched, vec!["u2"]);
    assert_eq!(retry.committed, 1);
    assert_eq!(ctx.ledger().len(), 3);
    assert_eq!(ctx.responses().len(), 1);
    assert_eq!(handler.calls_for("u2"), 2);
}

#[tokio::test]
async fn test_widget_keeps_failed_quest_pending() {
    let handler = Arc::new(RecordingHandler::failing_on(&["BB"]));
    let render_loop = RenderLoop::new(handler, fixed_clock());
    let mut ctx = session();
    let mut widget = WidgetSimulator::new();
    widget.click("u1", "A");
    widget.click("u2", "BB");

    let summary = render_loop.drive(&mut ctx, &mut widget).await.unwrap();

    assert_eq!(summary.rerenders, 1);
    assert_eq!(widget.pending_ids(), vec!["u2"]);
    assert!(widget.reward_for("BB").is_none());
    assert!(widget.reward_for("A").is_some());
}

#[tokio::test]
async fn test_persistent_failure_does_not_spin() {
    let render_loop = RenderLoop::new(Arc::new(FailingHandler), fixed_clock());
    let mut ctx = session();
    let mut widget = WidgetSimulator::new();
    widget.click("u1", "A");

    let summary = render_loop.drive(&mut ctx, &mut widget).await.unwrap();

    assert_eq!(summary.rerenders, 0);
    assert_eq!(summary.cycles[0].failed, vec!["u1"]);
    assert!(ctx.ledger().is_empty());
}

#[tokio::test]
async fn test_events_arriving_during_flight_are_picked_up_next_pass() {
    // Arrange: the second render reports the old click plus a new one.
    let handler = Arc::new(RecordingHandler::new());
    let render_loop = RenderLoop::new(handler.clone(), fixed_clock());
    let mut ctx = session();
    let mut source = ScriptedEventSource::new(vec![
        Some(clicks(&[("u1", "A")])),
        Some(clicks(&[("u1", "A"), ("u2", "BB")])),
        Some(clicks(&[("u1", "A"), ("u2", "BB")])),
    ]);

    // Act
    let summary = render_loop.drive(&mut ctx, &mut source).await.unwrap();

    // Assert
    assert_eq!(summary.rerenders, 2);
    assert_eq!(handler.calls_for("u1"), 1);
    assert_eq!(handler.calls_for("u2"), 1);
    let renders = source.renders();
    assert!(renders[0].is_empty());
    assert_eq!(renders[1][0].id, "u1");
    assert_eq!(renders[2][0].id, "u2");
}

#[tokio::test]
async fn test_source_minting_new_ids_forever_hits_rerender_cap() {
    let handler = Arc::new(RecordingHandler::new());
    let render_loop = RenderLoop::new(handler, fixed_clock()).with_max_rerenders(3);
    let mut ctx = session();
    let script = (0..10)
        .map(|n| Some(clicks(&[(format!("u{n}").as_str(), "A")])))
        .collect();
    let mut source = ScriptedEventSource::new(script);

    let result = render_loop.drive(&mut ctx, &mut source).await;

    assert_eq!(result.unwrap_err(), SyncError::RerenderLimit { limit: 3 });
    assert_eq!(ctx.ledger().len(), 4);
}
