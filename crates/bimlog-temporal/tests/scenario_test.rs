//! End-to-end rollbacks through SessionContext: capture, build, select, replay.

mod support;

use bimlog_core::config::BimLogConfig;
use bimlog_core::models::{
    CommandType, Curve, ElementCategory, ElementId, LiveId, RollbackRequest, RollbackScope, Xyz,
};
use bimlog_core::traits::Placement;
use bimlog_storage::LogStore;
use bimlog_temporal::replay::{Applied, ReplaySession, SkipReason};
use bimlog_temporal::SessionContext;

use support::*;

fn session() -> SessionContext {
    SessionContext::new("Tower.rvt", BimLogConfig::default()).unwrap()
}

/// Wall 1001: created with geometry A at t1, moved to geometry B at t2,
/// deleted at t3.
fn wall_history(ctx: &mut SessionContext) {
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Create, 1, Some(wall_snapshot(1, WALL_200, 10.0))))
        .unwrap();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Modify, 2, Some(wall_snapshot(2, WALL_200, 20.0))))
        .unwrap();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Delete, 3, None))
        .unwrap();
}

fn curve_end_x(placement: &Placement) -> f64 {
    match placement {
        Placement::Curve(Curve::Line { end, .. }) => end.x,
        other => panic!("expected line placement, got {other:?}"),
    }
}

// ── Wall scenario ────────────────────────────────────────────────────────

#[test]
fn rollback_between_create_and_modify_restores_geometry_a() {
    let mut ctx = session();
    wall_history(&mut ctx);
    let mut model = FakeModel::new();

    let request = RollbackRequest::new(at_secs(1, 30), RollbackScope::All);
    let report = ctx.rollback(&mut model, &request).unwrap();

    assert_eq!(report.plan_len, 2);
    let applied: Vec<(CommandType, _)> = report
        .replay
        .outcomes
        .iter()
        .map(|o| (o.command, o.timestamp))
        .collect();
    // undo(Delete@t3) then undo(Modify@t2)
    assert_eq!(applied, vec![(CommandType::Create, at(3)), (CommandType::Modify, at(2))]);
    assert!(report.replay.is_clean());

    assert_eq!(model.len(), 1);
    let wall = model.elements.values().next().unwrap();
    assert_eq!(wall.curve(), Some(&line(0.0, 0.0, 10.0, 0.0)));
}

#[test]
fn rollback_before_creation_removes_the_wall() {
    let mut ctx = session();
    wall_history(&mut ctx);
    let mut model = FakeModel::new();

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at(0), RollbackScope::All))
        .unwrap();
    assert_eq!(report.plan_len, 3);
    assert!(report.replay.is_clean());
    assert!(matches!(report.replay.outcomes[2].result, Ok(Applied::Deleted(_))));
    assert_eq!(model.len(), 0);
}

#[test]
fn rollback_to_now_does_nothing() {
    let mut ctx = session();
    wall_history(&mut ctx);
    let mut model = FakeModel::new();

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at(3), RollbackScope::All))
        .unwrap();
    assert_eq!(report.plan_len, 0);
    assert!(report.replay.outcomes.is_empty());
    assert!(model.transactions.is_empty());
}

#[test]
fn scope_limits_rollback_to_named_elements() {
    let mut ctx = session();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Create, 1, Some(wall_snapshot(1, WALL_200, 10.0))))
        .unwrap();
    ctx.capture(event("1002", ElementCategory::Walls, CommandType::Create, 2, Some(wall_snapshot(2, WALL_200, 5.0))))
        .unwrap();
    let mut model = FakeModel::new();
    model.insert("1001", live_wall(10.0));
    model.insert("1002", live_wall(5.0));

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at(0), RollbackScope::elements(["1002"])))
        .unwrap();
    assert_eq!(report.plan_len, 1);
    assert!(model.get("1001").is_some());
    assert!(model.get("1002").is_none());
}

// ── Remap consistency ────────────────────────────────────────────────────

#[test]
fn hosted_window_follows_recreated_wall() {
    let mut ctx = session();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Create, 1, Some(wall_snapshot(1, WALL_200, 10.0))))
        .unwrap();
    ctx.capture(event("2001", ElementCategory::Windows, CommandType::Create, 2, Some(window_snapshot(2, "1001", 3.0))))
        .unwrap();
    ctx.capture(event("2001", ElementCategory::Windows, CommandType::Delete, 3, None))
        .unwrap();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Delete, 4, None))
        .unwrap();

    let mut model = FakeModel::new();
    let (plan, _) = ctx
        .plan(&RollbackRequest::new(at_secs(2, 30), RollbackScope::All))
        .unwrap();
    let config = ctx.config().patch.clone();
    let mut session = ReplaySession::new(&mut model, plan, &config);

    let wall_live = match &session.step().unwrap().result {
        Ok(Applied::Created(live)) => live.clone(),
        other => panic!("expected recreated wall, got {other:?}"),
    };
    assert_eq!(session.remap().get(&ElementId::new("1001")), Some(&wall_live));

    let window_live = match &session.step().unwrap().result {
        Ok(Applied::Created(live)) => live.clone(),
        other => panic!("expected recreated window, got {other:?}"),
    };
    assert!(session.step().is_none());
    let report = session.finish();
    assert!(report.is_clean());

    assert_eq!(model.elements[&window_live].host, Some(wall_live));
}

#[test]
fn later_modify_targets_the_recreated_floor() {
    let mut ctx = session();
    ctx.capture(event("3001", ElementCategory::Floors, CommandType::Create, 1, Some(floor_snapshot(1, 10.0))))
        .unwrap();
    ctx.capture(event("3001", ElementCategory::Floors, CommandType::Modify, 2, Some(floor_snapshot(2, 20.0))))
        .unwrap();
    ctx.capture(event("3001", ElementCategory::Floors, CommandType::Modify, 3, Some(floor_snapshot(3, 30.0))))
        .unwrap();

    let mut model = FakeModel::new();
    model.insert(
        "3001",
        FakeElement {
            category: ElementCategory::Floors,
            type_id: Some(LiveId::new("ft-150")),
            level: Some(LiveId::new("L1")),
            host: None,
            placement: Placement::Profile {
                loops: Vec::new(),
                slope_arrow: None,
                slope: 0.0,
            },
            structural: false,
            flips: Default::default(),
            parameters: Default::default(),
        },
    );

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();
    assert!(report.replay.is_clean());
    assert_eq!(
        report.replay.outcomes[0].result,
        Ok(Applied::Recreated {
            previous: LiveId::new("3001"),
            live: LiveId::new("live-1"),
        })
    );
    // The second revert finds the floor through the remap.
    assert_eq!(
        report.replay.outcomes[1].result,
        Ok(Applied::Recreated {
            previous: LiveId::new("live-1"),
            live: LiveId::new("live-2"),
        })
    );

    assert_eq!(model.len(), 1);
    let floor = model.get("live-2").unwrap();
    let Placement::Profile { loops, slope_arrow, .. } = &floor.placement else {
        panic!("expected profile placement");
    };
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 4);
    assert_eq!(loops[0][0], line(0.0, 0.0, 10.0, 0.0));
    assert!(slope_arrow.is_none());
    assert_eq!(floor.type_id, Some(LiveId::new("ft-150")));
    assert_eq!(floor.level, Some(LiveId::new("L1")));
}

// ── Derivative suppression ───────────────────────────────────────────────

fn moved_wall_with_window(ctx: &mut SessionContext) -> FakeModel {
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Create, 1, Some(wall_snapshot(1, WALL_200, 10.0))))
        .unwrap();
    ctx.capture(event("2001", ElementCategory::Windows, CommandType::Create, 1, Some(window_snapshot(1, "1001", 2.0))))
        .unwrap();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Modify, 2, Some(wall_snapshot(2, WALL_200, 20.0))))
        .unwrap();
    ctx.capture(event("2001", ElementCategory::Windows, CommandType::Modify, 2, Some(window_snapshot(2, "1001", 4.0))))
        .unwrap();

    let mut model = FakeModel::new();
    model.insert("1001", live_wall(20.0));
    model.insert(
        "2001",
        FakeElement {
            category: ElementCategory::Windows,
            type_id: Some(LiveId::new("ws-0915")),
            level: Some(LiveId::new("L1")),
            host: Some(LiveId::new("1001")),
            placement: Placement::Point(Xyz::new(4.0, 0.0, 900.0)),
            structural: false,
            flips: Default::default(),
            parameters: Default::default(),
        },
    );
    model
}

fn window_x(model: &FakeModel) -> f64 {
    match model.get("2001").unwrap().placement {
        Placement::Point(p) => p.x,
        ref other => panic!("expected point placement, got {other:?}"),
    }
}

#[test]
fn derivative_window_move_is_left_to_the_host() {
    let mut ctx = session();
    let mut model = moved_wall_with_window(&mut ctx);

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();
    assert_eq!(report.plan_len, 1);
    assert_eq!(report.excluded_derivative, 1);
    assert_eq!(report.build.derivative, 1);
    assert_eq!(curve_end_x(&model.get("1001").unwrap().placement), 10.0);
    assert_eq!(window_x(&model), 4.0);
}

#[test]
fn derivative_window_move_replays_when_suppression_is_off() {
    let mut config = BimLogConfig::default();
    config.patch.suppress_derivative_changes = false;
    let mut ctx = SessionContext::new("Tower.rvt", config).unwrap();
    let mut model = moved_wall_with_window(&mut ctx);

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();
    assert_eq!(report.plan_len, 2);
    assert_eq!(report.excluded_derivative, 0);
    assert!(report.replay.is_clean());
    assert_eq!(window_x(&model), 2.0);
}

// ── Failure isolation ────────────────────────────────────────────────────

#[test]
fn rejected_entry_does_not_abort_the_rollback() {
    let mut ctx = session();
    for id in ["1001", "1002"] {
        ctx.capture(event(id, ElementCategory::Walls, CommandType::Create, 1, Some(wall_snapshot(1, WALL_200, 10.0))))
            .unwrap();
    }
    for id in ["1001", "1002"] {
        ctx.capture(event(id, ElementCategory::Walls, CommandType::Modify, 2, Some(wall_snapshot(2, WALL_200, 20.0))))
            .unwrap();
    }
    let mut model = FakeModel::new();
    model.insert("1001", live_wall(20.0));
    model.insert("1002", live_wall(20.0));
    model.rejecting.insert(LiveId::new("1002"));

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();

    assert_eq!(report.replay.outcomes.len(), 2);
    assert_eq!(report.replay.applied_count(), 1);
    let (skipped, reason) = report.replay.skipped().next().unwrap();
    assert_eq!(skipped.element_id().as_str(), "1002");
    assert!(matches!(reason, SkipReason::ModelRejected(_)));
    assert_eq!(model.commits, 2);

    assert_eq!(curve_end_x(&model.get("1001").unwrap().placement), 10.0);
    assert_eq!(curve_end_x(&model.get("1002").unwrap().placement), 20.0);
}

#[test]
fn modify_of_externally_deleted_wall_is_stale() {
    let mut ctx = session();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Create, 1, Some(wall_snapshot(1, WALL_200, 10.0))))
        .unwrap();
    ctx.capture(event("1001", ElementCategory::Walls, CommandType::Modify, 2, Some(wall_snapshot(2, WALL_200, 20.0))))
        .unwrap();
    let mut model = FakeModel::new();

    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();
    assert_eq!(
        report.replay.outcomes[0].result,
        Err(SkipReason::StaleReference(ElementId::new("1001")))
    );
}

// ── Requests and persistence ─────────────────────────────────────────────

#[test]
fn operator_request_form_is_accepted() {
    let mut ctx = session();
    wall_history(&mut ctx);
    let mut model = FakeModel::new();

    let report = ctx
        .rollback_json(&mut model, r#"{"Time": "02/05/2024\n14:01:30", "Elements": [1001]}"#)
        .unwrap();
    assert_eq!(report.plan_len, 2);
    assert_eq!(model.len(), 1);
}

#[test]
fn stored_session_can_be_reopened_and_rolled_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = BimLogConfig::default();
    config.storage.db_path = Some(dir.path().join("sessions.db"));

    let key = {
        let mut ctx = SessionContext::new("Tower.rvt", config.clone()).unwrap();
        wall_history(&mut ctx);
        ctx.info().session_key
    };

    let store = LogStore::open(&config.storage).unwrap();
    assert_eq!(store.count_entries(&key).unwrap(), 3);
    let mut ctx = SessionContext::open(store, &key, config).unwrap();
    assert_eq!(ctx.forward_log().len(), 3);

    let mut model = FakeModel::new();
    let report = ctx
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();
    assert!(report.replay.is_clean());

    let stored = ctx.store().unwrap().load_inverse_log(&key).unwrap();
    assert_eq!(stored.len(), 3);
}

#[test]
fn session_document_round_trips_through_context() {
    let mut ctx = session();
    wall_history(&mut ctx);
    let doc = ctx.to_document();
    assert_eq!(doc.forward.len(), 3);
    assert_eq!(doc.inverse.len(), 3);

    let mut restored = SessionContext::from_document(doc, BimLogConfig::default()).unwrap();
    assert_eq!(restored.info().session_key, ctx.info().session_key);
    let mut model = FakeModel::new();
    let report = restored
        .rollback(&mut model, &RollbackRequest::new(at_secs(1, 30), RollbackScope::All))
        .unwrap();
    assert_eq!(report.plan_len, 2);
}
