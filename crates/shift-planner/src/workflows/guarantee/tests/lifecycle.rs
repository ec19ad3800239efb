use super::common::*;
use crate::workflows::guarantee::domain::{GuaranteeEvent, ShiftStatus};
use crate::workflows::guarantee::service::GuaranteeServiceError;

#[test]
fn below_floor_earnings_activate_the_guarantee() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    let settled = service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 75.0)
        .expect("earnings recorded");

    assert_eq!(settled.status, ShiftStatus::Completed);
    assert_eq!(settled.actual_earnings, Some(75.0));
    assert_eq!(settled.guaranteed_minimum, 90.0);
    assert_eq!(settled.topup_amount, Some(15.0));
    assert_eq!(settled.guarantee_activated, Some(true));
    assert!(settled.completed_at.is_some());
}

#[test]
fn above_floor_earnings_leave_the_guarantee_dormant() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    let settled = service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 95.0)
        .expect("earnings recorded");

    assert_eq!(settled.topup_amount, Some(0.0));
    assert_eq!(settled.guarantee_activated, Some(false));
}

#[test]
fn earnings_exactly_at_the_floor_pay_no_topup() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    let settled = service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 90.0)
        .expect("earnings recorded");

    assert_eq!(settled.topup_amount, Some(0.0));
    assert_eq!(settled.guarantee_activated, Some(false));
}

#[test]
fn activation_appends_two_audit_entries() {
    let (service, repository, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 75.0)
        .expect("earnings recorded");

    let events: Vec<GuaranteeEvent> = repository.logs().iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![
            GuaranteeEvent::Commitment,
            GuaranteeEvent::EarningsRecorded,
            GuaranteeEvent::GuaranteeActivated,
        ]
    );

    let activation = repository
        .logs()
        .into_iter()
        .find(|e| e.event == GuaranteeEvent::GuaranteeActivated)
        .expect("activation logged");
    let snapshot = activation.snapshot.expect("activation carries a snapshot");
    assert_eq!(snapshot.actual_earnings, Some(75.0));
    assert_eq!(snapshot.topup_amount, Some(15.0));
}

#[test]
fn dormant_settlement_logs_earnings_only() {
    let (service, repository, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 95.0)
        .expect("earnings recorded");

    let events: Vec<GuaranteeEvent> = repository.logs().iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![GuaranteeEvent::Commitment, GuaranteeEvent::EarningsRecorded]
    );
}

#[test]
fn settled_values_are_stable_across_reads() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");
    service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 75.0)
        .expect("earnings recorded");

    let first = service
        .shifts(ACTIVE_DRIVER, None)
        .expect("shifts listed")
        .into_iter()
        .find(|s| s.id == shift.id)
        .expect("shift present");
    let second = service
        .shifts(ACTIVE_DRIVER, None)
        .expect("shifts listed")
        .into_iter()
        .find(|s| s.id == shift.id)
        .expect("shift present");

    assert_eq!(first.guaranteed_minimum, second.guaranteed_minimum);
    assert_eq!(first.topup_amount, second.topup_amount);
    assert_eq!(first.guarantee_activated, second.guarantee_activated);
}

#[test]
fn start_moves_a_committed_shift_in_progress() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    let started = service
        .start(shift.id, ACTIVE_DRIVER)
        .expect("start succeeds");
    assert_eq!(started.status, ShiftStatus::InProgress);
    assert!(started.started_at.is_some());

    let settled = service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 120.0)
        .expect("in-progress shifts settle");
    assert_eq!(settled.status, ShiftStatus::Completed);
}

#[test]
fn start_refuses_anything_but_committed() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");
    service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 80.0)
        .expect("earnings recorded");

    match service.start(shift.id, ACTIVE_DRIVER) {
        Err(GuaranteeServiceError::InvalidTransition { from, .. }) => {
            assert_eq!(from, ShiftStatus::Completed);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn cancel_is_limited_to_freshly_committed_shifts() {
    let (service, repository, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");

    let cancelled = service
        .cancel(shift.id, ACTIVE_DRIVER)
        .expect("cancel succeeds");
    assert_eq!(cancelled.status, ShiftStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let cancellation = repository
        .logs()
        .into_iter()
        .find(|e| e.event == GuaranteeEvent::Cancellation)
        .expect("cancellation logged");
    assert!(
        cancellation.snapshot.is_none(),
        "cancellations carry no financial snapshot"
    );
}

#[test]
fn cancel_refuses_in_progress_shifts() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");
    service.start(shift.id, ACTIVE_DRIVER).expect("start succeeds");

    match service.cancel(shift.id, ACTIVE_DRIVER) {
        Err(GuaranteeServiceError::InvalidTransition { from, .. }) => {
            assert_eq!(from, ShiftStatus::InProgress);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn cancel_refuses_completed_shifts() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");
    service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 100.0)
        .expect("earnings recorded");

    match service.cancel(shift.id, ACTIVE_DRIVER) {
        Err(GuaranteeServiceError::InvalidTransition { from, .. }) => {
            assert_eq!(from, ShiftStatus::Completed);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn earnings_cannot_be_recorded_on_cancelled_shifts() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");
    service.cancel(shift.id, ACTIVE_DRIVER).expect("cancel succeeds");

    match service.record_actual_earnings(shift.id, ACTIVE_DRIVER, 50.0) {
        Err(GuaranteeServiceError::InvalidTransition { from, .. }) => {
            assert_eq!(from, ShiftStatus::Cancelled);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn double_settlement_is_refused() {
    let (service, _, _) = build_service();
    let shift = service
        .commit(ACTIVE_DRIVER, recommendation())
        .expect("commit succeeds");
    service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 75.0)
        .expect("first settlement succeeds");

    match service.record_actual_earnings(shift.id, ACTIVE_DRIVER, 200.0) {
        Err(GuaranteeServiceError::InvalidTransition { from, .. }) => {
            assert_eq!(from, ShiftStatus::Completed);
        }
        other => panic!("expected second settlement to fail, got {other:?}"),
    }

    let stored = service
        .shifts(ACTIVE_DRIVER, Some(ShiftStatus::Completed))
        .expect("shifts listed")
        .into_iter()
        .find(|s| s.id == shift.id)
        .expect("shift present");
    assert_eq!(stored.actual_earnings, Some(75.0), "first settlement stands");
}

#[test]
fn fractional_earnings_round_to_cents() {
    let (service, _, _) = build_service();
    let mut rec = recommendation();
    rec.predicted_earnings = 50.006;

    let shift = service.commit(ACTIVE_DRIVER, rec).expect("commit succeeds");
    // predicted rounds to cents before the floor is derived
    assert_eq!(shift.predicted_earnings, 50.01);
    assert_eq!(shift.guaranteed_minimum, 45.01);

    let settled = service
        .record_actual_earnings(shift.id, ACTIVE_DRIVER, 44.998)
        .expect("earnings recorded");
    assert_eq!(settled.actual_earnings, Some(45.0));
    assert_eq!(settled.topup_amount, Some(0.01));
    assert_eq!(settled.guarantee_activated, Some(true));
}
