//! # Service Order Status Workflow
//!
//! Every service order moves between three statuses:
//! - [`OrderStatus::Waiting`][]: booked, nobody has started yet. Initial status.
//! - [`OrderStatus::InProgress`][]: a technician is on it.
//! - [`OrderStatus::Completed`][]: work finished.
//!
//! ## Transitions
//!
//! The workflow is **non-strict**: any status may move to any other, including itself.
//! There is no forward-only ordering; a technician who pressed "start" by mistake can go
//! straight back to Waiting.
//!
//! ## Timestamp Effects
//!
//! What a transition does to the execution timestamps depends only on the **target**:
//!
//! | Target | `actual_start_time` | `actual_end_time` |
//! |--------|---------------------|-------------------|
//! | Waiting | cleared | cleared |
//! | InProgress | set to now if absent | kept |
//! | Completed | kept | set to now if absent |
//!
//! "Set if absent" makes re-entering a status idempotent: starting an order twice keeps the
//! first start time. Going back to Waiting is a rollback: the order is treated as never
//! having run.
//!
//! The table lives in [`transition`] as data ([`TimestampEffect`]) rather than being
//! spread through update code.
//!
//! ## What the Workflow Does NOT Do
//!
//! - **Permission checks**: the UI keeps completed orders read-only
//!   ([`ServiceOrder::is_editable`]); the workflow applies whatever it is asked to.
//! - **Confirmation**: see [`OrderStatus::requires_confirmation`].
//!
//! ## Edits
//!
//! Field edits (type, description, scheduled time, notes) are orthogonal to status. An
//! [`OrderEdit`] can carry both; [`apply_edit_at`] applies the fields and then routes the
//! status through the same transition table, producing one new record.

use chrono::{DateTime, Utc};

use crate::model::{OrderEdit, OrderStatus, ServiceOrder};

/// What a transition does to one timestamp slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampEffect {
    Keep,
    SetIfAbsent,
    Clear,
}

impl TimestampEffect {
    pub fn apply(
        self,
        current: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            TimestampEffect::Keep => current,
            TimestampEffect::SetIfAbsent => current.or(Some(now)),
            TimestampEffect::Clear => None,
        }
    }
}

/// A resolved status change: where it goes and what it does to the timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub start: TimestampEffect,
    pub end: TimestampEffect,
}

/// Resolves a status change. Every pair is allowed; the effects follow the target only.
pub fn transition(from: OrderStatus, to: OrderStatus) -> Transition {
    let (start, end) = match to {
        OrderStatus::Waiting => (TimestampEffect::Clear, TimestampEffect::Clear),
        OrderStatus::InProgress => (TimestampEffect::SetIfAbsent, TimestampEffect::Keep),
        OrderStatus::Completed => (TimestampEffect::Keep, TimestampEffect::SetIfAbsent),
    };
    Transition {
        from,
        to,
        start,
        end,
    }
}

impl Transition {
    /// Produces the order after this transition. Only status and timestamps change.
    pub fn apply(&self, order: &ServiceOrder, now: DateTime<Utc>) -> ServiceOrder {
        ServiceOrder {
            status: self.to,
            actual_start_time: self.start.apply(order.actual_start_time, now),
            actual_end_time: self.end.apply(order.actual_end_time, now),
            ..order.clone()
        }
    }
}

/// Moves an order to `target`, stamping with the current instant.
pub fn apply_status_change(order: &ServiceOrder, target: OrderStatus) -> ServiceOrder {
    apply_status_change_at(order, target, Utc::now())
}

/// Moves an order to `target`, stamping with `now`.
pub fn apply_status_change_at(
    order: &ServiceOrder,
    target: OrderStatus,
    now: DateTime<Utc>,
) -> ServiceOrder {
    let step = transition(order.status, target);
    tracing::debug!(order = %order.id, from = ?step.from, to = ?step.to, "status change");
    step.apply(order, now)
}

/// Applies field edits and an optional status change as a single commit.
///
/// A note is appended to the description as `[YYYY-MM-DD] note`, dated with `now`.
pub fn apply_edit_at(order: &ServiceOrder, edit: &OrderEdit, now: DateTime<Utc>) -> ServiceOrder {
    let mut updated = order.clone();

    if let Some(service_type) = &edit.service_type {
        updated.service_type = service_type.trim().to_string();
    }
    if let Some(description) = &edit.description {
        updated.description = description.trim().to_string();
    }
    if let Some(time) = &edit.scheduled_time {
        updated.scheduled_time = Some(time.trim().to_string()).filter(|t| !t.is_empty());
    }
    if let Some(note) = edit.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        updated.description = format!(
            "{}\n\n[{}] {}",
            updated.description,
            now.date_naive().format("%Y-%m-%d"),
            note
        );
    }

    match edit.status {
        Some(target) => apply_status_change_at(&updated, target, now),
        None => updated,
    }
}

/// [`apply_edit_at`] with the current instant.
pub fn apply_edit(order: &ServiceOrder, edit: &OrderEdit) -> ServiceOrder {
    apply_edit_at(order, edit, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    fn waiting_order() -> ServiceOrder {
        ServiceOrder {
            id: "OS-457892".into(),
            client_id: "847291".into(),
            client_name: "João Silva".into(),
            service_type: "Preventive maintenance".into(),
            description: "Quarterly maintenance of the office units".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            scheduled_time: Some("09:00".into()),
            actual_start_time: None,
            actual_end_time: None,
            status: OrderStatus::Waiting,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_transition_table() {
        for from in OrderStatus::ALL {
            let t = transition(from, OrderStatus::Waiting);
            assert_eq!((t.start, t.end), (TimestampEffect::Clear, TimestampEffect::Clear));
            let t = transition(from, OrderStatus::InProgress);
            assert_eq!(
                (t.start, t.end),
                (TimestampEffect::SetIfAbsent, TimestampEffect::Keep)
            );
            let t = transition(from, OrderStatus::Completed);
            assert_eq!(
                (t.start, t.end),
                (TimestampEffect::Keep, TimestampEffect::SetIfAbsent)
            );
            assert_eq!(t.from, from);
        }
    }

    #[test]
    fn test_start_then_complete() {
        let order = waiting_order();
        let started = apply_status_change_at(&order, OrderStatus::InProgress, t0());
        assert_eq!(started.status, OrderStatus::InProgress);
        assert_eq!(started.actual_start_time, Some(t0()));
        assert_eq!(started.actual_end_time, None);

        let done_at = t0() + Duration::hours(2);
        let done = apply_status_change_at(&started, OrderStatus::Completed, done_at);
        assert_eq!(done.status, OrderStatus::Completed);
        assert_eq!(done.actual_start_time, Some(t0()));
        assert_eq!(done.actual_end_time, Some(done_at));

        // input untouched
        assert_eq!(order.status, OrderStatus::Waiting);
        assert_eq!(started.actual_end_time, None);
    }

    #[test]
    fn test_reentering_in_progress_keeps_start() {
        let started = apply_status_change_at(&waiting_order(), OrderStatus::InProgress, t0());
        let again = apply_status_change_at(
            &started,
            OrderStatus::InProgress,
            t0() + Duration::minutes(30),
        );
        assert_eq!(again.actual_start_time, Some(t0()));
    }

    #[test]
    fn test_completing_twice_keeps_end() {
        let done = apply_status_change_at(&waiting_order(), OrderStatus::Completed, t0());
        let again = apply_status_change_at(&done, OrderStatus::Completed, t0() + Duration::days(1));
        assert_eq!(again.actual_end_time, Some(t0()));
    }

    #[test]
    fn test_complete_directly_from_waiting_has_no_start() {
        let done = apply_status_change_at(&waiting_order(), OrderStatus::Completed, t0());
        assert_eq!(done.actual_start_time, None);
        assert_eq!(done.actual_end_time, Some(t0()));
    }

    #[test]
    fn test_rollback_to_waiting_clears_both() {
        let order = waiting_order();
        let started = apply_status_change_at(&order, OrderStatus::InProgress, t0());
        let done = apply_status_change_at(&started, OrderStatus::Completed, t0());
        let rolled_back = apply_status_change_at(&done, OrderStatus::Waiting, t0());
        assert_eq!(rolled_back.status, OrderStatus::Waiting);
        assert_eq!(rolled_back.actual_start_time, None);
        assert_eq!(rolled_back.actual_end_time, None);
        assert_eq!(rolled_back, order);
    }

    #[test]
    fn test_reopening_completed_order_keeps_end_time() {
        let done = apply_status_change_at(&waiting_order(), OrderStatus::Completed, t0());
        let reopened = apply_status_change_at(&done, OrderStatus::InProgress, t0());
        assert_eq!(reopened.actual_end_time, Some(t0()));
        assert_eq!(reopened.actual_start_time, Some(t0()));
    }

    #[test]
    fn test_transition_passes_other_fields_through() {
        let order = waiting_order();
        let started = apply_status_change(&order, OrderStatus::InProgress);
        assert_eq!(started.id, order.id);
        assert_eq!(started.client_name, order.client_name);
        assert_eq!(started.description, order.description);
        assert_eq!(started.scheduled_time, order.scheduled_time);
        assert_eq!(started.created_at, order.created_at);
        assert!(started.actual_start_time.is_some());
    }

    #[test]
    fn test_edit_fields_and_status_in_one_commit() {
        let edit = OrderEdit {
            service_type: Some("Repair".into()),
            description: Some("Replace the fan motor".into()),
            scheduled_time: Some("14:30".into()),
            note: Some("Customer asked for afternoon visit".into()),
            status: Some(OrderStatus::InProgress),
        };
        let updated = apply_edit_at(&waiting_order(), &edit, t0());
        assert_eq!(updated.service_type, "Repair");
        assert_eq!(
            updated.description,
            "Replace the fan motor\n\n[2024-06-10] Customer asked for afternoon visit"
        );
        assert_eq!(updated.scheduled_time.as_deref(), Some("14:30"));
        assert_eq!(updated.status, OrderStatus::InProgress);
        assert_eq!(updated.actual_start_time, Some(t0()));
    }

    #[test]
    fn test_edit_without_status_keeps_timestamps() {
        let started = apply_status_change_at(&waiting_order(), OrderStatus::InProgress, t0());
        let edit = OrderEdit {
            scheduled_time: Some("".into()),
            note: Some("   ".into()),
            ..Default::default()
        };
        let updated = apply_edit_at(&started, &edit, t0() + Duration::hours(1));
        assert_eq!(updated.scheduled_time, None);
        assert_eq!(updated.description, started.description);
        assert_eq!(updated.status, OrderStatus::InProgress);
        assert_eq!(updated.actual_start_time, Some(t0()));
    }

    fn any_status() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Waiting),
            Just(OrderStatus::InProgress),
            Just(OrderStatus::Completed),
        ]
    }

    proptest! {
        #[test]
        fn prop_timestamps_follow_reached_statuses(path in proptest::collection::vec(any_status(), 0..12)) {
            let mut order = waiting_order();
            let mut now = t0();
            for status in path {
                now += Duration::minutes(5);
                let before = order.clone();
                order = apply_status_change_at(&order, status, now);
                prop_assert_eq!(order.status, status);
                match status {
                    OrderStatus::Waiting => {
                        prop_assert!(order.actual_start_time.is_none());
                        prop_assert!(order.actual_end_time.is_none());
                    }
                    OrderStatus::InProgress => {
                        prop_assert!(order.actual_start_time.is_some());
                        if before.actual_start_time.is_some() {
                            prop_assert_eq!(order.actual_start_time, before.actual_start_time);
                        }
                        prop_assert_eq!(order.actual_end_time, before.actual_end_time);
                    }
                    OrderStatus::Completed => {
                        prop_assert!(order.actual_end_time.is_some());
                        if before.actual_end_time.is_some() {
                            prop_assert_eq!(order.actual_end_time, before.actual_end_time);
                        }
                        prop_assert_eq!(order.actual_start_time, before.actual_start_time);
                    }
                }
            }
        }
    }
}
