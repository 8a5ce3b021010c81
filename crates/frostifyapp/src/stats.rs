//! Order statistics and the dashboard board.
//!
//! [`compute_stats`] partitions orders by status and counts the ones due today.
//! "Due today" only looks at the scheduled date: an order finished this morning is
//! still due today.
//!
//! [`Board`] groups orders the way the dashboard shows them: waiting for today,
//! scheduled for later, in progress, completed.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{self, is_future_date};
use crate::model::{OrderStatus, ServiceOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total: usize,
    pub waiting_count: usize,
    pub in_progress_count: usize,
    pub completed_count: usize,
    pub due_today_count: usize,
}

impl OrderStats {
    pub fn count(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Waiting => self.waiting_count,
            OrderStatus::InProgress => self.in_progress_count,
            OrderStatus::Completed => self.completed_count,
        }
    }
}

pub fn compute_stats(orders: &[ServiceOrder], today: NaiveDate) -> OrderStats {
    orders.iter().fold(OrderStats::default(), |mut stats, order| {
        stats.total += 1;
        match order.status {
            OrderStatus::Waiting => stats.waiting_count += 1,
            OrderStatus::InProgress => stats.in_progress_count += 1,
            OrderStatus::Completed => stats.completed_count += 1,
        }
        if order.date == today {
            stats.due_today_count += 1;
        }
        stats
    })
}

/// [`compute_stats`] against the local calendar day.
pub fn compute_stats_now(orders: &[ServiceOrder]) -> OrderStats {
    compute_stats(orders, calendar::today())
}

/// Orders grouped into dashboard columns. Each column keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board<'a> {
    /// Waiting and scheduled for today.
    pub waiting_today: Vec<&'a ServiceOrder>,
    /// Waiting and scheduled after today.
    pub scheduled_future: Vec<&'a ServiceOrder>,
    pub in_progress: Vec<&'a ServiceOrder>,
    pub completed: Vec<&'a ServiceOrder>,
}

impl<'a> Board<'a> {
    /// Waiting orders dated before today are overdue and appear in no column.
    pub fn build(orders: &'a [ServiceOrder], today: NaiveDate) -> Self {
        let mut board = Board::default();
        for order in orders {
            match order.status {
                OrderStatus::Waiting if order.date == today => board.waiting_today.push(order),
                OrderStatus::Waiting if is_future_date(order.date, today) => {
                    board.scheduled_future.push(order)
                }
                OrderStatus::Waiting => {}
                OrderStatus::InProgress => board.in_progress.push(order),
                OrderStatus::Completed => board.completed.push(order),
            }
        }
        board
    }
}
