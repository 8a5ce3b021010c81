use chrono::{DateTime, Utc};
use rand::Rng;

use crate::calendar::local_day;
use crate::config::ServiceCatalog;
use crate::error::{FrostifyError, Result};
use crate::ids::IdGenerator;
use crate::model::{Client, OrderEdit, OrderForm, OrderStatus, ServiceOrder};
use crate::validation::{validate_order, validate_order_edit};
use crate::workflow::{apply_edit_at, apply_status_change_at};

use super::position;

/// Books a new service order for one of `clients`.
///
/// The date is checked against the local calendar day of `now`. The order keeps a copy of
/// the client's current name. A starting status other than Waiting is applied through the
/// workflow, so an order created as InProgress already has its start time.
pub fn create<R: Rng>(
    ids: &mut IdGenerator<R>,
    clients: &[Client],
    form: &OrderForm,
    catalog: &ServiceCatalog,
    now: DateTime<Utc>,
) -> Result<ServiceOrder> {
    let report = validate_order(form, catalog, local_day(now));
    if !report.is_valid() {
        return Err(FrostifyError::InvalidOrder(report));
    }

    // validation guarantees both are present
    let client_id = form.client_id.as_deref().unwrap_or_default().trim();
    let client = clients
        .iter()
        .find(|c| c.id == client_id)
        .ok_or_else(|| FrostifyError::ClientNotFound(client_id.to_string()))?;
    let Some(date) = form.date else {
        return Err(FrostifyError::InvalidOrder(report));
    };

    let order = ServiceOrder {
        id: ids.new_service_order_id()?,
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        service_type: form.service_type.trim().to_string(),
        description: form.description.trim().to_string(),
        date,
        scheduled_time: form
            .scheduled_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        actual_start_time: None,
        actual_end_time: None,
        status: OrderStatus::Waiting,
        created_at: now,
    };
    tracing::debug!(order = %order.id, client = %order.client_id, "service order created");

    Ok(match form.status {
        OrderStatus::Waiting => order,
        initial => apply_status_change_at(&order, initial, now),
    })
}

/// Applies an edit (fields, note, status) to one order.
pub fn update(
    orders: &[ServiceOrder],
    id: &str,
    edit: &OrderEdit,
    catalog: &ServiceCatalog,
    now: DateTime<Utc>,
) -> Result<Vec<ServiceOrder>> {
    let idx = find(orders, id)?;

    let report = validate_order_edit(edit, catalog);
    if !report.is_valid() {
        return Err(FrostifyError::InvalidOrder(report));
    }

    let mut updated = orders.to_vec();
    updated[idx] = apply_edit_at(&orders[idx], edit, now);
    tracing::debug!(order = %id, "service order updated");
    Ok(updated)
}

/// Moves one order to `status`.
pub fn change_status(
    orders: &[ServiceOrder],
    id: &str,
    status: OrderStatus,
    now: DateTime<Utc>,
) -> Result<Vec<ServiceOrder>> {
    let idx = find(orders, id)?;
    let mut updated = orders.to_vec();
    updated[idx] = apply_status_change_at(&orders[idx], status, now);
    Ok(updated)
}

pub fn delete(orders: &[ServiceOrder], id: &str) -> Result<Vec<ServiceOrder>> {
    find(orders, id)?;
    tracing::debug!(order = %id, "service order deleted");
    Ok(orders.iter().filter(|o| o.id != id).cloned().collect())
}

fn find(orders: &[ServiceOrder], id: &str) -> Result<usize> {
    position(orders, id, |o| o.id.as_str())
        .ok_or_else(|| FrostifyError::OrderNotFound(id.to_string()))
}
