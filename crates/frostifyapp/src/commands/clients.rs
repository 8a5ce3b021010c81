use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FrostifyError, Result};
use crate::ids::IdGenerator;
use crate::model::{Client, ClientForm, ServiceOrder};
use crate::validation::validate_client;

use super::position;

/// What happens to a client's service orders when the client is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Orders stay, still carrying the client's id and name snapshot.
    #[default]
    Orphan,
    /// Orders are deleted along with the client.
    Cascade,
    /// Deletion is refused while the client has any order.
    Block,
}

pub fn create<R: Rng>(
    ids: &mut IdGenerator<R>,
    form: &ClientForm,
    now: DateTime<Utc>,
) -> Result<Client> {
    let report = validate_client(form);
    if !report.is_valid() {
        return Err(FrostifyError::InvalidClient(report));
    }

    let client = Client::from_form(ids.new_client_id()?, form, now);
    tracing::debug!(client = %client.id, "client created");
    Ok(client)
}

/// Replaces the client's editable fields. Id and creation time are kept.
///
/// Orders keep the client name they were created with.
pub fn update(clients: &[Client], id: &str, form: &ClientForm) -> Result<Vec<Client>> {
    let idx = position(clients, id, |c| c.id.as_str())
        .ok_or_else(|| FrostifyError::ClientNotFound(id.to_string()))?;

    let report = validate_client(form);
    if !report.is_valid() {
        return Err(FrostifyError::InvalidClient(report));
    }

    let mut updated = clients.to_vec();
    updated[idx].apply_form(form);
    tracing::debug!(client = %id, "client updated");
    Ok(updated)
}

/// Removes a client, handling its orders according to `policy`.
pub fn delete(
    clients: &[Client],
    orders: &[ServiceOrder],
    id: &str,
    policy: DeletePolicy,
) -> Result<(Vec<Client>, Vec<ServiceOrder>)> {
    if position(clients, id, |c| c.id.as_str()).is_none() {
        return Err(FrostifyError::ClientNotFound(id.to_string()));
    }

    let owned = orders.iter().filter(|o| o.client_id == id).count();
    let remaining_orders = match policy {
        DeletePolicy::Block if owned > 0 => {
            return Err(FrostifyError::ClientHasOrders {
                id: id.to_string(),
                count: owned,
            });
        }
        DeletePolicy::Cascade => orders
            .iter()
            .filter(|o| o.client_id != id)
            .cloned()
            .collect(),
        DeletePolicy::Orphan | DeletePolicy::Block => orders.to_vec(),
    };

    let remaining_clients = clients.iter().filter(|c| c.id != id).cloned().collect();
    tracing::debug!(client = %id, ?policy, orders = owned, "client deleted");
    Ok((remaining_clients, remaining_orders))
}
