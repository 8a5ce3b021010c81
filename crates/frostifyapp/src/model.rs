//! # Domain Model: Clients and Service Orders
//!
//! This module defines the two record kinds the core works with: [`Client`] and
//! [`ServiceOrder`], plus the form types the UI submits to create them.
//!
//! ## Ownership
//!
//! A service order references its client **by id** (`client_id`). It does not own
//! the client, and nothing here keeps the two collections consistent: deleting a
//! client may leave orders pointing at an id that no longer exists. The command
//! layer decides what to do about that (see [`crate::commands::clients::DeletePolicy`]).
//!
//! ## The Client Name Snapshot
//!
//! `ServiceOrder::client_name` is copied from the client when the order is created
//! and is **never refreshed**. Renaming a client later does not rewrite the name on
//! past orders. The order shows who the work was booked for at the time.
//!
//! ## Timestamps
//!
//! | Field | Set by | Cleared by |
//! |-------|--------|------------|
//! | `created_at` | creation | never |
//! | `actual_start_time` | first entry into InProgress | rollback to Waiting |
//! | `actual_end_time` | first entry into Completed | rollback to Waiting |
//!
//! The start/end rules live in [`crate::workflow`]; nothing else writes them.
//!
//! ## Wire Shape
//!
//! Records serialize with camelCase field names (`clientId`, `scheduledTime`,
//! `actualStartTime`, ...) and the order's category as `type`, which is the shape
//! the UI layer consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Waiting,
    InProgress,
    Completed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Waiting
    }
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Waiting, Self::InProgress, Self::Completed];

    /// Human-readable label for the status.
    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }

    /// Whether the UI should ask before moving an order into this status.
    ///
    /// Completing an order makes it read-only in the UI, so it is confirmed first.
    pub fn requires_confirmation(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Tax id: personal (11 digits) or business (14 digits), with or without punctuation.
    pub cpf: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Builds a client from a submitted form. The form is assumed to be validated.
    pub fn from_form(id: String, form: &ClientForm, created_at: DateTime<Utc>) -> Self {
        let mut client = Self {
            id,
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            cpf: String::new(),
            address: String::new(),
            notes: None,
            created_at,
        };
        client.apply_form(form);
        client
    }

    /// Overwrites the editable fields with the form's values. `id` and `created_at` stay.
    pub fn apply_form(&mut self, form: &ClientForm) {
        self.name = form.name.trim().to_string();
        self.phone = form.phone.trim().to_string();
        self.email = form.email.trim().to_string();
        self.cpf = form.cpf.trim().to_string();
        self.address = form.address.trim().to_string();
        self.notes = form
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub client_id: String,
    /// Client name at creation time. Never refreshed.
    pub client_name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub description: String,
    /// Scheduled calendar day.
    pub date: NaiveDate,
    /// Time of day, `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl ServiceOrder {
    /// Completed orders are read-only in the UI.
    ///
    /// This is a policy hint for callers; the workflow itself never refuses a transition.
    pub fn is_editable(&self) -> bool {
        self.status != OrderStatus::Completed
    }
}

/// Client form as submitted by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub cpf: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&Client> for ClientForm {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            cpf: client.cpf.clone(),
            address: client.address.clone(),
            notes: client.notes.clone(),
        }
    }
}

/// Service order form as submitted by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    /// Selected client. `None` or blank means nothing was picked.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(rename = "type")]
    pub service_type: String,
    pub description: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    /// Status the order starts in. Waiting unless the UI says otherwise.
    #[serde(default)]
    pub status: OrderStatus,
}

/// Field edits to an existing order, optionally combined with a status change.
///
/// Every field is optional; `None` leaves the order's value alone. An empty
/// `scheduled_time` clears the scheduled time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    /// Free-text note appended to the description with the date it was written.
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl OrderEdit {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
