//! # Command Layer
//!
//! This module contains the **business operations** of frostify: creating, editing and
//! deleting clients and service orders. Each command is a plain function over data the
//! caller owns.
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate forms and refuse invalid submissions with a typed error
//!   ([`FrostifyError::InvalidClient`](crate::error::FrostifyError::InvalidClient),
//!   [`FrostifyError::InvalidOrder`](crate::error::FrostifyError::InvalidOrder))
//! - Draw identifiers from an [`IdGenerator`](crate::ids::IdGenerator)
//! - Route status changes through the [workflow](crate::workflow)
//! - Return **new** collections; the inputs are never mutated
//!
//! ## What Commands Do NOT Do
//!
//! - **Storage**: the caller keeps the collections and persists them however it likes
//! - **Clock reads**: the current instant is a parameter, so every command is
//!   deterministic under test. [`FrostifyApi`](crate::api::FrostifyApi) supplies `Utc::now()`.
//! - **Confirmation prompts**: see [`OrderStatus::requires_confirmation`](crate::model::OrderStatus::requires_confirmation)
//!
//! ## Command Modules
//!
//! - [`clients`]: create, update and delete clients
//! - [`orders`]: create, edit, change status and delete service orders

pub mod clients;
pub mod orders;

/// Index of the record whose id is `id`.
fn position<T>(items: &[T], id: &str, key: impl Fn(&T) -> &str) -> Option<usize> {
    items.iter().position(|item| key(item) == id)
}
