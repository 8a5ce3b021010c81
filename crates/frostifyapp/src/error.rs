use thiserror::Error;

use crate::ids::IdKind;
use crate::validation::{ClientField, OrderField, Validation};

#[derive(Error, Debug)]
pub enum FrostifyError {
    #[error("Client form is invalid: {0}")]
    InvalidClient(Validation<ClientField>),

    #[error("Service order form is invalid: {0}")]
    InvalidOrder(Validation<OrderField>),

    #[error("All {kind} identifiers have been issued")]
    IdSpaceExhausted { kind: IdKind },

    #[error("Malformed {kind} identifier: {id:?}")]
    MalformedId { kind: IdKind, id: String },

    #[error("Invalid service order tag {0:?}: use one or more ASCII letters")]
    InvalidOrderTag(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Service order not found: {0}")]
    OrderNotFound(String),

    #[error("Client {id} still has {count} service order(s)")]
    ClientHasOrders { id: String, count: usize },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, FrostifyError>;
