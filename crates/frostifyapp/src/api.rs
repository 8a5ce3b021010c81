//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the pure helpers
//! (validation, search, statistics). It is the single entry point a UI talks to.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the id generator, the configuration and the service catalog
//! - **Supplies the clock**: commands take `now` explicitly; the facade passes `Utc::now()`
//! - **Dispatches** to the appropriate command function
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Storage**: clients and orders are owned by the caller and passed in as slices;
//!   mutating calls hand back the new collections
//!
//! ## Restoring Saved Data
//!
//! Ids must stay unique across sessions. After loading saved records, call
//! [`FrostifyApi::register_existing`] so the generator never hands out an id that is
//! already taken.
//!
//! ## Testing Strategy
//!
//! API tests verify dispatch and that configuration reaches the commands (order id tag,
//! catalog). Command behavior is tested in the command modules.

use std::path::Path;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;

use crate::calendar;
use crate::commands::{self, clients::DeletePolicy};
use crate::config::{load_config, FrostifyConfig, ServiceCatalog};
use crate::error::Result;
use crate::ids::{IdGenerator, IdKind};
use crate::model::{Client, ClientForm, OrderEdit, OrderForm, OrderStatus, ServiceOrder};
use crate::search::{self, StatusFilter};
use crate::stats::{self, Board, OrderStats};
use crate::validation::{self, ClientField, OrderField, Validation};

/// The main API facade for frostify operations.
///
/// Generic over the generator's random source so tests can use a seeded one.
#[derive(Debug)]
pub struct FrostifyApi<R = StdRng> {
    ids: IdGenerator<R>,
    config: FrostifyConfig,
    catalog: ServiceCatalog,
}

impl FrostifyApi<StdRng> {
    /// Fails with [`FrostifyError::InvalidOrderTag`](crate::error::FrostifyError::InvalidOrderTag)
    /// if the configured tag is not made of ASCII letters.
    pub fn new(config: FrostifyConfig) -> Result<Self> {
        Self::with_generator(config, IdGenerator::new())
    }

    /// Builds the facade from [`load_config`].
    pub fn from_config_file(path: Option<&Path>) -> Result<Self> {
        Self::new(load_config(path)?)
    }
}

impl Default for FrostifyApi<StdRng> {
    /// Default configuration; the generator already carries the default tag.
    fn default() -> Self {
        let config = FrostifyConfig::default();
        Self {
            ids: IdGenerator::new(),
            catalog: config.catalog(),
            config,
        }
    }
}

impl<R: Rng> FrostifyApi<R> {
    /// Uses `ids` as the generator; its order tag is replaced by the configured one.
    pub fn with_generator(config: FrostifyConfig, ids: IdGenerator<R>) -> Result<Self> {
        let ids = ids.with_order_tag(config.order_id_tag.clone())?;
        let catalog = config.catalog();
        Ok(Self {
            ids,
            config,
            catalog,
        })
    }

    pub fn config(&self) -> &FrostifyConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn issued(&self, kind: IdKind) -> usize {
        self.ids.issued(kind)
    }

    /// Marks the ids of previously saved records as taken.
    ///
    /// All or nothing: if any id is malformed, none is registered. Orders saved under an
    /// earlier tag are accepted.
    pub fn register_existing(
        &mut self,
        clients: &[Client],
        orders: &[ServiceOrder],
    ) -> Result<usize> {
        self.ids.register_existing(
            clients.iter().map(|c| c.id.as_str()),
            orders.iter().map(|o| o.id.as_str()),
        )
    }

    pub fn validate_client(&self, form: &ClientForm) -> Validation<ClientField> {
        validation::validate_client(form)
    }

    /// Validates a new order against today's local date.
    pub fn validate_order(&self, form: &OrderForm) -> Validation<OrderField> {
        validation::validate_order(form, &self.catalog, calendar::today())
    }

    pub fn validate_order_edit(&self, edit: &OrderEdit) -> Validation<OrderField> {
        validation::validate_order_edit(edit, &self.catalog)
    }

    pub fn create_client(&mut self, form: &ClientForm) -> Result<Client> {
        commands::clients::create(&mut self.ids, form, Utc::now())
    }

    pub fn update_client(
        &self,
        clients: &[Client],
        id: &str,
        form: &ClientForm,
    ) -> Result<Vec<Client>> {
        commands::clients::update(clients, id, form)
    }

    pub fn delete_client(
        &self,
        clients: &[Client],
        orders: &[ServiceOrder],
        id: &str,
        policy: DeletePolicy,
    ) -> Result<(Vec<Client>, Vec<ServiceOrder>)> {
        commands::clients::delete(clients, orders, id, policy)
    }

    pub fn create_order(&mut self, clients: &[Client], form: &OrderForm) -> Result<ServiceOrder> {
        commands::orders::create(&mut self.ids, clients, form, &self.catalog, Utc::now())
    }

    pub fn update_order(
        &self,
        orders: &[ServiceOrder],
        id: &str,
        edit: &OrderEdit,
    ) -> Result<Vec<ServiceOrder>> {
        commands::orders::update(orders, id, edit, &self.catalog, Utc::now())
    }

    pub fn change_order_status(
        &self,
        orders: &[ServiceOrder],
        id: &str,
        status: OrderStatus,
    ) -> Result<Vec<ServiceOrder>> {
        commands::orders::change_status(orders, id, status, Utc::now())
    }

    pub fn delete_order(&self, orders: &[ServiceOrder], id: &str) -> Result<Vec<ServiceOrder>> {
        commands::orders::delete(orders, id)
    }

    pub fn search_clients(&self, clients: &[Client], query: &str) -> Vec<Client> {
        search::search_clients(clients, query)
    }

    pub fn search_orders(
        &self,
        orders: &[ServiceOrder],
        clients: &[Client],
        query: &str,
        status: StatusFilter,
    ) -> Vec<ServiceOrder> {
        search::search_orders(orders, clients, query, status)
    }

    pub fn stats(&self, orders: &[ServiceOrder]) -> OrderStats {
        stats::compute_stats_now(orders)
    }

    pub fn board<'a>(&self, orders: &'a [ServiceOrder]) -> Board<'a> {
        Board::build(orders, calendar::today())
    }
}
