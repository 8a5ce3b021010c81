//! # Identifier Generator
//!
//! Clients and service orders get short, human-friendly identifiers instead of UUIDs,
//! because people read them aloud over the phone and type them into the search box.
//!
//! ## Formats
//!
//! | Kind | Format | Example |
//! |------|--------|---------|
//! | Client | 6 digits | `847291` |
//! | Service order | `<TAG>-` + 6 digits | `OS-457892` |
//!
//! The digits are drawn uniformly from `100000..=999999`, giving 900,000 values per kind.
//!
//! ## Registries
//!
//! Each kind keeps its own registry of values already handed out. The two registries are
//! independent: client `457892` and order `OS-457892` may coexist. Registries only grow;
//! deleting a record does not free its number. Order numbers are reserved regardless of
//! tag: after the tag changes from `OS` to `WO`, `WO-457892` is never issued if
//! `OS-457892` was loaded.
//!
//! The generator is an ordinary value owned by the caller, not process-global state. Tests
//! build a fresh one (optionally with a seeded RNG) and get full isolation.
//!
//! ## Termination
//!
//! Random resampling gets slow as a registry fills up, and never finishes once it is full.
//! [`IdRegistry::reserve`] therefore:
//!
//! 1. Fails with [`FrostifyError::IdSpaceExhausted`] when all 900,000 values are taken.
//! 2. Tries up to [`MAX_RANDOM_ATTEMPTS`] random draws.
//! 3. Falls back to a linear probe from a random starting point, which is guaranteed
//!    to find the free value(s).
//!
//! ## Concurrency
//!
//! [`IdGenerator`] needs `&mut self`. Hosts that serve concurrent submissions should use
//! [`SharedIdGenerator`], which serializes the check-then-insert behind a mutex.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::{FrostifyError, Result};

pub const ID_MIN: u32 = 100_000;
pub const ID_MAX: u32 = 999_999;
/// Number of distinct values per identifier kind.
pub const ID_SPACE: usize = (ID_MAX - ID_MIN + 1) as usize;
/// Random draws before switching to a linear probe.
pub const MAX_RANDOM_ATTEMPTS: usize = 64;
pub const DEFAULT_ORDER_TAG: &str = "OS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Client,
    ServiceOrder,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Client => f.write_str("client"),
            IdKind::ServiceOrder => f.write_str("service order"),
        }
    }
}

/// The set of numeric values issued for one identifier kind.
#[derive(Debug, Clone)]
pub struct IdRegistry {
    kind: IdKind,
    issued: HashSet<u32>,
}

impl IdRegistry {
    pub fn new(kind: IdKind) -> Self {
        Self {
            kind,
            issued: HashSet::new(),
        }
    }

    pub fn kind(&self) -> IdKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    pub fn remaining(&self) -> usize {
        ID_SPACE - self.issued.len()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.issued.contains(&value)
    }

    /// Marks a value as issued. Returns `false` if it already was.
    ///
    /// Values outside the 6-digit space are ignored and return `false`.
    pub fn register(&mut self, value: u32) -> bool {
        if !(ID_MIN..=ID_MAX).contains(&value) {
            return false;
        }
        self.issued.insert(value)
    }

    /// Draws a fresh value and records it before returning.
    pub fn reserve<R: Rng>(&mut self, rng: &mut R) -> Result<u32> {
        if self.issued.len() >= ID_SPACE {
            tracing::error!(kind = %self.kind, "identifier space exhausted");
            return Err(FrostifyError::IdSpaceExhausted { kind: self.kind });
        }

        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = rng.gen_range(ID_MIN..=ID_MAX);
            if self.issued.insert(candidate) {
                return Ok(candidate);
            }
        }

        tracing::warn!(
            kind = %self.kind,
            issued = self.issued.len(),
            "random id draws kept colliding, probing linearly"
        );
        let start = rng.gen_range(0..ID_SPACE as u32);
        for offset in 0..ID_SPACE as u32 {
            let candidate = ID_MIN + (start + offset) % ID_SPACE as u32;
            if self.issued.insert(candidate) {
                return Ok(candidate);
            }
        }

        Err(FrostifyError::IdSpaceExhausted { kind: self.kind })
    }
}

/// Issues client and service order identifiers.
///
/// Generic over the random source so tests can use a seeded [`StdRng`].
#[derive(Debug)]
pub struct IdGenerator<R = StdRng> {
    rng: R,
    order_tag: String,
    clients: IdRegistry,
    orders: IdRegistry,
}

impl IdGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A generator with a deterministic sequence, for tests and reproducible seeding.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for IdGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> IdGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            order_tag: DEFAULT_ORDER_TAG.to_string(),
            clients: IdRegistry::new(IdKind::Client),
            orders: IdRegistry::new(IdKind::ServiceOrder),
        }
    }

    /// Replaces the tag placed in front of service order digits (`OS` by default).
    ///
    /// The tag must be one or more ASCII letters.
    pub fn with_order_tag(mut self, tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        if !is_valid_order_tag(&tag) {
            return Err(FrostifyError::InvalidOrderTag(tag));
        }
        self.order_tag = tag;
        Ok(self)
    }

    pub fn order_tag(&self) -> &str {
        &self.order_tag
    }

    pub fn new_client_id(&mut self) -> Result<String> {
        let value = self.clients.reserve(&mut self.rng)?;
        Ok(value.to_string())
    }

    pub fn new_service_order_id(&mut self) -> Result<String> {
        let value = self.orders.reserve(&mut self.rng)?;
        Ok(format!("{}-{}", self.order_tag, value))
    }

    /// Records an existing client id (e.g. from loaded records) so it is never reissued.
    ///
    /// Returns `Ok(false)` if it was already registered.
    pub fn register_client_id(&mut self, id: &str) -> Result<bool> {
        let value = parse_client_id(id)?;
        Ok(self.clients.register(value))
    }

    /// Records an existing service order id.
    ///
    /// Any well-formed tag is accepted, not only this generator's: ids issued before the
    /// tag was reconfigured still reserve their number.
    pub fn register_service_order_id(&mut self, id: &str) -> Result<bool> {
        let value = parse_service_order_id(id)?;
        Ok(self.orders.register(value))
    }

    /// Registers a batch of saved ids, all or nothing.
    ///
    /// Every id is parsed before any is recorded, so a malformed one leaves the registries
    /// untouched. Returns how many ids were newly registered.
    pub fn register_existing<'a>(
        &mut self,
        client_ids: impl IntoIterator<Item = &'a str>,
        order_ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<usize> {
        let clients = client_ids
            .into_iter()
            .map(parse_client_id)
            .collect::<Result<Vec<_>>>()?;
        let orders = order_ids
            .into_iter()
            .map(parse_service_order_id)
            .collect::<Result<Vec<_>>>()?;

        let added = clients
            .into_iter()
            .filter(|&v| self.clients.register(v))
            .count()
            + orders
                .into_iter()
                .filter(|&v| self.orders.register(v))
                .count();
        tracing::debug!(added, "existing ids registered");
        Ok(added)
    }

    pub fn issued(&self, kind: IdKind) -> usize {
        self.registry(kind).len()
    }

    pub fn remaining(&self, kind: IdKind) -> usize {
        self.registry(kind).remaining()
    }

    fn registry(&self, kind: IdKind) -> &IdRegistry {
        match kind {
            IdKind::Client => &self.clients,
            IdKind::ServiceOrder => &self.orders,
        }
    }
}

/// One or more ASCII letters.
pub fn is_valid_order_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_alphabetic())
}

fn parse_client_id(id: &str) -> Result<u32> {
    parse_digits(id).ok_or_else(|| FrostifyError::MalformedId {
        kind: IdKind::Client,
        id: id.to_string(),
    })
}

/// `<TAG>-<6 digits>` with any valid tag.
fn parse_service_order_id(id: &str) -> Result<u32> {
    id.split_once('-')
        .filter(|(tag, _)| is_valid_order_tag(tag))
        .and_then(|(_, digits)| parse_digits(digits))
        .ok_or_else(|| FrostifyError::MalformedId {
            kind: IdKind::ServiceOrder,
            id: id.to_string(),
        })
}

/// Parses exactly six ASCII digits within the identifier range.
fn parse_digits(s: &str) -> Option<u32> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse()
        .ok()
        .filter(|value| (ID_MIN..=ID_MAX).contains(value))
}

/// An [`IdGenerator`] safe to share between threads.
///
/// Each call holds the lock across the check and the insert, so two concurrent
/// submissions can never receive the same id.
#[derive(Debug)]
pub struct SharedIdGenerator<R = StdRng> {
    inner: Mutex<IdGenerator<R>>,
}

impl<R: Rng> SharedIdGenerator<R> {
    pub fn new(generator: IdGenerator<R>) -> Self {
        Self {
            inner: Mutex::new(generator),
        }
    }

    pub fn new_client_id(&self) -> Result<String> {
        self.with(|g| g.new_client_id())
    }

    pub fn new_service_order_id(&self) -> Result<String> {
        self.with(|g| g.new_service_order_id())
    }

    pub fn register_client_id(&self, id: &str) -> Result<bool> {
        self.with(|g| g.register_client_id(id))
    }

    pub fn register_service_order_id(&self, id: &str) -> Result<bool> {
        self.with(|g| g.register_service_order_id(id))
    }

    pub fn issued(&self, kind: IdKind) -> usize {
        self.with(|g| g.issued(kind))
    }

    fn with<T>(&self, f: impl FnOnce(&mut IdGenerator<R>) -> T) -> T {
        // Registries are only mutated by a single insert, so a poisoned lock still
        // guards a consistent set.
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}
