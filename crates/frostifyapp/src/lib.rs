//! # Frostify Architecture
//!
//! Frostify is the **core library of an HVAC service business manager**: it keeps a
//! client registry, books service orders, tracks each order through its status workflow,
//! and answers the questions a dashboard asks (what is due today, what is running).
//!
//! It is a UI-agnostic library. Records live wherever the caller keeps them; every
//! operation takes the current collections and returns new values.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, owns id generator + config + catalog        │
//! │  - Supplies the current time                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Create / update / delete clients and orders              │
//! │  - Refuses invalid forms with typed errors                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pure Core                                                  │
//! │  validation, workflow, search, stats, ids, calendar         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O in Core
//!
//! Nothing in this crate writes to stdout/stderr or touches storage. Diagnostics go
//! through `tracing`; installing a subscriber is up to the application.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business operations on clients and service orders
//! - [`model`]: Core data types (`Client`, `ServiceOrder`, `OrderStatus`, forms)
//! - [`ids`]: Unique client and service order id generation
//! - [`validation`]: Per-field form validation
//! - [`workflow`]: Status transitions and their timestamp effects
//! - [`search`]: Client and order search, status filtering
//! - [`stats`]: Order counts and the dashboard board
//! - [`calendar`]: Calendar-day comparisons
//! - [`config`]: Configuration and the service catalog
//! - [`error`]: Error types

pub mod api;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod search;
pub mod stats;
pub mod validation;
pub mod workflow;
