//! Form validation for clients and service orders.
//!
//! Every validator checks all fields independently and collects the failures into a
//! [`Validation`] report. Nothing short-circuits, so the UI can mark every bad field
//! at once. Validators never return `Err`: a failed check is data, and the caller
//! decides whether to block the submission.
//!
//! ## Client rules
//!
//! | Field | Rule |
//! |-------|------|
//! | name | non-blank, trimmed length ≥ 3 |
//! | phone | 10 or 11 digits once punctuation is stripped |
//! | email | non-blank, `local@domain.tld` with no whitespace |
//! | cpf | 11 digits (personal) or 14 digits (business) once punctuation is stripped |
//! | address | non-blank, trimmed length ≥ 10 |
//!
//! ## Service order rules
//!
//! | Field | Rule |
//! |-------|------|
//! | client | a client is selected |
//! | type | selected and part of the configured catalog |
//! | date | present and not before today (calendar day) |
//! | description | trimmed length ≥ 10 |
//! | scheduled time | blank, or `H:MM`/`HH:MM` on a 24-hour clock |
//!
//! Edits to an existing order ([`validate_order_edit`]) are looser: only the fields
//! being changed are checked, and the description only needs to be non-blank.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::calendar::is_past_date;
use crate::config::ServiceCatalog;
use crate::model::{ClientForm, OrderEdit, OrderForm};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_ADDRESS_LEN: usize = 10;
pub const MIN_DESCRIPTION_LEN: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

/// A field of a validated form, used as the key of a [`Validation`] report.
pub trait FormField: Copy + Ord + fmt::Debug {
    /// Key the UI uses for the field.
    fn key(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientField {
    Name,
    Phone,
    Email,
    Cpf,
    Address,
}

impl FormField for ClientField {
    fn key(self) -> &'static str {
        match self {
            ClientField::Name => "name",
            ClientField::Phone => "phone",
            ClientField::Email => "email",
            ClientField::Cpf => "cpf",
            ClientField::Address => "address",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderField {
    Client,
    Type,
    Date,
    Description,
    ScheduledTime,
}

impl FormField for OrderField {
    fn key(self) -> &'static str {
        match self {
            OrderField::Client => "client",
            OrderField::Type => "type",
            OrderField::Date => "date",
            OrderField::Description => "description",
            OrderField::ScheduledTime => "scheduledTime",
        }
    }
}

/// Why a single field was rejected. `Display` gives the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{label} must be at least {min} characters")]
    TooShort { label: &'static str, min: usize },

    #[error("Phone must have 10 or 11 digits")]
    PhoneDigits,

    #[error("CPF must have 11 digits or CNPJ 14 digits")]
    TaxIdDigits,

    #[error("E-mail is invalid")]
    InvalidEmail,

    #[error("Select a client")]
    NoClientSelected,

    #[error("Select a service type")]
    NoServiceType,

    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),

    #[error("Date cannot be in the past")]
    DateInPast,

    #[error("Invalid time (HH:MM)")]
    InvalidTime,
}

/// Outcome of validating a form: the failing fields and why.
///
/// A field absent from the report is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation<F: FormField> {
    errors: BTreeMap<F, FieldError>,
}

impl<F: FormField> Default for Validation<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> Validation<F> {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: F, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: F) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn errors(&self) -> &BTreeMap<F, FieldError> {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Field key → message, as the UI displays them.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.key(), error.to_string()))
            .collect()
    }
}

impl<F: FormField> fmt::Display for Validation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.key(), error)?;
            first = false;
        }
        Ok(())
    }
}

impl<F: FormField> Serialize for Validation<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Validation", 2)?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("errors", &self.messages())?;
        state.end()
    }
}

/// Strips everything but ASCII digits: `"(11) 99988-7766"` → `"11999887766"`.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

fn check_min_len(s: &str, label: &'static str, min: usize) -> Option<FieldError> {
    if s.trim().is_empty() {
        Some(FieldError::Required(label))
    } else if trimmed_len(s) < min {
        Some(FieldError::TooShort { label, min })
    } else {
        None
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `H:MM` or `HH:MM`, 24-hour clock.
pub fn is_valid_time(time: &str) -> bool {
    TIME_RE.is_match(time)
}

pub fn validate_client(form: &ClientForm) -> Validation<ClientField> {
    let mut report = Validation::new();

    if let Some(err) = check_min_len(&form.name, "Name", MIN_NAME_LEN) {
        report.reject(ClientField::Name, err);
    }

    let phone = digits_only(&form.phone);
    if phone.is_empty() {
        report.reject(ClientField::Phone, FieldError::Required("Phone"));
    } else if !matches!(phone.len(), 10 | 11) {
        // 10 digits: landline (area code + 8), 11 digits: mobile (area code + 9)
        report.reject(ClientField::Phone, FieldError::PhoneDigits);
    }

    if form.email.trim().is_empty() {
        report.reject(ClientField::Email, FieldError::Required("E-mail"));
    } else if !is_valid_email(&form.email) {
        report.reject(ClientField::Email, FieldError::InvalidEmail);
    }

    let cpf = digits_only(&form.cpf);
    if cpf.is_empty() {
        report.reject(ClientField::Cpf, FieldError::Required("CPF/CNPJ"));
    } else if !matches!(cpf.len(), 11 | 14) {
        report.reject(ClientField::Cpf, FieldError::TaxIdDigits);
    }

    if let Some(err) = check_min_len(&form.address, "Address", MIN_ADDRESS_LEN) {
        report.reject(ClientField::Address, err);
    }

    report
}

/// Validates a new service order. `today` is the caller's current calendar day.
pub fn validate_order(
    form: &OrderForm,
    catalog: &ServiceCatalog,
    today: NaiveDate,
) -> Validation<OrderField> {
    let mut report = Validation::new();

    let has_client = form
        .client_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    if !has_client {
        report.reject(OrderField::Client, FieldError::NoClientSelected);
    }

    if let Some(err) = check_service_type(&form.service_type, catalog) {
        report.reject(OrderField::Type, err);
    }

    match form.date {
        None => report.reject(OrderField::Date, FieldError::Required("Date")),
        Some(date) if is_past_date(date, today) => {
            report.reject(OrderField::Date, FieldError::DateInPast)
        }
        Some(_) => {}
    }

    if let Some(err) = check_min_len(&form.description, "Description", MIN_DESCRIPTION_LEN) {
        report.reject(OrderField::Description, err);
    }

    if let Some(err) = check_scheduled_time(form.scheduled_time.as_deref()) {
        report.reject(OrderField::ScheduledTime, err);
    }

    report
}

/// A blank time means "not scheduled" and is accepted.
fn check_scheduled_time(time: Option<&str>) -> Option<FieldError> {
    let time = time?.trim();
    (!time.is_empty() && !is_valid_time(time)).then_some(FieldError::InvalidTime)
}

/// Validates the fields an edit actually touches.
pub fn validate_order_edit(edit: &OrderEdit, catalog: &ServiceCatalog) -> Validation<OrderField> {
    let mut report = Validation::new();

    if let Some(service_type) = &edit.service_type {
        if let Some(err) = check_service_type(service_type, catalog) {
            report.reject(OrderField::Type, err);
        }
    }

    if let Some(description) = &edit.description {
        if description.trim().is_empty() {
            report.reject(OrderField::Description, FieldError::Required("Description"));
        }
    }

    if let Some(err) = check_scheduled_time(edit.scheduled_time.as_deref()) {
        report.reject(OrderField::ScheduledTime, err);
    }

    report
}

/// Looked up trimmed, the way commands store it.
fn check_service_type(service_type: &str, catalog: &ServiceCatalog) -> Option<FieldError> {
    let service_type = service_type.trim();
    if service_type.is_empty() {
        Some(FieldError::NoServiceType)
    } else if !catalog.contains(service_type) {
        Some(FieldError::UnknownServiceType(service_type.to_string()))
    } else {
        None
    }
}
