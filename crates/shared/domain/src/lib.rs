//! # Domain Models
//!
//! Pure domain types for the customer registration form with minimal
//! dependencies (`serde`, `strum`). Keep it lean: no I/O, no heavy
//! logic, just data and simple helpers.

pub mod config;

use serde::{Deserialize, Serialize};

/// The customer record a completed registration form describes.
/// A plain value carrier, no behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub send_catalog: bool,
    pub address_type: String,
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: String,
    pub zip: Option<String>,
}

/// How the customer prefers to be notified.
///
/// Serialized lowercase; `Text` is the value that makes the phone field
/// mandatory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationMethod {
    #[default]
    Email,
    Text,
    Phone,
}
