//! # Customer Registration
//!
//! The registration feature slice: a [`CustomerForm`] controller owning
//! the customer form's control tree. It wires the shape (personal fields,
//! email confirmation pair, notification preference, rating, address
//! sub-forms), evaluates conditional validator rules atomically with the
//! edits that trigger them, and feeds change notifications to background
//! subscribers such as the debounced email message.

mod error;
mod events;
mod form;
mod messages;
mod rules;

pub use crate::error::RegistrationError;
pub use crate::events::ValueChanged;
pub use crate::form::{CustomerForm, EMAIL_PATH, FormState};
pub use crate::messages::validation_message;
pub use crate::rules::ConditionalRule;
