//! User-facing validation messages.
//!
//! The error maps on the control tree are machine-shaped; this module
//! flattens them into display text. Messages are only produced for fields
//! the user has interacted with (touched or dirty): a freshly-built form
//! full of `required` errors stays quiet.

use regkit_controls::{ErrorKind, Field};

/// Display order for combined messages; hash-map iteration order is not
/// stable, so the order is pinned here.
const MESSAGE_ORDER: [ErrorKind; 6] = [
    ErrorKind::Required,
    ErrorKind::Email,
    ErrorKind::MinLength,
    ErrorKind::MaxLength,
    ErrorKind::Range,
    ErrorKind::Match,
];

const fn message_for(kind: ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::Required => Some("Please enter your email address."),
        ErrorKind::Email => Some("Please enter a valid email address."),
        _ => None,
    }
}

/// Combined message for the email field, empty when there is nothing to say.
///
/// Non-empty iff the field has been interacted with and currently has
/// errors; multiple concurrent errors are joined with a single space.
#[must_use]
pub fn validation_message(field: &Field) -> String {
    if !(field.is_touched() || field.is_dirty()) || field.errors().is_empty() {
        return String::new();
    }
    MESSAGE_ORDER
        .iter()
        .filter(|kind| field.errors().contains_key(kind))
        .filter_map(|kind| message_for(*kind))
        .collect::<Vec<_>>()
        .join(" ")
}
