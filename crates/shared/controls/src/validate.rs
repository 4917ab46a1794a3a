//! Pure, stateless validation rules.
//!
//! Field validators inspect a single [`Value`]; group validators receive
//! read access to the whole sub-tree so cross-field checks never need a
//! child to reference its sibling directly. A validator returns `None`
//! when the input is acceptable and a keyed [`ErrorDetail`] otherwise.

use crate::error::{ErrorDetail, ErrorKind};
use crate::group::Group;
use crate::value::Value;
use std::sync::Arc;

/// A validator attached to a single field.
pub type Validator = Arc<dyn Fn(&Value) -> Option<(ErrorKind, ErrorDetail)> + Send + Sync>;

/// A validator attached to a group, inspecting multiple children.
pub type GroupValidator = Arc<dyn Fn(&Group) -> Option<(ErrorKind, ErrorDetail)> + Send + Sync>;

/// Fails with [`ErrorKind::Required`] on null or empty text.
#[must_use]
pub fn required() -> Validator {
    Arc::new(|value| value.is_empty().then_some((ErrorKind::Required, ErrorDetail::Flag(true))))
}

/// Fails with [`ErrorKind::Email`] when a non-empty text value is not a
/// structurally plausible address (`local@domain` with a dot-bearing
/// domain). Emptiness is [`required`]'s concern, not this rule's.
#[must_use]
pub fn email() -> Validator {
    Arc::new(|value| match value.as_text() {
        Some(text) if !text.is_empty() && !is_well_formed_email(text) => {
            Some((ErrorKind::Email, ErrorDetail::Flag(true)))
        },
        _ => None,
    })
}

fn is_well_formed_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|segment| !segment.is_empty())
}

/// Fails with [`ErrorKind::MinLength`] when text is shorter than `min`
/// characters. Empty text passes, mirroring [`email`]'s division of labor.
#[must_use]
pub fn min_length(min: usize) -> Validator {
    Arc::new(move |value| {
        let text = value.as_text()?;
        if text.is_empty() {
            return None;
        }
        let actual = text.chars().count();
        (actual < min).then_some((
            ErrorKind::MinLength,
            ErrorDetail::Length { required_length: min, actual_length: actual },
        ))
    })
}

/// Fails with [`ErrorKind::MaxLength`] when text exceeds `max` characters.
#[must_use]
pub fn max_length(max: usize) -> Validator {
    Arc::new(move |value| {
        let text = value.as_text()?;
        let actual = text.chars().count();
        (actual > max).then_some((
            ErrorKind::MaxLength,
            ErrorDetail::Length { required_length: max, actual_length: actual },
        ))
    })
}

/// Fails with [`ErrorKind::Range`] when a value is present but is either
/// not a number or falls outside `[min, max]`. Null always passes: an
/// unspecified value is not an out-of-range one.
#[must_use]
pub fn range(min: f64, max: f64) -> Validator {
    Arc::new(move |value| {
        if value.is_null() {
            return None;
        }
        match value.as_number() {
            Some(number) if number >= min && number <= max => None,
            Some(number) => {
                Some((ErrorKind::Range, ErrorDetail::Range { min, max, actual: Some(number) }))
            },
            None => Some((ErrorKind::Range, ErrorDetail::Range { min, max, actual: None })),
        }
    })
}

/// Cross-field equality check over two sibling fields of a group.
///
/// Passes while either field is still pristine (the user has not edited
/// it yet); once both are dirty, passes iff the values are equal
/// (case-sensitive) and fails with [`ErrorKind::Match`] otherwise.
/// Fields absent from the group are treated as pristine.
#[must_use]
pub fn match_fields(left: &'static str, right: &'static str) -> GroupValidator {
    Arc::new(move |group| {
        let (Ok(a), Ok(b)) = (group.field(left), group.field(right)) else {
            return None;
        };
        if a.is_pristine() || b.is_pristine() {
            return None;
        }
        (a.value() != b.value()).then_some((ErrorKind::Match, ErrorDetail::Flag(true)))
    })
}
