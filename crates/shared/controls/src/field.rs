use crate::error::ErrorMap;
use crate::validate::Validator;
use crate::value::Value;
use std::fmt;

/// A single editable value with interaction state and attached validators.
///
/// The error map is recomputed eagerly whenever the value or the validator
/// list changes, so it always reflects the union of the currently-failing
/// validators. Invalid states are represented, never thrown.
#[derive(Clone)]
pub struct Field {
    value: Value,
    touched: bool,
    dirty: bool,
    enabled: bool,
    validators: Vec<Validator>,
    errors: ErrorMap,
}

impl Field {
    /// Creates an enabled, pristine, untouched field with no validators.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_validators(value, Vec::new())
    }

    /// Creates a field with an initial value and an ordered validator list.
    pub fn with_validators(value: impl Into<Value>, validators: Vec<Validator>) -> Self {
        let mut field = Self {
            value: value.into(),
            touched: false,
            dirty: false,
            enabled: true,
            validators,
            errors: ErrorMap::default(),
        };
        field.revalidate();
        field
    }

    /// Marks the field disabled at construction time.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Replaces the value, marks the field dirty and recomputes its errors.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.dirty = true;
        self.revalidate();
    }

    /// Records that the field has received and lost input focus.
    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    /// Replaces the attached validators and recomputes errors immediately,
    /// so no intermediate inconsistent state is observable.
    pub fn set_validators(&mut self, validators: Vec<Validator>) {
        self.validators = validators;
        self.revalidate();
    }

    /// Drops all attached validators; the error map becomes empty.
    pub fn clear_validators(&mut self) {
        self.validators.clear();
        self.revalidate();
    }

    /// Toggles the enabled flag. Disabled fields keep their value and
    /// errors but are excluded from parent validity and serialization.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn revalidate(&mut self) {
        self.errors = self.validators.iter().filter_map(|validator| validator(&self.value)).collect();
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub const fn is_pristine(&self) -> bool {
        !self.dirty
    }

    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("value", &self.value)
            .field("touched", &self.touched)
            .field("dirty", &self.dirty)
            .field("enabled", &self.enabled)
            .field("validators", &self.validators.len())
            .field("errors", &self.errors)
            .finish()
    }
}
