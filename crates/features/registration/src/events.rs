use regkit_controls::Value;
use std::sync::Arc;

/// Notification that a single field's value changed.
///
/// Carries the dotted path and the new value so subscribers can react
/// without re-reading the tree. Published after the mutation and all its
/// conditional-rule consequences have been applied, so a subscriber that
/// does read the tree observes a consistent state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChanged {
    pub path: Arc<str>,
    pub value: Value,
}

impl ValueChanged {
    #[must_use]
    pub fn new(path: &str, value: Value) -> Self {
        Self { path: Arc::from(path), value }
    }
}
