use crate::error::ControlError;
use crate::group::Group;

/// An ordered, appendable/removable sequence of structurally-identical
/// sub-groups (the address sub-forms).
///
/// Order is significant: it reflects UI display order and serialization
/// order. Elements are created by explicit `push` or bulk-replaced via
/// `replace_all`; nothing is destroyed otherwise.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    elements: Vec<Group>,
}

impl Collection {
    #[must_use]
    pub const fn new() -> Self {
        Self { elements: Vec::new() }
    }

    #[must_use]
    pub fn from_groups(groups: Vec<Group>) -> Self {
        Self { elements: groups }
    }

    /// Appends an element to the end of the sequence.
    pub fn push(&mut self, group: Group) {
        self.elements.push(group);
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    /// [`ControlError::IndexOutOfRange`] when `index >= len`.
    pub fn at(&self, index: usize) -> Result<&Group, ControlError> {
        let len = self.elements.len();
        self.elements.get(index).ok_or(ControlError::IndexOutOfRange { index, len })
    }

    /// Mutable counterpart of [`Collection::at`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut Group, ControlError> {
        let len = self.elements.len();
        self.elements.get_mut(index).ok_or(ControlError::IndexOutOfRange { index, len })
    }

    /// Atomically swaps the entire sequence (bulk populate).
    pub fn replace_all(&mut self, groups: Vec<Group>) {
        self.elements = groups;
    }

    /// Toggles an element's subtree enabled flag, removing or restoring it
    /// from parent validity aggregation and serialization.
    ///
    /// # Errors
    /// [`ControlError::IndexOutOfRange`] when `index >= len`.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), ControlError> {
        self.at_mut(index)?.set_enabled(enabled);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.elements.iter()
    }

    /// Valid iff all enabled elements are valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.elements.iter().all(|group| !group.is_enabled() || group.is_valid())
    }

    /// Snapshot of the enabled elements only, in display order.
    #[must_use]
    pub fn value(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.elements
                .iter()
                .filter(|group| group.is_enabled())
                .map(Group::value)
                .collect(),
        )
    }
}

impl From<Vec<Group>> for Collection {
    fn from(groups: Vec<Group>) -> Self {
        Self::from_groups(groups)
    }
}
