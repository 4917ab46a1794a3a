use crate::collection::Collection;
use crate::error::{ControlError, ErrorMap};
use crate::field::Field;
use crate::validate::{GroupValidator, Validator};
use crate::value::Value;
use fxhash::FxHashMap;
use std::fmt;

/// A node of the control tree.
#[derive(Debug, Clone)]
pub enum Control {
    Field(Field),
    Group(Group),
    Collection(Collection),
}

impl From<Field> for Control {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Group> for Control {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Collection> for Control {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

/// Shared read access to a resolved control.
#[derive(Debug)]
pub enum ControlRef<'a> {
    Field(&'a Field),
    Group(&'a Group),
    Collection(&'a Collection),
}

/// A named mapping of child controls with optional group-level validators.
///
/// Group validity is the conjunction of all enabled children's validity
/// and the group's own validator results. Both are recomputed eagerly:
/// every mutation that descends through a group revalidates it on the way
/// back up, so group validators always see the subtree they just changed.
#[derive(Clone)]
pub struct Group {
    controls: FxHashMap<String, Control>,
    validators: Vec<GroupValidator>,
    errors: ErrorMap,
    enabled: bool,
}

/// Builder for [`Group`], mirroring the declarative form-shape setup.
#[derive(Default)]
pub struct GroupBuilder {
    controls: FxHashMap<String, Control>,
    validators: Vec<GroupValidator>,
}

impl GroupBuilder {
    /// Adds a named child control (field, nested group or collection).
    #[must_use]
    pub fn control(mut self, name: impl Into<String>, control: impl Into<Control>) -> Self {
        self.controls.insert(name.into(), control.into());
        self
    }

    /// Attaches a group-level validator operating on the whole mapping.
    #[must_use]
    pub fn validator(mut self, validator: GroupValidator) -> Self {
        self.validators.push(validator);
        self
    }

    #[must_use]
    pub fn build(self) -> Group {
        let mut group = Group {
            controls: self.controls,
            validators: self.validators,
            errors: ErrorMap::default(),
            enabled: true,
        };
        group.revalidate();
        group
    }
}

impl Group {
    #[must_use]
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    /// Resolves a dotted path (`emailGroup.email`, `addresses.0.street1`)
    /// to a control reference. Numeric segments index into collections.
    ///
    /// # Errors
    /// Returns [`ControlError::NotFound`] when the path does not resolve,
    /// or [`ControlError::IndexOutOfRange`] for a bad collection index.
    pub fn resolve(&self, path: &str) -> Result<ControlRef<'_>, ControlError> {
        self.resolve_in(path, path)
    }

    fn resolve_in<'a>(&'a self, full: &str, path: &str) -> Result<ControlRef<'a>, ControlError> {
        let (head, rest) = split_head(path);
        let control = self
            .controls
            .get(head)
            .ok_or_else(|| ControlError::NotFound { path: full.to_owned() })?;
        match (control, rest) {
            (Control::Field(field), None) => Ok(ControlRef::Field(field)),
            (Control::Group(child), None) => Ok(ControlRef::Group(child)),
            (Control::Collection(collection), None) => Ok(ControlRef::Collection(collection)),
            (Control::Group(child), Some(rest)) => child.resolve_in(full, rest),
            (Control::Collection(collection), Some(rest)) => {
                let (index, tail) = split_index(full, rest)?;
                let element = collection.at(index)?;
                match tail {
                    None => Ok(ControlRef::Group(element)),
                    Some(tail) => element.resolve_in(full, tail),
                }
            },
            (Control::Field(_), Some(_)) => {
                Err(ControlError::NotFound { path: full.to_owned() })
            },
        }
    }

    /// Looks up the field at `path`.
    ///
    /// # Errors
    /// [`ControlError::NotFound`] for an absent path,
    /// [`ControlError::NotAField`] when it resolves to another node kind.
    pub fn field(&self, path: &str) -> Result<&Field, ControlError> {
        match self.resolve(path)? {
            ControlRef::Field(field) => Ok(field),
            _ => Err(ControlError::NotAField { path: path.to_owned() }),
        }
    }

    /// Looks up the nested group at `path`.
    ///
    /// # Errors
    /// [`ControlError::NotFound`] / [`ControlError::NotAGroup`].
    pub fn group(&self, path: &str) -> Result<&Self, ControlError> {
        match self.resolve(path)? {
            ControlRef::Group(group) => Ok(group),
            _ => Err(ControlError::NotAGroup { path: path.to_owned() }),
        }
    }

    /// Looks up the collection at `path`.
    ///
    /// # Errors
    /// [`ControlError::NotFound`] / [`ControlError::NotACollection`].
    pub fn collection(&self, path: &str) -> Result<&Collection, ControlError> {
        match self.resolve(path)? {
            ControlRef::Collection(collection) => Ok(collection),
            _ => Err(ControlError::NotACollection { path: path.to_owned() }),
        }
    }

    /// Mutable counterpart of [`Group::collection`]. The caller is expected
    /// to leave the collection in a consistent state; group-level validators
    /// are recomputed before returning control flow to the tree's owner via
    /// [`Group::revalidate`] on the next mutation.
    pub fn collection_mut(&mut self, path: &str) -> Result<&mut Collection, ControlError> {
        let (head, rest) = split_head(path);
        let control = self
            .controls
            .get_mut(head)
            .ok_or_else(|| ControlError::NotFound { path: path.to_owned() })?;
        match (control, rest) {
            (Control::Collection(collection), None) => Ok(collection),
            (Control::Group(child), Some(rest)) => child.collection_mut(rest),
            _ => Err(ControlError::NotACollection { path: path.to_owned() }),
        }
    }

    /// Applies `apply` to the field at `path`, then eagerly revalidates
    /// every group on the unwind path so aggregate validity and group
    /// validators are never stale.
    fn update_field<F>(&mut self, full: &str, path: &str, apply: F) -> Result<(), ControlError>
    where
        F: FnOnce(&mut Field),
    {
        let (head, rest) = split_head(path);
        let control = self
            .controls
            .get_mut(head)
            .ok_or_else(|| ControlError::NotFound { path: full.to_owned() })?;
        match (control, rest) {
            (Control::Field(field), None) => apply(field),
            (Control::Group(child), Some(rest)) => child.update_field(full, rest, apply)?,
            (Control::Collection(collection), Some(rest)) => {
                let (index, tail) = split_index(full, rest)?;
                let element = collection.at_mut(index)?;
                match tail {
                    Some(tail) => element.update_field(full, tail, apply)?,
                    None => return Err(ControlError::NotAField { path: full.to_owned() }),
                }
            },
            (Control::Field(_), Some(_)) => {
                return Err(ControlError::NotFound { path: full.to_owned() });
            },
            (Control::Group(_) | Control::Collection(_), None) => {
                return Err(ControlError::NotAField { path: full.to_owned() });
            },
        }
        self.revalidate();
        Ok(())
    }

    /// Sets the field value at `path`, marking it dirty.
    ///
    /// # Errors
    /// See [`Group::resolve`]; additionally [`ControlError::NotAField`]
    /// when the path resolves to a group or collection.
    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ControlError> {
        let value = value.into();
        self.update_field(path, path, |field| field.set_value(value))
    }

    /// Marks the field at `path` touched. Ancestors are revalidated since
    /// cross-field validators may consult interaction state.
    pub fn mark_touched(&mut self, path: &str) -> Result<(), ControlError> {
        self.update_field(path, path, Field::mark_touched)
    }

    /// Replaces the validator list of the field at `path`.
    pub fn set_validators(
        &mut self,
        path: &str,
        validators: Vec<Validator>,
    ) -> Result<(), ControlError> {
        self.update_field(path, path, |field| field.set_validators(validators))
    }

    /// Clears the validator list of the field at `path`.
    pub fn clear_validators(&mut self, path: &str) -> Result<(), ControlError> {
        self.update_field(path, path, Field::clear_validators)
    }

    /// Toggles the enabled flag of the field at `path`.
    pub fn set_enabled_at(&mut self, path: &str, enabled: bool) -> Result<(), ControlError> {
        self.update_field(path, path, |field| field.set_enabled(enabled))
    }

    /// Structurally replaces (or inserts) a direct child control.
    /// Used to swap a whole collection on bulk populate.
    pub fn set_control(&mut self, name: impl Into<String>, control: impl Into<Control>) {
        let name = name.into();
        tracing::trace!(control = %name, "replacing control");
        self.controls.insert(name, control.into());
        self.revalidate();
    }

    /// Applies only the provided subset of fields, recursively, leaving
    /// the rest untouched. The whole patch is verified against the tree
    /// shape before any mutation: an unknown key or a value that does not
    /// fit aborts with the tree unchanged (all-or-nothing).
    ///
    /// Patched fields are set through [`Field::set_value`] and therefore
    /// become dirty. Collections are not patchable; they are replaced
    /// wholesale via [`Group::set_control`].
    ///
    /// # Errors
    /// [`ControlError::NotFound`] for unknown keys,
    /// [`ControlError::InvalidPatch`] for shape mismatches.
    pub fn patch_value(&mut self, patch: &serde_json::Value) -> Result<Vec<String>, ControlError> {
        let object = patch
            .as_object()
            .ok_or_else(|| ControlError::InvalidPatch { path: String::new() })?;
        self.verify_patch(object, "")?;

        let mut patched = Vec::new();
        self.apply_patch(object, "", &mut patched);
        tracing::trace!(fields = patched.len(), "patch applied");
        Ok(patched)
    }

    fn verify_patch(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
        prefix: &str,
    ) -> Result<(), ControlError> {
        for (name, entry) in object {
            let path = join_path(prefix, name);
            match self.controls.get(name) {
                None => return Err(ControlError::NotFound { path }),
                Some(Control::Field(_)) => {
                    if entry.is_object() || entry.is_array() {
                        return Err(ControlError::InvalidPatch { path });
                    }
                },
                Some(Control::Group(child)) => {
                    let inner = entry
                        .as_object()
                        .ok_or_else(|| ControlError::InvalidPatch { path: path.clone() })?;
                    child.verify_patch(inner, &path)?;
                },
                Some(Control::Collection(_)) => {
                    return Err(ControlError::InvalidPatch { path });
                },
            }
        }
        Ok(())
    }

    fn apply_patch(
        &mut self,
        object: &serde_json::Map<String, serde_json::Value>,
        prefix: &str,
        patched: &mut Vec<String>,
    ) {
        for (name, entry) in object {
            let path = join_path(prefix, name);
            match self.controls.get_mut(name) {
                Some(Control::Field(field)) => {
                    field.set_value(json_to_value(entry));
                    patched.push(path);
                },
                Some(Control::Group(child)) => {
                    if let Some(inner) = entry.as_object() {
                        child.apply_patch(inner, &path, patched);
                    }
                },
                _ => {},
            }
        }
        self.revalidate();
    }

    /// Snapshot of the enabled descendants only, in serialization shape.
    #[must_use]
    pub fn value(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (name, control) in &self.controls {
            match control {
                Control::Field(field) if field.is_enabled() => {
                    object.insert(name.clone(), field.value().into());
                },
                Control::Group(group) if group.is_enabled() => {
                    object.insert(name.clone(), group.value());
                },
                Control::Collection(collection) => {
                    object.insert(name.clone(), collection.value());
                },
                _ => {},
            }
        }
        serde_json::Value::Object(object)
    }

    /// Recomputes this group's own validator errors against the current
    /// subtree. Field and child-group errors are owned by those nodes.
    pub fn revalidate(&mut self) {
        let validators = self.validators.clone();
        let errors = validators.iter().filter_map(|validator| validator(&*self)).collect();
        self.errors = errors;
    }

    /// Valid iff all enabled children are valid and all group-level
    /// validators pass. Disabled children are excluded from aggregation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
            && self.controls.values().all(|control| match control {
                Control::Field(field) => !field.is_enabled() || field.is_valid(),
                Control::Group(group) => !group.is_enabled() || group.is_valid(),
                Control::Collection(collection) => collection.is_valid(),
            })
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Toggles this subtree's enabled flag, removing or restoring it from
    /// parent validity aggregation and serialization.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }
}

fn split_head(path: &str) -> (&str, Option<&str>) {
    path.split_once('.').map_or((path, None), |(head, tail)| (head, Some(tail)))
}

fn split_index<'a>(full: &str, path: &'a str) -> Result<(usize, Option<&'a str>), ControlError> {
    let (head, tail) = split_head(path);
    let index = head
        .parse::<usize>()
        .map_err(|_| ControlError::NotFound { path: full.to_owned() })?;
    Ok((index, tail))
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_owned() } else { format!("{prefix}.{name}") }
}

fn json_to_value(entry: &serde_json::Value) -> Value {
    match entry {
        serde_json::Value::Bool(flag) => Value::Bool(*flag),
        serde_json::Value::Number(number) => {
            number.as_f64().map_or(Value::Null, Value::Number)
        },
        serde_json::Value::String(text) => Value::Text(text.clone()),
        _ => Value::Null,
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("controls", &self.controls)
            .field("validators", &self.validators.len())
            .field("errors", &self.errors)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl fmt::Debug for GroupBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("controls", &self.controls)
            .field("validators", &self.validators.len())
            .finish()
    }
}
