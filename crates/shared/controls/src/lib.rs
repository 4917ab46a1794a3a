//! # Form Controls
//!
//! The structured model behind a form: a tree of [`Field`]s, [`Group`]s
//! and [`Collection`]s that binds user input to typed values, validates it
//! and serializes the enabled subset on demand.
//!
//! ## Design
//!
//! * Validation failures are **represented, never thrown**: each node
//!   carries an [`ErrorMap`] that is recomputed eagerly on every value or
//!   validator change. Operational failures (bad paths, bad indices,
//!   malformed patches) are [`ControlError`] results and leave the tree
//!   untouched.
//! * Cross-field checks are group-level validators with read access to the
//!   whole sub-tree, so a child never references its sibling directly.
//! * Disabled nodes carry a uniform `enabled` flag consulted by both the
//!   validity aggregation and the serialization routine.

mod collection;
mod error;
mod field;
mod group;
pub mod validate;
mod value;

pub use crate::collection::Collection;
pub use crate::error::{ControlError, ErrorDetail, ErrorKind, ErrorMap};
pub use crate::field::Field;
pub use crate::group::{Control, ControlRef, Group, GroupBuilder};
pub use crate::validate::{GroupValidator, Validator};
pub use crate::value::Value;
