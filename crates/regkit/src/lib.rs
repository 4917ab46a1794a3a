//! Facade crate for the registration form engine.
//! Re-exports the control tree, domain types and the form controller.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `regkit` and call [`registration::CustomerForm::initialize`]
//!   from within a tokio runtime.
//! - Subscribe to change notifications through the controller, or inspect
//!   the tree with its accessor surface.

pub use regkit_controls as controls;
pub use regkit_domain as domain;
pub use regkit_events as events;
pub use regkit_registration as registration;

pub use regkit_registration::{CustomerForm, FormState, RegistrationError, ValueChanged};
