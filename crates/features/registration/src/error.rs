use regkit_controls::ControlError;

/// Operational failures of the registration controller.
///
/// Validation failures are never errors; they live in the controls' error
/// maps. These variants cover programming mistakes only (bad paths, bad
/// indices, malformed patches).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Control(#[from] ControlError),
}
