use thiserror::Error;

/// Failures surfaced as errors by the registry.
///
/// Anything `NotFound`- or `InvalidState`-shaped is reported through
/// `Option`/`bool` returns instead: a missing session or a rejected
/// submission is an expected outcome for a polling caller, not a fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Both sides must bring at least one combatant")]
    InvalidRoster,

    #[error("A participant cannot battle itself")]
    DuplicateParticipant,
}
