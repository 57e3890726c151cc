//! Error types for gameplay components

use thiserror::Error;

/// Component operation errors
///
/// Every variant is a local, recoverable refusal. Nothing here is fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    /// Handle no longer resolves (component removed)
    #[error("Component no longer exists")]
    StaleHandle,

    /// Activation requested on an active component
    #[error("Component is already active")]
    AlreadyActive,

    /// Deactivation requested on an inactive component
    #[error("Component is already inactive")]
    AlreadyInactive,

    /// Activation permission lacks `External`
    #[error("Component cannot be activated externally")]
    ExternalActivationDenied,

    /// Deactivation permission lacks `External`
    #[error("Component cannot be deactivated externally")]
    ExternalDeactivationDenied,

    /// Activation permission lacks `SelfInternal`
    #[error("Component cannot activate itself")]
    SelfActivationDenied,

    /// Deactivation permission lacks `SelfInternal`
    #[error("Component cannot deactivate itself")]
    SelfDeactivationDenied,

    /// Business rules or link state refuse activation
    #[error("Component currently cannot be activated")]
    ActivationRefused,

    /// Business rules or link state refuse deactivation
    #[error("Component currently cannot be deactivated")]
    DeactivationRefused,

    /// Operation needs the linked capability
    #[error("Component has no links")]
    NotLinked,

    /// No legal transfer over the requested link
    #[error("Transfer over link (order {order}, param {param_id}) is not possible")]
    TransferRefused { order: i32, param_id: i32 },

    /// No link qualifies for a transfer
    #[error("No active link to transfer over")]
    NoActiveLink,

    /// Links must connect two different components
    #[error("A component cannot link to itself")]
    SelfLink,

    /// Operation needs the internal state capability
    #[error("Component has no internal states")]
    NotStated,

    /// Requested state index is out of range
    #[error("Invalid state {index} (component has {count} states)")]
    InvalidState { index: usize, count: usize },

    /// No state with this name
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// State names must be unique
    #[error("Duplicate state: {0}")]
    DuplicateState(String),

    /// Operation needs the animation capability
    #[error("Component is not animated")]
    NotAnimated,

    /// Requested slider does not exist
    #[error("Unknown slider: {0}")]
    UnknownSlider(usize),

    /// Slider values must be finite
    #[error("Invalid value {value} for slider {id}")]
    InvalidSliderValue { id: usize, value: f32 },

    /// Component name not found while resolving a description
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// Invalid configuration
    #[error("Invalid component configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for component operations
pub type Result<T> = std::result::Result<T, ComponentError>;
