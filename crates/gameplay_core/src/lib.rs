//! # gameplay_core - Gameplay Core
//!
//! Small set of primitives shared by every gameplay layer:
//! - **Handles**: generational indices used as non-owning references between
//!   components, so a removed peer resolves to "gone" instead of dangling
//! - **Errors**: handle resolution failures
//! - **Messages**: the leveled Warning/Error/Notification sink, routed to `log`

pub mod error;
pub mod handle;
pub mod message;

pub use error::*;
pub use handle::*;
pub use message::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{HandleError, Result};
    pub use crate::handle::{Handle, HandleMap};
    pub use crate::message::{log_message, MessageKind, LOG_TARGET};
}
