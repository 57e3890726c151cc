//! # gameplay_components - Gameplay Components
//!
//! Composable gameplay building blocks for a real-time 3D game:
//!
//! - **Activation**: every component is `Active` or `Inactive`, guarded by
//!   permission flags (`External`, `SelfInternal`) and hook vetoes
//! - **Links**: ordered input/output connections along which activation is
//!   handed over like a token
//! - **Conditions**: per-parameter switches gating individual links
//! - **Internal states**: a named state list with transfer-driven switching
//! - **Animation**: per-state clip bindings played through an
//!   [`AnimationDriver`], plus eased sliders
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              ComponentRegistry               │
//! │  HandleMap<GameplayComponent>                │
//! │  activate / deactivate / transfer / connect  │
//! └──────────────────────┬───────────────────────┘
//!                        │ owns
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │             GameplayComponent                │
//! │  lifecycle + Option<LinkSet>                 │
//! │            + Option<LinkCondition>           │
//! │            + Option<InternalStates>          │
//! │            + Option<AnimatedState>           │
//! │            + Vec<ComponentHook>              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gameplay_components::prelude::*;
//!
//! let mut registry = ComponentRegistry::new();
//! let lever = registry.insert(GameplayComponent::new("lever").linked());
//! let door = registry.insert(GameplayComponent::new("door").linked());
//! registry.connect(lever, door, 0, 0)?;
//!
//! registry.activate(lever)?;
//! // Deactivating the lever hands activation over to the door
//! registry.deactivate(lever)?;
//! assert!(registry.get(door).unwrap().is_active());
//! ```

pub mod activation;
pub mod animation;
pub mod component;
pub mod condition;
pub mod config;
pub mod error;
pub mod hooks;
pub mod link;
pub mod registry;
pub mod stated;

pub use activation::*;
pub use animation::*;
pub use component::*;
pub use condition::*;
pub use config::*;
pub use error::*;
pub use hooks::*;
pub use link::*;
pub use registry::*;
pub use stated::*;

pub mod prelude {
    //! Common imports for gameplay components
    pub use crate::activation::{ActivationFlags, ActivationState};
    pub use crate::animation::{
        AnimatedState, AnimationBinding, AnimationDriver, Slider, SliderDesc, TransitionMode,
    };
    pub use crate::component::{ComponentHandle, GameplayComponent};
    pub use crate::condition::{ConditionTable, LinkCondition};
    pub use crate::config::{AnimationDesc, ComponentDesc, LinkedDesc, StatesDesc};
    pub use crate::error::{ComponentError, Result};
    pub use crate::hooks::ComponentHook;
    pub use crate::link::{Link, LinkDesc, LinkSet, Peer};
    pub use crate::registry::ComponentRegistry;
    pub use crate::stated::{InternalState, InternalStates, StateSwitch, DEFAULT_STATE_NAME};
}
