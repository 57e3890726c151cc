//! Ordered extension hooks
//!
//! Behaviour layered on top of a component is expressed as a list of
//! `ComponentHook`s. Hooks run in insertion order after the component's
//! built-in handling of the same event (state flip, state switch, slider
//! easing). A hook receives the component it is attached to; hooks are
//! detached for the duration of the call, so a hook never sees itself in
//! `component`.

use crate::component::GameplayComponent;
use crate::link::Link;

/// Extension point for component events
#[allow(unused_variables)]
pub trait ComponentHook: Send {
    /// After the component turned on
    fn on_activate(&mut self, component: &mut GameplayComponent) {}

    /// After the component turned off
    fn on_deactivate(&mut self, component: &mut GameplayComponent) {}

    /// After activation arrived over `link` (an input link of `component`)
    fn on_transfer_in(&mut self, component: &mut GameplayComponent, link: &Link) {}

    /// After activation left over `link` (an output link of `component`)
    fn on_transfer_out(&mut self, component: &mut GameplayComponent, link: &Link) {}

    /// After `component` switched to internal state `state`
    fn on_switch_state(&mut self, component: &mut GameplayComponent, state: usize) {}

    /// Once per frame
    fn perform(&mut self, component: &mut GameplayComponent, dt: f32) {}

    /// Extra business rule for activation
    fn allows_activation(&self, component: &GameplayComponent) -> bool {
        true
    }

    /// Extra business rule for deactivation
    fn allows_deactivation(&self, component: &GameplayComponent) -> bool {
        true
    }
}
