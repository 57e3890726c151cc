//! The composed gameplay component
//!
//! A `GameplayComponent` always has the activation lifecycle. The linked,
//! conditional, stated and animated layers are optional capabilities
//! plugged in with the `with_*` builders. Cross-component operations
//! (transfers, link editing) live on [`ComponentRegistry`], which owns
//! every component and resolves link handles.
//!
//! [`ComponentRegistry`]: crate::registry::ComponentRegistry

use crate::activation::{ActivationFlags, ActivationState};
use crate::animation::{AnimatedState, AnimationDriver, Slider};
use crate::condition::LinkCondition;
use crate::error::{ComponentError, Result};
use crate::hooks::ComponentHook;
use crate::link::{Link, LinkSet};
use crate::stated::InternalStates;
use gameplay_core::{log_message, Handle, MessageKind};
use std::fmt;

/// Handle to a component owned by a `ComponentRegistry`
pub type ComponentHandle = Handle<GameplayComponent>;

/// A gameplay component: lifecycle plus optional capabilities
pub struct GameplayComponent {
    name: String,
    state: ActivationState,
    activation: ActivationFlags,
    deactivation: ActivationFlags,
    links: Option<LinkSet>,
    condition: Option<Box<dyn LinkCondition>>,
    states: Option<InternalStates>,
    animation: Option<AnimatedState>,
    hooks: Vec<Box<dyn ComponentHook>>,
}

impl GameplayComponent {
    /// Plain, inactive component, activatable and deactivatable externally
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ActivationState::Inactive,
            activation: ActivationFlags::EXTERNAL,
            deactivation: ActivationFlags::EXTERNAL,
            links: None,
            condition: None,
            states: None,
            animation: None,
            hooks: Vec::new(),
        }
    }

    /// Set activation permissions
    pub fn with_activation(mut self, flags: ActivationFlags) -> Self {
        self.activation = flags;
        self
    }

    /// Set deactivation permissions
    pub fn with_deactivation(mut self, flags: ActivationFlags) -> Self {
        self.deactivation = flags;
        self
    }

    /// Add the linked capability
    pub fn with_links(mut self, links: LinkSet) -> Self {
        self.links = Some(links);
        self
    }

    /// Add the linked capability with default settings
    pub fn linked(self) -> Self {
        self.with_links(LinkSet::new())
    }

    /// Gate transfers with `condition`
    pub fn with_condition(mut self, condition: impl LinkCondition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Add the internal state capability
    pub fn with_states(mut self, states: InternalStates) -> Self {
        if let Some(animation) = self.animation.as_mut() {
            animation.sync_len(states.len());
        }
        self.states = Some(states);
        self
    }

    /// Add the animation capability. The binding table follows the state count.
    pub fn with_animation(mut self, mut animation: AnimatedState) -> Self {
        animation.sync_len(self.states.as_ref().map_or(1, InternalStates::len));
        self.animation = Some(animation);
        self
    }

    /// Append a hook
    pub fn with_hook(mut self, hook: impl ComponentHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Append a hook
    pub fn add_hook(&mut self, hook: Box<dyn ComponentHook>) {
        self.hooks.push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn activation(&self) -> ActivationFlags {
        self.activation
    }

    pub fn deactivation(&self) -> ActivationFlags {
        self.deactivation
    }

    pub fn set_activation(&mut self, flags: ActivationFlags) {
        self.activation = flags;
    }

    pub fn set_deactivation(&mut self, flags: ActivationFlags) {
        self.deactivation = flags;
    }

    /// Lifecycle allows turning on
    pub fn can_turn_on(&self) -> bool {
        self.state == ActivationState::Inactive
    }

    /// Lifecycle allows turning off
    pub fn can_turn_off(&self) -> bool {
        self.state == ActivationState::Active
    }

    /// Every hook agrees to activation
    pub fn allows_activation(&self) -> bool {
        self.hooks.iter().all(|h| h.allows_activation(self))
    }

    /// Every hook agrees to deactivation
    pub fn allows_deactivation(&self) -> bool {
        self.hooks.iter().all(|h| h.allows_deactivation(self))
    }

    /// Flip to `Active` and run activation hooks
    pub(crate) fn turn_on(&mut self) -> bool {
        if !self.can_turn_on() {
            return false;
        }
        self.state = ActivationState::Active;
        self.dispatch(|hook, component| hook.on_activate(component));
        true
    }

    /// Flip to `Inactive` and run deactivation hooks
    pub(crate) fn turn_off(&mut self) -> bool {
        if !self.can_turn_off() {
            return false;
        }
        self.state = ActivationState::Inactive;
        self.dispatch(|hook, component| hook.on_deactivate(component));
        true
    }

    /// Activation arrived over input `link`
    pub(crate) fn on_transfer_in(&mut self, link: &Link) {
        let target = self
            .states
            .as_ref()
            .and_then(|s| s.input_switch_for(link.param_id));
        if let Some(state) = target {
            self.switch_state_logged(state);
        }
        self.dispatch(|hook, component| hook.on_transfer_in(component, link));
    }

    /// Activation left over output `link`
    pub(crate) fn on_transfer_out(&mut self, link: &Link) {
        let target = self
            .states
            .as_ref()
            .and_then(|s| s.output_switch_for(link.param_id));
        if let Some(state) = target {
            self.switch_state_logged(state);
        }
        self.dispatch(|hook, component| hook.on_transfer_out(component, link));
    }

    // ---------------------------------------------------------------------
    // Links and conditions
    // ---------------------------------------------------------------------

    pub fn is_linked(&self) -> bool {
        self.links.is_some()
    }

    pub fn links(&self) -> Option<&LinkSet> {
        self.links.as_ref()
    }

    pub fn links_mut(&mut self) -> Option<&mut LinkSet> {
        self.links.as_mut()
    }

    pub fn set_condition(&mut self, condition: Box<dyn LinkCondition>) {
        self.condition = Some(condition);
    }

    /// Inbound gate for `param_id`; passes without a condition
    pub fn check_input_condition(&self, param_id: i32) -> bool {
        self.condition.as_ref().map_or(true, |c| c.check_input(param_id))
    }

    /// Outbound gate for `param_id`; passes without a condition
    pub fn check_output_condition(&self, param_id: i32) -> bool {
        self.condition.as_ref().map_or(true, |c| c.check_output(param_id))
    }

    // ---------------------------------------------------------------------
    // Internal states
    // ---------------------------------------------------------------------

    pub fn is_stated(&self) -> bool {
        self.states.is_some()
    }

    pub fn states(&self) -> Option<&InternalStates> {
        self.states.as_ref()
    }

    /// Current state index (`0` without the state capability)
    pub fn internal_state_id(&self) -> usize {
        self.states.as_ref().map_or(0, InternalStates::current_id)
    }

    pub fn internal_state_name(&self) -> Option<&str> {
        self.states.as_ref().map(InternalStates::current_name)
    }

    pub fn all_state_names(&self) -> Vec<String> {
        self.states.as_ref().map(InternalStates::names).unwrap_or_default()
    }

    pub fn can_go_to_state(&self, state: usize) -> bool {
        self.states.as_ref().is_some_and(|s| s.can_switch(state))
    }

    /// Switch internal state, play its animation and run switch hooks
    pub fn switch_state(&mut self, state: usize) -> Result<()> {
        self.states
            .as_mut()
            .ok_or(ComponentError::NotStated)?
            .switch(state)?;

        if let Some(animation) = self.animation.as_mut() {
            animation.play_state(state);
        }
        self.dispatch(|hook, component| hook.on_switch_state(component, state));
        Ok(())
    }

    /// External state request; failures are reported as warnings
    pub fn go_to_state(&mut self, state: usize) -> Result<()> {
        let result = self.switch_state(state);
        self.report(result)
    }

    /// External state request by name
    pub fn go_to_state_named(&mut self, name: &str) -> Result<()> {
        let index = self
            .states
            .as_ref()
            .ok_or(ComponentError::NotStated)
            .and_then(|s| {
                s.index_of(name)
                    .ok_or_else(|| ComponentError::UnknownState(name.to_string()))
            });
        match index {
            Ok(index) => self.go_to_state(index),
            Err(e) => self.report(Err(e)),
        }
    }

    /// Append a state; the animation table grows with it
    pub fn add_state(&mut self, name: impl Into<String>) -> Result<usize> {
        let states = self.states.as_mut().ok_or(ComponentError::NotStated)?;
        let index = states.add_state(name)?;
        let len = states.len();
        if let Some(animation) = self.animation.as_mut() {
            animation.sync_len(len);
        }
        Ok(index)
    }

    /// Reset to the single default state
    pub fn clear_states(&mut self) {
        if let Some(states) = self.states.as_mut() {
            states.clear_states();
            if let Some(animation) = self.animation.as_mut() {
                animation.sync_len(1);
            }
        }
    }

    fn switch_state_logged(&mut self, state: usize) {
        if let Err(e) = self.switch_state(state) {
            log_message(&self.name, MessageKind::Warning, e);
        }
    }

    // ---------------------------------------------------------------------
    // Animation
    // ---------------------------------------------------------------------

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&AnimatedState> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut AnimatedState> {
        self.animation.as_mut()
    }

    /// Attach the playback backend
    pub fn attach_animation_driver(&mut self, driver: Box<dyn AnimationDriver>) -> Result<()> {
        self.animation
            .as_mut()
            .ok_or(ComponentError::NotAnimated)?
            .attach_driver(driver);
        Ok(())
    }

    /// Normalized time of the current state's clip
    pub fn animation_time(&self) -> f32 {
        let state = self.internal_state_id();
        self.animation.as_ref().map_or(0.0, |a| a.animation_time(state))
    }

    /// Loops completed since the last state switch
    pub fn animation_extra_loops(&self) -> i32 {
        let state = self.internal_state_id();
        self.animation.as_ref().map_or(0, |a| a.extra_loops(state))
    }

    /// True once the current state plays `clip` and it has looped at least once
    pub fn is_animation_finished(&self, clip: &str) -> bool {
        let state = self.internal_state_id();
        self.animation.as_ref().is_some_and(|a| a.is_finished(state, clip))
    }

    pub fn slider(&self, id: usize) -> Option<&Slider> {
        self.animation.as_ref().and_then(|a| a.slider(id))
    }

    /// Jump a slider to `value`; failures are reported as warnings
    pub fn set_slider_position(&mut self, id: usize, value: f32) -> Result<()> {
        let result = match self.animation.as_mut() {
            Some(animation) => animation.set_slider_position(id, value),
            None => Err(ComponentError::NotAnimated),
        };
        self.report(result)
    }

    /// Ease a slider toward `value`
    pub fn set_slider_target(&mut self, id: usize, value: f32) -> Result<()> {
        self.animation
            .as_mut()
            .ok_or(ComponentError::NotAnimated)?
            .set_slider_target(id, value)
    }

    // ---------------------------------------------------------------------
    // Frame update
    // ---------------------------------------------------------------------

    /// Ease sliders, then run `perform` hooks
    pub fn update(&mut self, dt: f32) {
        if let Some(animation) = self.animation.as_mut() {
            animation.tick_sliders(dt);
        }
        self.dispatch(|hook, component| hook.perform(component, dt));
    }

    /// Log `Err` results as warnings and pass them through
    pub(crate) fn report(&self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            log_message(&self.name, MessageKind::Warning, e);
        }
        result
    }

    fn dispatch(&mut self, mut f: impl FnMut(&mut dyn ComponentHook, &mut GameplayComponent)) {
        if self.hooks.is_empty() {
            return;
        }
        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in hooks.iter_mut() {
            f(hook.as_mut(), self);
        }
        // Hooks added while dispatching go after the existing ones
        hooks.append(&mut self.hooks);
        self.hooks = hooks;
    }
}

impl fmt::Debug for GameplayComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameplayComponent")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("activation", &self.activation)
            .field("deactivation", &self.deactivation)
            .field("links", &self.links)
            .field("has_condition", &self.condition.is_some())
            .field("states", &self.states)
            .field("animation", &self.animation)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationBinding, SliderDesc};
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl ComponentHook for Recorder {
        fn on_activate(&mut self, component: &mut GameplayComponent) {
            self.0.lock().push(format!("activate {:?}", component.state()));
        }

        fn on_deactivate(&mut self, component: &mut GameplayComponent) {
            self.0.lock().push(format!("deactivate {:?}", component.state()));
        }

        fn on_switch_state(&mut self, component: &mut GameplayComponent, state: usize) {
            self.0.lock().push(format!("switch {} {:?}", state, component.internal_state_name()));
        }

        fn perform(&mut self, _component: &mut GameplayComponent, dt: f32) {
            self.0.lock().push(format!("perform {}", dt));
        }
    }

    struct Veto;

    impl ComponentHook for Veto {
        fn allows_activation(&self, _component: &GameplayComponent) -> bool {
            false
        }
    }

    #[test]
    fn test_defaults() {
        let c = GameplayComponent::new("door");
        assert_eq!(c.name(), "door");
        assert_eq!(c.state(), ActivationState::Inactive);
        assert_eq!(c.activation(), ActivationFlags::EXTERNAL);
        assert_eq!(c.deactivation(), ActivationFlags::EXTERNAL);
        assert!(!c.is_linked());
        assert!(!c.is_stated());
        assert_eq!(c.internal_state_id(), 0);
    }

    #[test]
    fn test_hooks_run_after_state_flip() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut c = GameplayComponent::new("lamp").with_hook(Recorder(log.clone()));

        assert!(c.turn_on());
        assert!(!c.turn_on());
        assert!(c.turn_off());

        assert_eq!(*log.lock(), vec!["activate Active", "deactivate Inactive"]);
    }

    #[test]
    fn test_hook_veto() {
        let c = GameplayComponent::new("safe").with_hook(Veto);
        assert!(!c.allows_activation());
        assert!(c.allows_deactivation());
    }

    #[test]
    fn test_switch_state_runs_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut c = GameplayComponent::new("gate")
            .with_states(InternalStates::from_names(["Closed", "Open"]).unwrap())
            .with_hook(Recorder(log.clone()));

        c.switch_state(1).unwrap();
        assert_eq!(c.internal_state_name(), Some("Open"));
        assert!(c.go_to_state(5).is_err());
        assert_eq!(c.internal_state_id(), 1);
        c.go_to_state_named("Closed").unwrap();
        assert_eq!(
            c.go_to_state_named("Ajar"),
            Err(ComponentError::UnknownState("Ajar".into()))
        );

        assert_eq!(*log.lock(), vec!["switch 1 Some(\"Open\")", "switch 0 Some(\"Closed\")"]);
    }

    #[test]
    fn test_plain_component_has_no_states() {
        let mut c = GameplayComponent::new("plain");
        assert_eq!(c.switch_state(0), Err(ComponentError::NotStated));
        assert!(!c.can_go_to_state(0));
        assert!(c.all_state_names().is_empty());
        assert_eq!(c.set_slider_position(0, 1.0), Err(ComponentError::NotAnimated));
    }

    #[test]
    fn test_animation_table_follows_states() {
        let mut c = GameplayComponent::new("npc")
            .with_states(InternalStates::new())
            .with_animation(AnimatedState::new(vec![AnimationBinding::new("idle", 0)]));

        assert_eq!(c.animation().unwrap().bindings().len(), 1);
        c.add_state("Walk").unwrap();
        c.add_state("Run").unwrap();
        assert_eq!(c.animation().unwrap().bindings().len(), 3);

        c.clear_states();
        assert_eq!(c.animation().unwrap().bindings().len(), 1);
        assert_eq!(c.all_state_names(), vec!["Default".to_string()]);
    }

    #[test]
    fn test_update_eases_sliders_then_performs() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut c = GameplayComponent::new("npc")
            .with_animation(AnimatedState::new(Vec::new()).with_slider(&SliderDesc::new("speed", 0.5)))
            .with_hook(Recorder(log.clone()));

        c.set_slider_target(0, 1.0).unwrap();
        c.update(0.5);

        assert!(c.slider(0).unwrap().position() > 0.0);
        assert_eq!(*log.lock(), vec!["perform 0.5"]);
    }
}
