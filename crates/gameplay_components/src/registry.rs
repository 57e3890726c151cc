//! Component registry and the activation transfer protocol
//!
//! The registry owns every component in a [`HandleMap`]. Links hold
//! handles, so a removed component turns into [`Peer::Gone`] for everyone
//! pointing at it instead of dangling.
//!
//! # Transfer
//!
//! Activation moves along links like a token. Deactivating a linked
//! component hands activation to the first legal output peer (lowest
//! `order`); activating it pulls activation from the first legal input
//! peer. A hop between two linked components is only legal when both sides
//! list the link (an output on one side, the matching input on the other,
//! with the same `order` and `param_id`). Each hop checks every
//! precondition before mutating anything.

use crate::activation::ActivationFlags;
use crate::component::{ComponentHandle, GameplayComponent};
use crate::config::ComponentDesc;
use crate::error::{ComponentError, Result};
use crate::link::{Link, Peer};
use gameplay_core::{log_message, HandleMap, MessageKind};
use std::collections::{HashMap, HashSet};

/// Owner of all components
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HandleMap<GameplayComponent>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Ownership
    // ---------------------------------------------------------------------

    /// Take ownership of a component
    pub fn insert(&mut self, component: GameplayComponent) -> ComponentHandle {
        if component.is_animated() && !component.animation().is_some_and(|a| a.has_driver()) {
            log_message(
                component.name(),
                MessageKind::Warning,
                "no animation driver attached, animation runs degraded",
            );
        }
        log::debug!(target: gameplay_core::LOG_TARGET, "spawned component '{}'", component.name());
        self.components.insert(component)
    }

    /// Build and insert a component from its description (links ignored)
    pub fn spawn(&mut self, desc: &ComponentDesc) -> Result<ComponentHandle> {
        Ok(self.insert(desc.build()?))
    }

    /// Spawn several components and connect their described output links.
    ///
    /// Link targets are resolved by name among `descs`. Handles are returned
    /// in description order.
    pub fn spawn_graph(&mut self, descs: &[ComponentDesc]) -> Result<Vec<ComponentHandle>> {
        for desc in descs {
            desc.validate()?;
        }

        let mut names = HashSet::new();
        for desc in descs {
            if !names.insert(desc.name.as_str()) {
                return Err(ComponentError::InvalidConfig(format!(
                    "duplicate component name '{}'",
                    desc.name
                )));
            }
        }
        for desc in descs {
            for link in desc.linked.iter().flat_map(|l| &l.outputs) {
                if !names.contains(link.target.as_str()) {
                    return Err(ComponentError::UnknownComponent(link.target.clone()));
                }
            }
        }

        let mut handles = Vec::with_capacity(descs.len());
        let mut named = HashMap::new();
        for desc in descs {
            let handle = self.spawn(desc)?;
            named.insert(desc.name.as_str(), handle);
            handles.push(handle);
        }

        for (desc, &from) in descs.iter().zip(&handles) {
            for link in desc.linked.iter().flat_map(|l| &l.outputs) {
                let to = named[link.target.as_str()];
                self.connect(from, to, link.order, link.param_id)?;
            }
        }

        Ok(handles)
    }

    /// Remove a component. Links pointing at it resolve to `Peer::Gone`.
    pub fn remove(&mut self, handle: ComponentHandle) -> Option<GameplayComponent> {
        self.components.remove(handle)
    }

    pub fn get(&self, handle: ComponentHandle) -> Option<&GameplayComponent> {
        self.components.get(handle)
    }

    pub fn get_mut(&mut self, handle: ComponentHandle) -> Option<&mut GameplayComponent> {
        self.components.get_mut(handle)
    }

    /// Resolve or report a stale handle
    pub fn resolve(&self, handle: ComponentHandle) -> Result<&GameplayComponent> {
        self.components
            .resolve(handle)
            .map_err(|_| ComponentError::StaleHandle)
    }

    fn resolve_mut(&mut self, handle: ComponentHandle) -> Result<&mut GameplayComponent> {
        self.components
            .get_mut(handle)
            .ok_or(ComponentError::StaleHandle)
    }

    pub fn contains(&self, handle: ComponentHandle) -> bool {
        self.components.contains(handle)
    }

    /// First component called `name`
    pub fn find_by_name(&self, name: &str) -> Option<ComponentHandle> {
        self.components
            .iter()
            .find(|(_, c)| c.name() == name)
            .map(|(h, _)| h)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn handles(&self) -> Vec<ComponentHandle> {
        self.components.handles()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentHandle, &GameplayComponent)> {
        self.components.iter()
    }

    /// What a link target currently is
    pub fn peer(&self, link: &Link) -> Peer {
        let Some(target) = link.target else {
            return Peer::Gone;
        };
        match self.components.get(target) {
            None => Peer::Gone,
            Some(c) if c.is_linked() => Peer::Linked(target),
            Some(_) => Peer::Plain(target),
        }
    }

    // ---------------------------------------------------------------------
    // Link editing
    // ---------------------------------------------------------------------

    /// Add (or update) the output link `from -> to`.
    ///
    /// When `to` is linked, the reciprocal input link on `to` is created or
    /// updated with the same `order` and `param_id`.
    pub fn connect(
        &mut self,
        from: ComponentHandle,
        to: ComponentHandle,
        order: i32,
        param_id: i32,
    ) -> Result<()> {
        if from == to {
            return Err(ComponentError::SelfLink);
        }
        let (source, target) = self
            .components
            .get_pair_mut(from, to)
            .ok_or(ComponentError::StaleHandle)?;

        source
            .links_mut()
            .ok_or(ComponentError::NotLinked)?
            .set_output(Link::new(to, order, param_id));

        if let Some(links) = target.links_mut() {
            links.set_input(Link::new(from, order, param_id));
        }
        Ok(())
    }

    /// Remove every link between `from` and `to` in the `from -> to` direction
    pub fn disconnect(&mut self, from: ComponentHandle, to: ComponentHandle) -> Result<()> {
        self.resolve_mut(from)?
            .links_mut()
            .ok_or(ComponentError::NotLinked)?
            .remove_output_to(to);

        if let Some(links) = self.components.get_mut(to).and_then(|c| c.links_mut()) {
            links.remove_input_from(from);
        }
        Ok(())
    }

    /// Remove all links of `handle`, and the reciprocal links on its peers
    pub fn clear_links(&mut self, handle: ComponentHandle) -> Result<()> {
        let (inputs, outputs) = {
            let links = self.resolve(handle)?.links().ok_or(ComponentError::NotLinked)?;
            (links.inputs().to_vec(), links.outputs().to_vec())
        };

        for peer in outputs.iter().filter_map(|l| l.target) {
            if let Some(links) = self.components.get_mut(peer).and_then(|c| c.links_mut()) {
                links.remove_input_from(handle);
            }
        }
        for peer in inputs.iter().filter_map(|l| l.target) {
            if let Some(links) = self.components.get_mut(peer).and_then(|c| c.links_mut()) {
                links.remove_output_to(handle);
            }
        }
        if let Some(links) = self.resolve_mut(handle)?.links_mut() {
            links.clear();
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Connection queries
    // ---------------------------------------------------------------------

    pub fn has_input_from(&self, handle: ComponentHandle, other: ComponentHandle) -> bool {
        self.get(handle)
            .and_then(GameplayComponent::links)
            .is_some_and(|l| l.has_input_from(other))
    }

    pub fn has_output_to(&self, handle: ComponentHandle, other: ComponentHandle) -> bool {
        self.get(handle)
            .and_then(GameplayComponent::links)
            .is_some_and(|l| l.has_output_to(other))
    }

    /// Input of `handle` coming from `other`, or [`Link::EMPTY`]
    pub fn find_input_from(&self, handle: ComponentHandle, other: ComponentHandle) -> Link {
        self.get(handle)
            .and_then(GameplayComponent::links)
            .map_or(Link::EMPTY, |l| l.find_input_from(other))
    }

    /// Output of `handle` going to `other`, or [`Link::EMPTY`]
    pub fn find_output_to(&self, handle: ComponentHandle, other: ComponentHandle) -> Link {
        self.get(handle)
            .and_then(GameplayComponent::links)
            .map_or(Link::EMPTY, |l| l.find_output_to(other))
    }

    /// `handle` has an input from `other`, and `other`'s output to `handle`
    /// equals `output` and carries the same `order` and `param_id`
    pub fn has_matching_input(
        &self,
        handle: ComponentHandle,
        other: ComponentHandle,
        output: &Link,
    ) -> bool {
        let input = self.find_input_from(handle, other);
        if input.is_empty() {
            return false;
        }
        let other_output = self.find_output_to(other, handle);
        if other_output.is_empty() {
            return false;
        }
        other_output == *output && input.same_params(&other_output)
    }

    /// `handle` has an output to `other`, and `other`'s input from `handle`
    /// equals `input` and carries the same `order` and `param_id`
    pub fn has_matching_output(
        &self,
        handle: ComponentHandle,
        other: ComponentHandle,
        input: &Link,
    ) -> bool {
        let output = self.find_output_to(handle, other);
        if output.is_empty() {
            return false;
        }
        let other_input = self.find_input_from(other, handle);
        if other_input.is_empty() {
            return false;
        }
        other_input == *input && output.same_params(&other_input)
    }

    // ---------------------------------------------------------------------
    // Permission predicates
    // ---------------------------------------------------------------------

    fn can_turn_on(&self, handle: ComponentHandle) -> bool {
        self.get(handle).is_some_and(GameplayComponent::can_turn_on)
    }

    fn can_turn_off(&self, handle: ComponentHandle) -> bool {
        self.get(handle).is_some_and(GameplayComponent::can_turn_off)
    }

    /// Activation allowed by lifecycle, hooks and (for linked components)
    /// by an available inbound transfer or linkless activation
    pub fn can_activate(&self, handle: ComponentHandle) -> bool {
        let Some(c) = self.get(handle) else {
            return false;
        };
        if !(c.can_turn_on() && c.allows_activation()) {
            return false;
        }
        match c.links() {
            None => true,
            Some(links) => links.allows_linkless_activation() || self.can_transfer_in_any(handle),
        }
    }

    /// Symmetric to [`can_activate`](Self::can_activate)
    pub fn can_deactivate(&self, handle: ComponentHandle) -> bool {
        let Some(c) = self.get(handle) else {
            return false;
        };
        if !(c.can_turn_off() && c.allows_deactivation()) {
            return false;
        }
        match c.links() {
            None => true,
            Some(links) => links.allows_linkless_deactivation() || self.can_transfer_out_any(handle),
        }
    }

    /// `can_activate` and the `SelfInternal` activation flag
    pub fn can_self_activate(&self, handle: ComponentHandle) -> bool {
        self.get(handle)
            .is_some_and(|c| c.activation().contains(ActivationFlags::SELF_INTERNAL))
            && self.can_activate(handle)
    }

    /// `can_deactivate` and the `SelfInternal` deactivation flag
    pub fn can_self_deactivate(&self, handle: ComponentHandle) -> bool {
        self.get(handle)
            .is_some_and(|c| c.deactivation().contains(ActivationFlags::SELF_INTERNAL))
            && self.can_deactivate(handle)
    }

    /// Whether activation can leave `handle` over its output `link`
    pub fn can_transfer_out(&self, handle: ComponentHandle, link: &Link) -> bool {
        let Some(c) = self.get(handle) else {
            return false;
        };
        if !c.is_linked() || !c.can_turn_off() {
            return false;
        }
        let peer_ok = match self.peer(link) {
            Peer::Gone => false,
            Peer::Plain(t) => {
                self.get(t)
                    .is_some_and(|p| p.activation().contains(ActivationFlags::EXTERNAL))
                    && self.can_activate(t)
            }
            Peer::Linked(t) => self.has_matching_input(t, handle, link) && self.can_turn_on(t),
        };
        peer_ok && c.check_output_condition(link.param_id)
    }

    /// Whether activation can arrive at `handle` over its input `link`
    pub fn can_transfer_in(&self, handle: ComponentHandle, link: &Link) -> bool {
        let Some(c) = self.get(handle) else {
            return false;
        };
        if !c.is_linked() || !c.can_turn_on() {
            return false;
        }
        let peer_ok = match self.peer(link) {
            Peer::Gone => false,
            Peer::Plain(t) => {
                self.get(t)
                    .is_some_and(|p| p.deactivation().contains(ActivationFlags::EXTERNAL))
                    && self.can_deactivate(t)
            }
            Peer::Linked(t) => self.has_matching_output(t, handle, link) && self.can_turn_off(t),
        };
        peer_ok && c.check_input_condition(link.param_id)
    }

    /// Any output qualifies for a transfer
    pub fn can_transfer_out_any(&self, handle: ComponentHandle) -> bool {
        !self.find_active_outputs(handle).is_empty()
    }

    /// Any input qualifies for a transfer
    pub fn can_transfer_in_any(&self, handle: ComponentHandle) -> bool {
        !self.find_active_inputs(handle).is_empty()
    }

    /// Outputs a transfer may currently use, ascending by `order`
    /// (ties in insertion order)
    pub fn find_active_outputs(&self, handle: ComponentHandle) -> Vec<Link> {
        let Some(links) = self.get(handle).and_then(GameplayComponent::links) else {
            return Vec::new();
        };
        links
            .sorted_outputs()
            .into_iter()
            .filter(|link| match self.peer(link) {
                Peer::Gone => false,
                Peer::Plain(_) => self.can_transfer_out(handle, link),
                Peer::Linked(t) => {
                    let reciprocal = self.find_input_from(t, handle);
                    !reciprocal.is_empty()
                        && self.can_transfer_out(handle, link)
                        && self.can_transfer_in(t, &reciprocal)
                }
            })
            .collect()
    }

    /// Inputs a transfer may currently use, ascending by `order`
    /// (ties in insertion order)
    pub fn find_active_inputs(&self, handle: ComponentHandle) -> Vec<Link> {
        let Some(links) = self.get(handle).and_then(GameplayComponent::links) else {
            return Vec::new();
        };
        links
            .sorted_inputs()
            .into_iter()
            .filter(|link| match self.peer(link) {
                Peer::Gone => false,
                Peer::Plain(_) => self.can_transfer_in(handle, link),
                Peer::Linked(t) => {
                    let reciprocal = self.find_output_to(t, handle);
                    !reciprocal.is_empty()
                        && self.can_transfer_in(handle, link)
                        && self.can_transfer_out(t, &reciprocal)
                }
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Transfers
    // ---------------------------------------------------------------------

    /// Hand activation from `handle` to the peer of its output `link`
    pub fn transfer_out(&mut self, handle: ComponentHandle, link: &Link) -> Result<()> {
        if !self.can_transfer_out(handle, link) {
            return Err(ComponentError::TransferRefused {
                order: link.order,
                param_id: link.param_id,
            });
        }

        match self.peer(link) {
            Peer::Plain(target) => {
                let this = self.resolve_mut(handle)?;
                this.turn_off();
                this.on_transfer_out(link);
                self.activate(target)
            }
            Peer::Linked(target) => {
                let reciprocal = self.find_input_from(target, handle);
                let (this, peer) = self
                    .components
                    .get_pair_mut(handle, target)
                    .ok_or(ComponentError::StaleHandle)?;
                this.turn_off();
                this.on_transfer_out(link);
                peer.turn_on();
                peer.on_transfer_in(&reciprocal);
                log::debug!(
                    target: gameplay_core::LOG_TARGET,
                    "transfer '{}' -> '{}' (param {})",
                    this.name(),
                    peer.name(),
                    link.param_id
                );
                Ok(())
            }
            Peer::Gone => Err(ComponentError::StaleHandle),
        }
    }

    /// Pull activation into `handle` from the peer of its input `link`
    pub fn transfer_in(&mut self, handle: ComponentHandle, link: &Link) -> Result<()> {
        if !self.can_transfer_in(handle, link) {
            return Err(ComponentError::TransferRefused {
                order: link.order,
                param_id: link.param_id,
            });
        }

        match self.peer(link) {
            Peer::Plain(target) => {
                let this = self.resolve_mut(handle)?;
                this.turn_on();
                this.on_transfer_in(link);
                self.deactivate(target)
            }
            Peer::Linked(target) => {
                let reciprocal = self.find_output_to(target, handle);
                let (this, peer) = self
                    .components
                    .get_pair_mut(handle, target)
                    .ok_or(ComponentError::StaleHandle)?;
                this.turn_on();
                this.on_transfer_in(link);
                peer.turn_off();
                peer.on_transfer_out(&reciprocal);
                log::debug!(
                    target: gameplay_core::LOG_TARGET,
                    "transfer '{}' <- '{}' (param {})",
                    this.name(),
                    peer.name(),
                    link.param_id
                );
                Ok(())
            }
            Peer::Gone => Err(ComponentError::StaleHandle),
        }
    }

    /// Transfer out over the lowest-order active output
    pub fn transfer_out_first(&mut self, handle: ComponentHandle) -> Result<()> {
        let link = self
            .find_active_outputs(handle)
            .first()
            .copied()
            .ok_or(ComponentError::NoActiveLink)?;
        self.transfer_out(handle, &link)
    }

    /// Transfer in over the lowest-order active input
    pub fn transfer_in_first(&mut self, handle: ComponentHandle) -> Result<()> {
        let link = self
            .find_active_inputs(handle)
            .first()
            .copied()
            .ok_or(ComponentError::NoActiveLink)?;
        self.transfer_in(handle, &link)
    }

    // ---------------------------------------------------------------------
    // Entry points
    // ---------------------------------------------------------------------

    /// External activation. Requires the `External` activation flag.
    pub fn activate(&mut self, handle: ComponentHandle) -> Result<()> {
        let c = self.resolve(handle)?;
        if !c.activation().contains(ActivationFlags::EXTERNAL) {
            return self.refuse(handle, ComponentError::ExternalActivationDenied);
        }
        self.activate_internal(handle)
    }

    /// External deactivation. Requires the `External` deactivation flag.
    pub fn deactivate(&mut self, handle: ComponentHandle) -> Result<()> {
        let c = self.resolve(handle)?;
        if !c.deactivation().contains(ActivationFlags::EXTERNAL) {
            return self.refuse(handle, ComponentError::ExternalDeactivationDenied);
        }
        self.deactivate_internal(handle)
    }

    /// Self-triggered activation. Requires the `SelfInternal` activation flag.
    pub fn try_self_activate(&mut self, handle: ComponentHandle) -> Result<()> {
        let c = self.resolve(handle)?;
        if !c.activation().contains(ActivationFlags::SELF_INTERNAL) {
            return self.refuse(handle, ComponentError::SelfActivationDenied);
        }
        self.activate_internal(handle)
    }

    /// Self-triggered deactivation. Requires the `SelfInternal` deactivation flag.
    pub fn try_self_deactivate(&mut self, handle: ComponentHandle) -> Result<()> {
        let c = self.resolve(handle)?;
        if !c.deactivation().contains(ActivationFlags::SELF_INTERNAL) {
            return self.refuse(handle, ComponentError::SelfDeactivationDenied);
        }
        self.deactivate_internal(handle)
    }

    /// Turn on, pulling activation over an input when one is available
    fn activate_internal(&mut self, handle: ComponentHandle) -> Result<()> {
        let c = self.resolve(handle)?;
        if c.is_active() {
            return self.refuse(handle, ComponentError::AlreadyActive);
        }
        if !self.can_activate(handle) {
            return self.refuse(handle, ComponentError::ActivationRefused);
        }
        if self.can_transfer_in_any(handle) {
            return self.transfer_in_first(handle);
        }
        self.resolve_mut(handle)?.turn_on();
        Ok(())
    }

    /// Turn off, handing activation over an output when one is available
    fn deactivate_internal(&mut self, handle: ComponentHandle) -> Result<()> {
        let c = self.resolve(handle)?;
        if !c.is_active() {
            return self.refuse(handle, ComponentError::AlreadyInactive);
        }
        if !self.can_deactivate(handle) {
            return self.refuse(handle, ComponentError::DeactivationRefused);
        }
        if self.can_transfer_out_any(handle) {
            return self.transfer_out_first(handle);
        }
        self.resolve_mut(handle)?.turn_off();
        Ok(())
    }

    /// External state request
    pub fn go_to_state(&mut self, handle: ComponentHandle, state: usize) -> Result<()> {
        self.resolve_mut(handle)?.go_to_state(state)
    }

    /// External slider request
    pub fn set_slider_position(&mut self, handle: ComponentHandle, id: usize, value: f32) -> Result<()> {
        self.resolve_mut(handle)?.set_slider_position(id, value)
    }

    /// Per-frame tick for every component
    pub fn update(&mut self, dt: f32) {
        for (_, component) in self.components.iter_mut() {
            component.update(dt);
        }
    }

    fn refuse(&self, handle: ComponentHandle, error: ComponentError) -> Result<()> {
        match self.get(handle) {
            Some(c) => c.report(Err(error)),
            None => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationState;
    use crate::stated::InternalStates;

    fn linked(reg: &mut ComponentRegistry, name: &str) -> ComponentHandle {
        reg.insert(GameplayComponent::new(name).linked())
    }

    #[test]
    fn test_debug_lists_components() {
        let mut reg = ComponentRegistry::new();
        linked(&mut reg, "lever");
        reg.insert(GameplayComponent::new("lamp"));

        let dump = format!("{:?}", reg);
        assert!(dump.starts_with("ComponentRegistry"));
        assert!(dump.contains("\"lever\""));
        assert!(dump.contains("\"lamp\""));
    }

    #[test]
    fn test_activate_twice_fails() {
        let mut reg = ComponentRegistry::new();
        let c = reg.insert(GameplayComponent::new("switch"));

        assert!(reg.activate(c).is_ok());
        assert_eq!(reg.get(c).unwrap().state(), ActivationState::Active);
        assert_eq!(reg.activate(c), Err(ComponentError::AlreadyActive));
        assert_eq!(reg.get(c).unwrap().state(), ActivationState::Active);
    }

    #[test]
    fn test_external_only_cannot_self_activate() {
        let mut reg = ComponentRegistry::new();
        let c = reg.insert(GameplayComponent::new("door"));

        assert_eq!(reg.try_self_activate(c), Err(ComponentError::SelfActivationDenied));
        assert!(!reg.get(c).unwrap().is_active());
        assert!(reg.activate(c).is_ok());
    }

    #[test]
    fn test_self_only_cannot_be_activated_externally() {
        let mut reg = ComponentRegistry::new();
        let c = reg.insert(
            GameplayComponent::new("timer")
                .with_activation(ActivationFlags::SELF_INTERNAL)
                .with_deactivation(ActivationFlags::SELF_INTERNAL),
        );

        assert_eq!(reg.activate(c), Err(ComponentError::ExternalActivationDenied));
        assert!(reg.can_self_activate(c));
        assert!(reg.try_self_activate(c).is_ok());
        assert_eq!(reg.deactivate(c), Err(ComponentError::ExternalDeactivationDenied));
        assert!(reg.try_self_deactivate(c).is_ok());
        assert!(!reg.get(c).unwrap().is_active());
    }

    #[test]
    fn test_connect_creates_reciprocal_input() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = linked(&mut reg, "b");

        reg.connect(a, b, 3, 7).unwrap();
        assert!(reg.has_output_to(a, b));
        assert!(reg.has_input_from(b, a));
        assert_eq!(reg.find_input_from(b, a), Link::new(a, 3, 7));

        let l = reg.find_output_to(a, b);
        assert!(reg.has_matching_input(b, a, &l));
        let input = reg.find_input_from(b, a);
        assert!(reg.has_matching_output(a, b, &input));

        assert_eq!(reg.connect(a, a, 0, 0), Err(ComponentError::SelfLink));
    }

    #[test]
    fn test_changed_param_breaks_match() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = linked(&mut reg, "b");
        reg.connect(a, b, 0, 1).unwrap();

        let input = reg.find_input_from(b, a);
        assert!(reg.has_matching_output(a, b, &input));

        reg.get_mut(b).unwrap().links_mut().unwrap().inputs_mut()[0].param_id = 9;
        let mutated = reg.find_input_from(b, a);
        assert!(!reg.has_matching_output(a, b, &input));
        assert!(!reg.has_matching_output(a, b, &mutated));
    }

    #[test]
    fn test_disconnect_and_clear() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = linked(&mut reg, "b");
        let c = linked(&mut reg, "c");
        reg.connect(a, b, 0, 0).unwrap();
        reg.connect(c, a, 0, 0).unwrap();

        reg.disconnect(a, b).unwrap();
        assert!(!reg.has_output_to(a, b));
        assert!(!reg.has_input_from(b, a));

        reg.connect(a, b, 0, 0).unwrap();
        reg.clear_links(a).unwrap();
        assert!(!reg.has_input_from(b, a));
        assert!(!reg.has_output_to(c, a));
        assert!(reg.get(a).unwrap().links().unwrap().inputs().is_empty());
    }

    #[test]
    fn test_deactivate_transfers_to_linked_peer() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = linked(&mut reg, "b");
        reg.connect(a, b, 0, 0).unwrap();
        reg.get_mut(a).unwrap().turn_on();

        reg.deactivate(a).unwrap();
        assert!(!reg.get(a).unwrap().is_active());
        assert!(reg.get(b).unwrap().is_active());
    }

    #[test]
    fn test_transfer_refused_leaves_no_trace() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = linked(&mut reg, "b");
        reg.connect(a, b, 0, 0).unwrap();
        reg.get_mut(a).unwrap().turn_on();
        reg.get_mut(b).unwrap().turn_on();

        let link = reg.find_output_to(a, b);
        assert!(matches!(reg.transfer_out(a, &link), Err(ComponentError::TransferRefused { .. })));
        assert!(reg.get(a).unwrap().is_active());
        assert!(reg.get(b).unwrap().is_active());
    }

    #[test]
    fn test_removed_peer_is_gone() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = linked(&mut reg, "b");
        reg.connect(a, b, 0, 0).unwrap();
        reg.get_mut(a).unwrap().turn_on();

        let link = reg.find_output_to(a, b);
        reg.remove(b);
        assert_eq!(reg.peer(&link), Peer::Gone);
        assert!(!reg.can_transfer_out(a, &link));
        assert!(reg.find_active_outputs(a).is_empty());

        // Output list is not empty, so linkless deactivation is off too
        assert_eq!(reg.deactivate(a), Err(ComponentError::DeactivationRefused));
        assert_eq!(reg.activate(b), Err(ComponentError::StaleHandle));
    }

    #[test]
    fn test_transfer_in_switches_state() {
        let mut reg = ComponentRegistry::new();
        let a = linked(&mut reg, "a");
        let b = reg.insert(
            GameplayComponent::new("b")
                .linked()
                .with_states(
                    InternalStates::from_names(["Idle", "FromA"])
                        .unwrap()
                        .with_input_switch(4, 1),
                ),
        );
        reg.connect(a, b, 0, 4).unwrap();
        reg.get_mut(a).unwrap().turn_on();

        reg.deactivate(a).unwrap();
        assert_eq!(reg.get(b).unwrap().internal_state_name(), Some("FromA"));
    }
}
