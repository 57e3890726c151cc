//! Directed links between components
//!
//! A link is owned by its source component and points at a peer through a
//! `ComponentHandle`. Traversal order is by `order`, not by position in the
//! owning list. The target is non-owning: a removed peer resolves to
//! [`Peer::Gone`].

use crate::component::ComponentHandle;
use serde::{Deserialize, Serialize};

/// Directed, ordered, parameterized edge to another component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    /// Peer component
    pub target: Option<ComponentHandle>,
    /// Traversal priority (lower first)
    pub order: i32,
    /// Semantic tag interpreted by the receiving side
    pub param_id: i32,
}

impl Link {
    /// The "no link" sentinel
    pub const EMPTY: Self = Self {
        target: None,
        order: -1,
        param_id: -1,
    };

    /// Create a link to `target`
    pub const fn new(target: ComponentHandle, order: i32, param_id: i32) -> Self {
        Self {
            target: Some(target),
            order,
            param_id,
        }
    }

    /// Link from an optional target: `None` gives the empty sentinel
    pub fn from_target(target: Option<ComponentHandle>) -> Self {
        match target {
            Some(target) => Self::new(target, 0, 0),
            None => Self::EMPTY,
        }
    }

    /// Sentinel check
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.order == -1 && self.param_id == -1
    }

    /// Same `order` and `param_id`, ignoring the target
    pub fn same_params(&self, other: &Link) -> bool {
        self.order == other.order && self.param_id == other.param_id
    }

    /// Check whether this link points at `handle`
    pub fn points_to(&self, handle: ComponentHandle) -> bool {
        self.target == Some(handle)
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Option<ComponentHandle>> for Link {
    fn from(target: Option<ComponentHandle>) -> Self {
        Self::from_target(target)
    }
}

/// What a link target resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    /// No target, or the target was removed
    Gone,
    /// Target without links: plain activate/deactivate
    Plain(ComponentHandle),
    /// Target with links: reciprocal-link transfer
    Linked(ComponentHandle),
}

impl Peer {
    /// Handle of a live peer
    pub fn handle(self) -> Option<ComponentHandle> {
        match self {
            Self::Gone => None,
            Self::Plain(h) | Self::Linked(h) => Some(h),
        }
    }
}

/// Serialized form of an output link, addressing the target by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDesc {
    /// Target component name
    pub target: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub param_id: i32,
}

/// Input and output links of a linked component
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSet {
    inputs: Vec<Link>,
    outputs: Vec<Link>,
    allow_linkless_activation: bool,
    allow_linkless_deactivation: bool,
}

impl Default for LinkSet {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            allow_linkless_activation: true,
            allow_linkless_deactivation: true,
        }
    }
}

impl LinkSet {
    /// Empty link set allowing linkless activation and deactivation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set linkless permissions
    pub fn with_linkless(mut self, activation: bool, deactivation: bool) -> Self {
        self.allow_linkless_activation = activation;
        self.allow_linkless_deactivation = deactivation;
        self
    }

    /// Input links in insertion order
    pub fn inputs(&self) -> &[Link] {
        &self.inputs
    }

    /// Output links in insertion order
    pub fn outputs(&self) -> &[Link] {
        &self.outputs
    }

    pub fn inputs_mut(&mut self) -> &mut Vec<Link> {
        &mut self.inputs
    }

    pub fn outputs_mut(&mut self) -> &mut Vec<Link> {
        &mut self.outputs
    }

    /// Inputs sorted by `order`; ties keep insertion order
    pub fn sorted_inputs(&self) -> Vec<Link> {
        let mut links = self.inputs.clone();
        links.sort_by_key(|l| l.order);
        links
    }

    /// Outputs sorted by `order`; ties keep insertion order
    pub fn sorted_outputs(&self) -> Vec<Link> {
        let mut links = self.outputs.clone();
        links.sort_by_key(|l| l.order);
        links
    }

    pub fn has_input_from(&self, other: ComponentHandle) -> bool {
        self.inputs.iter().any(|l| l.points_to(other))
    }

    pub fn has_output_to(&self, other: ComponentHandle) -> bool {
        self.outputs.iter().any(|l| l.points_to(other))
    }

    /// First input from `other`, or [`Link::EMPTY`]
    pub fn find_input_from(&self, other: ComponentHandle) -> Link {
        self.inputs
            .iter()
            .find(|l| l.points_to(other))
            .copied()
            .unwrap_or(Link::EMPTY)
    }

    /// First output to `other`, or [`Link::EMPTY`]
    pub fn find_output_to(&self, other: ComponentHandle) -> Link {
        self.outputs
            .iter()
            .find(|l| l.points_to(other))
            .copied()
            .unwrap_or(Link::EMPTY)
    }

    /// Add an output, replacing an existing one to the same target
    pub fn set_output(&mut self, link: Link) {
        match self.outputs.iter_mut().find(|l| l.target == link.target) {
            Some(existing) => *existing = link,
            None => self.outputs.push(link),
        }
    }

    /// Add an input, replacing an existing one from the same source
    pub fn set_input(&mut self, link: Link) {
        match self.inputs.iter_mut().find(|l| l.target == link.target) {
            Some(existing) => *existing = link,
            None => self.inputs.push(link),
        }
    }

    /// Drop every input from `other`. Returns whether anything was removed.
    pub fn remove_input_from(&mut self, other: ComponentHandle) -> bool {
        let before = self.inputs.len();
        self.inputs.retain(|l| !l.points_to(other));
        before != self.inputs.len()
    }

    /// Drop every output to `other`. Returns whether anything was removed.
    pub fn remove_output_to(&mut self, other: ComponentHandle) -> bool {
        let before = self.outputs.len();
        self.outputs.retain(|l| !l.points_to(other));
        before != self.outputs.len()
    }

    /// Remove all links
    pub fn clear(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }

    /// Linkless activation is allowed only with no inputs at all
    pub fn allows_linkless_activation(&self) -> bool {
        self.inputs.is_empty() && self.allow_linkless_activation
    }

    /// Linkless deactivation is allowed only with no outputs at all
    pub fn allows_linkless_deactivation(&self) -> bool {
        self.outputs.is_empty() && self.allow_linkless_deactivation
    }

    pub fn set_allow_linkless_activation(&mut self, allow: bool) {
        self.allow_linkless_activation = allow;
    }

    pub fn set_allow_linkless_deactivation(&mut self, allow: bool) {
        self.allow_linkless_deactivation = allow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(index: u32) -> ComponentHandle {
        ComponentHandle::new(index, 0)
    }

    #[test]
    fn test_empty_link() {
        assert!(Link::EMPTY.is_empty());
        assert!(Link::from_target(None).is_empty());
        assert!(Link::default().is_empty());
        assert!(!Link::from_target(Some(handle(0))).is_empty());
        assert!(!Link::new(handle(3), -1, -1).is_empty());
    }

    #[test]
    fn test_sorted_outputs_are_stable() {
        let mut set = LinkSet::new();
        set.outputs_mut().push(Link::new(handle(1), 5, 10));
        set.outputs_mut().push(Link::new(handle(2), 1, 20));
        set.outputs_mut().push(Link::new(handle(3), 5, 30));
        set.outputs_mut().push(Link::new(handle(4), 0, 40));

        let params: Vec<i32> = set.sorted_outputs().iter().map(|l| l.param_id).collect();
        assert_eq!(params, vec![40, 20, 10, 30]);
    }

    #[test]
    fn test_find_and_remove() {
        let mut set = LinkSet::new();
        set.set_input(Link::new(handle(1), 0, 7));
        set.set_input(Link::new(handle(1), 2, 9));

        assert_eq!(set.inputs().len(), 1);
        assert_eq!(set.find_input_from(handle(1)).param_id, 9);
        assert!(set.find_input_from(handle(2)).is_empty());
        assert!(set.find_output_to(handle(1)).is_empty());

        assert!(set.remove_input_from(handle(1)));
        assert!(!set.remove_input_from(handle(1)));
    }

    #[test]
    fn test_linkless_permissions() {
        let mut set = LinkSet::new();
        assert!(set.allows_linkless_activation());
        assert!(set.allows_linkless_deactivation());

        set.set_input(Link::new(handle(1), 0, 0));
        assert!(!set.allows_linkless_activation());
        assert!(set.allows_linkless_deactivation());

        let set = LinkSet::new().with_linkless(false, true);
        assert!(!set.allows_linkless_activation());
    }
}
