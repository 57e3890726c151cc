//! Internal state machine of a component
//!
//! States are an ordered list of names. Index 0 is the default state and
//! the current index is always in range. Inbound and outbound transfers can
//! switch state through tables keyed by the link's `param_id`.

use crate::error::{ComponentError, Result};
use serde::{Deserialize, Serialize};

/// Name of the state every component starts with
pub const DEFAULT_STATE_NAME: &str = "Default";

/// A named internal state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InternalState {
    pub name: String,
}

impl InternalState {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for InternalState {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_NAME)
    }
}

/// Map a link `param_id` to a target state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSwitch {
    pub param_id: i32,
    pub state: usize,
}

impl StateSwitch {
    pub const fn new(param_id: i32, state: usize) -> Self {
        Self { param_id, state }
    }
}

/// Ordered states plus the current one and the transfer switch tables
#[derive(Debug, Clone, PartialEq)]
pub struct InternalStates {
    states: Vec<InternalState>,
    current: usize,
    input_switch: Vec<StateSwitch>,
    output_switch: Vec<StateSwitch>,
    input_switch_to_default: bool,
    output_switch_to_default: bool,
}

impl Default for InternalStates {
    fn default() -> Self {
        Self {
            states: vec![InternalState::default()],
            current: 0,
            input_switch: Vec::new(),
            output_switch: Vec::new(),
            input_switch_to_default: false,
            output_switch_to_default: false,
        }
    }
}

impl InternalStates {
    /// Just the default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from names. An empty list yields the default state alone.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut states: Vec<InternalState> = Vec::new();
        for name in names {
            let state = InternalState::new(name);
            if states.contains(&state) {
                return Err(ComponentError::DuplicateState(state.name));
            }
            states.push(state);
        }
        if states.is_empty() {
            states.push(InternalState::default());
        }
        Ok(Self {
            states,
            ..Self::default()
        })
    }

    /// Add an inbound switch entry
    pub fn with_input_switch(mut self, param_id: i32, state: usize) -> Self {
        self.input_switch.push(StateSwitch::new(param_id, state));
        self
    }

    /// Add an outbound switch entry
    pub fn with_output_switch(mut self, param_id: i32, state: usize) -> Self {
        self.output_switch.push(StateSwitch::new(param_id, state));
        self
    }

    /// Fall back to state 0 when no inbound/outbound entry matches
    pub fn with_switch_to_default(mut self, input: bool, output: bool) -> Self {
        self.input_switch_to_default = input;
        self.output_switch_to_default = output;
        self
    }

    /// Current state index
    pub fn current_id(&self) -> usize {
        self.current
    }

    /// Current state
    pub fn current(&self) -> &InternalState {
        &self.states[self.current]
    }

    pub fn current_name(&self) -> &str {
        &self.current().name
    }

    pub fn all(&self) -> &[InternalState] {
        &self.states
    }

    pub fn names(&self) -> Vec<String> {
        self.states.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true: there is always at least the default state
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Index of the state called `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }

    /// Check that `index` names a state
    pub fn can_switch(&self, index: usize) -> bool {
        index < self.states.len()
    }

    /// Make `index` current
    pub fn switch(&mut self, index: usize) -> Result<()> {
        if !self.can_switch(index) {
            return Err(ComponentError::InvalidState {
                index,
                count: self.states.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Append a state, returning its index
    pub fn add_state(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.index_of(&name).is_some() {
            return Err(ComponentError::DuplicateState(name));
        }
        self.states.push(InternalState::new(name));
        Ok(self.states.len() - 1)
    }

    /// Back to the single default state with empty switch tables
    pub fn clear_states(&mut self) {
        self.states = vec![InternalState::default()];
        self.current = 0;
        self.input_switch.clear();
        self.output_switch.clear();
    }

    /// State an inbound transfer over `param_id` switches to, if any
    pub fn input_switch_for(&self, param_id: i32) -> Option<usize> {
        Self::lookup(&self.input_switch, param_id, self.input_switch_to_default)
    }

    /// State an outbound transfer over `param_id` switches to, if any
    pub fn output_switch_for(&self, param_id: i32) -> Option<usize> {
        Self::lookup(&self.output_switch, param_id, self.output_switch_to_default)
    }

    pub fn input_switches(&self) -> &[StateSwitch] {
        &self.input_switch
    }

    pub fn output_switches(&self) -> &[StateSwitch] {
        &self.output_switch
    }

    fn lookup(table: &[StateSwitch], param_id: i32, to_default: bool) -> Option<usize> {
        table
            .iter()
            .find(|s| s.param_id == param_id)
            .map(|s| s.state)
            .or(if to_default { Some(0) } else { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let states = InternalStates::new();
        assert_eq!(states.len(), 1);
        assert_eq!(states.current_id(), 0);
        assert_eq!(states.current_name(), DEFAULT_STATE_NAME);

        let empty = InternalStates::from_names(Vec::<String>::new()).unwrap();
        assert_eq!(empty.names(), vec![DEFAULT_STATE_NAME.to_string()]);
    }

    #[test]
    fn test_switch_rejects_out_of_range() {
        let mut states = InternalStates::from_names(["Closed", "Open"]).unwrap();
        assert!(states.switch(1).is_ok());
        assert_eq!(states.current_name(), "Open");

        let err = states.switch(2).unwrap_err();
        assert_eq!(err, ComponentError::InvalidState { index: 2, count: 2 });
        assert_eq!(states.current_id(), 1);
    }

    #[test]
    fn test_add_and_clear() {
        let mut states = InternalStates::new().with_input_switch(1, 0);
        assert_eq!(states.add_state("Walk").unwrap(), 1);
        assert!(matches!(states.add_state("Walk"), Err(ComponentError::DuplicateState(_))));
        assert_eq!(states.names(), vec!["Default".to_string(), "Walk".to_string()]);

        states.switch(1).unwrap();
        states.clear_states();
        assert_eq!(states.len(), 1);
        assert_eq!(states.current_id(), 0);
        assert!(states.input_switches().is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        assert!(InternalStates::from_names(["A", "A"]).is_err());
    }

    #[test]
    fn test_switch_tables() {
        let states = InternalStates::from_names(["Idle", "Left", "Right"])
            .unwrap()
            .with_input_switch(10, 1)
            .with_input_switch(20, 2)
            .with_output_switch(10, 2);

        assert_eq!(states.input_switch_for(10), Some(1));
        assert_eq!(states.input_switch_for(20), Some(2));
        assert_eq!(states.input_switch_for(30), None);
        assert_eq!(states.output_switch_for(10), Some(2));

        let states = states.with_switch_to_default(true, false);
        assert_eq!(states.input_switch_for(30), Some(0));
        assert_eq!(states.output_switch_for(30), None);
    }
}
