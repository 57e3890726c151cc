//! Per-link gating predicates
//!
//! A linked component may carry a `LinkCondition`. Transfers over a link
//! additionally require the condition to pass for the link's `param_id`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gate evaluated before a transfer, keyed by link `param_id`
pub trait LinkCondition: Send {
    /// Gate inbound transfers
    fn check_input(&self, _param_id: i32) -> bool {
        true
    }

    /// Gate outbound transfers
    fn check_output(&self, _param_id: i32) -> bool {
        true
    }
}

/// Boolean flags per `param_id`; missing entries pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionTable {
    #[serde(default)]
    pub inputs: BTreeMap<i32, bool>,
    #[serde(default)]
    pub outputs: BTreeMap<i32, bool>,
}

impl ConditionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inbound flag for `param_id`
    pub fn with_input(mut self, param_id: i32, flag: bool) -> Self {
        self.inputs.insert(param_id, flag);
        self
    }

    /// Set the outbound flag for `param_id`
    pub fn with_output(mut self, param_id: i32, flag: bool) -> Self {
        self.outputs.insert(param_id, flag);
        self
    }

    pub fn set_input(&mut self, param_id: i32, flag: bool) {
        self.inputs.insert(param_id, flag);
    }

    pub fn set_output(&mut self, param_id: i32, flag: bool) {
        self.outputs.insert(param_id, flag);
    }
}

impl LinkCondition for ConditionTable {
    fn check_input(&self, param_id: i32) -> bool {
        self.inputs.get(&param_id).copied().unwrap_or(true)
    }

    fn check_output(&self, param_id: i32) -> bool {
        self.outputs.get(&param_id).copied().unwrap_or(true)
    }
}
