//! Component configuration
//!
//! Plain-data descriptions of components, loadable from JSON. Links name
//! their targets; the registry resolves names to handles when spawning a
//! whole graph.

use crate::activation::ActivationFlags;
use crate::animation::{AnimatedState, AnimationBinding, SliderDesc};
use crate::component::GameplayComponent;
use crate::condition::ConditionTable;
use crate::error::{ComponentError, Result};
use crate::link::{LinkDesc, LinkSet};
use crate::stated::{InternalStates, StateSwitch};
use serde::{Deserialize, Serialize};

fn external() -> ActivationFlags {
    ActivationFlags::EXTERNAL
}

fn yes() -> bool {
    true
}

/// Linked capability settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedDesc {
    #[serde(default = "yes")]
    pub allow_linkless_activation: bool,
    #[serde(default = "yes")]
    pub allow_linkless_deactivation: bool,
    /// Output links; reciprocal inputs are created on the targets
    #[serde(default)]
    pub outputs: Vec<LinkDesc>,
    /// Per-`param_id` transfer gates
    #[serde(default)]
    pub conditions: Option<ConditionTable>,
}

impl Default for LinkedDesc {
    fn default() -> Self {
        Self {
            allow_linkless_activation: true,
            allow_linkless_deactivation: true,
            outputs: Vec::new(),
            conditions: None,
        }
    }
}

/// Internal state capability settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatesDesc {
    /// State names; index 0 is the default state
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub input_switch: Vec<StateSwitch>,
    #[serde(default)]
    pub output_switch: Vec<StateSwitch>,
    #[serde(default)]
    pub input_switch_to_default: bool,
    #[serde(default)]
    pub output_switch_to_default: bool,
}

/// Animation capability settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationDesc {
    /// One binding per state
    #[serde(default)]
    pub bindings: Vec<AnimationBinding>,
    #[serde(default)]
    pub sliders: Vec<SliderDesc>,
}

/// Full description of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDesc {
    pub name: String,
    #[serde(default = "external")]
    pub activation: ActivationFlags,
    #[serde(default = "external")]
    pub deactivation: ActivationFlags,
    /// Start active
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub linked: Option<LinkedDesc>,
    #[serde(default)]
    pub states: Option<StatesDesc>,
    #[serde(default)]
    pub animation: Option<AnimationDesc>,
}

impl ComponentDesc {
    /// Plain component description
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activation: ActivationFlags::EXTERNAL,
            deactivation: ActivationFlags::EXTERNAL,
            active: false,
            linked: None,
            states: None,
            animation: None,
        }
    }

    pub fn with_activation(mut self, activation: ActivationFlags, deactivation: ActivationFlags) -> Self {
        self.activation = activation;
        self.deactivation = deactivation;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_linked(mut self, linked: LinkedDesc) -> Self {
        self.linked = Some(linked);
        self
    }

    pub fn with_states(mut self, states: StatesDesc) -> Self {
        self.states = Some(states);
        self
    }

    pub fn with_animation(mut self, animation: AnimationDesc) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let desc: Self =
            serde_json::from_str(json).map_err(|e| ComponentError::InvalidConfig(e.to_string()))?;
        desc.validate()?;
        Ok(desc)
    }

    /// Parse a list of descriptions from JSON and validate each
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let descs: Vec<Self> =
            serde_json::from_str(json).map_err(|e| ComponentError::InvalidConfig(e.to_string()))?;
        for desc in &descs {
            desc.validate()?;
        }
        Ok(descs)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ComponentError::InvalidConfig(e.to_string()))
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ComponentError::InvalidConfig(msg));

        if self.name.is_empty() {
            return invalid("component name is empty".into());
        }

        let state_count = match &self.states {
            Some(states) => {
                let count = states.names.len().max(1);
                for (i, name) in states.names.iter().enumerate() {
                    if states.names[..i].contains(name) {
                        return invalid(format!("{}: duplicate state '{}'", self.name, name));
                    }
                }
                for switch in states.input_switch.iter().chain(&states.output_switch) {
                    if switch.state >= count {
                        return invalid(format!(
                            "{}: switch for param {} targets state {} of {}",
                            self.name, switch.param_id, switch.state, count
                        ));
                    }
                }
                count
            }
            None => 1,
        };

        if let Some(animation) = &self.animation {
            if animation.bindings.len() > state_count {
                return invalid(format!(
                    "{}: {} animation bindings for {} states",
                    self.name,
                    animation.bindings.len(),
                    state_count
                ));
            }
            for slider in &animation.sliders {
                if !(0.0..=1.0).contains(&slider.rate) {
                    return invalid(format!(
                        "{}: slider '{}' rate {} outside [0, 1]",
                        self.name, slider.name, slider.rate
                    ));
                }
            }
        }

        if let Some(linked) = &self.linked {
            if linked.outputs.iter().any(|l| l.target == self.name) {
                return invalid(format!("{}: links to itself", self.name));
            }
        }

        Ok(())
    }

    /// Build the component. Output links are not created here.
    pub fn build(&self) -> Result<GameplayComponent> {
        self.validate()?;

        let mut component = GameplayComponent::new(self.name.clone())
            .with_activation(self.activation)
            .with_deactivation(self.deactivation);

        if let Some(linked) = &self.linked {
            component = component.with_links(
                LinkSet::new().with_linkless(
                    linked.allow_linkless_activation,
                    linked.allow_linkless_deactivation,
                ),
            );
            if let Some(conditions) = &linked.conditions {
                component = component.with_condition(conditions.clone());
            }
        }

        if let Some(desc) = &self.states {
            let mut states = InternalStates::from_names(desc.names.iter().cloned())?
                .with_switch_to_default(desc.input_switch_to_default, desc.output_switch_to_default);
            for s in &desc.input_switch {
                states = states.with_input_switch(s.param_id, s.state);
            }
            for s in &desc.output_switch {
                states = states.with_output_switch(s.param_id, s.state);
            }
            component = component.with_states(states);
        }

        if let Some(desc) = &self.animation {
            let mut animation = AnimatedState::new(desc.bindings.clone());
            for slider in &desc.sliders {
                animation = animation.with_slider(slider);
            }
            component = component.with_animation(animation);
        }

        if self.active {
            component.turn_on();
        }

        Ok(component)
    }
}
