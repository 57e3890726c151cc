//! Animation bindings and sliders
//!
//! Each internal state is bound to one clip on one layer. Switching state
//! plays the bound clip through an [`AnimationDriver`] and records the
//! layer's normalized time, so later queries can tell how many extra loops
//! have played since the switch. Sliders are named float parameters eased
//! toward a target every frame and pushed to the driver.
//!
//! Without a driver the component runs degraded: playback calls do nothing
//! and every animation reports itself finished.

use crate::error::{ComponentError, Result};
use gameplay_math::Interval;
use serde::{Deserialize, Serialize};

/// Reference frame rate for slider easing
const SLIDER_REFERENCE_FPS: f32 = 60.0;

/// How a bound clip replaces the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransitionMode {
    /// Hard cut
    #[default]
    Switch,
    /// Crossfade over the binding's transition time
    Crossfade,
    /// Played as a hard cut
    Blend,
}

/// Clip played when a state becomes current
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationBinding {
    /// Clip name; empty means "play nothing"
    #[serde(default)]
    pub clip: String,
    #[serde(default)]
    pub layer: u32,
    #[serde(default)]
    pub mode: TransitionMode,
    /// Crossfade duration (normalized)
    #[serde(default)]
    pub transition_time: f32,
}

impl AnimationBinding {
    /// Hard-cut binding on `layer`
    pub fn new(clip: impl Into<String>, layer: u32) -> Self {
        Self {
            clip: clip.into(),
            layer,
            mode: TransitionMode::Switch,
            transition_time: 0.0,
        }
    }

    /// Set the transition
    pub fn with_transition(mut self, mode: TransitionMode, time: f32) -> Self {
        self.mode = mode;
        self.transition_time = time;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clip.is_empty()
    }
}

/// Playback backend provided by the host
pub trait AnimationDriver: Send {
    /// Start `clip` on `layer` at normalized `offset`
    fn play(&mut self, clip: &str, layer: u32, offset: f32);

    /// Crossfade to `clip` on `layer` over `blend`
    fn crossfade(&mut self, clip: &str, blend: f32, layer: u32);

    /// Normalized playback time of the current clip on `layer`.
    /// The integer part counts completed loops.
    fn normalized_time(&self, layer: u32) -> f32;

    /// Set a named float parameter
    fn set_float(&mut self, name: &str, value: f32);
}

/// Slider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderDesc {
    /// Driver parameter name
    pub name: String,
    /// Easing rate in `[0, 1]`
    #[serde(default = "default_slider_rate")]
    pub rate: f32,
    /// Starting position in `[0, 1]`
    #[serde(default)]
    pub initial: f32,
}

fn default_slider_rate() -> f32 {
    0.1
}

impl SliderDesc {
    pub fn new(name: impl Into<String>, rate: f32) -> Self {
        Self {
            name: name.into(),
            rate,
            initial: 0.0,
        }
    }
}

/// A continuous animation parameter eased toward a target
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    name: String,
    position: f32,
    target: f32,
    rate: f32,
}

impl Slider {
    /// Non-finite rates fall back to the default rate, non-finite starts to `0`
    pub fn new(desc: &SliderDesc) -> Self {
        let unit = Interval::unit();
        let initial = if desc.initial.is_finite() {
            unit.clamp_value(desc.initial)
        } else {
            0.0
        };
        let rate = if desc.rate.is_finite() { desc.rate } else { default_slider_rate() };
        Self {
            name: desc.name.clone(),
            position: initial,
            target: initial,
            rate: unit.clamp_value(rate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Jump straight to `value` (clamped to `[0, 1]`).
    ///
    /// Returns `false` and keeps the slider unchanged for NaN or infinity.
    pub fn set_position(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let value = Interval::unit().clamp_value(value);
        self.position = value;
        self.target = value;
        true
    }

    /// Ease toward `value` (clamped to `[0, 1]`) on later ticks.
    ///
    /// Returns `false` and keeps the target unchanged for NaN or infinity.
    pub fn set_target(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.target = Interval::unit().clamp_value(value);
        true
    }

    /// Advance toward the target.
    ///
    /// The fraction covered per tick is `1 - (1 - rate)^(dt * 60)`, so the
    /// approach is frame-rate independent, monotonic and never overshoots.
    pub fn tick(&mut self, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) || self.position == self.target {
            return;
        }
        let alpha = 1.0 - (1.0 - self.rate).powf(dt * SLIDER_REFERENCE_FPS);
        let next = self.position + (self.target - self.position) * alpha.clamp(0.0, 1.0);

        self.position = if self.target >= self.position {
            next.min(self.target)
        } else {
            next.max(self.target)
        };
    }
}

/// Animation capability of a component
pub struct AnimatedState {
    bindings: Vec<AnimationBinding>,
    sliders: Vec<Slider>,
    driver: Option<Box<dyn AnimationDriver>>,
    start_time: f32,
}

impl AnimatedState {
    /// Bindings indexed by state. Sliders start empty.
    pub fn new(bindings: Vec<AnimationBinding>) -> Self {
        Self {
            bindings,
            sliders: Vec::new(),
            driver: None,
            start_time: 0.0,
        }
    }

    pub fn with_slider(mut self, desc: &SliderDesc) -> Self {
        self.sliders.push(Slider::new(desc));
        self
    }

    pub fn with_driver(mut self, driver: Box<dyn AnimationDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Attach (or replace) the playback backend
    pub fn attach_driver(&mut self, driver: Box<dyn AnimationDriver>) {
        self.driver = Some(driver);
    }

    /// Detach the playback backend, entering degraded mode
    pub fn detach_driver(&mut self) -> Option<Box<dyn AnimationDriver>> {
        self.driver.take()
    }

    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    pub fn bindings(&self) -> &[AnimationBinding] {
        &self.bindings
    }

    /// Binding for `state`
    pub fn binding(&self, state: usize) -> Option<&AnimationBinding> {
        self.bindings.get(state)
    }

    /// Replace the binding for `state`, growing the table if needed
    pub fn set_binding(&mut self, state: usize, binding: AnimationBinding) {
        if state >= self.bindings.len() {
            self.bindings.resize_with(state + 1, AnimationBinding::default);
        }
        self.bindings[state] = binding;
    }

    /// Keep one binding per state
    pub fn sync_len(&mut self, states: usize) {
        self.bindings.resize_with(states, AnimationBinding::default);
    }

    /// Normalized time recorded at the last switch
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    /// Play the clip bound to `state`
    pub(crate) fn play_state(&mut self, state: usize) {
        let Some(binding) = self.bindings.get(state) else {
            return;
        };
        let Some(driver) = self.driver.as_mut() else {
            return;
        };

        self.start_time = driver.normalized_time(binding.layer);

        if binding.is_empty() {
            return;
        }

        match binding.mode {
            TransitionMode::Crossfade => {
                driver.crossfade(&binding.clip, binding.transition_time, binding.layer)
            }
            TransitionMode::Switch | TransitionMode::Blend => {
                driver.play(&binding.clip, binding.layer, 0.0)
            }
        }
    }

    /// Normalized time of the clip bound to `state`, `0` until it moves past
    /// the switch point. Degraded mode reports `start + 2`.
    pub fn animation_time(&self, state: usize) -> f32 {
        match (&self.driver, self.bindings.get(state)) {
            (Some(driver), Some(binding)) => {
                let t = driver.normalized_time(binding.layer);
                if t > self.start_time { t } else { 0.0 }
            }
            (Some(_), None) => 0.0,
            (None, _) => self.start_time + 2.0,
        }
    }

    /// Whole loops played since the last switch
    pub fn extra_loops(&self, state: usize) -> i32 {
        match (&self.driver, self.bindings.get(state)) {
            (Some(driver), Some(binding)) => {
                (driver.normalized_time(binding.layer) - self.start_time).floor() as i32
            }
            (Some(_), None) => 0,
            (None, _) => 2,
        }
    }

    /// True once `clip` is the clip bound to `state` and has looped at least once
    pub fn is_finished(&self, state: usize, clip: &str) -> bool {
        match self.bindings.get(state) {
            Some(binding) if !binding.is_empty() && binding.clip == clip => {
                self.extra_loops(state) >= 1
            }
            _ => false,
        }
    }

    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    pub fn slider(&self, id: usize) -> Option<&Slider> {
        self.sliders.get(id)
    }

    /// Add a slider, returning its id
    pub fn add_slider(&mut self, desc: &SliderDesc) -> usize {
        self.sliders.push(Slider::new(desc));
        self.sliders.len() - 1
    }

    /// Jump a slider and push the value immediately
    pub fn set_slider_position(&mut self, id: usize, value: f32) -> Result<()> {
        let slider = self
            .sliders
            .get_mut(id)
            .ok_or(ComponentError::UnknownSlider(id))?;
        if !slider.set_position(value) {
            return Err(ComponentError::InvalidSliderValue { id, value });
        }
        if let Some(driver) = self.driver.as_mut() {
            driver.set_float(&slider.name, slider.position);
        }
        Ok(())
    }

    /// Set the value a slider eases toward
    pub fn set_slider_target(&mut self, id: usize, value: f32) -> Result<()> {
        let slider = self
            .sliders
            .get_mut(id)
            .ok_or(ComponentError::UnknownSlider(id))?;
        if !slider.set_target(value) {
            return Err(ComponentError::InvalidSliderValue { id, value });
        }
        Ok(())
    }

    /// Ease every slider and push positions to the driver
    pub fn tick_sliders(&mut self, dt: f32) {
        for slider in &mut self.sliders {
            slider.tick(dt);
            if let Some(driver) = self.driver.as_mut() {
                driver.set_float(&slider.name, slider.position);
            }
        }
    }
}

impl std::fmt::Debug for AnimatedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedState")
            .field("bindings", &self.bindings)
            .field("sliders", &self.sliders)
            .field("has_driver", &self.driver.is_some())
            .field("start_time", &self.start_time)
            .finish()
    }
}
