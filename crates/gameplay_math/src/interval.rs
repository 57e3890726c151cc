//! Numeric interval classifier
//!
//! An `Interval` is built from two unordered bounds and classifies values
//! either as inside `[start, end]` (inner mode) or outside it (outer mode,
//! `x <= start` or `x >= end`). Each bound can independently be strict.
//! Floor detection uses an outer interval over contact angles; input
//! clamping and slider feeding use inner ones.

use core::fmt;

/// Range predicate with inner/outer mode and per-bound strictness
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    a: f32,
    b: f32,
    inner: bool,
    strict_a: bool,
    strict_b: bool,
}

impl Interval {
    /// Inner interval with inclusive bounds
    pub const fn new(a: f32, b: f32) -> Self {
        Self {
            a,
            b,
            inner: true,
            strict_a: false,
            strict_b: false,
        }
    }

    /// Outer interval with inclusive bounds
    pub const fn outer(a: f32, b: f32) -> Self {
        Self {
            a,
            b,
            inner: false,
            strict_a: false,
            strict_b: false,
        }
    }

    /// `[0; 1]`
    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Set strictness of the start and end bounds
    pub const fn with_strict(mut self, strict_start: bool, strict_end: bool) -> Self {
        self.strict_a = strict_start;
        self.strict_b = strict_end;
        self
    }

    /// Lower bound
    #[inline]
    pub fn start(&self) -> f32 {
        self.a.min(self.b)
    }

    /// Upper bound
    #[inline]
    pub fn end(&self) -> f32 {
        self.a.max(self.b)
    }

    #[inline]
    pub fn is_inner(&self) -> bool {
        self.inner
    }

    #[inline]
    pub fn is_strict_start(&self) -> bool {
        self.strict_a
    }

    #[inline]
    pub fn is_strict_end(&self) -> bool {
        self.strict_b
    }

    /// `end - start`
    #[inline]
    pub fn length(&self) -> f32 {
        self.end() - self.start()
    }

    fn above_start(&self, value: f32) -> bool {
        if self.strict_a { value > self.start() } else { value >= self.start() }
    }

    fn below_end(&self, value: f32) -> bool {
        if self.strict_b { value < self.end() } else { value <= self.end() }
    }

    fn at_or_below_start(&self, value: f32) -> bool {
        if self.strict_a { value < self.start() } else { value <= self.start() }
    }

    fn at_or_above_end(&self, value: f32) -> bool {
        if self.strict_b { value > self.end() } else { value >= self.end() }
    }

    /// Check whether `value` lies in the valid region
    pub fn check_value(&self, value: f32) -> bool {
        if self.inner {
            self.above_start(value) && self.below_end(value)
        } else {
            self.at_or_below_start(value) || self.at_or_above_end(value)
        }
    }

    /// Nearest value in the valid region.
    ///
    /// Strict bounds clamp to the closest representable value on the valid
    /// side. Values already valid are returned unchanged.
    pub fn clamp_value(&self, value: f32) -> f32 {
        if value.is_nan() || self.check_value(value) {
            return value;
        }

        let (start, end) = (self.start(), self.end());
        let lo = if self.strict_a { next_up(start) } else { start };
        let hi = if self.strict_b { next_down(end) } else { end };

        if self.inner {
            if value < lo {
                lo
            } else {
                hi
            }
        } else {
            // Inside the excluded band: snap to the nearer side
            let low_side = if self.strict_a { next_down(start) } else { start };
            let high_side = if self.strict_b { next_up(end) } else { end };
            if value - start <= end - value {
                low_side
            } else {
                high_side
            }
        }
    }

    /// Normalized position of `value` between start and end, clamped to `[0, 1]`.
    ///
    /// Degenerate intervals report `0`.
    pub fn percentage(&self, value: f32) -> f32 {
        let len = self.length();
        if len <= 0.0 {
            return 0.0;
        }
        ((value - self.start()) / len).clamp(0.0, 1.0)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::unit()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.strict_a { '(' } else { '[' };
        let close = if self.strict_b { ')' } else { ']' };

        if self.start() != self.end() {
            write!(f, "{}{};{}{}", open, self.start(), self.end(), close)
        } else {
            write!(f, "{}{}{}", open, self.start(), close)
        }
    }
}

fn next_up(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

fn next_down(x: f32) -> f32 {
    -next_up(-x)
}
