//! Activation lifecycle and permission flags

use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use serde::{Deserialize, Serialize};

/// Two-state component lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivationState {
    /// Off (initial)
    #[default]
    Inactive,
    /// On
    Active,
}

impl ActivationState {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Who may turn a component on (or off)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationFlags(u8);

impl ActivationFlags {
    pub const NONE: Self = Self(0);
    /// Triggered by gameplay code owning the component
    pub const INTERNAL: Self = Self(1);
    /// Triggered through `activate` / `deactivate`
    pub const EXTERNAL: Self = Self(2);
    pub const INTERNAL_OR_EXTERNAL: Self = Self(3);
    /// The component may trigger itself
    pub const SELF_INTERNAL: Self = Self(128);

    const MASK: u8 = 0b1000_0011;

    /// Raw bits
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Check that every flag in `other` is set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ActivationFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ActivationFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for ActivationFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::INTERNAL) {
            names.push("Internal");
        }
        if self.contains(Self::EXTERNAL) {
            names.push("External");
        }
        if self.contains(Self::SELF_INTERNAL) {
            names.push("SelfInternal");
        }
        write!(f, "ActivationFlags({})", names.join(" | "))
    }
}
