//! External control input bindings.

use serde::{Deserialize, Serialize};

/// Binding of a preset to one channel of an external control input (DMX, MIDI, OSC...).
///
/// Raw input values are rescaled through the `[lower_value, upper_value]` range. The range is
/// stored as given; an inverted range (`lower > upper`) is allowed and means an inverted mapping.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputSource {
    universe: u32,
    channel: u32,
    #[serde(default)]
    lower_value: u8,
    #[serde(default = "default_upper_value")]
    upper_value: u8,
}

fn default_upper_value() -> u8 {
    InputSource::DEFAULT_UPPER_VALUE
}

impl InputSource {
    /// Marker for "no universe assigned".
    pub const INVALID_UNIVERSE: u32 = u32::MAX;
    /// Marker for "no channel assigned".
    pub const INVALID_CHANNEL: u32 = u32::MAX;
    pub const DEFAULT_LOWER_VALUE: u8 = u8::MIN;
    pub const DEFAULT_UPPER_VALUE: u8 = u8::MAX;

    /// Create a binding with the full `0..=255` range.
    pub fn new(universe: u32, channel: u32) -> Self {
        Self {
            universe,
            channel,
            lower_value: Self::DEFAULT_LOWER_VALUE,
            upper_value: Self::DEFAULT_UPPER_VALUE,
        }
    }

    #[inline]
    pub fn universe(&self) -> u32 {
        self.universe
    }

    #[inline]
    pub fn channel(&self) -> u32 {
        self.channel
    }

    #[inline]
    pub fn lower_value(&self) -> u8 {
        self.lower_value
    }

    #[inline]
    pub fn upper_value(&self) -> u8 {
        self.upper_value
    }

    pub fn set_range(&mut self, lower_value: u8, upper_value: u8) {
        self.lower_value = lower_value;
        self.upper_value = upper_value;
    }

    /// Builder-style variant of [set_range](Self::set_range).
    #[inline]
    pub fn with_range(mut self, lower_value: u8, upper_value: u8) -> Self {
        self.set_range(lower_value, upper_value);
        self
    }

    /// Whether both the universe and the channel are assigned.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.universe != Self::INVALID_UNIVERSE && self.channel != Self::INVALID_CHANNEL
    }

    #[inline]
    pub fn has_default_range(&self) -> bool {
        self.lower_value == Self::DEFAULT_LOWER_VALUE && self.upper_value == Self::DEFAULT_UPPER_VALUE
    }
}
