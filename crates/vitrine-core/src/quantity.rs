//! Quantity input clamping.

/// Fallback minimum when the input declares none.
pub const DEFAULT_MIN: i32 = 1;

/// Fallback maximum when the input declares none.
pub const DEFAULT_MAX: i32 = 999;

/// Inclusive bounds of a quantity input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        QuantityBounds {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl QuantityBounds {
    /// Builds bounds from the raw `min`/`max` attribute values of an
    /// input. Missing or unparseable attributes fall back to the defaults.
    pub fn from_attrs(min: Option<&str>, max: Option<&str>) -> Self {
        let parse = |attr: Option<&str>, fallback: i32| {
            attr.and_then(|raw| raw.trim().parse::<i32>().ok())
                .unwrap_or(fallback)
        };
        QuantityBounds {
            min: parse(min, DEFAULT_MIN),
            max: parse(max, DEFAULT_MAX),
        }
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Parses what the user typed, clamped into bounds. Non-numeric input
    /// lands on the minimum.
    pub fn parse_value(&self, raw: &str) -> i32 {
        let value = raw.trim().parse::<i32>().unwrap_or(self.min);
        self.clamp(value)
    }

    /// One stepper press. `delta` is typically `-1` or `1`.
    pub fn step(&self, current: i32, delta: i32) -> i32 {
        self.clamp(current.saturating_add(delta))
    }

    pub fn at_min(&self, value: i32) -> bool {
        value <= self.min
    }

    pub fn at_max(&self, value: i32) -> bool {
        value >= self.max
    }
}
