/// Temperatures at or above this get the "almost there" treatment.
pub const NEAR_MAX_TEMPERATURE: f32 = 90.0;

/// Coarse closeness bands for a temperature value. Thresholds match the
/// scoring oracle's 0-100 range; rendering (colors, emoji) is up to the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Exact,
    Blazing,
    Scorching,
    Hot,
    Warm,
    Mild,
    Cool,
    Breezy,
    Icy,
    Frozen,
}

impl TemperatureBand {
    pub fn of(temperature: f32) -> Self {
        match temperature {
            t if t >= 100.0 => Self::Exact,
            t if t >= NEAR_MAX_TEMPERATURE => Self::Blazing,
            t if t >= 75.0 => Self::Scorching,
            t if t >= 60.0 => Self::Hot,
            t if t >= 45.0 => Self::Warm,
            t if t >= 30.0 => Self::Mild,
            t if t >= 20.0 => Self::Cool,
            t if t >= 10.0 => Self::Breezy,
            t if t > 0.0 => Self::Icy,
            _ => Self::Frozen,
        }
    }
}

/// Formats a temperature the way the boards show it, one decimal.
pub fn format_temperature(temperature: f32) -> String {
    format!("{:.1}°C", temperature)
}
