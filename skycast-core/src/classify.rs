//! Display classifications derived from snapshot values.
//!
//! Every function here is total: tiers are compared from the top down with the
//! lower bound inclusive, and NaN falls through to the lowest tier.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HumidityLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl HumidityLevel {
    pub fn from_percent(humidity: f64) -> Self {
        if humidity >= 80.0 {
            Self::VeryHigh
        } else if humidity >= 60.0 {
            Self::High
        } else if humidity >= 40.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisibilityLevel {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl VisibilityLevel {
    pub fn from_km(visibility_km: f64) -> Self {
        if visibility_km >= 10.0 {
            Self::Excellent
        } else if visibility_km >= 5.0 {
            Self::Good
        } else if visibility_km >= 2.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

/// Six ordered temperature bands used for colouring readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TemperatureBand {
    BelowMinus10,
    Minus10To0,
    From1To10,
    From11To20,
    From21To30,
    Above30,
}

impl TemperatureBand {
    pub fn from_celsius(temp_c: f64) -> Self {
        if temp_c >= 31.0 {
            Self::Above30
        } else if temp_c >= 21.0 {
            Self::From21To30
        } else if temp_c >= 11.0 {
            Self::From11To20
        } else if temp_c >= 1.0 {
            Self::From1To10
        } else if temp_c >= -10.0 {
            Self::Minus10To0
        } else {
            Self::BelowMinus10
        }
    }

    /// Stable tag for themes and stylesheets.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Above30 => "temp-above-30",
            Self::From21To30 => "temp-21-to-30",
            Self::From11To20 => "temp-11-to-20",
            Self::From1To10 => "temp-1-to-10",
            Self::Minus10To0 => "temp-10-to-0",
            Self::BelowMinus10 => "temp-below-10",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    /// Upper bounds are inclusive here: 2 is still "Low", 3 is "Moderate".
    pub fn from_index(uv: f64) -> Self {
        if uv.is_nan() || uv <= 2.0 {
            Self::Low
        } else if uv <= 5.0 {
            Self::Moderate
        } else if uv <= 7.0 {
            Self::High
        } else if uv <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }
}

/// Broad sky category guessed from a condition description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionKind {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Wind,
    Other,
}

impl ConditionKind {
    /// Keyword match, first hit wins. "Partly cloudy" is checked before
    /// "cloudy" and rain before thunder, so "thunderstorm with rain" is rain.
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |needle: &str| text.contains(needle);

        if has("sunny") || has("clear") {
            Self::Clear
        } else if has("partly") {
            Self::PartlyCloudy
        } else if has("cloud") || has("overcast") {
            Self::Cloudy
        } else if has("rain") || has("drizzle") {
            Self::Rain
        } else if has("thunder") || has("storm") {
            Self::Thunderstorm
        } else if has("snow") {
            Self::Snow
        } else if has("fog") || has("mist") {
            Self::Fog
        } else if has("wind") {
            Self::Wind
        } else {
            Self::Other
        }
    }
}

/// Arrow pointing the way a compass label reads; unknown labels get "→".
pub fn wind_arrow(direction: &str) -> &'static str {
    match direction {
        "N" | "NNE" => "↑",
        "NE" | "ENE" => "↗",
        "E" | "ESE" => "→",
        "SE" | "SSE" => "↘",
        "S" | "SSW" => "↓",
        "SW" | "WSW" => "↙",
        "W" | "WNW" => "←",
        "NW" | "NNW" => "↖",
        _ => "→",
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(HumidityLevel, VisibilityLevel, UvLevel);
