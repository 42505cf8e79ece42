use std::fmt;

use serde::{Deserialize, Serialize};

/// The canonical weather conditions the effect factory knows how to build.
/// External collaborators may hand the engine one of these directly, or a
/// free-text description resolved through [`WeatherCondition::from_description`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Rain,
    Snow,
    Sunny,
    Cloudy,
    Thunderstorm,
    Mist,
}

impl WeatherCondition {
    /// Resolve a free-text condition description by case-insensitive
    /// substring match. Priority order matters: "rainstorm" is rain, not a
    /// thunderstorm. Unrecognized descriptions fall back to sunny.
    pub fn from_description(description: &str) -> Self {
        let condition = description.to_lowercase();
        if condition.contains("rain") || condition.contains("drizzle") {
            WeatherCondition::Rain
        } else if condition.contains("snow") {
            WeatherCondition::Snow
        } else if condition.contains("clear") || condition.contains("sunny") {
            WeatherCondition::Sunny
        } else if condition.contains("cloud") {
            WeatherCondition::Cloudy
        } else if condition.contains("thunder") || condition.contains("storm") {
            WeatherCondition::Thunderstorm
        } else if condition.contains("mist")
            || condition.contains("fog")
            || condition.contains("haze")
        {
            WeatherCondition::Mist
        } else {
            WeatherCondition::Sunny
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Thunderstorm => "thunderstorm",
            WeatherCondition::Mist => "mist",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
