//! Weather condition tags and free-text resolution

pub mod condition;

pub use condition::WeatherCondition;
