//! HTTP handlers

mod forecast;
mod health;
mod prediction;
mod weather_data;

pub use forecast::*;
pub use health::*;
pub use prediction::*;
pub use weather_data::*;
