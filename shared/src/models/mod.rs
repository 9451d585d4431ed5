//! Domain models for the drought and flood risk platform

mod forecast;
mod prediction;
mod sample;
mod trend;

pub use forecast::*;
pub use prediction::*;
pub use sample::*;
pub use trend::*;
