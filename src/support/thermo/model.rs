//! Property models implementing the provider contracts.

pub mod memoized;
pub mod perfect_flue_gas;
pub mod saturated_water;

pub(crate) mod ideal_gas_eos;

pub use memoized::Memoized;
pub use perfect_flue_gas::PerfectFlueGas;
pub use saturated_water::{SaturatedWater, SaturatedWaterParameters};
