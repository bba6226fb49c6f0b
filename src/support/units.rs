//! Extensions to [`uom`].
//!
//! Boiler models report every physical value as a [`uom`] quantity. This module
//! adds the quantities that [`uom`] does not name directly.
//!
//! ```
//! use firetube_models::support::units::{SpecificEnthalpy, linear_heat_rate};
//! use uom::si::available_energy::kilojoule_per_kilogram;
//!
//! let h = SpecificEnthalpy::new::<kilojoule_per_kilogram>(762.6);
//! let q = linear_heat_rate(12_500.0);
//! assert!(h.value > 0.0 && q.value > 0.0);
//! ```

mod quantities;

pub use quantities::{
    LinearHeatRate, SpecificEnthalpy, SpecificGasConstant, SurfaceTension,
    linear_heat_rate, surface_tension,
};
