//! Supporting utilities used by the boiler models.
//!
//! These modules are public because property providers and callers need them,
//! but their APIs are not yet stable.

pub mod constraint;
pub mod thermo;
pub mod units;
