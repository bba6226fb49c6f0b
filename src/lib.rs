//! # Fire-tube boiler models
//!
//! Axial thermal-hydraulic models of multi-stage fire-tube boilers for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Units, constraints and the property-provider contract used
//!   by the models.
//!
//! ## Property providers
//!
//! Models never compute fluid properties themselves. Callers pass a
//! [`support::thermo::GasPropertyModel`] for the flue gas and a
//! [`support::thermo::WaterPropertyModel`] for the shell-side water. The crate
//! ships simple constant-property providers in [`support::thermo::model`] for
//! estimates and tests.
//!
//! ## Logging
//!
//! Solvers emit [`tracing`] events: `debug` per stage and per shooting
//! iteration, `trace` for wall-temperature bracket scans and `warn` when
//! shooting runs out of iterations. Install any `tracing` subscriber to see
//! them.
//!
//! Note: Only utilities in [`support`] and the types re-exported from each
//! model module are part of the public API.

pub mod models;
pub mod support;
