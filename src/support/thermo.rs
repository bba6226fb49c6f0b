//! Thermophysical property contracts for flue gas and water/steam.
//!
//! Boiler models never hard-code a property engine. They consume the
//! [`GasPropertyModel`] and [`WaterPropertyModel`] traits, which callers
//! implement on top of whatever engine they use. Implementations must behave
//! as pure functions of their inputs.
//!
//! The [`model`] module provides simple deterministic implementations that
//! satisfy both contracts.

mod composition;
mod error;
mod properties;
mod provider;

pub mod model;

pub use composition::{Component, Composition, CompositionError, Species};
pub use error::PropertyError;
pub use properties::{FilmProperties, GasProperties, WaterPhase, WaterProperties};
pub use provider::{GasPropertyModel, WaterPropertyModel};
