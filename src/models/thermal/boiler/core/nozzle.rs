//! Pressure loss across a reversal chamber nozzle.

use uom::si::{
    area::square_meter,
    f64::{Length, Pressure},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
};

use crate::support::thermo::{Composition, GasPropertyModel};

use super::{
    error::{IntegrationFailureReason, MarchState, SolveError},
    geometry::Nozzle,
    stage::StageId,
};

/// Where a nozzle sits and what flows through it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NozzleFlow<'a> {
    pub(crate) stage: StageId,
    pub(crate) position: Length,
    pub(crate) mass_flow: f64,
    pub(crate) composition: &'a Composition,
}

/// Applies `Δp = K·½ρv²` with `v = ṁ/(ρ·A_nozzle)` and returns the loss.
///
/// Temperature and water enthalpy are unchanged.
///
/// # Errors
///
/// Returns [`SolveError::Property`] if the gas density cannot be evaluated,
/// or [`SolveError::IntegrationFailure`] if the loss would consume the whole
/// static pressure.
pub(crate) fn pressure_drop(
    nozzle: &Nozzle,
    gas_model: &impl GasPropertyModel,
    state: &MarchState,
    flow: &NozzleFlow<'_>,
) -> Result<Pressure, SolveError> {
    let density = gas_model
        .gas_properties(state.gas_temperature, state.gas_pressure, flow.composition)
        .map_err(|source| SolveError::Property {
            stage: flow.stage,
            position: flow.position,
            source,
        })?
        .density
        .get::<kilogram_per_cubic_meter>();

    let velocity = flow.mass_flow / (density * nozzle.area().get::<square_meter>());
    let drop = nozzle.loss_coefficient * 0.5 * density * velocity * velocity;
    let p = state.gas_pressure.get::<pascal>();

    if !(drop.is_finite() && drop < p) {
        return Err(SolveError::IntegrationFailure {
            stage: flow.stage,
            position: flow.position,
            reason: IntegrationFailureReason::NonPhysicalState {
                context: format!("nozzle loss {drop:.1} Pa exceeds static pressure {p:.1} Pa"),
            },
            last_state: *state,
        });
    }

    Ok(Pressure::new::<pascal>(drop))
}
