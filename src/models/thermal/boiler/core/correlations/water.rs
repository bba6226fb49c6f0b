//! Water-side convection and flow boiling.
//!
//! Single-phase liquid and vapour use Sieder–Tate (laminar) or Gnielinski
//! (turbulent). Saturated flow uses a Gungor–Winterton superposition of
//! Cooper pool boiling and a liquid-only Dittus–Boelter film, blended linearly
//! into the single-phase values within 0.02 of either phase boundary.

use super::{FilmTransport, friction::LAMINAR_LIMIT};

/// Critical pressure of water, Pa.
const CRITICAL_PRESSURE: f64 = 22.064e6;

/// Molar mass of water, g/mol.
const MOLAR_MASS: f64 = 18.015_28;

const GRAVITY: f64 = 9.806_65;

/// Width of the quality band over which boiling blends into single phase.
const BLEND_BAND: f64 = 0.02;

/// Water-side flow passage in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WaterChannel {
    /// Mass flux `G = ṁ/A`, kg/(m²·s).
    pub(crate) mass_flux: f64,
    pub(crate) hydraulic_diameter: f64,
    /// Heated length used by the laminar entrance term.
    pub(crate) heated_length: f64,
}

/// Saturation data at the channel pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Saturation {
    pub(crate) liquid: FilmTransport,
    pub(crate) vapor: FilmTransport,
    pub(crate) latent_heat: f64,
    pub(crate) pressure: f64,
}

/// Local water regime seen by the wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Regime {
    Liquid,
    Boiling { quality: f64 },
    Vapor,
}

impl Regime {
    /// Whether the liquid wall-viscosity correction contributes.
    pub(crate) fn needs_wall_viscosity(&self) -> bool {
        match *self {
            Regime::Liquid => true,
            Regime::Boiling { quality } => quality < BLEND_BAND,
            Regime::Vapor => false,
        }
    }
}

/// Water-side coefficient, W/(m²·K).
///
/// `viscosity_ratio` is `μ_bulk/μ_wall` and only affects liquid films.
/// `heat_flux` is the magnitude of the water-side wall heat flux, W/m².
pub(crate) fn coefficient(
    regime: Regime,
    bulk: &FilmTransport,
    saturation: &Saturation,
    channel: &WaterChannel,
    heat_flux: f64,
    viscosity_ratio: f64,
) -> f64 {
    match regime {
        Regime::Liquid => single_phase(bulk, channel, viscosity_ratio),
        Regime::Vapor => single_phase(bulk, channel, 1.0),
        Regime::Boiling { quality } => {
            let boiling = gungor_winterton(quality, saturation, channel, heat_flux);
            if quality < BLEND_BAND {
                let w = quality / BLEND_BAND;
                let liquid = single_phase(&saturation.liquid, channel, viscosity_ratio);
                (1.0 - w) * liquid + w * boiling
            } else if quality > 1.0 - BLEND_BAND {
                let w = (quality - (1.0 - BLEND_BAND)) / BLEND_BAND;
                let vapor = single_phase(&saturation.vapor, channel, 1.0);
                (1.0 - w) * boiling + w * vapor
            } else {
                boiling
            }
        }
    }
}

/// Sieder–Tate laminar or Gnielinski turbulent single-phase coefficient.
pub(crate) fn single_phase(
    film: &FilmTransport,
    channel: &WaterChannel,
    viscosity_ratio: f64,
) -> f64 {
    let d = channel.hydraulic_diameter;
    let re = channel.mass_flux * d / film.viscosity;
    let pr = film.prandtl();

    let nusselt = if re < LAMINAR_LIMIT {
        let entrance = 1.86 * (re * pr * d / channel.heated_length).cbrt();
        entrance.max(3.66) * viscosity_ratio.powf(0.14)
    } else {
        let f = (0.79 * re.ln() - 1.64).powi(-2);
        let f8 = f / 8.0;
        let nu = f8 * (re - 1_000.0) * pr / (1.0 + 12.7 * f8.sqrt() * (pr.powf(2.0 / 3.0) - 1.0));
        nu * viscosity_ratio.powf(0.11)
    };

    nusselt * film.conductivity / d
}

/// Cooper pool-boiling coefficient at reduced pressure `p_r`.
pub(crate) fn cooper(reduced_pressure: f64, heat_flux: f64) -> f64 {
    let pr = reduced_pressure.clamp(1e-4, 0.99);
    55.0 * pr.powf(0.12) * (-pr.log10()).powf(-0.55) * MOLAR_MASS.powf(-0.5) * heat_flux.powf(0.67)
}

/// Gungor–Winterton flow boiling coefficient.
pub(crate) fn gungor_winterton(
    quality: f64,
    saturation: &Saturation,
    channel: &WaterChannel,
    heat_flux: f64,
) -> f64 {
    let x = quality.clamp(1e-6, 1.0 - 1e-6);
    let liquid = &saturation.liquid;
    let vapor = &saturation.vapor;
    let g = channel.mass_flux;
    let d = channel.hydraulic_diameter;

    let re_l = g * (1.0 - x) * d / liquid.viscosity;
    let h_l = 0.023 * re_l.powf(0.8) * liquid.prandtl().powf(0.4) * liquid.conductivity / d;

    let boiling_number = heat_flux / (g * saturation.latent_heat);
    let xtt = ((1.0 - x) / x).powf(0.9)
        * (vapor.density / liquid.density).sqrt()
        * (liquid.viscosity / vapor.viscosity).powf(0.1);

    let enhancement = 1.0 + 3_000.0 * boiling_number.powf(0.86) + 1.12 * xtt.powf(-0.75);

    // Froude corrections for stratified flow.
    let froude = g * g / (liquid.density * liquid.density * GRAVITY * d);
    let (e2, s2) = if froude < 0.05 {
        (froude.powf(0.1 - 2.0 * froude), froude.sqrt())
    } else {
        (1.0, 1.0)
    };

    let suppression = s2 / (1.0 + 1.15e-6 * e2 * re_l.powf(1.17));
    let nucleate = cooper(saturation.pressure / CRITICAL_PRESSURE, heat_flux);

    suppression * nucleate + enhancement * e2 * h_l
}
