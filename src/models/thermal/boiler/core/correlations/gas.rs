//! Gas-side convection and radiation.

use uom::si::length::meter;

use crate::models::thermal::boiler::core::geometry::{StageGeometry, TubeArrangement};

use super::GasTransport;

/// Stefan–Boltzmann constant, W/(m²·K⁴).
const STEFAN_BOLTZMANN: f64 = 5.670_374_419e-8;

/// Fully developed laminar Nusselt number for a round duct at constant wall temperature.
const LAMINAR_NUSSELT: f64 = 3.66;

/// Reynolds number above which the turbulent power law applies unblended.
const TURBULENT_LIMIT: f64 = 10_000.0;

/// Nusselt correlation for one stage, resolved from its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GasNusselt {
    /// Dittus–Boelter with a laminar floor and transition blend.
    PowerLaw,
    /// Dittus–Boelter scaled by `1 + 3.5·D_h/(2·R_c)`.
    Curved { curvature_ratio: f64 },
    /// Zukauskas banded correlation for crossflow over a tube bank.
    Crossflow {
        arrangement: TubeArrangement,
        /// Transverse over longitudinal pitch.
        pitch_ratio: f64,
        rows: u32,
    },
}

impl GasNusselt {
    pub(crate) fn for_geometry(geometry: &StageGeometry) -> Self {
        match geometry {
            StageGeometry::TubePass(_) | StageGeometry::Economiser(_) => GasNusselt::PowerLaw,
            StageGeometry::ReversalChamber(c) => GasNusselt::Curved {
                curvature_ratio: geometry.hydraulic_diameter_m()
                    / (2.0 * c.curvature_radius.get::<meter>()),
            },
            StageGeometry::TubeBank(b) => GasNusselt::Crossflow {
                arrangement: b.arrangement,
                pitch_ratio: b.transverse_pitch.get::<meter>()
                    / b.longitudinal_pitch.get::<meter>(),
                rows: b.rows,
            },
        }
    }

    /// Nusselt number at Reynolds number `re` and Prandtl number `pr`.
    ///
    /// `gas_cooled` selects the Dittus–Boelter exponent: 0.3 when the gas is
    /// hotter than the wall, 0.4 otherwise.
    pub(crate) fn nusselt(&self, re: f64, pr: f64, gas_cooled: bool) -> f64 {
        match *self {
            GasNusselt::PowerLaw => duct(re, pr, gas_cooled),
            GasNusselt::Curved { curvature_ratio } => {
                duct(re, pr, gas_cooled) * (1.0 + 3.5 * curvature_ratio)
            }
            GasNusselt::Crossflow {
                arrangement,
                pitch_ratio,
                rows,
            } => zukauskas(arrangement, pitch_ratio, rows, re, pr),
        }
    }
}

fn dittus_boelter(re: f64, pr: f64, gas_cooled: bool) -> f64 {
    let n = if gas_cooled { 0.3 } else { 0.4 };
    0.023 * re.powf(0.8) * pr.powf(n)
}

/// Duct flow: laminar below 2300, power law above 10 000, linear in between.
fn duct(re: f64, pr: f64, gas_cooled: bool) -> f64 {
    if re < super::friction::LAMINAR_LIMIT {
        return LAMINAR_NUSSELT;
    }
    if re >= TURBULENT_LIMIT {
        return dittus_boelter(re, pr, gas_cooled);
    }
    let w = (re - super::friction::LAMINAR_LIMIT)
        / (TURBULENT_LIMIT - super::friction::LAMINAR_LIMIT);
    (1.0 - w) * LAMINAR_NUSSELT + w * dittus_boelter(TURBULENT_LIMIT, pr, gas_cooled)
}

/// `Nu = C₂·C·Re^m·Pr^0.36` on the gap-velocity Reynolds number.
fn zukauskas(arrangement: TubeArrangement, pitch_ratio: f64, rows: u32, re: f64, pr: f64) -> f64 {
    let (c, m) = match arrangement {
        TubeArrangement::Inline => match re {
            r if r < 100.0 => (0.80, 0.40),
            r if r < 1_000.0 => (0.51, 0.50),
            r if r < 2e5 => (0.27, 0.63),
            _ => (0.021, 0.84),
        },
        TubeArrangement::Staggered => match re {
            r if r < 100.0 => (0.90, 0.40),
            r if r < 1_000.0 => (0.51, 0.50),
            r if r < 2e5 && pitch_ratio < 2.0 => (0.35 * pitch_ratio.powf(0.2), 0.60),
            r if r < 2e5 => (0.40, 0.60),
            _ => (0.022, 0.84),
        },
    };
    row_correction(arrangement, rows) * c * re.powf(m) * pr.powf(0.36)
}

/// Correction for banks with fewer than 20 rows.
fn row_correction(arrangement: TubeArrangement, rows: u32) -> f64 {
    const ROWS: [u32; 9] = [1, 2, 3, 4, 5, 7, 10, 13, 16];
    const INLINE: [f64; 9] = [0.70, 0.80, 0.86, 0.90, 0.92, 0.95, 0.97, 0.98, 0.99];
    const STAGGERED: [f64; 9] = [0.64, 0.76, 0.84, 0.89, 0.92, 0.95, 0.97, 0.98, 0.99];

    if rows >= 20 {
        return 1.0;
    }
    let table = match arrangement {
        TubeArrangement::Inline => &INLINE,
        TubeArrangement::Staggered => &STAGGERED,
    };
    ROWS.iter()
        .zip(table)
        .rev()
        .find(|(n, _)| **n <= rows)
        .map_or(table[0], |(_, c)| *c)
}

/// Convective film on the gas side of the wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GasFilm {
    pub(crate) reynolds: f64,
    pub(crate) prandtl: f64,
    pub(crate) nusselt: f64,
    /// Convective coefficient, W/(m²·K).
    pub(crate) coefficient: f64,
}

/// Evaluates the gas film for mass flux `G = ṁ/A` over characteristic length `l`.
pub(crate) fn film(
    correlation: &GasNusselt,
    gas: &GasTransport,
    mass_flux: f64,
    length: f64,
    gas_cooled: bool,
) -> GasFilm {
    let reynolds = mass_flux * length / gas.viscosity;
    let prandtl = gas.prandtl();
    let nusselt = correlation.nusselt(reynolds, prandtl, gas_cooled);
    GasFilm {
        reynolds,
        prandtl,
        nusselt,
        coefficient: nusselt * gas.conductivity / length,
    }
}

/// Gray-gas emissivity `ε = 1 − exp(−κ·L)`.
pub(crate) fn emissivity(absorption_coefficient: f64, path_length: f64) -> f64 {
    1.0 - (-absorption_coefficient * path_length).exp()
}

/// Linearised radiative coefficient `4σ·ε·T_mean³`, with `T_mean` the film mean.
pub(crate) fn radiative_coefficient(emissivity: f64, t_gas: f64, t_wall: f64) -> f64 {
    let t_mean = 0.5 * (t_gas + t_wall);
    4.0 * STEFAN_BOLTZMANN * emissivity * t_mean.powi(3)
}
