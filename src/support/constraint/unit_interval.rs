use std::cmp::Ordering;

use super::{Constrained, Constraint, ConstraintError};

/// Marker for `f64` values in the closed interval `0 ≤ x ≤ 1`.
///
/// Vapour quality and mole fractions use this bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs a `Constrained<f64, UnitInterval>` if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] for `NaN`.
    pub fn new(value: f64) -> Result<Constrained<f64, UnitInterval>, ConstraintError> {
        Constrained::<f64, UnitInterval>::new(value)
    }

    /// Clamps `value` into `[0, 1]`, mapping `NaN` to an error.
    ///
    /// Property models use this to absorb round-off at the phase boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NotANumber`] if `value` is `NaN`.
    pub fn clamped(value: f64) -> Result<Constrained<f64, UnitInterval>, ConstraintError> {
        if value.is_nan() {
            return Err(ConstraintError::NotANumber);
        }
        Self::new(value.clamp(0.0, 1.0))
    }
}

impl Constraint<f64> for UnitInterval {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&0.0), value.partial_cmp(&1.0)) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn endpoints_are_inside() {
        assert_eq!(UnitInterval::new(0.0).unwrap().into_inner(), 0.0);
        assert_eq!(UnitInterval::new(1.0).unwrap().into_inner(), 1.0);
    }

    #[test]
    fn outside_values_are_rejected() {
        assert_eq!(
            UnitInterval::check(&-1e-12),
            Err(ConstraintError::BelowMinimum)
        );
        assert_eq!(
            UnitInterval::check(&(1.0 + 1e-12)),
            Err(ConstraintError::AboveMaximum)
        );
        assert_eq!(
            UnitInterval::check(&f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn clamped_absorbs_round_off() {
        let rounded = UnitInterval::clamped(1.0 + 1e-14).unwrap();
        assert_eq!(rounded.into_inner(), 1.0);
        assert_eq!(UnitInterval::clamped(-1e-14).unwrap().into_inner(), 0.0);
        assert!(UnitInterval::clamped(f64::NAN).is_err());
    }
}
