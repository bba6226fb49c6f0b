//! Memoizing wrapper for property providers.
//!
//! Boiler solves call the property engines many times at identical states,
//! for example every wall-temperature iterate re-reads the bulk water state.
//! [`Memoized`] caches results keyed on the exact bit patterns of the inputs.
//!
//! The cache is invisible to callers: a hit returns exactly what the wrapped
//! provider returned for the same inputs. Errors are never cached.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{
        Composition, GasProperties, GasPropertyModel, PropertyError, Species, WaterProperties,
        WaterPropertyModel,
    },
    units::SpecificEnthalpy,
};

/// Default number of cached entries per property kind before the cache is reset.
const DEFAULT_CAPACITY: usize = 4_096;

type GasKey = (u64, u64, Vec<(Species, u64, u64)>);
type WaterKey = (u64, u64);

/// Caches results of a wrapped gas and/or water property provider.
#[derive(Debug)]
pub struct Memoized<P> {
    inner: P,
    capacity: usize,
    gas: Mutex<HashMap<GasKey, GasProperties>>,
    water: Mutex<HashMap<WaterKey, WaterProperties>>,
}

impl<P> Memoized<P> {
    /// Wraps `inner` with the default cache capacity.
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// Wraps `inner`, clearing each cache once it holds `capacity` entries.
    pub fn with_capacity(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            gas: Mutex::new(HashMap::new()),
            water: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the wrapped provider.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

fn composition_key(composition: &Composition) -> Vec<(Species, u64, u64)> {
    composition
        .components()
        .iter()
        .map(|c| {
            (
                c.species,
                c.mole_fraction.to_bits(),
                c.absorption_coefficient.value.to_bits(),
            )
        })
        .collect()
}

fn cached<K, V, E>(
    cache: &Mutex<HashMap<K, V>>,
    capacity: usize,
    key: K,
    compute: impl FnOnce() -> Result<V, E>,
) -> Result<V, E>
where
    K: std::hash::Hash + Eq,
    V: Copy,
{
    if let Some(hit) = cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(*hit);
    }

    let value = compute()?;

    let mut map = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if map.len() >= capacity {
        map.clear();
    }
    map.insert(key, value);
    Ok(value)
}

impl<P: GasPropertyModel> GasPropertyModel for Memoized<P> {
    fn gas_properties(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        composition: &Composition,
    ) -> Result<GasProperties, PropertyError> {
        let key = (
            temperature.get::<kelvin>().to_bits(),
            pressure.get::<pascal>().to_bits(),
            composition_key(composition),
        );
        cached(&self.gas, self.capacity, key, || {
            self.inner.gas_properties(temperature, pressure, composition)
        })
    }
}

impl<P: WaterPropertyModel> WaterPropertyModel for Memoized<P> {
    fn water_properties(
        &self,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<WaterProperties, PropertyError> {
        let key = (
            pressure.get::<pascal>().to_bits(),
            enthalpy.get::<joule_per_kilogram>().to_bits(),
        );
        cached(&self.water, self.capacity, key, || {
            self.inner.water_properties(pressure, enthalpy)
        })
    }
}
