//! Thermal systems models.
//!
//! This module contains models for fired heat-transfer equipment, starting
//! with the three-pass fire-tube boiler.

pub mod boiler;
