//! # Density Models Module
//!
//! Fundamental data structures for representing a decoded electron-density
//! map.
//!
//! ## Key Components
//!
//! - [`cell`] - Triclinic unit cell with fractional/orthogonal coordinate transforms
//! - [`grid`] - Dense periodic scalar-field container with toroidal indexing
//! - [`map`] - The [`map::DensityMap`] façade owning a grid, a cell, and map statistics
//!
//! A [`map::DensityMap`] is produced by one of the decoders in
//! [`crate::core::io`] and is read-only afterwards; block extraction for
//! isosurfacing goes through [`map::DensityMap::extract_block`].

pub mod cell;
pub mod grid;
pub mod map;
