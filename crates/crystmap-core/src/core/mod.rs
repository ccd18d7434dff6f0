//! # Core Module
//!
//! The computational core of crystmap: data models for periodic density
//! grids and unit cells, binary decoders for the supported map formats, and
//! the supporting symmetry and statistics utilities.
//!
//! ## Organization
//!
//! - **Density representation** ([`models`]) - Periodic grid, unit cell, and the density-map façade
//! - **File decoding** ([`io`]) - CCP4/MRC and DSN6/BRIX binary layouts
//! - **Symmetry expansion** ([`symmetry`]) - Textual operator parsing into grid transforms
//! - **Summary statistics** ([`stats`]) - Single-pass mean/standard-deviation estimation

pub mod io;
pub mod models;
pub mod stats;
pub mod symmetry;
