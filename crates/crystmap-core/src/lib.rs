//! # Crystmap Core Library
//!
//! A library for decoding crystallographic electron-density maps into a
//! periodic 3D scalar field and extracting localized sub-volumes for
//! downstream isosurface computation.
//!
//! ## Architecture
//!
//! - **[`core::models`]**: the data foundation — the periodic grid container
//!   ([`core::models::grid::PeriodicGrid`]), the triclinic unit cell with its
//!   fractional/orthogonal transforms ([`core::models::cell::UnitCell`]), and
//!   the [`core::models::map::DensityMap`] façade that ties a decoded grid,
//!   its cell, and its summary statistics together.
//!
//! - **[`core::io`]**: bit-exact decoders for the two supported on-disk
//!   layouts — CCP4/MRC mode 2 ([`core::io::ccp4`]) and brick-packed
//!   DSN6/BRIX ([`core::io::dsn6`]) — behind a common
//!   [`core::io::traits::DensityMapFile`] interface, with explicit format
//!   selection via [`core::io::MapFormat`].
//!
//! - **[`core::symmetry`]**: parsing of crystallographic symmetry-operator
//!   text records into affine grid transforms, used during CCP4 decoding to
//!   expand the stored asymmetric unit across the full cell.
//!
//! The engine is entirely synchronous and single-threaded: every decode and
//! extraction runs to completion before returning, fails fast with a typed
//! error, and never mutates the caller's input buffer.

pub mod core;
