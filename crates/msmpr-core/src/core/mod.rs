//! # Core Module
//!
//! This module provides the fundamental building blocks of the crystallizer model:
//! the operating-point parameters, typed size-distribution tables, numerical
//! utilities, and file I/O.
//!
//! ## Overview
//!
//! Everything in `core` is stateless. Parameters are loaded once into an immutable
//! [`params::ParameterSet`], distributions are plain values tagged with their physical
//! quantity, and the numerical routines are free functions over closures or slices.
//!
//! ## Architecture
//!
//! - **Operating Point** ([`params`]) - Crystallizer constants, their validation, and settings-file loading
//! - **Distributions** ([`models`]) - Typed (size, value) tables for density and fraction representations
//! - **Numerics** ([`utils`]) - Meshes, linear interpolation, Gauss-Kronrod quadrature, Brent root finding
//! - **File I/O** ([`io`]) - Distribution tables and the summary report
//!
//! ## Scientific Foundation
//!
//! - **Population balance** for a continuous mixed-suspension, mixed-product-removal crystallizer
//! - **Power-law nucleation kinetics** coupled to a size-independent growth rate
//! - **Moment methods** relating the third moment of the population density to slurry mass

pub mod io;
pub mod models;
pub mod params;
pub mod utils;
