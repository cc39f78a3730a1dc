//! # Engine Module
//!
//! The solving layer of the crate. It turns a validated [`ParameterSet`] into a
//! steady operating point and derives every distribution view from it.
//!
//! ## Architecture
//!
//! - **Model** ([`model`]) - Nucleation kinetics, the closed-form zone integrals and
//!   the slurry-concentration residual
//! - **Solver** ([`solver`]) - Bracketed Brent search for the growth rate
//! - **State** ([`state`]) - The immutable [`SolvedModel`](state::SolvedModel)
//! - **Sampling** ([`sampler`]) - Three-zone meshing of the population density
//! - **Moments and fractions** ([`moments`], [`fractions`]) - Quadrature over sampled
//!   curves and conversions between density, number and volume views
//! - **Configuration** ([`config`]) - Solver and sampling settings with a validating builder
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for front ends
//! - **Error Handling** ([`error`]) - [`EngineError`](error::EngineError)
//!
//! [`ParameterSet`]: crate::core::params::ParameterSet

pub mod config;
pub mod error;
pub mod fractions;
pub mod model;
pub mod moments;
pub mod progress;
pub mod sampler;
pub mod solver;
pub mod state;
