//! # MSMPR Core Library
//!
//! Steady-state population balance for a continuous crystallizer with fines removal
//! and product classification. Given the crystallizer constants, the library solves
//! for the growth rate that reproduces the target slurry concentration and derives
//! the crystal size distribution as a sampled density function, number fractions
//! and volume fractions.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (typed size distributions,
//!   the `ParameterSet`), numeric utilities (root bracketing, Brent's method,
//!   adaptive Gauss–Kronrod quadrature, linear interpolation) and table I/O.
//!
//! - **[`engine`]: The Logic Core.** The analytic three-zone model, the growth-rate
//!   solver, the density sampler and the moment and fraction conversions. Solving
//!   yields an immutable `SolvedModel` that every later stage reads from.
//!
//! - **[`workflows`]: The Public API.** End-to-end runs that tie the layers together,
//!   report progress and persist results without leaving partial output behind.
//!
//! ## Example
//!
//! ```no_run
//! use msmpr::core::params::ParameterSet;
//! use msmpr::engine::config::SimulationConfigBuilder;
//! use msmpr::engine::progress::ProgressReporter;
//! use msmpr::workflows::simulate;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = ParameterSet::load(Path::new("setting.csv"))?;
//! let config = SimulationConfigBuilder::new()
//!     .initial_guess(10.0)
//!     .relative_tolerance(1e-8)
//!     .max_iterations(200)
//!     .mesh_size(1.0)
//!     .cutoff_factor(15.0)
//!     .build()?;
//!
//! let reporter = ProgressReporter::new();
//! let result = simulate::run(&params, &config, &reporter)?;
//! simulate::write_results(&result, Path::new("Result"), &reporter)?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
