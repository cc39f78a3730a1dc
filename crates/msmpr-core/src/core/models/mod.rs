//! # Core Models Module
//!
//! This module contains the data structures used to represent crystal size
//! distributions in their different discretized forms.
//!
//! ## Overview
//!
//! A crystal size distribution can be described as a sampled population density
//! function, as number fractions per size bin, or as volume fractions per size bin.
//! All three share the same shape, an ordered list of (size, value) pairs, but carry
//! different physical meaning. The [`distribution`] module encodes that meaning in
//! the type system so that conversions cannot be applied to the wrong representation.
//!
//! ## Key Components
//!
//! - [`distribution`] - Typed size-indexed tables (`Distribution<Q>`) and the quantity markers
//!
//! ## Usage
//!
//! ```
//! use msmpr::core::models::distribution::{NumberFractions, SizePoint};
//!
//! let table = NumberFractions::new(vec![SizePoint::new(0.5, 0.5), SizePoint::new(1.5, 0.5)]);
//! assert_eq!(table.name(), "number fraction");
//! assert!((table.total() - 1.0).abs() < 1e-12);
//! ```

pub mod distribution;
