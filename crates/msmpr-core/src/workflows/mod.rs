//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core) and
//! [`engine`](crate::engine) layers together.
//!
//! - **Simulation Workflow** ([`simulate`]) - Solve the operating point, sample the
//!   population density, derive number and volume fractions and persist them.

pub mod simulate;
