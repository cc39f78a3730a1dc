//! Provides input/output functionality for size-distribution tables and run reports.
//!
//! This module contains the delimited-text format used to persist sampled population
//! density functions and fraction tables, and the plain-text summary report written
//! at the end of a simulation. Both writers operate on in-memory values only, so a
//! caller can assemble every artifact before touching the filesystem.

pub mod report;
pub mod table;
