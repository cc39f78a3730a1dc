//! Numerical building blocks shared by the engine: uniform meshes, piecewise-linear
//! interpolation, adaptive quadrature, and scalar root finding.

pub mod interpolation;
pub mod mesh;
pub mod quadrature;
pub mod roots;
