use crate::core::models::distribution::{Distribution, Quantity, SizePoint};
use crate::core::utils::interpolation::LinearInterpolant;
use crate::core::utils::quadrature::{self, QuadratureSettings};
use crate::engine::error::EngineError;
use tracing::warn;

/// Integrates `n(x)·x^order` over a sampled curve.
///
/// The curve is linearly interpolated between samples and the integral runs
/// from the first to the last sampled size, with one quadrature interval seeded
/// per sample segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentCalculator {
    settings: QuadratureSettings,
}

impl MomentCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moment(&self, points: &[SizePoint], order: f64) -> Result<f64, EngineError> {
        let curve = LinearInterpolant::new(points)
            .ok_or_else(|| EngineError::degenerate("moment calculation", "the sample is empty"))?;
        let result = quadrature::integrate(
            |x| curve.evaluate(x) * x.powf(order),
            &curve.breakpoints(),
            &self.settings,
        );
        if !result.converged {
            warn!(
                "Moment of order {} did not reach tolerance after {} subdivisions (error estimate {:e}).",
                order, result.subdivisions, result.error_estimate
            );
        }
        Ok(result.value)
    }

    pub fn moment_of<Q: Quantity>(
        &self,
        distribution: &Distribution<Q>,
        order: f64,
    ) -> Result<f64, EngineError> {
        self.moment(distribution.points(), order)
    }

    /// Area under the curve; the order-0 moment.
    pub fn normalization<Q: Quantity>(
        &self,
        distribution: &Distribution<Q>,
    ) -> Result<f64, EngineError> {
        self.moment_of(distribution, 0.0)
    }
}
