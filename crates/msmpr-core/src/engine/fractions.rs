use crate::core::models::distribution::{
    DensityFunctionSample, NumberFractions, SizePoint, VolumeFractions,
};
use crate::core::params::ConfigError;
use crate::core::utils::interpolation::LinearInterpolant;
use crate::core::utils::mesh;
use crate::engine::error::EngineError;
use crate::engine::moments::MomentCalculator;
use tracing::debug;

/// Converts between density-function, number-fraction and volume-fraction views
/// of a crystal size distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct FractionConverter {
    moments: MomentCalculator,
}

impl FractionConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bins a sampled density function onto a uniform mesh over its size range.
    ///
    /// The fraction at each bin midpoint is the mean of the interpolated density at
    /// the two bin edges, times `mesh_size`, divided by the order-0 moment of the
    /// sample.
    pub fn density_to_number_fraction(
        &self,
        sample: &DensityFunctionSample,
        mesh_size: f64,
    ) -> Result<NumberFractions, EngineError> {
        if !mesh_size.is_finite() || mesh_size <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "mesh_size",
                reason: format!("must be finite and > 0, got {}", mesh_size),
            }
            .into());
        }
        let curve = LinearInterpolant::new(sample.points()).ok_or_else(|| {
            EngineError::degenerate("number fraction conversion", "the density sample is empty")
        })?;
        let (first, last) = (sample.points()[0].size, sample.points()[sample.len() - 1].size);

        let normalization = self.moments.normalization(sample)?;
        if !normalization.is_finite() || normalization == 0.0 {
            return Err(EngineError::degenerate(
                "number fraction conversion",
                format!("normalization constant is {}", normalization),
            ));
        }

        let count = mesh::node_count(last - first, mesh_size);
        if count < 2 {
            return Err(EngineError::degenerate(
                "number fraction conversion",
                format!(
                    "mesh size {} um is wider than the sampled size range [{}, {}]",
                    mesh_size, first, last
                ),
            ));
        }
        if count > mesh::MAX_NODES {
            return Err(ConfigError::InvalidParameter {
                name: "mesh_size",
                reason: format!(
                    "{} um splits [{}, {}] into {} nodes (at most {} allowed)",
                    mesh_size,
                    first,
                    last,
                    count,
                    mesh::MAX_NODES
                ),
            }
            .into());
        }
        let nodes = mesh::linspace(first, last, count);
        let fractions: NumberFractions = nodes
            .windows(2)
            .map(|edge| {
                let midpoint = (edge[0] + edge[1]) / 2.0;
                let mean = (curve.evaluate(edge[0]) + curve.evaluate(edge[1])) / 2.0;
                SizePoint::new(midpoint, mean * mesh_size / normalization)
            })
            .collect();

        debug!(
            bins = fractions.len(),
            normalization,
            total = fractions.total(),
            "Binned density function into number fractions."
        );
        Ok(fractions)
    }

    /// `vf_i = L_i³·nf_i / Σ L_j³·nf_j`.
    pub fn number_to_volume_fraction(
        &self,
        fractions: &NumberFractions,
    ) -> Result<VolumeFractions, EngineError> {
        let total: f64 = fractions.points().iter().map(|p| p.size.powi(3) * p.value).sum();
        if !total.is_finite() || total == 0.0 {
            return Err(EngineError::degenerate(
                "volume fraction conversion",
                format!("total crystal volume is {}", total),
            ));
        }
        Ok(fractions
            .points()
            .iter()
            .map(|p| SizePoint::new(p.size, p.size.powi(3) * p.value / total))
            .collect())
    }

    /// `nf_i = (vf_i/L_i³) / Σ (vf_j/L_j³)`; any zero size is rejected.
    pub fn volume_to_number_fraction(
        &self,
        fractions: &VolumeFractions,
    ) -> Result<NumberFractions, EngineError> {
        if let Some(p) = fractions.points().iter().find(|p| p.size == 0.0) {
            return Err(EngineError::degenerate(
                "number fraction conversion",
                format!("size 0 with volume fraction {} cannot be divided by L^3", p.value),
            ));
        }
        let total: f64 = fractions.points().iter().map(|p| p.value / p.size.powi(3)).sum();
        if !total.is_finite() || total == 0.0 {
            return Err(EngineError::degenerate(
                "number fraction conversion",
                format!("total crystal count is {}", total),
            ));
        }
        Ok(fractions
            .points()
            .iter()
            .map(|p| SizePoint::new(p.size, p.value / p.size.powi(3) / total))
            .collect())
    }
}
