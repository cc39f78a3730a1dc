use crate::core::models::distribution::{DensityFunctionSample, SizePoint};
use crate::core::params::ConfigError;
use crate::core::utils::mesh;
use crate::engine::config::SamplingConfig;
use crate::engine::error::EngineError;
use crate::engine::model::{Zone, ZoneProfile};
use crate::engine::state::SolvedModel;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Materializes the population density of a solved model on a size mesh.
///
/// Each zone is meshed on its own with `floor(width / mesh_size) + 1` evenly
/// spaced nodes including both ends, so the sizes `Lf` and `Lp` appear twice:
/// once closing one zone and once opening the next.
#[derive(Debug, Clone, Copy)]
pub struct DistributionSampler {
    config: SamplingConfig,
}

impl DistributionSampler {
    pub fn new(config: SamplingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Upper end of the sampled range, `cutoff_factor·G·τ`.
    pub fn cutoff(&self, solved: &SolvedModel) -> f64 {
        self.config.cutoff_factor * solved.growth_length()
    }

    fn too_many_nodes(&self, what: &str, nodes: usize) -> ConfigError {
        ConfigError::InvalidParameter {
            name: "mesh_size",
            reason: format!(
                "{} um leaves {} with {} size nodes (at most {} allowed)",
                self.config.mesh_size,
                what,
                nodes,
                mesh::MAX_NODES
            ),
        }
    }

    /// Samples all three zones and concatenates them in zone order.
    ///
    /// Fails before allocating if the whole sample would exceed [`mesh::MAX_NODES`].
    pub fn sample(&self, solved: &SolvedModel) -> Result<DensityFunctionSample, EngineError> {
        let cutoff = self.cutoff(solved);
        let product_cutoff = solved.params().product_cutoff;
        if cutoff < product_cutoff {
            warn!(
                "Sampling cutoff {} um lies below the classification size {} um; the {} zone is reduced to a single point.",
                cutoff,
                product_cutoff,
                Zone::Classification.label()
            );
        }

        let zones = solved.zones(cutoff);
        let total = zones
            .iter()
            .map(|zone| mesh::node_count(zone.end - zone.start, self.config.mesh_size))
            .fold(0usize, usize::saturating_add);
        if total > mesh::MAX_NODES {
            return Err(self.too_many_nodes("the density sample", total).into());
        }

        let growth_rate = solved.growth_rate();
        let residence_time = solved.params().residence_time;
        let pieces = zones
            .par_iter()
            .map(|zone| self.sample_zone(zone, growth_rate, residence_time))
            .collect::<Result<Vec<_>, _>>()?;

        let sample: DensityFunctionSample = pieces.into_iter().flatten().collect();
        debug!(
            points = sample.len(),
            cutoff, "Sampled population density function."
        );
        Ok(sample)
    }

    /// Samples one zone; a zone narrower than the mesh yields only its start point.
    pub fn sample_zone(
        &self,
        zone: &ZoneProfile,
        growth_rate: f64,
        residence_time: f64,
    ) -> Result<Vec<SizePoint>, ConfigError> {
        let width = zone.end - zone.start;
        let count = mesh::bounded_node_count(width, self.config.mesh_size).ok_or_else(|| {
            self.too_many_nodes(
                zone.zone.label(),
                mesh::node_count(width, self.config.mesh_size),
            )
        })?;
        debug!(
            zone = zone.zone.label(),
            start = zone.start,
            end = zone.end,
            nodes = count,
            "Sampling zone."
        );
        Ok(mesh::linspace(zone.start, zone.end, count)
            .into_iter()
            .map(|size| SizePoint::new(size, zone.density_at(size, growth_rate, residence_time)))
            .collect())
    }
}
