use crate::core::io::report::SummaryReport;
use crate::core::params::ParameterSet;
use crate::engine::model::{ZoneProfile, zone_profiles};

/// Population density at the start of each zone (1/µm⁴).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneConstants {
    /// `C1`, equal to the zero-size density `B/G`.
    pub fines_removal: f64,
    /// `C2`, density at the fines cutoff `Lf`.
    pub growth: f64,
    /// `C3`, density at the classification size `Lp`.
    pub classification: f64,
}

/// The steady operating point found by [`PopulationBalanceModel::solve`].
///
/// Produced once and never mutated; every downstream stage reads from it.
///
/// [`PopulationBalanceModel::solve`]: crate::engine::model::PopulationBalanceModel::solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedModel {
    params: ParameterSet,
    growth_rate: f64,
    nucleation_rate: f64,
    zone_constants: ZoneConstants,
    achieved_slurry_concentration: f64,
    evaluations: usize,
}

impl SolvedModel {
    pub(crate) fn new(
        params: ParameterSet,
        growth_rate: f64,
        nucleation_rate: f64,
        zone_constants: ZoneConstants,
        achieved_slurry_concentration: f64,
        evaluations: usize,
    ) -> Self {
        Self {
            params,
            growth_rate,
            nucleation_rate,
            zone_constants,
            achieved_slurry_concentration,
            evaluations,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Growth rate `G` (µm/min).
    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    /// Nucleation rate `B` (1/(µm³·min)).
    pub fn nucleation_rate(&self) -> f64 {
        self.nucleation_rate
    }

    /// Zero-size population density `n = B/G`.
    pub fn zero_size_density(&self) -> f64 {
        self.zone_constants.fines_removal
    }

    pub fn zone_constants(&self) -> ZoneConstants {
        self.zone_constants
    }

    /// Slurry concentration reproduced at the solved growth rate (`MT2`).
    pub fn achieved_slurry_concentration(&self) -> f64 {
        self.achieved_slurry_concentration
    }

    /// Residual evaluations spent by the root search.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Characteristic size `G·τ` (µm).
    pub fn growth_length(&self) -> f64 {
        self.growth_rate * self.params.residence_time
    }

    /// The three zone densities, with the last zone ending at `upper`.
    pub fn zones(&self, upper: f64) -> [ZoneProfile; 3] {
        zone_profiles(&self.params, &self.zone_constants, upper)
    }

    pub fn summary(&self) -> SummaryReport {
        SummaryReport {
            growth_rate: self.growth_rate,
            nucleation_rate: self.nucleation_rate,
            residence_time: self.params.residence_time,
            achieved_slurry_concentration: self.achieved_slurry_concentration,
        }
    }
}
