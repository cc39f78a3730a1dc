use crate::core::params::ConfigError;
use crate::core::utils::roots::{self, RootError};
use crate::engine::config::SolverConfig;
use crate::engine::error::EngineError;
use crate::engine::model::PopulationBalanceModel;
use std::cell::Cell;
use tracing::{debug, trace};

const BRACKET_GROWTH_FACTOR: f64 = 2.0;

/// A converged root must satisfy `|residual| <= RESIDUAL_FACTOR·relative_tolerance·MT`.
///
/// A bracket of relative width `tol` around the root leaves a residual of about
/// `(i + 3)·tol·MT`, since the suspension density scales as `G^(i+3)`.
pub const RESIDUAL_FACTOR: f64 = 100.0;

/// Floor of the accepted relative residual, for tolerances near machine precision.
const MIN_RELATIVE_RESIDUAL: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthRateSolution {
    pub growth_rate: f64,
    /// `slurry_concentration(G) − MT` at the returned growth rate.
    pub residual: f64,
    pub evaluations: usize,
}

/// Finds the growth rate at which the model reproduces the target slurry
/// concentration.
///
/// The root is bracketed by geometric expansion from the initial guess (every
/// trial stays positive) and then refined with Brent's method. Expansion steps
/// and Brent iterations share the configured iteration cap.
pub struct GrowthRateSolver<'a> {
    model: &'a PopulationBalanceModel,
    config: SolverConfig,
}

impl<'a> GrowthRateSolver<'a> {
    pub fn new(model: &'a PopulationBalanceModel, config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    /// Largest `|slurry_concentration(G) − MT|` accepted at the returned root.
    pub fn allowed_residual(&self) -> f64 {
        let relative = (RESIDUAL_FACTOR * self.config.relative_tolerance).max(MIN_RELATIVE_RESIDUAL);
        relative * self.model.params().slurry_concentration
    }

    pub fn solve(&self) -> Result<GrowthRateSolution, EngineError> {
        let evaluations = Cell::new(0usize);
        let residual = |g: f64| {
            evaluations.set(evaluations.get() + 1);
            let r = self.model.material_balance(g);
            trace!(growth_rate = g, residual = r, "Evaluated material balance.");
            r
        };
        let failed = |source: RootError| EngineError::SolverNonConvergence {
            evaluations: evaluations.get(),
            source,
        };

        let bracket = roots::expand_positive_bracket(
            residual,
            self.config.initial_guess,
            BRACKET_GROWTH_FACTOR,
            self.config.max_iterations,
        )
        .map_err(failed)?;
        debug!(
            lower = bracket.lower,
            upper = bracket.upper,
            steps = bracket.steps,
            "Bracketed growth rate."
        );

        let remaining = self.config.max_iterations.saturating_sub(bracket.steps);
        let root = roots::brent(residual, &bracket, self.config.relative_tolerance, remaining)
            .and_then(|root| roots::accept_residual(root, self.allowed_residual()))
            .map_err(failed)?;

        if !root.x.is_finite() || root.x <= 0.0 {
            return Err(EngineError::NonPhysicalGrowthRate {
                growth_rate: root.x,
            });
        }
        debug!(
            growth_rate = root.x,
            residual = root.residual,
            iterations = root.iterations,
            "Brent iteration converged."
        );

        Ok(GrowthRateSolution {
            growth_rate: root.x,
            residual: root.residual,
            evaluations: evaluations.get(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::tests::sample_params;

    fn model() -> PopulationBalanceModel {
        PopulationBalanceModel::new(sample_params()).unwrap()
    }

    #[test]
    fn converges_from_reference_guess() {
        let model = model();
        let solution = GrowthRateSolver::new(&model, SolverConfig::default())
            .unwrap()
            .solve()
            .unwrap();
        assert!((solution.growth_rate - 11.731_942_1).abs() < 1e-5);
        assert!(solution.residual.abs() < 1e-4);
        assert!(solution.evaluations > 0);
    }

    #[test]
    fn converges_from_distant_guesses() {
        let model = model();
        for guess in [0.01, 1.0, 500.0] {
            let config = SolverConfig {
                initial_guess: guess,
                ..SolverConfig::default()
            };
            let solution = GrowthRateSolver::new(&model, config).unwrap().solve().unwrap();
            assert!(
                (solution.growth_rate - 11.731_942_1).abs() < 1e-5,
                "guess {guess} gave {}",
                solution.growth_rate
            );
        }
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let model = model();
        let config = SolverConfig {
            max_iterations: 2,
            relative_tolerance: 1e-14,
            ..SolverConfig::default()
        };
        let result = GrowthRateSolver::new(&model, config).unwrap().solve();
        match result {
            Err(err @ EngineError::SolverNonConvergence { .. }) => {
                assert!(err.is_non_convergence());
            }
            other => panic!("expected non-convergence, got {:?}", other),
        }
    }

    #[test]
    fn returned_root_satisfies_mass_balance() {
        for (z, kr) in [(0.0, 1e12), (0.5, 1e6), (0.5, 1e4), (0.5, 1e2)] {
            let mut params = sample_params();
            params.classification_fraction = z;
            params.kr = kr;
            let model = PopulationBalanceModel::new(params).unwrap();
            let solver = GrowthRateSolver::new(&model, SolverConfig::default()).unwrap();
            let solution = solver.solve().unwrap();
            assert!(
                solution.residual.abs() <= solver.allowed_residual(),
                "z {z}, Kr {kr}: residual {}",
                solution.residual
            );
            let achieved = model.slurry_concentration(solution.growth_rate);
            assert!((achieved - 100.0).abs() / 100.0 < 1e-6, "z {z}, Kr {kr}: MT2 {achieved}");
        }
    }

    #[test]
    fn allowed_residual_scales_with_target() {
        let model = model();
        let solver = GrowthRateSolver::new(&model, SolverConfig::default()).unwrap();
        assert!((solver.allowed_residual() - 100.0 * 1e-8 * 100.0).abs() < 1e-15);

        let tight = SolverConfig {
            relative_tolerance: 1e-16,
            ..SolverConfig::default()
        };
        let solver = GrowthRateSolver::new(&model, tight).unwrap();
        assert!((solver.allowed_residual() - 1e-12 * 100.0).abs() < 1e-20);
    }

    #[test]
    fn rejects_non_positive_initial_guess() {
        let model = model();
        let config = SolverConfig {
            initial_guess: 0.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            GrowthRateSolver::new(&model, config),
            Err(ConfigError::InvalidParameter {
                name: "initial_guess",
                ..
            })
        ));
    }
}
