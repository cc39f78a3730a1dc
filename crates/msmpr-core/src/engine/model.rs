use crate::core::params::{ConfigError, ParameterSet};
use crate::engine::config::SolverConfig;
use crate::engine::error::EngineError;
use crate::engine::solver::GrowthRateSolver;
use crate::engine::state::{SolvedModel, ZoneConstants};
use tracing::{debug, info};

/// Upper size limit (µm) of the zone-3 mass integral.
pub const MASS_INTEGRATION_LIMIT: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// `[0, Lf]`, drained by the fines-removal loop.
    FinesRemoval,
    /// `[Lf, Lp]`, plain MSMPR growth.
    Growth,
    /// `[Lp, ∞)`, product classification.
    Classification,
}

impl Zone {
    pub fn label(self) -> &'static str {
        match self {
            Zone::FinesRemoval => "fines removal",
            Zone::Growth => "growth",
            Zone::Classification => "classification",
        }
    }
}

/// One exponential piece `n(L) = C·exp(−L·rate_factor/(G·τ))·weight` on `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneProfile {
    pub zone: Zone,
    pub start: f64,
    pub end: f64,
    pub density_constant: f64,
    /// Divides the residence time: `R`, `1` and `z` for zones 1 to 3.
    pub rate_factor: f64,
    pub weight: f64,
}

impl ZoneProfile {
    pub fn density_at(&self, size: f64, growth_rate: f64, residence_time: f64) -> f64 {
        self.density_constant * (-size * self.rate_factor / growth_rate / residence_time).exp()
            * self.weight
    }

    /// Weighted third moment of the zone, `∫ L³·n(L) dL` over `[start, end]`.
    pub fn third_moment(&self, growth_rate: f64, residence_time: f64) -> f64 {
        if self.weight == 0.0 {
            return 0.0;
        }
        let tau = residence_time / self.rate_factor;
        self.density_constant
            * PopulationBalanceModel::third_moment_between(growth_rate, tau, self.start, self.end)
            * self.weight
    }
}

/// Below this scaled size the tail sums are formed from the series of the lower
/// incomplete gamma function instead of `1 − tail`.
const SERIES_CROSSOVER: f64 = 4.0;

/// `exp(−u)·(1 + u + u²/2 + u³/6)`, the regularized upper incomplete gamma `Q(4, u)`.
fn gamma4_tail(u: f64) -> f64 {
    (-u).exp() * (1.0 + u * (1.0 + u * (0.5 + u / 6.0)))
}

/// Regularized lower incomplete gamma `P(4, u) = 1 − Q(4, u)`.
fn gamma4_head(u: f64) -> f64 {
    if u >= SERIES_CROSSOVER {
        return 1.0 - gamma4_tail(u);
    }
    // P(4, u) = exp(−u)·u⁴/4!·Σ u^n·4!/(n+4)!
    let (mut term, mut sum) = (1.0, 1.0);
    for n in 1..200 {
        term *= u / (n as f64 + 4.0);
        sum += term;
        if term <= sum * f64::EPSILON * 0.1 {
            break;
        }
    }
    (-u).exp() * u.powi(4) / 24.0 * sum
}

pub(crate) fn zone_profiles(
    params: &ParameterSet,
    constants: &ZoneConstants,
    upper: f64,
) -> [ZoneProfile; 3] {
    [
        ZoneProfile {
            zone: Zone::FinesRemoval,
            start: 0.0,
            end: params.fines_cutoff,
            density_constant: constants.fines_removal,
            rate_factor: params.recycle_ratio,
            weight: 1.0,
        },
        ZoneProfile {
            zone: Zone::Growth,
            start: params.fines_cutoff,
            end: params.product_cutoff,
            density_constant: constants.growth,
            rate_factor: 1.0,
            weight: 1.0,
        },
        ZoneProfile {
            zone: Zone::Classification,
            start: params.product_cutoff,
            end: upper,
            density_constant: constants.classification,
            rate_factor: params.classification_fraction,
            weight: params.classification_fraction,
        },
    ]
}

/// Steady-state population balance of a crystallizer with fines removal and
/// product classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationBalanceModel {
    params: ParameterSet,
}

impl PopulationBalanceModel {
    pub fn new(params: ParameterSet) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Nucleation rate `B` (1/(µm³·min)) at growth rate `G` (µm/min).
    ///
    /// Kinetics are evaluated in SI units (`G` in m/s, `B` in 1/(L·s)) and the
    /// result is rescaled by `1000·1e-18·60`.
    pub fn nucleation(&self, growth_rate: f64) -> f64 {
        let p = &self.params;
        // µm/min to m/s
        let g_si = growth_rate * 1e-6 / 60.0;
        p.kr * p.slurry_concentration.powf(p.j) * g_si.powf(p.i) * 1000.0 * 1e-18 * 60.0
    }

    /// Primitive of `x³·exp(−x/(G·τ))` evaluated at `L`.
    pub fn integral(growth_rate: f64, residence_time: f64, size: f64) -> f64 {
        let a = growth_rate * residence_time;
        -a * (size.powi(3) + 3.0 * a * size.powi(2) + 6.0 * a.powi(2) * size + 6.0 * a.powi(3))
            * (-size / a).exp()
    }

    /// `∫ x³·exp(−x/(G·τ)) dx` over `[start, end]`.
    ///
    /// Equal to `integral(end) − integral(start)`, but both primitives are close to
    /// `−6(Gτ)⁴` once `Gτ` dwarfs the sizes, so the difference is taken between
    /// incomplete gamma functions instead.
    pub fn third_moment_between(growth_rate: f64, residence_time: f64, start: f64, end: f64) -> f64 {
        let a = growth_rate * residence_time;
        let (u_start, u_end) = (start / a, end / a);
        let fraction = if u_start >= SERIES_CROSSOVER {
            gamma4_tail(u_start) - gamma4_tail(u_end)
        } else {
            gamma4_head(u_end) - gamma4_head(u_start)
        };
        6.0 * a.powi(4) * fraction
    }

    pub fn zone_constants(&self, growth_rate: f64) -> ZoneConstants {
        let p = &self.params;
        let c1 = self.nucleation(growth_rate) / growth_rate;
        let c2 = c1 * (-p.fines_cutoff / p.residence_time / growth_rate * (p.recycle_ratio - 1.0)).exp();
        let c3 = c2
            * (-p.product_cutoff / p.residence_time / growth_rate
                * (1.0 - p.classification_fraction))
                .exp();
        ZoneConstants {
            fines_removal: c1,
            growth: c2,
            classification: c3,
        }
    }

    /// Zones used for the mass balance; the last one is cut at [`MASS_INTEGRATION_LIMIT`].
    pub fn zones(&self, growth_rate: f64) -> [ZoneProfile; 3] {
        let upper = MASS_INTEGRATION_LIMIT.max(self.params.product_cutoff);
        zone_profiles(&self.params, &self.zone_constants(growth_rate), upper)
    }

    /// Suspension density (kg/m³) implied by growth rate `G`.
    pub fn slurry_concentration(&self, growth_rate: f64) -> f64 {
        let tau = self.params.residence_time;
        let third_moment: f64 = self
            .zones(growth_rate)
            .iter()
            .map(|zone| zone.third_moment(growth_rate, tau))
            .sum();
        third_moment * self.params.shape_factor * self.params.crystal_density
    }

    /// Residual `slurry_concentration(G) − MT`; zero at the operating point.
    pub fn material_balance(&self, growth_rate: f64) -> f64 {
        self.slurry_concentration(growth_rate) - self.params.slurry_concentration
    }

    pub fn solve(&self, config: &SolverConfig) -> Result<SolvedModel, EngineError> {
        let solution = GrowthRateSolver::new(self, *config)?.solve()?;
        let growth_rate = solution.growth_rate;

        let nucleation_rate = self.nucleation(growth_rate);
        let achieved = self.slurry_concentration(growth_rate);
        let constants = self.zone_constants(growth_rate);
        debug!(
            nucleation_rate,
            c1 = constants.fines_removal,
            c2 = constants.growth,
            c3 = constants.classification,
            "Derived zone constants."
        );
        info!(
            "Solved growth rate G = {} um/min (MT2 = {} kg/m3, {} evaluations).",
            growth_rate, achieved, solution.evaluations
        );

        Ok(SolvedModel::new(
            self.params,
            growth_rate,
            nucleation_rate,
            constants,
            achieved,
            solution.evaluations,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::tests::sample_params;

    fn model() -> PopulationBalanceModel {
        PopulationBalanceModel::new(sample_params()).unwrap()
    }

    fn assert_close(actual: f64, expected: f64, rel: f64) {
        let scale = expected.abs().max(f64::MIN_POSITIVE);
        assert!(
            (actual - expected).abs() / scale <= rel,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn nucleation_reproduces_unit_conversion() {
        let model = model();
        let g = 10.0_f64;
        let g_si = g * 1e-6 / 60.0;
        let expected = 1e12 * 100.0 * g_si * g_si * 1000.0 * 1e-18 * 60.0;
        assert_close(model.nucleation(g), expected, 1e-14);
    }

    #[test]
    fn nucleation_is_monotone_in_growth_rate_and_concentration() {
        let model = model();
        let rates: Vec<f64> = [0.1, 1.0, 5.0, 10.0, 50.0]
            .iter()
            .map(|&g| model.nucleation(g))
            .collect();
        assert!(rates.windows(2).all(|w| w[1] >= w[0]));

        let mut denser = sample_params();
        denser.slurry_concentration = 200.0;
        let denser = PopulationBalanceModel::new(denser).unwrap();
        assert!(denser.nucleation(10.0) >= model.nucleation(10.0));
    }

    #[test]
    fn integral_is_primitive_of_cubic_exponential() {
        let (g, tau) = (2.0, 30.0);
        let a = g * tau;
        for &x in &[10.0, 75.0, 400.0] {
            let h = 1e-3;
            let derivative = (PopulationBalanceModel::integral(g, tau, x + h)
                - PopulationBalanceModel::integral(g, tau, x - h))
                / (2.0 * h);
            let expected = x.powi(3) * (-x / a).exp();
            assert!((derivative - expected).abs() <= 1e-6 * expected.max(1.0));
        }
        assert_close(PopulationBalanceModel::integral(g, tau, 0.0), -6.0 * a.powi(4), 1e-14);
    }

    #[test]
    fn third_moment_matches_primitive_difference() {
        let (g, tau) = (2.0, 30.0);
        for &(start, end) in &[(0.0, 50.0), (50.0, 400.0), (400.0, 10_000.0)] {
            let expected = PopulationBalanceModel::integral(g, tau, end)
                - PopulationBalanceModel::integral(g, tau, start);
            let actual = PopulationBalanceModel::third_moment_between(g, tau, start, end);
            assert_close(actual, expected, 1e-12);
        }
    }

    #[test]
    fn third_moment_keeps_precision_for_long_decay_lengths() {
        // Gτ far beyond the interval: the integrand is x³ and the moment (b⁴ − a⁴)/4.
        let (start, end) = (50.0_f64, 400.0_f64);
        let tau = 60.0;
        for &g in &[1e4, 1e6, 1e9] {
            let a = g * tau;
            let exact = (end.powi(4) - start.powi(4)) / 4.0;
            // Leading corrections from expanding the exponential.
            let first = (end.powi(5) - start.powi(5)) / 5.0 / a;
            let second = (end.powi(6) - start.powi(6)) / 12.0 / a.powi(2);
            let actual = PopulationBalanceModel::third_moment_between(g, tau, start, end);
            assert_close(actual, exact - first + second, 1e-9);
        }
    }

    #[test]
    fn zone_constants_follow_boundary_decay() {
        let model = model();
        let g = 10.0;
        let c = model.zone_constants(g);
        assert_close(c.fines_removal, model.nucleation(g) / g, 1e-14);
        assert_close(c.growth, c.fines_removal * (-50.0 / 60.0 / g * 3.0_f64).exp(), 1e-14);
        assert_close(c.classification, c.growth * (-400.0 / 60.0 / g * 0.5_f64).exp(), 1e-14);
    }

    #[test]
    fn single_zone_matches_plain_msmpr_moment() {
        let mut params = sample_params();
        params.recycle_ratio = 1.0;
        params.classification_fraction = 1.0;
        params.fines_cutoff = 0.0;
        params.product_cutoff = 0.0;
        let model = PopulationBalanceModel::new(params).unwrap();

        let g = 1.0;
        let a = g * params.residence_time;
        let n0 = model.nucleation(g) / g;
        // Plain MSMPR: MT = 6·k·ρ·n0·(Gτ)⁴, truncated far beyond the decay length.
        let expected = 6.0 * params.shape_factor * params.crystal_density * n0 * a.powi(4);
        assert_close(model.slurry_concentration(g), expected, 1e-9);
    }

    #[test]
    fn zero_classification_fraction_drops_last_zone() {
        let mut params = sample_params();
        params.classification_fraction = 0.0;
        let model = PopulationBalanceModel::new(params).unwrap();
        let zones = model.zones(10.0);
        assert_eq!(zones[2].third_moment(10.0, params.residence_time), 0.0);
        assert!(model.slurry_concentration(10.0).is_finite());
        assert!(model.slurry_concentration(10.0) > 0.0);
    }

    #[test]
    fn slurry_concentration_increases_with_growth_rate() {
        let model = model();
        let values: Vec<f64> = [1.0, 5.0, 10.0, 20.0]
            .iter()
            .map(|&g| model.slurry_concentration(g))
            .collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        assert!(model.material_balance(1.0) < 0.0);
        assert!(model.material_balance(100.0) > 0.0);
    }

    #[test]
    fn solve_reproduces_target_slurry_concentration() {
        let model = model();
        let solved = model.solve(&SolverConfig::default()).unwrap();
        assert_close(solved.growth_rate(), 11.731_942_1, 1e-6);
        assert_close(solved.achieved_slurry_concentration(), 100.0, 1e-6);
        assert_close(
            model.slurry_concentration(solved.growth_rate()),
            sample_params().slurry_concentration,
            1e-6,
        );
        assert_close(
            solved.zero_size_density(),
            solved.nucleation_rate() / solved.growth_rate(),
            1e-14,
        );
    }

    #[test]
    fn solve_without_classified_zone() {
        let mut params = sample_params();
        params.classification_fraction = 0.0;
        let model = PopulationBalanceModel::new(params).unwrap();
        let solved = model.solve(&SolverConfig::default()).unwrap();
        assert_close(solved.growth_rate(), 12_144.695_636, 1e-7);
        assert_close(solved.achieved_slurry_concentration(), 100.0, 1e-6);
    }

    #[test]
    fn solve_slow_nucleation_kinetics() {
        // Reference roots from an 80-digit evaluation of the primitive difference.
        let cases = [
            (1e6, 62_213.045_834_727_11),
            (1e4, 6_214_131.471_006_254),
            (1e2, 621_405_969.660_961_6),
        ];
        for (kr, expected) in cases {
            let mut params = sample_params();
            params.kr = kr;
            let model = PopulationBalanceModel::new(params).unwrap();
            let solved = model.solve(&SolverConfig::default()).unwrap();
            assert_close(solved.growth_rate(), expected, 1e-7);
            assert_close(solved.achieved_slurry_concentration(), 100.0, 1e-6);
        }
    }

    #[test]
    fn solve_collapsed_zones() {
        let mut params = sample_params();
        params.recycle_ratio = 1.0;
        params.classification_fraction = 1.0;
        params.fines_cutoff = 0.0;
        params.product_cutoff = 0.0;
        let solved = PopulationBalanceModel::new(params)
            .unwrap()
            .solve(&SolverConfig::default())
            .unwrap();
        assert_close(solved.growth_rate(), 15.8682, 1e-4);
        let c = solved.zone_constants();
        assert_eq!(c.fines_removal, c.growth);
        assert_eq!(c.growth, c.classification);
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        let mut params = sample_params();
        params.residence_time = 0.0;
        assert!(PopulationBalanceModel::new(params).is_err());
    }
}
