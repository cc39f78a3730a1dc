use crate::core::params::ConfigError;

pub const DEFAULT_INITIAL_GUESS: f64 = 10.0;
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_MAX_ITERATIONS: usize = 200;
pub const DEFAULT_CUTOFF_FACTOR: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Starting growth rate for the bracket search (µm/min).
    pub initial_guess: f64,
    pub relative_tolerance: f64,
    /// Cap shared by bracket expansion and Brent iterations.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_guess.is_finite() || self.initial_guess <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "initial_guess",
                reason: format!("must be finite and > 0, got {}", self.initial_guess),
            });
        }
        if !self.relative_tolerance.is_finite() || self.relative_tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "relative_tolerance",
                reason: format!("must be finite and > 0, got {}", self.relative_tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Size step of the density mesh and of the fraction bins (µm).
    pub mesh_size: f64,
    /// Upper end of the sampled range as a multiple of `G·τ`.
    pub cutoff_factor: f64,
}

impl SamplingConfig {
    pub fn new(mesh_size: f64) -> Self {
        Self {
            mesh_size,
            cutoff_factor: DEFAULT_CUTOFF_FACTOR,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mesh_size.is_finite() || self.mesh_size <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "mesh_size",
                reason: format!("must be finite and > 0, got {}", self.mesh_size),
            });
        }
        if !self.cutoff_factor.is_finite() || self.cutoff_factor <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "cutoff_factor",
                reason: format!("must be finite and > 0, got {}", self.cutoff_factor),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub solver: SolverConfig,
    pub sampling: SamplingConfig,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    initial_guess: Option<f64>,
    relative_tolerance: Option<f64>,
    max_iterations: Option<usize>,
    mesh_size: Option<f64>,
    cutoff_factor: Option<f64>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_guess(mut self, growth_rate: f64) -> Self {
        self.initial_guess = Some(growth_rate);
        self
    }
    pub fn relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = Some(tolerance);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn mesh_size(mut self, size: f64) -> Self {
        self.mesh_size = Some(size);
        self
    }
    pub fn cutoff_factor(mut self, factor: f64) -> Self {
        self.cutoff_factor = Some(factor);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let solver = SolverConfig {
            initial_guess: self
                .initial_guess
                .ok_or(ConfigError::MissingParameter("initial_guess"))?,
            relative_tolerance: self
                .relative_tolerance
                .ok_or(ConfigError::MissingParameter("relative_tolerance"))?,
            max_iterations: self
                .max_iterations
                .ok_or(ConfigError::MissingParameter("max_iterations"))?,
        };
        let sampling = SamplingConfig {
            mesh_size: self
                .mesh_size
                .ok_or(ConfigError::MissingParameter("mesh_size"))?,
            cutoff_factor: self
                .cutoff_factor
                .ok_or(ConfigError::MissingParameter("cutoff_factor"))?,
        };
        solver.validate()?;
        sampling.validate()?;
        Ok(SimulationConfig { solver, sampling })
    }
}
