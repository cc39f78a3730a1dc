use msmpr::engine::config::{
    DEFAULT_CUTOFF_FACTOR, DEFAULT_INITIAL_GUESS, DEFAULT_MAX_ITERATIONS,
    DEFAULT_RELATIVE_TOLERANCE,
};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub settings_file: PathBuf,
    pub results_dir: PathBuf,
    pub initial_guess: f64,
    pub relative_tolerance: f64,
    pub max_iterations: usize,
    pub mesh_size: f64,
    pub cutoff_factor: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            settings_file: PathBuf::from("setting.csv"),
            results_dir: PathBuf::from("Result"),
            initial_guess: DEFAULT_INITIAL_GUESS,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            mesh_size: 1.0,
            cutoff_factor: DEFAULT_CUTOFF_FACTOR,
        }
    }
}
