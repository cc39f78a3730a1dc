use msmpr::engine::config::SimulationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub working_dir: PathBuf,
    pub settings_path: PathBuf,
    pub results_dir: PathBuf,
    pub simulation: SimulationConfig,
}
