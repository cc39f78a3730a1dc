use crate::cli::RunArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use msmpr::core::params::ParameterSet;
use msmpr::engine::progress::ProgressReporter;
use msmpr::workflows::simulate;
use tracing::info;

pub fn run(args: RunArgs, show_progress: bool) -> Result<()> {
    info!("Merging run configuration from defaults, file and CLI arguments...");
    let config = build_config(&args)?;

    if !config.working_dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Working directory '{}' does not exist or is not a directory.",
            config.working_dir.display()
        )));
    }

    let progress_handler = CliProgressHandler::new(show_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let settings_path = config.settings_path.clone();
    let params = reporter.phase("Loading Parameters", || {
        info!("Loading crystallizer parameters from {:?}", &settings_path);
        ParameterSet::load(&settings_path).map_err(|source| CliError::Parameters {
            path: settings_path.clone(),
            source,
        })
    })?;

    println!(
        "Solving crystallizer in '{}'...",
        config.working_dir.display()
    );
    info!("Invoking the simulation workflow...");
    let result = simulate::run(&params, &config.simulation, &reporter)?;
    let written = simulate::write_results(&result, &config.results_dir, &reporter)?;

    for line in result.summary().lines() {
        println!("{}", line);
    }
    println!(
        "Wrote {} files to '{}'.",
        written.len(),
        config.results_dir.display()
    );
    Ok(())
}
