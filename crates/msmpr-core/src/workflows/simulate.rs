use crate::core::io::report::SummaryReport;
use crate::core::io::table::{CsvTable, TableFile};
use crate::core::models::distribution::{
    DensityFunctionSample, Distribution, NumberFractions, Quantity, VolumeFractions,
};
use crate::core::params::ParameterSet;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::fractions::FractionConverter;
use crate::engine::model::PopulationBalanceModel;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sampler::DistributionSampler;
use crate::engine::state::SolvedModel;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const DENSITY_FILE: &str = "PDF.csv";
pub const NUMBER_FRACTION_FILE: &str = "CSD(number).csv";
pub const VOLUME_FRACTION_FILE: &str = "CSD(volume).csv";
pub const REPORT_FILE: &str = "report.txt";

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub solved: SolvedModel,
    pub density: DensityFunctionSample,
    pub number_fractions: NumberFractions,
    pub volume_fractions: VolumeFractions,
}

impl SimulationResult {
    pub fn summary(&self) -> SummaryReport {
        self.solved.summary()
    }
}

#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    params: &ParameterSet,
    config: &SimulationConfig,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    // === Phase 1: Growth rate ===
    let solved = reporter.phase("Solving Growth Rate", || -> Result<_, EngineError> {
        let model = PopulationBalanceModel::new(*params)?;
        model.solve(&config.solver)
    })?;
    reporter.report(Progress::Message(format!(
        "Growth rate {:.6} um/min after {} residual evaluations",
        solved.growth_rate(),
        solved.evaluations()
    )));

    // === Phase 2: Density function ===
    let density = reporter.phase("Sampling Density Function", || -> Result<_, EngineError> {
        let sampler = DistributionSampler::new(config.sampling)?;
        sampler.sample(&solved)
    })?;
    info!(
        "Sampled {} density points up to {} um.",
        density.len(),
        density.size_range().map_or(0.0, |(_, last)| last)
    );

    // === Phase 3: Fractions ===
    let (number_fractions, volume_fractions) =
        reporter.phase("Converting Distributions", || -> Result<_, EngineError> {
            let converter = FractionConverter::new();
            let number =
                converter.density_to_number_fraction(&density, config.sampling.mesh_size)?;
            let volume = converter.number_to_volume_fraction(&number)?;
            Ok((number, volume))
        })?;
    info!(
        "Derived {} size classes (number fractions sum to {}).",
        number_fractions.len(),
        number_fractions.total()
    );

    Ok(SimulationResult {
        solved,
        density,
        number_fractions,
        volume_fractions,
    })
}

struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

fn discard(staged: &[StagedFile]) {
    for file in staged {
        if let Err(e) = fs::remove_file(&file.temp) {
            debug!("Could not remove '{}': {}", file.temp.display(), e);
        }
    }
}

fn stage(
    dir: &Path,
    name: &str,
    staged: &mut Vec<StagedFile>,
    reporter: &ProgressReporter,
    write: impl FnOnce(&Path) -> Result<(), EngineError>,
) -> Result<(), EngineError> {
    let temp = dir.join(format!(".{}.tmp", name));
    staged.push(StagedFile {
        temp: temp.clone(),
        target: dir.join(name),
    });
    write(&temp)?;
    reporter.report(Progress::TaskIncrement);
    Ok(())
}

fn write_table<Q: Quantity>(table: &Distribution<Q>, path: &Path) -> Result<(), EngineError> {
    CsvTable::write_to_path(table, path).map_err(|source| EngineError::Table {
        path: path.to_path_buf(),
        source,
    })
}

fn stage_all(
    result: &SimulationResult,
    dir: &Path,
    staged: &mut Vec<StagedFile>,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    stage(dir, DENSITY_FILE, staged, reporter, |path| {
        write_table(&result.density, path)
    })?;
    stage(dir, NUMBER_FRACTION_FILE, staged, reporter, |path| {
        write_table(&result.number_fractions, path)
    })?;
    stage(dir, VOLUME_FRACTION_FILE, staged, reporter, |path| {
        write_table(&result.volume_fractions, path)
    })?;
    stage(dir, REPORT_FILE, staged, reporter, |path| {
        result
            .summary()
            .write_to_path(path)
            .map_err(|source| EngineError::Io {
                path: path.to_path_buf(),
                source,
            })
    })
}

/// Writes the three tables and the summary report into `dir`.
///
/// Every file is first written to a hidden sibling and only renamed into place
/// once all of them were written, so a failed run leaves no partial results.
/// Returns the final paths in write order.
#[instrument(skip_all, name = "write_results")]
pub fn write_results(
    result: &SimulationResult,
    dir: &Path,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, EngineError> {
    reporter.phase("Writing Results", || -> Result<_, EngineError> {
        fs::create_dir_all(dir).map_err(|source| EngineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut staged = Vec::with_capacity(4);
        reporter.report(Progress::TaskStart { total_steps: 4 });
        let outcome = stage_all(result, dir, &mut staged, reporter);
        reporter.report(Progress::TaskFinish);
        if let Err(e) = outcome {
            discard(&staged);
            return Err(e);
        }

        let mut written = Vec::with_capacity(staged.len());
        for (index, file) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(&file.temp, &file.target) {
                discard(&staged[index..]);
                return Err(EngineError::Io {
                    path: file.target.clone(),
                    source,
                });
            }
            debug!("Wrote '{}'.", file.target.display());
            written.push(file.target.clone());
        }
        info!("Results written to '{}'.", dir.display());
        Ok(written)
    })
}
