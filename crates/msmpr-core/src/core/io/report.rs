use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Human-readable summary of a solved operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryReport {
    /// Growth rate `G` (µm/min).
    pub growth_rate: f64,
    /// Nucleation rate `B` (1/(µm³·min)).
    pub nucleation_rate: f64,
    /// Residence time `τ` (min).
    pub residence_time: f64,
    /// Slurry concentration reproduced by the solved model (kg/m³).
    pub achieved_slurry_concentration: f64,
}

impl SummaryReport {
    /// Characteristic crystal size `G·τ` (µm).
    pub fn growth_length(&self) -> f64 {
        self.growth_rate * self.residence_time
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Growth Rate: {} um/min", self.growth_rate),
            format!("Nucleation Rate: {:e} 1/(um^3*min)", self.nucleation_rate),
            format!("Residence Time: {} min", self.residence_time),
            format!("G*tau: {} um", self.growth_length()),
            format!("MT2: {} kg/m3", self.achieved_slurry_concentration),
        ]
    }

    pub fn write_to_path(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_string())
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
