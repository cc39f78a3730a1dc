use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Identifies one of the crystallizer constants held by a [`ParameterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterKey {
    ShapeFactor,
    CrystalDensity,
    Kr,
    J,
    I,
    ResidenceTime,
    SlurryConcentration,
    R,
    Lf,
    Z,
    Lp,
}

impl ParameterKey {
    pub const ALL: [ParameterKey; 11] = [
        ParameterKey::ShapeFactor,
        ParameterKey::CrystalDensity,
        ParameterKey::Kr,
        ParameterKey::J,
        ParameterKey::I,
        ParameterKey::ResidenceTime,
        ParameterKey::SlurryConcentration,
        ParameterKey::R,
        ParameterKey::Lf,
        ParameterKey::Z,
        ParameterKey::Lp,
    ];

    /// Canonical name as it appears in a settings file.
    pub fn name(self) -> &'static str {
        match self {
            ParameterKey::ShapeFactor => "shape factor",
            ParameterKey::CrystalDensity => "crystal density",
            ParameterKey::Kr => "Kr",
            ParameterKey::J => "j",
            ParameterKey::I => "i",
            ParameterKey::ResidenceTime => "residence time",
            ParameterKey::SlurryConcentration => "slurry concentration",
            ParameterKey::R => "R",
            ParameterKey::Lf => "Lf",
            ParameterKey::Z => "z",
            ParameterKey::Lp => "Lp",
        }
    }

    /// Resolves a settings-file name, ignoring case and treating `-`/`_` as spaces.
    pub fn lookup(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ");
        let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        PARAMETER_ALIASES.get(collapsed.as_str()).copied()
    }
}

static PARAMETER_ALIASES: Map<&'static str, ParameterKey> = phf_map! {
    "shape factor" => ParameterKey::ShapeFactor,
    "k" => ParameterKey::ShapeFactor,
    "crystal density" => ParameterKey::CrystalDensity,
    "rho" => ParameterKey::CrystalDensity,
    "kr" => ParameterKey::Kr,
    "j" => ParameterKey::J,
    "i" => ParameterKey::I,
    "residence time" => ParameterKey::ResidenceTime,
    "tau" => ParameterKey::ResidenceTime,
    "slurry concentration" => ParameterKey::SlurryConcentration,
    "mt" => ParameterKey::SlurryConcentration,
    "r" => ParameterKey::R,
    "recycle ratio" => ParameterKey::R,
    "lf" => ParameterKey::Lf,
    "z" => ParameterKey::Z,
    "lp" => ParameterKey::Lp,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{name}' has a non-numeric value: '{value}'")]
    Malformed { name: String, value: String },
    #[error("Parameter '{0}' is defined more than once")]
    Duplicate(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Immutable set of crystallizer constants for a single steady operating point.
///
/// Units follow the settings file convention: sizes in micrometers, times in
/// minutes, densities and concentrations in kg/m³.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    /// Volumetric shape factor `k`.
    pub shape_factor: f64,
    /// Crystal density `ρ` (kg/m³).
    pub crystal_density: f64,
    /// Nucleation rate constant `Kr`.
    pub kr: f64,
    /// Slurry concentration exponent `j` of the nucleation law.
    pub j: f64,
    /// Growth rate exponent `i` of the nucleation law.
    pub i: f64,
    /// Residence time `τ` (min).
    pub residence_time: f64,
    /// Target slurry concentration `MT` (kg/m³).
    pub slurry_concentration: f64,
    /// Fines recycle ratio `R`.
    pub recycle_ratio: f64,
    /// Fines-removal cutoff size `Lf` (µm).
    pub fines_cutoff: f64,
    /// Product classification residence fraction `z`.
    pub classification_fraction: f64,
    /// Product classification size `Lp` (µm).
    pub product_cutoff: f64,
}

#[derive(Debug, Deserialize)]
struct ParameterRecord {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterDocument {
    parameters: BTreeMap<String, f64>,
}

impl ParameterSet {
    /// Loads a parameter set from a settings file.
    ///
    /// Files ending in `.toml` are read as a `[parameters]` table; anything else is
    /// read as a CSV key/value table with `name` and `value` columns.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading crystallizer parameters from {:?}", path);
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let entries = if is_toml {
            Self::read_toml(path)?
        } else {
            Self::read_csv(path)?
        };
        Self::from_entries(entries)
    }

    fn read_csv(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| ConfigError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let mut entries = Vec::new();
        for result in reader.deserialize::<ParameterRecord>() {
            let record = result.map_err(|e| ConfigError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            entries.push((record.name, record.value));
        }
        Ok(entries)
    }

    fn read_toml(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let document: ParameterDocument =
            toml::from_str(&content).map_err(|e| ConfigError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(document
            .parameters
            .into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect())
    }

    /// Builds a validated parameter set from raw `(name, value)` pairs.
    ///
    /// Unrecognized names are skipped with a warning.
    pub fn from_entries<I, N, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values: HashMap<ParameterKey, f64> = HashMap::new();
        for (name, raw_value) in entries {
            let (name, raw_value) = (name.as_ref(), raw_value.as_ref());
            let Some(key) = ParameterKey::lookup(name) else {
                warn!("Ignoring unrecognized parameter '{}'.", name);
                continue;
            };
            let value: f64 = raw_value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Malformed {
                    name: key.name().to_string(),
                    value: raw_value.to_string(),
                })?;
            if values.insert(key, value).is_some() {
                return Err(ConfigError::Duplicate(key.name()));
            }
        }

        let get = |key: ParameterKey| {
            values
                .get(&key)
                .copied()
                .ok_or(ConfigError::MissingParameter(key.name()))
        };

        let params = Self {
            shape_factor: get(ParameterKey::ShapeFactor)?,
            crystal_density: get(ParameterKey::CrystalDensity)?,
            kr: get(ParameterKey::Kr)?,
            j: get(ParameterKey::J)?,
            i: get(ParameterKey::I)?,
            residence_time: get(ParameterKey::ResidenceTime)?,
            slurry_concentration: get(ParameterKey::SlurryConcentration)?,
            recycle_ratio: get(ParameterKey::R)?,
            fines_cutoff: get(ParameterKey::Lf)?,
            classification_fraction: get(ParameterKey::Z)?,
            product_cutoff: get(ParameterKey::Lp)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn get(&self, key: ParameterKey) -> f64 {
        match key {
            ParameterKey::ShapeFactor => self.shape_factor,
            ParameterKey::CrystalDensity => self.crystal_density,
            ParameterKey::Kr => self.kr,
            ParameterKey::J => self.j,
            ParameterKey::I => self.i,
            ParameterKey::ResidenceTime => self.residence_time,
            ParameterKey::SlurryConcentration => self.slurry_concentration,
            ParameterKey::R => self.recycle_ratio,
            ParameterKey::Lf => self.fines_cutoff,
            ParameterKey::Z => self.classification_fraction,
            ParameterKey::Lp => self.product_cutoff,
        }
    }

    /// Checks the physical invariants of the operating point.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in ParameterKey::ALL {
            let value = self.get(key);
            if !value.is_finite() {
                return Err(invalid(key, format!("must be finite, got {}", value)));
            }
        }

        let positive = [
            ParameterKey::ShapeFactor,
            ParameterKey::CrystalDensity,
            ParameterKey::Kr,
            ParameterKey::ResidenceTime,
            ParameterKey::SlurryConcentration,
        ];
        for key in positive {
            if self.get(key) <= 0.0 {
                return Err(invalid(key, format!("must be > 0, got {}", self.get(key))));
            }
        }

        if self.recycle_ratio < 1.0 {
            return Err(invalid(
                ParameterKey::R,
                format!("must be >= 1, got {}", self.recycle_ratio),
            ));
        }
        if !(0.0..=1.0).contains(&self.classification_fraction) {
            return Err(invalid(
                ParameterKey::Z,
                format!("must lie in [0, 1], got {}", self.classification_fraction),
            ));
        }
        if self.fines_cutoff < 0.0 {
            return Err(invalid(
                ParameterKey::Lf,
                format!("must be >= 0, got {}", self.fines_cutoff),
            ));
        }
        if self.product_cutoff < self.fines_cutoff {
            return Err(invalid(
                ParameterKey::Lp,
                format!(
                    "must be >= Lf ({}), got {}",
                    self.fines_cutoff, self.product_cutoff
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(key: ParameterKey, reason: String) -> ConfigError {
    ConfigError::InvalidParameter {
        name: key.name(),
        reason,
    }
}
