pub mod convert;
pub mod moment;
pub mod run;

use crate::error::{CliError, Result};
use msmpr::core::io::table::{CsvTable, TableFile};
use msmpr::core::models::distribution::{Distribution, Quantity};
use std::path::Path;

pub(crate) fn read_table<Q: Quantity>(path: &Path) -> Result<Distribution<Q>> {
    CsvTable::read_from_path(path).map_err(|source| CliError::Table {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_table<Q: Quantity>(table: &Distribution<Q>, path: &Path) -> Result<()> {
    CsvTable::write_to_path(table, path).map_err(|source| CliError::Table {
        path: path.to_path_buf(),
        source,
    })
}
