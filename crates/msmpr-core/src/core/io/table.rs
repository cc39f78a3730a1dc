use crate::core::models::distribution::{Distribution, Quantity, SIZE_NAME, SIZE_UNIT, SizePoint};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Defines the interface for reading and writing size-distribution tables.
///
/// Implementors handle a concrete on-disk layout; the quantity carried by the value
/// column is chosen by the caller through the `Q` type parameter and checked against
/// the file header when reading.
pub trait TableFile {
    /// The error type for I/O and format errors.
    type Error: Error + From<io::Error>;

    /// Reads a distribution of quantity `Q` from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the header does not describe `Q`, if a row is malformed,
    /// or if the underlying reader fails.
    fn read_from<Q: Quantity>(reader: &mut impl Read) -> Result<Distribution<Q>, Self::Error>;

    /// Writes a distribution, header first, to a writer.
    fn write_to<Q: Quantity>(
        table: &Distribution<Q>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads a distribution of quantity `Q` from a file path.
    fn read_from_path<Q: Quantity, P: AsRef<Path>>(
        path: P,
    ) -> Result<Distribution<Q>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a distribution to a file path, creating or truncating the file.
    fn write_to_path<Q: Quantity, P: AsRef<Path>>(
        table: &Distribution<Q>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(table, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unexpected header in column {column}: expected '{expected}', found '{found}'")]
    Header {
        column: usize,
        expected: String,
        found: String,
    },
    #[error("Expected 2 columns on line {line}, found {found}")]
    ColumnCount { line: u64, found: usize },
    #[error("Size {size} on line {line} is smaller than the preceding size {previous}")]
    Unsorted { line: u64, size: f64, previous: f64 },
    #[error("Invalid number on line {line}, column {column}: '{value}'")]
    Value {
        line: u64,
        column: usize,
        value: String,
    },
}

/// Comma-separated table with a `name (unit)` header row.
///
/// ```text
/// size (um),number fraction (-)
/// 0.5,0.5
/// 1.5,0.5
/// ```
pub struct CsvTable;

/// Formats a column header as `name (unit)`.
pub fn header_label(name: &str, unit: &str) -> String {
    format!("{} ({})", name, unit)
}

/// Splits a `name (unit)` header into its parts.
pub fn parse_header_label(label: &str) -> Option<(&str, &str)> {
    let label = label.trim();
    let open = label.rfind(" (")?;
    let unit = label[open + 2..].strip_suffix(')')?;
    Some((label[..open].trim(), unit.trim()))
}

fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e15).contains(&magnitude) {
        format!("{}", value)
    } else {
        format!("{:e}", value)
    }
}

fn check_header(column: usize, found: &str, name: &str, unit: &str) -> Result<(), TableError> {
    match parse_header_label(found) {
        Some((n, u)) if n == name && u == unit => Ok(()),
        _ => Err(TableError::Header {
            column,
            expected: header_label(name, unit),
            found: found.to_string(),
        }),
    }
}

impl TableFile for CsvTable {
    type Error = TableError;

    fn read_from<Q: Quantity>(reader: &mut impl Read) -> Result<Distribution<Q>, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.len() != 2 {
            return Err(TableError::ColumnCount {
                line: 1,
                found: headers.len(),
            });
        }
        check_header(1, &headers[0], SIZE_NAME, SIZE_UNIT)?;
        check_header(2, &headers[1], Q::NAME, Q::UNIT)?;

        let mut points = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() != 2 {
                return Err(TableError::ColumnCount {
                    line,
                    found: record.len(),
                });
            }
            let parse = |column: usize| -> Result<f64, TableError> {
                record[column - 1]
                    .parse::<f64>()
                    .map_err(|_| TableError::Value {
                        line,
                        column,
                        value: record[column - 1].to_string(),
                    })
            };
            let point = SizePoint::new(parse(1)?, parse(2)?);
            if let Some(previous) = points.last().map(|p: &SizePoint| p.size) {
                if point.size < previous {
                    return Err(TableError::Unsorted {
                        line,
                        size: point.size,
                        previous,
                    });
                }
            }
            points.push(point);
        }
        Ok(Distribution::new(points))
    }

    fn write_to<Q: Quantity>(
        table: &Distribution<Q>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            header_label(SIZE_NAME, SIZE_UNIT),
            header_label(Q::NAME, Q::UNIT),
        ])?;
        for point in table.points() {
            csv_writer.write_record([format_value(point.size), format_value(point.value)])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::distribution::{
        DensityFunctionSample, NumberFraction, NumberFractions, PopulationDensity, VolumeFraction,
    };
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn write_emits_named_header_and_rows() {
        let table = NumberFractions::from_columns(&[0.5, 1.5], &[0.25, 0.75]).unwrap();
        let mut buffer = Vec::new();
        CsvTable::write_to(&table, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("size (um),number fraction (-)"));
        assert_eq!(lines.next(), Some("0.5,0.25"));
        assert_eq!(lines.next(), Some("1.5,0.75"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn tiny_densities_are_written_in_exponent_form() {
        let table = DensityFunctionSample::from_columns(&[0.0, 10.0], &[2.5e-13, 0.0]).unwrap();
        let mut buffer = Vec::new();
        CsvTable::write_to(&table, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("size (um),population density (1/um^4)\n"));
        assert!(text.contains("0,2.5e-13"));
        assert!(text.contains("10,0"));
    }

    #[test]
    fn read_parses_table_of_expected_quantity() {
        let mut input = Cursor::new("size (um), volume fraction (-)\n1, 0.1111\n2,8.889e-1\n");
        let table = CsvTable::read_from::<VolumeFraction>(&mut input).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.points()[0], SizePoint::new(1.0, 0.1111));
        assert_eq!(table.points()[1], SizePoint::new(2.0, 0.8889));
    }

    #[test]
    fn read_rejects_table_of_other_quantity() {
        let mut input = Cursor::new("size (um),volume fraction (-)\n1,0.5\n");
        let result = CsvTable::read_from::<NumberFraction>(&mut input);
        match result {
            Err(TableError::Header {
                column, expected, ..
            }) => {
                assert_eq!(column, 2);
                assert_eq!(expected, "number fraction (-)");
            }
            other => panic!("expected header error, got {:?}", other),
        }
    }

    #[test]
    fn read_reports_malformed_numbers_with_position() {
        let mut input = Cursor::new("size (um),number fraction (-)\n1,0.5\n2,abc\n");
        let result = CsvTable::read_from::<NumberFraction>(&mut input);
        match result {
            Err(TableError::Value {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected value error, got {:?}", other),
        }
    }

    #[test]
    fn read_rejects_decreasing_sizes() {
        let mut input = Cursor::new(
            "size (um),population density (1/um^4)\n0,3\n50,2\n50,2.5\n20,1\n",
        );
        let result = CsvTable::read_from::<PopulationDensity>(&mut input);
        assert!(matches!(
            result,
            Err(TableError::Unsorted {
                line: 5,
                size,
                previous,
            }) if size == 20.0 && previous == 50.0
        ));
    }

    #[test]
    fn read_rejects_short_rows() {
        let mut input = Cursor::new("size (um),number fraction (-)\n1\n");
        let result = CsvTable::read_from::<NumberFraction>(&mut input);
        assert!(matches!(result, Err(TableError::ColumnCount { .. })));
    }

    #[test]
    fn path_helpers_persist_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CSD(number).csv");
        let table = NumberFractions::from_columns(&[0.5, 1.5, 2.5], &[0.2, 0.3, 0.5]).unwrap();

        CsvTable::write_to_path(&table, &path).unwrap();
        let loaded: NumberFractions = CsvTable::read_from_path(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result: Result<NumberFractions, _> =
            CsvTable::read_from_path(dir.path().join("absent.csv"));
        assert!(matches!(result, Err(TableError::Io(_))));
    }

    #[test]
    fn header_labels_round_trip() {
        assert_eq!(header_label("size", "um"), "size (um)");
        assert_eq!(
            parse_header_label(" population density (1/um^4) "),
            Some(("population density", "1/um^4"))
        );
        assert_eq!(parse_header_label("size"), None);
    }
}
