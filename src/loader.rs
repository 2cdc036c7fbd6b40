use std::path::Path;

use polars::prelude::*;

use crate::error::NamesError;
use crate::schema::{corpus, raw};

/// Load the name file for one (year, district) cell into the canonical
/// corpus layout.
///
/// The district argument may be given with or without a `.csv` suffix; the
/// suffix is stripped for the `kiez` label. Source columns are renamed to
/// canonical names, `count` is coerced strictly to Int16, `position` is
/// coerced best-effort to Int8 (defaulting to 1 for years where the column
/// does not exist), and `year`/`kiez` tag columns are attached.
pub fn load_names(data_dir: &Path, year: i32, kiez: &str) -> Result<DataFrame, NamesError> {
    let kiez_label = kiez.strip_suffix(".csv").unwrap_or(kiez);

    let year_dir = data_dir.join(year.to_string());
    if !year_dir.is_dir() {
        return Err(NamesError::NotFound { path: year_dir });
    }
    let path = year_dir.join(format!("{kiez_label}.csv"));
    if !path.is_file() {
        return Err(NamesError::NotFound { path });
    }

    let raw_df = read_csv_as_strings(&path)?;
    require_columns(&raw_df, &[raw::VORNAME, raw::GESCHLECHT, raw::ANZAHL])?;
    let has_position = raw_df.schema().contains(raw::POSITION);

    let mut lazy = raw_df.lazy().rename(
        [raw::VORNAME, raw::GESCHLECHT, raw::ANZAHL],
        [corpus::NAME, corpus::GENDER, corpus::COUNT],
        true,
    );

    // Best-effort position: failed coercions become null rather than
    // aborting the load. Pre-2017 files have no position column at all and
    // every record counts as a first name.
    if has_position {
        lazy = lazy.with_columns([col(corpus::POSITION).cast(DataType::Int8)]);
    } else {
        lazy = lazy.with_columns([lit(1).cast(DataType::Int8).alias(corpus::POSITION)]);
    }

    let df = lazy
        .with_columns([
            lit(year).alias(corpus::YEAR),
            lit(kiez_label.to_string()).alias(corpus::KIEZ),
        ])
        .collect()?;

    // Count is load-bearing for every downstream aggregate, so a value that
    // fails numeric coercion is a data-quality failure, not a null.
    let df = df
        .lazy()
        .with_columns([col(corpus::COUNT).strict_cast(DataType::Int16)])
        .collect()
        .map_err(|e| {
            NamesError::DataQuality(format!(
                "{}: count column failed Int16 coercion: {e}",
                path.display()
            ))
        })?;

    Ok(df)
}

/// Read a CSV file with all columns as String dtype and whitespace-trimmed
/// column names.
pub(crate) fn read_csv_as_strings(path: &Path) -> Result<DataFrame, NamesError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), NamesError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(NamesError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, year: i32, kiez: &str, body: &str) {
        let year_dir = dir.join(year.to_string());
        fs::create_dir_all(&year_dir).unwrap();
        fs::write(year_dir.join(format!("{kiez}.csv")), body).unwrap();
    }

    #[test]
    fn loads_file_with_position_column() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            2018,
            "mitte",
            "vorname,geschlecht,anzahl,position\nEmma,w,42,1\nNoah,m,37,2\n",
        );

        let df = load_names(tmp.path(), 2018, "mitte").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("count").unwrap().dtype(), &DataType::Int16);
        assert_eq!(df.column("position").unwrap().dtype(), &DataType::Int8);
        assert_eq!(
            df.column("kiez").unwrap().str().unwrap().get(0),
            Some("mitte")
        );
        assert_eq!(df.column("year").unwrap().i32().unwrap().get(1), Some(2018));
    }

    /// Pre-2017 files carry no position column; every record is a first name.
    #[test]
    fn missing_position_column_defaults_to_one() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            2014,
            "mitte",
            "vorname,geschlecht,anzahl\nMia,w,12\nBen,m,9\n",
        );

        let df = load_names(tmp.path(), 2014, "mitte").unwrap();
        let position = df.column("position").unwrap().i8().unwrap();
        assert!(position.into_iter().all(|p| p == Some(1)));
    }

    #[test]
    fn csv_suffix_on_district_is_stripped() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), 2015, "pankow", "vorname,geschlecht,anzahl\nIda,w,3\n");

        let df = load_names(tmp.path(), 2015, "pankow.csv").unwrap();
        assert_eq!(
            df.column("kiez").unwrap().str().unwrap().get(0),
            Some("pankow")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("2012")).unwrap();

        let err = load_names(tmp.path(), 2012, "atlantis").unwrap_err();
        assert!(matches!(err, NamesError::NotFound { .. }));
    }

    #[test]
    fn missing_year_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_names(tmp.path(), 2011, "mitte").unwrap_err();
        assert!(matches!(err, NamesError::NotFound { .. }));
    }

    #[test]
    fn garbage_count_is_a_data_quality_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            2019,
            "spandau",
            "vorname,geschlecht,anzahl\nLina,w,many\n",
        );

        let err = load_names(tmp.path(), 2019, "spandau").unwrap_err();
        assert!(matches!(err, NamesError::DataQuality(_)));
    }

    #[test]
    fn unparseable_position_becomes_null() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            2020,
            "mitte",
            "vorname,geschlecht,anzahl,position\nOtto,m,5,first\n",
        );

        let df = load_names(tmp.path(), 2020, "mitte").unwrap();
        assert_eq!(df.column("position").unwrap().i8().unwrap().get(0), None);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), 2013, "mitte", "vorname,anzahl\nKarl,4\n");

        let err = load_names(tmp.path(), 2013, "mitte").unwrap_err();
        assert!(matches!(err, NamesError::MissingColumn(c) if c == "geschlecht"));
    }
}
