use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::config::{CorpusConfig, NameFilter};
use crate::error::NamesError;
use crate::loader::{load_names, read_csv_as_strings, require_columns};
use crate::schema::corpus;

/// Build the unified corpus over the full (year x district) cross product.
///
/// Iterates the explicit district list from the config (not a directory
/// listing) in year-ascending order, so row order is deterministic. Any
/// failing cell aborts the whole build: a partial corpus would silently
/// skew every per-name aggregate derived from it.
pub fn assemble(config: &CorpusConfig) -> Result<DataFrame, NamesError> {
    info!(
        data_dir = %config.data_dir.display(),
        years = ?config.years,
        districts = config.districts.len(),
        "assembling corpus"
    );

    let mut frames: Vec<LazyFrame> = Vec::new();
    for year in config.years.clone() {
        for kiez in &config.districts {
            let df = load_names(&config.data_dir, year, kiez)?;
            debug!(year, kiez, rows = df.height(), "loaded cell");
            // Fix the column order so the concat below sees one schema.
            frames.push(df.select(corpus::ALL)?.lazy());
        }
    }

    let lazy = concat(&frames, UnionArgs::default())?;
    let df = lazy.filter(keep_predicate(config.name_filter)).collect()?;

    validate_natural_key(&df)?;

    info!(rows = df.height(), "corpus assembled");
    Ok(df)
}

/// Rows to keep under the given filter rule. Parenthesized names are
/// annotated/uncertain entries in the source; hyphenated names are compound.
fn keep_predicate(filter: NameFilter) -> Expr {
    let mut dropped = col(corpus::NAME)
        .str()
        .contains_literal(lit("("))
        .or(col(corpus::NAME).str().contains_literal(lit(")")));
    if filter == NameFilter::AnnotatedAndCompound {
        dropped = dropped.or(col(corpus::NAME).str().contains_literal(lit("-")));
    }
    dropped.not()
}

/// `(name, gender, position, year, kiez)` is the natural key of the corpus.
/// Overlapping source files would duplicate it and double-count every
/// downstream total, so duplicates fail the build.
fn validate_natural_key(df: &DataFrame) -> Result<(), NamesError> {
    let key: Vec<Expr> = corpus::NATURAL_KEY.iter().map(|c| col(*c)).collect();
    let duplicates = df
        .clone()
        .lazy()
        .group_by(key)
        .agg([len().alias("rows")])
        .filter(col("rows").gt(lit(1u32)))
        .collect()?;

    if duplicates.height() > 0 {
        return Err(NamesError::DataQuality(format!(
            "{} duplicate (name, gender, position, year, kiez) keys in corpus",
            duplicates.height()
        )));
    }
    Ok(())
}

/// Write-once export of an assembled corpus.
pub fn write_corpus(df: &DataFrame, path: &Path) -> Result<(), NamesError> {
    let mut out = df.clone();
    let file = File::create(path)?;
    CsvWriter::new(file).finish(&mut out)?;
    info!(path = %path.display(), rows = df.height(), "corpus written");
    Ok(())
}

/// Re-load a persisted corpus export into the canonical layout.
///
/// Index columns introduced by serialization round-trips (unnamed or
/// `Unnamed*` headers) are dropped.
pub fn read_corpus(path: &Path) -> Result<DataFrame, NamesError> {
    if !path.is_file() {
        return Err(NamesError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let df = drop_index_artifacts(read_csv_as_strings(path)?)?;
    require_columns(&df, &corpus::ALL)?;

    let df = df
        .lazy()
        .with_columns([
            col(corpus::POSITION).cast(DataType::Int8),
            col(corpus::YEAR).strict_cast(DataType::Int32),
            col(corpus::COUNT).strict_cast(DataType::Int16),
        ])
        .select(corpus::ALL.map(col))
        .collect()
        .map_err(|e| {
            NamesError::DataQuality(format!("{}: corpus reload failed: {e}", path.display()))
        })?;

    Ok(df)
}

pub(crate) fn drop_index_artifacts(df: DataFrame) -> Result<DataFrame, NamesError> {
    let keep: Vec<String> = df
        .get_column_names_str()
        .iter()
        .filter(|c| !c.is_empty() && !c.starts_with("Unnamed"))
        .map(|c| c.to_string())
        .collect();
    if keep.len() == df.width() {
        return Ok(df);
    }
    Ok(df.select(keep)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_file(dir: &Path, year: i32, kiez: &str, body: &str) {
        let year_dir = dir.join(year.to_string());
        fs::create_dir_all(&year_dir).unwrap();
        fs::write(year_dir.join(format!("{kiez}.csv")), body).unwrap();
    }

    fn two_cell_config(dir: &Path) -> CorpusConfig {
        let mut config = CorpusConfig::new(dir);
        config.years = 2014..=2015;
        config.districts = vec!["mitte".into(), "pankow".into()];
        config
    }

    fn seed_two_cells(dir: &Path) {
        write_file(dir, 2014, "mitte", "vorname,geschlecht,anzahl\nEmma,w,40\nNoah,m,30\n");
        write_file(dir, 2014, "pankow", "vorname,geschlecht,anzahl\nEmma,w,25\n");
        write_file(
            dir,
            2015,
            "mitte",
            "vorname,geschlecht,anzahl,position\nEmma,w,41,1\nNoah,m,28,1\n",
        );
        write_file(dir, 2015, "pankow", "vorname,geschlecht,anzahl,position\nIda,w,7,2\n");
    }

    #[test]
    fn concatenates_all_cells_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        seed_two_cells(tmp.path());

        let df = assemble(&two_cell_config(tmp.path())).unwrap();
        assert_eq!(df.height(), 6);
        // Year ascending, district order as configured.
        let years: Vec<Option<i32>> = df.column("year").unwrap().i32().unwrap().iter().collect();
        assert_eq!(
            years,
            vec![Some(2014), Some(2014), Some(2014), Some(2015), Some(2015), Some(2015)]
        );
    }

    #[test]
    fn annotated_filter_drops_parenthesized_names_only() {
        let tmp = tempfile::tempdir().unwrap();
        seed_two_cells(tmp.path());
        write_file(
            tmp.path(),
            2014,
            "mitte",
            "vorname,geschlecht,anzahl\nEmma,w,40\nMarie (Maria),w,5\nAnna-Lena,w,4\n",
        );

        let config = two_cell_config(tmp.path()).with_name_filter(NameFilter::Annotated);
        let df = assemble(&config).unwrap();
        let names: Vec<&str> = df
            .column("name")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert!(!names.contains(&"Marie (Maria)"));
        assert!(names.contains(&"Anna-Lena"));
    }

    #[test]
    fn compound_filter_also_drops_hyphenated_names() {
        let tmp = tempfile::tempdir().unwrap();
        seed_two_cells(tmp.path());
        write_file(
            tmp.path(),
            2014,
            "mitte",
            "vorname,geschlecht,anzahl\nEmma,w,40\nMarie (Maria),w,5\nAnna-Lena,w,4\n",
        );

        let config =
            two_cell_config(tmp.path()).with_name_filter(NameFilter::AnnotatedAndCompound);
        let df = assemble(&config).unwrap();
        let names: Vec<&str> = df
            .column("name")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert!(!names.contains(&"Marie (Maria)"));
        assert!(!names.contains(&"Anna-Lena"));
    }

    /// A missing cell aborts the whole build instead of silently skipping.
    #[test]
    fn missing_cell_fails_the_build() {
        let tmp = tempfile::tempdir().unwrap();
        seed_two_cells(tmp.path());
        fs::remove_file(tmp.path().join("2015").join("pankow.csv")).unwrap();

        let err = assemble(&two_cell_config(tmp.path())).unwrap_err();
        assert!(matches!(err, NamesError::NotFound { .. }));
    }

    #[test]
    fn duplicate_natural_key_fails_the_build() {
        let tmp = tempfile::tempdir().unwrap();
        seed_two_cells(tmp.path());
        write_file(
            tmp.path(),
            2014,
            "mitte",
            "vorname,geschlecht,anzahl\nEmma,w,40\nEmma,w,12\n",
        );

        let err = assemble(&two_cell_config(tmp.path())).unwrap_err();
        assert!(matches!(err, NamesError::DataQuality(_)));
    }

    /// Persisting and reloading a corpus yields the identical tuple set.
    #[test]
    fn corpus_round_trips_through_csv() {
        let tmp = tempfile::tempdir().unwrap();
        seed_two_cells(tmp.path());

        let df = assemble(&two_cell_config(tmp.path())).unwrap();
        let out = tmp.path().join("names_combined_raw.csv");
        write_corpus(&df, &out).unwrap();

        let reloaded = read_corpus(&out).unwrap();
        assert!(df.equals(&reloaded));
    }

    #[test]
    fn reload_drops_unnamed_index_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("corpus.csv");
        fs::write(
            &out,
            ",name,gender,position,year,kiez,count\n0,Emma,w,1,2014,mitte,40\n",
        )
        .unwrap();

        let df = read_corpus(&out).unwrap();
        assert_eq!(df.width(), 6);
        assert_eq!(df.height(), 1);
    }
}
