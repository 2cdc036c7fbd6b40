use std::ops::RangeInclusive;
use std::path::PathBuf;

/// First year with published per-district name files.
pub const FIRST_YEAR: i32 = 2012;
/// Most recent year covered by the dataset.
pub const LAST_YEAR: i32 = 2022;

/// The 12 Berlin districts, sorted. Assembly iterates this list rather than
/// a directory listing so the corpus row order is reproducible everywhere.
pub const DISTRICTS: [&str; 12] = [
    "charlottenburg-wilmersdorf",
    "friedrichshain-kreuzberg",
    "lichtenberg",
    "marzahn-hellersdorf",
    "mitte",
    "neukoelln",
    "pankow",
    "reinickendorf",
    "spandau",
    "steglitz-zehlendorf",
    "tempelhof-schoeneberg",
    "treptow-koepenick",
];

/// Row filter applied while assembling the corpus.
///
/// Parentheses mark annotated/uncertain entries in the source, hyphens mark
/// compound names. The two variants existed side by side upstream; the
/// assembler takes the rule explicitly instead of hard-coding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameFilter {
    /// Drop names containing a parenthesis.
    Annotated,
    /// Drop names containing a parenthesis or a hyphen.
    #[default]
    AnnotatedAndCompound,
}

/// Everything the assembler needs to build a corpus.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Root of the cleaned dataset: `<data_dir>/<year>/<district>.csv`.
    pub data_dir: PathBuf,
    pub years: RangeInclusive<i32>,
    pub districts: Vec<String>,
    pub name_filter: NameFilter,
}

impl CorpusConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            years: FIRST_YEAR..=LAST_YEAR,
            districts: DISTRICTS.iter().map(|d| d.to_string()).collect(),
            name_filter: NameFilter::default(),
        }
    }

    pub fn with_name_filter(mut self, filter: NameFilter) -> Self {
        self.name_filter = filter;
        self
    }
}
