//! kiezname CLI — thin entry point over the library pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use kiezname::schema::corpus;
use kiezname::{
    add_features, assemble, fetch_features, filter_gender, filter_kiez, first_names_only,
    gender_range, similar_names, to_timeseries, write_corpus, write_features, CorpusConfig,
    GenderFilter, NameFilter,
};

#[derive(Parser)]
#[command(
    name = "kiezname",
    version,
    about = "Batch pipeline over Berlin's registered first-name dataset (2012-2022)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    /// Drop parenthesized (annotated) names only
    Annotated,
    /// Drop parenthesized and hyphenated (compound) names
    AnnotatedAndCompound,
}

impl From<FilterArg> for NameFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Annotated => NameFilter::Annotated,
            FilterArg::AnnotatedAndCompound => NameFilter::AnnotatedAndCompound,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenderArg {
    All,
    Girls,
    Boys,
}

impl From<GenderArg> for GenderFilter {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::All => GenderFilter::All,
            GenderArg::Girls => GenderFilter::Girls,
            GenderArg::Boys => GenderFilter::Boys,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Assemble the unified raw corpus from the per-(year, district) files
    Assemble {
        #[arg(long)]
        data_dir: PathBuf,
        /// Write the assembled corpus to this CSV instead of printing a preview
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "annotated-and-compound")]
        filter: FilterArg,
    },
    /// Assemble the corpus and derive the per-name feature columns
    Features {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "annotated-and-compound")]
        filter: FilterArg,
    },
    /// Print the top-N names as a year-indexed time series
    Top {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long, default_value_t = 30)]
        top_n: usize,
        /// District selection; repeat for several, omit for all of Berlin
        #[arg(long = "kiez")]
        kiez: Vec<String>,
        #[arg(long, value_enum, default_value = "all")]
        gender: GenderArg,
        /// Include middle names instead of first given names only
        #[arg(long)]
        all_positions: bool,
    },
    /// Print names whose gender scale falls in a range, aggregated per name
    Genders {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long, default_value_t = 0.25)]
        lo: f32,
        #[arg(long, default_value_t = 0.75)]
        hi: f32,
    },
    /// Find the names orthographically closest to a given name
    Similar {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 10)]
        n: usize,
    },
    /// Fetch the published enriched corpus snapshot over HTTP
    Fetch {
        #[arg(long)]
        url: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Assemble {
            data_dir,
            out,
            filter,
        } => {
            let config = CorpusConfig::new(data_dir).with_name_filter(filter.into());
            let df = assemble(&config)?;
            match out {
                Some(path) => write_corpus(&df, &path)?,
                None => println!("{}", df.head(Some(20))),
            }
        }
        Command::Features {
            data_dir,
            out,
            filter,
        } => {
            let config = CorpusConfig::new(data_dir).with_name_filter(filter.into());
            let df = add_features(&assemble(&config)?)?;
            match out {
                Some(path) => write_features(&df, &path)?,
                None => println!("{}", df.head(Some(20))),
            }
        }
        Command::Top {
            data_dir,
            top_n,
            kiez,
            gender,
            all_positions,
        } => {
            let config = CorpusConfig::new(data_dir);
            let mut df = assemble(&config)?;
            if !all_positions {
                df = first_names_only(&df)?;
            }
            df = filter_gender(&df, gender.into())?;
            df = filter_kiez(&df, &kiez)?;
            let ts = to_timeseries(&df, config.years.clone(), top_n)?;
            println!("{ts}");
        }
        Command::Genders { data_dir, lo, hi } => {
            let config = CorpusConfig::new(data_dir);
            let df = add_features(&assemble(&config)?)?;
            let out = gender_range(&df, lo, hi)?;
            println!("{out}");
        }
        Command::Similar { data_dir, name, n } => {
            let config = CorpusConfig::new(data_dir);
            let df = assemble(&config)?;
            let mut candidates: Vec<String> = df
                .column(corpus::NAME)?
                .str()?
                .into_no_null_iter()
                .map(str::to_string)
                .collect();
            candidates.sort();
            candidates.dedup();

            for (candidate, distance) in similar_names(&name, &candidates, n) {
                println!("{candidate}\t{distance}");
            }
        }
        Command::Fetch { url } => {
            let df = fetch_features(&url)?;
            println!("{}", df.head(Some(20)));
        }
    }

    Ok(())
}
