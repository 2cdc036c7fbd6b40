use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::NamesError;
use crate::schema::{category, corpus, features, gender};

/// Augment an assembled corpus with the derived per-name attributes:
/// `unisex_score`, `gender_scale`, `gender_category` and the composite
/// `name_key`. The input frame is not modified; a new frame is returned.
///
/// Scores are computed over the whole corpus (all years, districts and
/// positions of a name share one score) in Float32. "Observed" means the
/// gender occurs in the grouped totals at all, not that its total is
/// nonzero.
pub fn add_features(df: &DataFrame) -> Result<DataFrame, NamesError> {
    validate_gender_domain(df)?;

    // Per-(name, gender) totals, independent of year and district.
    let totals = df
        .clone()
        .lazy()
        .group_by([col(corpus::NAME), col(corpus::GENDER)])
        .agg([col(corpus::COUNT)
            .cast(DataType::Int64)
            .sum()
            .alias("total")]);

    let per_name = totals.group_by([col(corpus::NAME)]).agg([
        col("total")
            .filter(col(corpus::GENDER).eq(lit(gender::FEMALE)))
            .sum()
            .alias(features::FEMALE_TOTAL),
        col("total")
            .filter(col(corpus::GENDER).eq(lit(gender::MALE)))
            .sum()
            .alias(features::MALE_TOTAL),
        col(corpus::GENDER)
            .eq(lit(gender::FEMALE))
            .any(false)
            .alias("has_female"),
        col(corpus::GENDER)
            .eq(lit(gender::MALE))
            .any(false)
            .alias("has_male"),
    ]);

    let female = col(features::FEMALE_TOTAL).cast(DataType::Float32);
    let male = col(features::MALE_TOTAL).cast(DataType::Float32);
    let both = col("has_female").and(col("has_male"));

    // min/max ratio: 0 = strictly single-gender, 1 = perfectly balanced.
    let ratio = when(female.clone().lt_eq(male.clone()))
        .then(female.clone() / male.clone())
        .otherwise(male.clone() / female.clone());
    let unisex_score = when(both.clone())
        .then(ratio)
        .otherwise(lit(0.0f32))
        .cast(DataType::Float32)
        .alias(features::UNISEX_SCORE);

    // Share of female registrations: 0 = exclusively male, 1 = exclusively
    // female; degenerate when only one gender was observed.
    let gender_scale = when(both)
        .then(female.clone() / (female + male))
        .when(col("has_female"))
        .then(lit(1.0f32))
        .otherwise(lit(0.0f32))
        .cast(DataType::Float32)
        .alias(features::GENDER_SCALE);

    let scores = per_name
        .with_columns([unisex_score, gender_scale])
        .with_columns([gender_category_expr()])
        .select([
            col(corpus::NAME),
            col(features::UNISEX_SCORE),
            col(features::GENDER_SCALE),
            col(features::GENDER_CATEGORY),
        ]);

    // Broadcast the per-name scalars back onto every corpus row.
    let enriched = df
        .clone()
        .lazy()
        .join(
            scores,
            [col(corpus::NAME)],
            [col(corpus::NAME)],
            JoinArgs::new(JoinType::Left),
        )
        .with_columns([concat_str(
            [
                col(corpus::NAME),
                col(corpus::GENDER),
                col(corpus::POSITION).cast(DataType::String),
            ],
            "_",
            false,
        )
        .alias(features::NAME_KEY)])
        .collect()?;

    Ok(enriched)
}

/// 5-bin categorical over `gender_scale`: upper-inclusive bins with 0.0 in
/// the lowest bin, total over [0, 1] with no gaps or overlaps.
fn gender_category_expr() -> Expr {
    let scale = col(features::GENDER_SCALE);
    when(scale.clone().lt_eq(lit(category::UPPER_EDGES[0])))
        .then(lit(category::PREDOMINANTLY_MALE))
        .when(scale.clone().lt_eq(lit(category::UPPER_EDGES[1])))
        .then(lit(category::MALE_LEANING_UNISEX))
        .when(scale.clone().lt_eq(lit(category::UPPER_EDGES[2])))
        .then(lit(category::TRUE_UNISEX))
        .when(scale.lt_eq(lit(category::UPPER_EDGES[3])))
        .then(lit(category::FEMALE_LEANING_UNISEX))
        .otherwise(lit(category::PREDOMINANTLY_FEMALE))
        .alias(features::GENDER_CATEGORY)
}

/// The score formulas branch on which of {m, w} were observed; any other
/// gender value would silently compute wrong scores, so it fails here.
fn validate_gender_domain(df: &DataFrame) -> Result<(), NamesError> {
    let known = Series::new(
        corpus::GENDER.into(),
        [gender::MALE, gender::FEMALE],
    );
    let bad = df
        .clone()
        .lazy()
        .filter(col(corpus::GENDER).is_in(lit(known), false).not())
        .collect()?;

    if bad.height() > 0 {
        return Err(NamesError::DataQuality(format!(
            "{} rows carry a gender outside {{m, w}}",
            bad.height()
        )));
    }
    Ok(())
}

/// Write-once export of an enriched corpus.
pub fn write_features(df: &DataFrame, path: &Path) -> Result<(), NamesError> {
    let mut out = df.clone();
    let file = File::create(path)?;
    CsvWriter::new(file).finish(&mut out)?;
    info!(path = %path.display(), rows = df.height(), "features written");
    Ok(())
}
