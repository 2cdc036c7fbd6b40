use std::ops::RangeInclusive;

use polars::prelude::*;

use crate::error::NamesError;
use crate::schema::{corpus, features, gender};

/// Gender selection for query transforms. `All` is the "show everything"
/// default used when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    All,
    Girls,
    Boys,
}

/// Restrict a frame to one registered gender. `All` returns the frame
/// unchanged.
pub fn filter_gender(df: &DataFrame, filter: GenderFilter) -> Result<DataFrame, NamesError> {
    let value = match filter {
        GenderFilter::All => return Ok(df.clone()),
        GenderFilter::Girls => gender::FEMALE,
        GenderFilter::Boys => gender::MALE,
    };
    let out = df
        .clone()
        .lazy()
        .filter(col(corpus::GENDER).eq(lit(value)))
        .collect()?;
    Ok(out)
}

/// Keep first given names only (`position == 1`). Rows whose position failed
/// coercion (null) are excluded as well.
pub fn first_names_only(df: &DataFrame) -> Result<DataFrame, NamesError> {
    let out = df
        .clone()
        .lazy()
        .filter(col(corpus::POSITION).eq(lit(1)))
        .collect()?;
    Ok(out)
}

/// Restrict to a district selection and merge the surviving districts:
/// rows are re-aggregated by `(name, gender, year)` with counts summed, so a
/// multi-district selection behaves like one combined district. An empty
/// selection means all of Berlin.
pub fn filter_kiez(df: &DataFrame, districts: &[String]) -> Result<DataFrame, NamesError> {
    let mut lazy = df.clone().lazy();
    if !districts.is_empty() {
        let selection = Series::new(corpus::KIEZ.into(), districts);
        lazy = lazy.filter(col(corpus::KIEZ).is_in(lit(selection), false));
    }

    let out = lazy
        .group_by([col(corpus::NAME), col(corpus::GENDER), col(corpus::YEAR)])
        .agg([col(corpus::COUNT)
            .cast(DataType::Int64)
            .sum()
            .alias(corpus::COUNT)])
        .collect()?;

    let out = out.sort(
        [corpus::COUNT],
        SortMultipleOptions::default().with_order_descending(true),
    )?;
    Ok(out)
}

/// Case-insensitive name multi-select. An empty selection keeps every name.
pub fn filter_names(df: &DataFrame, names: &[String]) -> Result<DataFrame, NamesError> {
    if names.is_empty() {
        return Ok(df.clone());
    }
    let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    let selection = Series::new(corpus::NAME.into(), lowered);

    let out = df
        .clone()
        .lazy()
        .filter(
            col(corpus::NAME)
                .str()
                .to_lowercase()
                .is_in(lit(selection), false),
        )
        .collect()?;
    Ok(out)
}

/// Pivot a corpus into a wide year-indexed time series: one row per name,
/// one Int32 column per year, missing (name, year) cells filled with zero.
/// Rows are the `top_n` names by the most recent year's count, descending.
pub fn to_timeseries(
    df: &DataFrame,
    years: RangeInclusive<i32>,
    top_n: usize,
) -> Result<DataFrame, NamesError> {
    // Unique names as the pivot index.
    let mut wide = df
        .clone()
        .lazy()
        .group_by([col(corpus::NAME)])
        .agg(Vec::<Expr>::new());

    for year in years.clone() {
        let yearly = df
            .clone()
            .lazy()
            .filter(col(corpus::YEAR).eq(lit(year)))
            .group_by([col(corpus::NAME)])
            .agg([col(corpus::COUNT)
                .cast(DataType::Int32)
                .sum()
                .alias(year.to_string())]);
        wide = wide.join(
            yearly,
            [col(corpus::NAME)],
            [col(corpus::NAME)],
            JoinArgs::new(JoinType::Left),
        );
    }

    let zero_fill: Vec<Expr> = years
        .clone()
        .map(|year| col(year.to_string()).fill_null(lit(0i32)))
        .collect();
    let wide = wide.with_columns(zero_fill).collect()?;

    let latest = years.end().to_string();
    let wide = wide.sort(
        [latest],
        SortMultipleOptions::default().with_order_descending(true),
    )?;
    Ok(wide.head(Some(top_n)))
}

/// Names whose `gender_scale` lies in `[lo, hi]`, aggregated per name:
/// counts summed, scores averaged. This is the table behind the gender
/// association view.
pub fn gender_range(df: &DataFrame, lo: f32, hi: f32) -> Result<DataFrame, NamesError> {
    let out = df
        .clone()
        .lazy()
        .filter(
            col(features::GENDER_SCALE)
                .gt_eq(lit(lo))
                .and(col(features::GENDER_SCALE).lt_eq(lit(hi))),
        )
        .group_by([col(corpus::NAME)])
        .agg([
            col(corpus::COUNT)
                .cast(DataType::Int64)
                .sum()
                .alias(corpus::COUNT),
            col(features::GENDER_SCALE)
                .mean()
                .cast(DataType::Float32)
                .alias(features::GENDER_SCALE),
            col(features::UNISEX_SCORE)
                .mean()
                .cast(DataType::Float32)
                .alias(features::UNISEX_SCORE),
        ])
        .collect()?;

    let out = out.sort([corpus::NAME], SortMultipleOptions::default())?;
    Ok(out)
}
