use std::io::Cursor;

use polars::prelude::*;
use tracing::info;

use crate::assembler::drop_index_artifacts;
use crate::error::NamesError;
use crate::loader::require_columns;
use crate::schema::corpus;

/// Fetch the published enriched corpus snapshot via plain HTTP GET.
///
/// The pipeline is synchronous end to end, so this uses the blocking
/// client. A non-2xx status is an error; the body is parsed with schema
/// inference since the snapshot carries numeric feature columns.
pub fn fetch_features(url: &str) -> Result<DataFrame, NamesError> {
    info!(url, "fetching enriched corpus snapshot");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let body = response.bytes()?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(body.to_vec()))
        .finish()?;

    let df = drop_index_artifacts(df)?;
    require_columns(&df, &corpus::ALL)?;

    info!(rows = df.height(), "snapshot fetched");
    Ok(df)
}
