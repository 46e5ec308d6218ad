//! Recover command implementation.

use super::read_response;
use crate::cli::{RecoverArgs, SchemaArg};
use crate::error::Result;
use crate::output::Formatter;
use sift_extractor::ExtractionPipeline;

/// Execute the recover command.
pub async fn execute_recover(
    args: RecoverArgs,
    pipeline: &ExtractionPipeline,
    formatter: &Formatter,
) -> Result<()> {
    let schema = args.schema.resolve(SchemaArg::Upi)?;
    let text = read_response(args.file.as_deref()).await?;

    let record = pipeline.run_maybe(text.as_deref(), &schema);
    if let Some(message) = record.error() {
        eprintln!("{}", formatter.error(message));
    }
    println!("{}", formatter.format_record(&record)?);

    Ok(())
}
