//! Batch command implementation.

use super::read_response;
use crate::cli::{BatchArgs, SchemaArg};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use sift_extractor::ExtractionPipeline;

/// Execute the batch command.
pub async fn execute_batch(
    args: BatchArgs,
    pipeline: &ExtractionPipeline,
    formatter: &Formatter,
) -> Result<()> {
    if args.expected == 0 {
        return Err(CliError::InvalidInput(
            "Expected tenant count must be at least 1".to_string(),
        ));
    }

    let schema = args.schema.resolve(SchemaArg::BankMatch)?;
    let text = read_response(args.file.as_deref()).await?;

    // Non-text input takes the empty-input path
    let records = pipeline.run_batch(text.as_deref().unwrap_or_default(), &schema, args.expected);
    let failed = records.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} of {} record(s) could not be recovered", failed, records.len()))
        );
    }
    println!("{}", formatter.format_records(&records)?);

    Ok(())
}
