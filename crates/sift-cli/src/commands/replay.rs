//! Replay command implementation.
//!
//! Every file is read and recovered on its own task, all feeding the same
//! telemetry, then the aggregate strategy usage is reported.

use super::decode_response;
use crate::cli::{ReplayArgs, SchemaArg};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use sift_domain::Record;
use sift_extractor::ExtractionPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::warn;

/// Execute the replay command.
pub async fn execute_replay(
    args: ReplayArgs,
    pipeline: Arc<ExtractionPipeline>,
    formatter: &Formatter,
) -> Result<()> {
    let schema = Arc::new(args.schema.resolve(SchemaArg::Upi)?);
    let records = replay_files(args.files, pipeline.clone(), schema).await?;

    println!("{}", formatter.format_records(&records)?);

    let snapshot = pipeline.telemetry().snapshot();
    eprintln!("{}", formatter.format_performance(&snapshot.into())?);
    eprintln!("{}", formatter.info(&snapshot.summary()));

    Ok(())
}

/// Recover one record per readable file, preserving argument order.
async fn replay_files(
    files: Vec<PathBuf>,
    pipeline: Arc<ExtractionPipeline>,
    schema: Arc<sift_domain::Schema>,
) -> Result<Vec<Record>> {
    let mut tasks = JoinSet::new();
    for (position, path) in files.into_iter().enumerate() {
        let pipeline = pipeline.clone();
        let schema = schema.clone();
        tasks.spawn(async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable response file");
                    return Ok::<_, CliError>(None);
                }
            };
            let text = decode_response(bytes);
            let record = tokio::task::spawn_blocking(move || {
                pipeline.run_maybe(text.as_deref(), &schema)
            })
            .await?;
            Ok(Some((position, record)))
        });
    }

    let mut recovered = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        if let Some(entry) = joined?? {
            recovered.push(entry);
        }
    }
    recovered.sort_by_key(|(position, _)| *position);
    Ok(recovered.into_iter().map(|(_, record)| record).collect())
}
