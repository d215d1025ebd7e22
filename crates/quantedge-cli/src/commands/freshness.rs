//! Load a freshness manifest into the warehouse log table.

use tracing::info;

use quantedge_warehouse::{FreshnessLog, FreshnessManifest};

use crate::cli::FreshnessArgs;
use crate::error::CliError;

pub fn run(args: &FreshnessArgs) -> Result<(), CliError> {
    let manifest = FreshnessManifest::load(&args.manifest)?;
    let records = manifest.records();

    let log = FreshnessLog::open(&args.database)?;
    log.ensure_table()?;
    let inserted = log.append(&records)?;

    info!(
        database = %args.database.display(),
        inserted,
        generated_at = %manifest.generated_at,
        "appended freshness rows"
    );
    Ok(())
}
