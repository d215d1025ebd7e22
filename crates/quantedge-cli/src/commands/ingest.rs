//! Per-symbol fetch → normalize → encode → upload loop.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use quantedge_core::{
    build_object_path, normalize, BinanceKlines, HttpClient, Pager, ReqwestHttpClient,
    ResilientFetcher, RetryPolicy, SeriesKey, Sleeper, Symbol, TokioSleeper,
};
use quantedge_store::{GcsStore, ObjectStore, PARQUET_CONTENT_TYPE};

use crate::cli::IngestArgs;
use crate::config::IngestConfig;
use crate::error::{CliError, SymbolError};

pub async fn run(args: &IngestArgs) -> Result<(), CliError> {
    let config = IngestConfig::resolve(args)?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);

    let mut provider = BinanceKlines::new(http.clone());
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    let fetcher = ResilientFetcher::new(
        Arc::new(provider),
        RetryPolicy::default(),
        sleeper.clone(),
    );
    let pager = Pager::new(fetcher, sleeper);

    let mut store = GcsStore::new(http, &config.bucket);
    if let Ok(token) = std::env::var(&config.auth_token_env) {
        store = store.with_bearer_token(token);
    }
    if let Some(project) = &config.project_id {
        store = store.with_quota_project(project.clone());
    }

    let run_id = Uuid::new_v4();
    info!(
        %run_id,
        bucket = config.bucket.as_str(),
        interval = config.interval.as_str(),
        start = %config.range.start(),
        end = %config.range.end(),
        symbols = config.symbols.len(),
        "starting ingest run"
    );

    let mut failed = 0usize;
    for symbol in &config.symbols {
        if let Err(source) = ingest_symbol(&pager, &store, &config, symbol).await {
            error!(symbol = symbol.as_str(), "ingestion failed: {source}");
            if config.fail_fast {
                return Err(CliError::Symbol {
                    symbol: symbol.as_str().to_owned(),
                    source,
                });
            }
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: config.symbols.len(),
        });
    }
    info!(%run_id, "ingest run complete");
    Ok(())
}

/// One symbol's isolated pipeline. The sink write happens only after
/// the full normalized table is assembled, so a failure leaves no
/// partial object behind.
async fn ingest_symbol(
    pager: &Pager,
    store: &GcsStore,
    config: &IngestConfig,
    symbol: &Symbol,
) -> Result<(), SymbolError> {
    let key = SeriesKey::binance(symbol.clone(), config.interval);
    let raw = pager.page(&key, config.range).await?;
    let rows = normalize(raw, &key, config.range);

    if rows.is_empty() {
        warn!(
            symbol = symbol.as_str(),
            interval = config.interval.as_str(),
            "provider returned no candles for the window; skipping upload"
        );
        return Ok(());
    }

    let bytes = quantedge_store::to_parquet_bytes(&rows)?;
    let path = build_object_path(
        &config.prefix,
        symbol,
        config.interval,
        quantedge_core::UtcDateTime::now().date(),
    );
    store.put(&path, bytes, PARQUET_CONTENT_TYPE).await?;

    let destination = format!("gs://{}/{}", store.bucket(), path);
    info!(
        symbol = symbol.as_str(),
        rows = rows.len(),
        destination = %destination,
        "uploaded normalized candles"
    );
    Ok(())
}
