//! docferry: uploads client documents to the practice platform from the
//! command line, with validation, chunking and retry handled by the
//! workflow crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use docferry_protocol::UploadTarget;
use docferry_transport::{ApiClient, StaticTokenProvider};
use docferry_upload::{HttpDocumentApi, ProgressSinks, RetryPolicy, Uploader};
use tracing::{error, info};

mod config;

use config::FileConfig;

#[derive(Parser, Debug)]
#[clap(name = "docferry")]
#[clap(about = "Upload client documents to the practice platform")]
#[clap(version)]
struct Args {
    /// Files to upload.
    #[clap(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// API base URL, e.g. https://api.example.com
    #[clap(long, env = "DOCFERRY_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for the ingestion API.
    #[clap(long, env = "DOCFERRY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Client the documents belong to.
    #[clap(long)]
    client_id: Option<String>,

    /// Business under the client, if any.
    #[clap(long)]
    business_id: Option<String>,

    /// Document category, e.g. receipt, bank-statement.
    #[clap(long)]
    document_type: Option<String>,

    /// Destination folder, if any.
    #[clap(long)]
    folder_id: Option<String>,

    /// TOML file supplying defaults for the options above.
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Upload attempts per file before giving up.
    #[clap(long)]
    max_retries: Option<u32>,

    /// Chunk size in MiB for files above the single-shot threshold.
    #[clap(long)]
    chunk_size_mib: Option<u64>,

    /// Skip server pre-flight validation; retry and progress still apply.
    #[clap(long)]
    no_validate: bool,
}

/// Flags and environment win over the config file.
struct Settings {
    base_url: String,
    token: String,
    target: UploadTarget,
    max_retries: u32,
    chunk_size: u64,
    no_validate: bool,
}

impl Settings {
    fn resolve(args: Args, file: FileConfig) -> anyhow::Result<(Self, Vec<PathBuf>)> {
        let base_url = args
            .base_url
            .or(file.base_url)
            .context("no base URL given (--base-url, DOCFERRY_BASE_URL or config file)")?;
        let token = args
            .token
            .or(file.token)
            .context("no API token given (--token, DOCFERRY_TOKEN or config file)")?;
        let client_id = args
            .client_id
            .or(file.client_id)
            .context("no client id given (--client-id or config file)")?;

        let target = UploadTarget {
            client_id,
            business_id: args.business_id.or(file.business_id),
            document_type: args
                .document_type
                .or(file.document_type)
                .unwrap_or_else(|| "general".to_owned()),
            folder_id: args.folder_id.or(file.folder_id),
        };

        let settings = Settings {
            base_url,
            token,
            target,
            max_retries: args.max_retries.or(file.max_retries).unwrap_or(3),
            chunk_size: args
                .chunk_size_mib
                .or(file.chunk_size_mib)
                .map(|mib| mib * 1024 * 1024)
                .unwrap_or(docferry_upload::DEFAULT_CHUNK_SIZE),
            no_validate: args.no_validate,
        };
        Ok((settings, args.files))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let (settings, files) = Settings::resolve(args, file_config)?;

    info!(
        "docferry v{} uploading {} file(s) for client {}",
        env!("CARGO_PKG_VERSION"),
        files.len(),
        settings.target.client_id
    );

    let tokens = Arc::new(StaticTokenProvider::new(settings.token.clone()));
    let client = ApiClient::new(&settings.base_url, tokens)?;
    let api = Arc::new(HttpDocumentApi::new(client));

    let uploader = Uploader::new(api)
        .with_chunk_size(settings.chunk_size)
        .with_retry_policy(RetryPolicy {
            max_attempts: settings.max_retries.max(1),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        });

    let total = files.len();
    let results = if settings.no_validate {
        let mut results = Vec::with_capacity(total);
        for (index, path) in files.iter().enumerate() {
            let sinks = ProgressSinks::new()
                .on_overall(Arc::new(move |pct| info!("file {}/{}: {pct}%", index + 1, total)));
            match uploader
                .upload_with_retry(path, &settings.target, &sinks)
                .await
            {
                Ok(result) => {
                    info!(file = %path.display(), document_id = %result.document_id, "uploaded");
                    results.push(result);
                }
                Err(err) => error!(file = %path.display(), error = %err, "upload failed"),
            }
            let done = ((index + 1) as f64 / total as f64 * 100.0).round() as u8;
            info!("batch: {done}%");
        }
        results
    } else {
        uploader
            .upload_many(
                &files,
                &settings.target,
                Some(Arc::new(move |index, pct| {
                    info!("file {}/{}: {pct}%", index + 1, total);
                })),
                Some(Arc::new(move |pct| info!("batch: {pct}%"))),
            )
            .await
    };

    for result in &results {
        info!(
            "{} -> {} ({} bytes, processing {})",
            result.file_name, result.document_id, result.file_size, result.processing_status
        );
    }

    if results.len() < total {
        bail!("{} of {} file(s) failed to upload", total - results.len(), total);
    }
    Ok(())
}
