mod report;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docreview_core::{
    DecisionRule, FolderClassifier, FolderKey, FolderStore, NameFilter, ResultMap,
    DEFAULT_AFFIRMATIVE, DEFAULT_DECISION_COLUMN, DEFAULT_NEGATIVE, DEFAULT_SPREADSHEET_EXTENSION,
};
use docreview_fs::{atomic_write_bytes, LocalFolderStore};
use docreview_sharepoint::{SharePointConfig, SharePointFolderStore};
use docreview_xlsx::XlsxTableReader;

use crate::report::ReportContext;

const TOKEN_ENV: &str = "DOCREVIEW_SHAREPOINT_TOKEN";

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyArg {
    Path,
    Name,
}

impl From<KeyArg> for FolderKey {
    fn from(value: KeyArg) -> Self {
        match value {
            KeyArg::Path => FolderKey::Path,
            KeyArg::Name => FolderKey::Name,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "docreview",
    about = "Classify case folders by the access decisions recorded in their spreadsheets."
)]
struct Args {
    /// Root folder to walk, as a '/'-delimited path inside the store.
    root: String,

    /// Read folders from this local directory.
    #[arg(long, value_name = "PATH", conflicts_with = "site_url", required_unless_present = "site_url")]
    dir: Option<PathBuf>,

    /// Read folders from this SharePoint site (e.g. `https://contoso.sharepoint.com/Teams/sager`).
    #[arg(long, value_name = "URL")]
    site_url: Option<String>,

    /// Read the SharePoint bearer token from a file (trailing newlines are trimmed).
    ///
    /// Defaults to the `DOCREVIEW_SHAREPOINT_TOKEN` environment variable.
    #[arg(long, value_name = "PATH", requires = "site_url")]
    token_file: Option<PathBuf>,

    /// Request timeout for SharePoint calls, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Only inspect folders named like case numbers (`ABC-2024-000123`).
    #[arg(long, conflicts_with = "name_pattern")]
    case_numbers: bool,

    /// Only inspect folders whose name matches this regular expression.
    #[arg(long, value_name = "REGEX")]
    name_pattern: Option<String>,

    /// How folders are identified in the report.
    #[arg(long, value_enum, default_value_t = KeyArg::Path)]
    key: KeyArg,

    /// Header of the decision column.
    #[arg(long, default_value = DEFAULT_DECISION_COLUMN)]
    column: String,

    /// Cell value meaning access is granted.
    #[arg(long, default_value = DEFAULT_AFFIRMATIVE)]
    affirmative: String,

    /// Cell value meaning access is refused.
    #[arg(long, default_value = DEFAULT_NEGATIVE)]
    negative: String,

    /// File name suffix identifying a folder's spreadsheet (case-sensitive).
    #[arg(long, default_value = DEFAULT_SPREADSHEET_EXTENSION)]
    extension: String,

    /// Worksheet to read instead of the first one.
    #[arg(long)]
    sheet: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Exit with status 1 if any folder's spreadsheet is missing the decision column or
    /// could not be processed.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let filter = if args.case_numbers {
        Some(NameFilter::case_number())
    } else if let Some(pattern) = args.name_pattern.as_deref() {
        Some(
            NameFilter::new(pattern)
                .with_context(|| format!("invalid --name-pattern '{pattern}'"))?,
        )
    } else {
        None
    };

    let store = open_store(&args)?;
    let mut reader = XlsxTableReader::new();
    if let Some(sheet) = &args.sheet {
        reader = reader.with_sheet(sheet.clone());
    }

    let key = FolderKey::from(args.key);
    let classifier = FolderClassifier::new(store, reader)
        .with_rule(DecisionRule {
            column: args.column.clone(),
            affirmative: args.affirmative.clone(),
            negative: args.negative.clone(),
        })
        .with_key(key)
        .with_extension(args.extension.clone());

    let results = classifier
        .classify_tree(&args.root, filter.as_ref())
        .with_context(|| format!("classify folders under {}", args.root))?;
    log::info!("classified {} folder(s)", results.len());

    let ctx = ReportContext {
        root: &args.root,
        filter: filter.as_ref().map(NameFilter::pattern),
        key,
    };
    emit(&args, &ctx, &results)?;

    if args.strict && results.values().any(|c| c.is_failure()) {
        std::process::exit(1);
    }

    Ok(())
}

fn open_store(args: &Args) -> Result<Box<dyn FolderStore>> {
    if let Some(dir) = &args.dir {
        log::debug!("reading folders from {}", dir.display());
        return Ok(Box::new(LocalFolderStore::new(dir)));
    }

    let Some(site_url) = args.site_url.as_deref() else {
        anyhow::bail!("one of --dir or --site-url is required");
    };
    let token = read_token(args.token_file.as_deref())?;
    let config = SharePointConfig::new(site_url, token)
        .with_context(|| format!("invalid SharePoint settings for {site_url}"))?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let store = SharePointFolderStore::connect(config)
        .with_context(|| format!("connect to {site_url}"))?;
    Ok(Box::new(store))
}

fn read_token(token_file: Option<&std::path::Path>) -> Result<String> {
    if let Some(path) = token_file {
        let value = std::fs::read_to_string(path)
            .with_context(|| format!("read token file {}", path.display()))?;
        return Ok(value.trim_end_matches(&['\r', '\n'][..]).to_string());
    }
    std::env::var(TOKEN_ENV)
        .with_context(|| format!("--site-url needs --token-file or {TOKEN_ENV}"))
}

fn emit(args: &Args, ctx: &ReportContext<'_>, results: &ResultMap) -> Result<()> {
    let mut rendered = Vec::new();
    match args.format {
        OutputFormat::Text => report::write_text(&mut rendered, ctx, results)?,
        OutputFormat::Json => report::write_json(&mut rendered, ctx, results)?,
    }

    match &args.output {
        Some(path) => atomic_write_bytes(path, &rendered)
            .with_context(|| format!("write report to {}", path.display())),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            match handle.write_all(&rendered).and_then(|()| handle.flush()) {
                // A consumer like `head` closing the pipe early is not a failure.
                Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => Ok(other?),
            }
        }
    }
}
