use anyhow::{bail, Context, Result};
use bibresolve::config::{load_config, Config};
use bibresolve::models::{normalize_identifier, parse_identifier, Reference};
use bibresolve::utils::{Abbreviator, CitationFormat, CitationRenderer};
use bibresolve::Resolver;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// bibresolve - Turn DOIs, PubMed IDs, arXiv IDs and titles into citations
#[derive(Parser, Debug)]
#[command(name = "bibresolve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve DOIs, PubMed IDs, arXiv IDs and titles into BibTeX citations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Citation output type
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputType {
    /// BibTeX entries
    Bibtex,
    /// Markdown reference list
    Markdown,
    /// Plain text reference list
    Text,
}

impl From<OutputType> for CitationFormat {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::Bibtex => CitationFormat::Bibtex,
            OutputType::Markdown => CitationFormat::Markdown,
            OutputType::Text => CitationFormat::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve identifiers (DOI, PMID, arXiv ID or title) into citations
    From {
        /// Identifiers to resolve
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Write to a file instead of stdout; without a path, the name is
        /// derived from the citation key (or "references" for several entries)
        #[arg(long, short, num_args = 0..=1, value_name = "PATH")]
        output: Option<Option<PathBuf>>,

        /// Output type (defaults to the configured format)
        #[arg(long = "type", short = 't', value_enum)]
        output_type: Option<OutputType>,

        /// Skip identifiers that fail instead of aborting
        #[arg(long)]
        ignore_errors: bool,
    },

    /// Show how inputs are classified, without any network access
    #[command(alias = "c")]
    Classify {
        /// Inputs to classify
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing based on verbosity; stdout is reserved for output
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bibresolve={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::From {
            identifiers,
            output,
            output_type,
            ignore_errors,
        } => {
            let format = output_type
                .map(CitationFormat::from)
                .unwrap_or(config.output.format);
            resolve_identifiers(&config, &identifiers, format, output, ignore_errors).await
        }
        Commands::Classify { inputs } => {
            for input in &inputs {
                match parse_identifier(&normalize_identifier(input)) {
                    Some(identifier) => {
                        println!("{}\t{}\t{}", input, identifier.kind, identifier.value)
                    }
                    None => println!("{}\tunknown", input),
                }
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

async fn resolve_identifiers(
    config: &Config,
    identifiers: &[String],
    format: CitationFormat,
    output: Option<Option<PathBuf>>,
    ignore_errors: bool,
) -> Result<()> {
    let resolver = Resolver::from_config(config).context("Failed to set up providers")?;
    let renderer =
        CitationRenderer::new(Arc::new(Abbreviator::new())).with_wrap_width(config.output.wrap_width);

    let mut references = Vec::new();
    let mut entries = Vec::new();
    for identifier in identifiers {
        match resolve_one(&resolver, &renderer, identifier, format).await {
            Ok((reference, entry)) => {
                references.push(reference);
                entries.push(entry);
            }
            Err(e) if ignore_errors => {
                tracing::warn!("Skipping '{}': {:#}", identifier, e);
            }
            Err(e) => return Err(e.context(format!("Failed to resolve '{}'", identifier))),
        }
    }

    if entries.is_empty() {
        tracing::warn!("No citation could be produced");
        return Ok(());
    }
    let text = entries.join("\n");

    match output {
        None => print!("{}", text),
        Some(path) => {
            let path = path.unwrap_or_else(|| derived_path(&renderer, &references, format));
            std::fs::write(&path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} entries to {}", entries.len(), path.display());
        }
    }
    Ok(())
}

async fn resolve_one(
    resolver: &Resolver,
    renderer: &CitationRenderer,
    identifier: &str,
    format: CitationFormat,
) -> Result<(Reference, String)> {
    let reference = resolver.resolve(identifier).await?;
    if reference.is_empty() {
        bail!("No record found");
    }
    let entry = renderer.render(&reference, format)?;
    Ok((reference, entry))
}

/// `<key>.<ext>` for a single entry, `references.<ext>` otherwise
fn derived_path(
    renderer: &CitationRenderer,
    references: &[Reference],
    format: CitationFormat,
) -> PathBuf {
    let stem = match references {
        [reference] => renderer
            .key(reference)
            .map(|key| key.key)
            .unwrap_or_else(|_| "references".to_string()),
        _ => "references".to_string(),
    };
    PathBuf::from(format!("{}.{}", stem, format.extension()))
}
