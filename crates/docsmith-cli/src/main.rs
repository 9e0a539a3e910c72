//! Docsmith CLI - document-to-Markdown conversion from the command line.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsmith::{ConvertOptions, MarkdownPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docsmith",
    version,
    about = "Convert documents to Markdown",
    long_about = "Convert HTML pages, Office documents, PDFs, images, audio, and plain text\n\
                  to Markdown. Inputs can be local files or http(s):// and file:// URLs.",
    after_help = "EXAMPLES:\n  \
                  docsmith convert report.docx\n  \
                  docsmith convert slides.pptx -o slides.md\n  \
                  docsmith convert https://en.wikipedia.org/wiki/Rust_(programming_language)\n  \
                  docsmith convert download.bin --extension .xlsx\n  \
                  docsmith converters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to Markdown
    Convert {
        /// Path or URL of the document
        input: String,

        /// Write the Markdown to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Explicit format hint, with leading dot (e.g. ".html")
        #[arg(short, long, value_name = "EXT")]
        extension: Option<String>,

        /// Emit the full result (title and Markdown) as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered converters in priority order
    Converters,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            extension,
            json,
        } => convert(&input, output, extension, json).await,
        Commands::Converters => {
            let pipeline = MarkdownPipeline::new();
            for name in pipeline.registry().names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_directives = match verbose {
        0 => "warn",
        1 => "warn,docsmith=info",
        _ => "info,docsmith=debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    Ok(())
}

async fn convert(
    input: &str,
    output: Option<PathBuf>,
    extension: Option<String>,
    json: bool,
) -> Result<()> {
    let options = ConvertOptions {
        file_extension: extension,
        ..Default::default()
    };

    let pipeline = MarkdownPipeline::new();
    let result = pipeline
        .convert(input, &options)
        .await
        .with_context(|| format!("Failed to convert '{input}'"))?;

    let mut rendered = if json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.text_content
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
        }
    }
    Ok(())
}
