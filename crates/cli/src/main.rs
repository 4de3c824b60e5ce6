//! CLI tool for generating audience-tailored proposal decks from
//! brochure text files.

mod http;

use anyhow::{Context, Result};
use clap::Parser;
use http::HttpInferenceClient;
use proposal_core::{
    ContentPlanner, FactExtractor, InferenceClient, NullClient, OutputFormat, ProposalRecord,
};
use proposal_pptx::{PptxRenderer, RenderConfig};
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Generate audience-tailored proposal decks from brochure text.
#[derive(Parser, Debug)]
#[command(name = "proposal-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input brochure text file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Target audience description (e.g. "individual investor")
    #[arg(short, long)]
    audience: String,

    /// Output format: pptx or odp
    #[arg(short, long, default_value = "pptx")]
    format: String,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PNG logo to embed on each slide
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Inference endpoint URL; omitted means the deterministic fallback
    /// pipeline runs with no network calls
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Also write the proposal record (persistence shape) as JSON
    #[arg(short, long)]
    record: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    // Unrecognized formats are the pipeline's one hard error; reject before
    // doing any work.
    let format = OutputFormat::parse(&args.format)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let http_client = match &args.endpoint {
        Some(endpoint) => Some(
            HttpInferenceClient::new(endpoint)
                .context("Failed to construct inference client")?,
        ),
        None => None,
    };
    let client: &dyn InferenceClient = match &http_client {
        Some(c) => c,
        None => &NullClient,
    };

    let config = match &args.logo {
        Some(path) => {
            let png = fs::read(path)
                .with_context(|| format!("Failed to read logo {}", path.display()))?;
            RenderConfig::new().with_logo(png)
        }
        None => RenderConfig::new(),
    };
    let renderer = PptxRenderer::with_config(config);

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, client, &renderer, format) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("Error processing {}: {}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Run the three-stage pipeline for one brochure file and write the
/// resulting document (plus the optional record) next to it.
fn process_file(
    input_path: &Path,
    args: &Args,
    client: &dyn InferenceClient,
    renderer: &PptxRenderer,
    format: OutputFormat,
) -> Result<()> {
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let facts = FactExtractor::new(client).extract(&text);
    log::debug!("extracted facts for '{}' at {}", facts.title, facts.location);

    let plan = ContentPlanner::new(client).plan(&facts, &args.audience);
    log::info!(
        "planned {} slides for audience '{}'",
        plan.len(),
        args.audience
    );

    // The renderer already warns when a format degrades.
    let doc = renderer.render(&plan, &facts.title, &args.audience, format)?;

    let output_path = resolve_output_path(input_path, args.output.as_ref(), &doc.filename)?;
    write_output(&output_path, &doc.bytes)?;
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }

    if args.record {
        let source = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        let record = ProposalRecord::new(source, &args.audience, &facts, &plan, format);
        let record_path = output_path.with_extension("json");
        let json = serde_json::to_string_pretty(&record)?;
        write_output(&record_path, json.as_bytes())?;
        if args.verbose {
            eprintln!("Record written to: {}", record_path.display());
        }
    }

    Ok(())
}

/// Place the document's suggested filename in the requested directory, or
/// beside the input file.
fn resolve_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(filename),
            None => PathBuf::from(filename),
        },
    };

    Ok(output_path)
}

fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
