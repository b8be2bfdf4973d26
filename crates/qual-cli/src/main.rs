//! QualAgents command-line runner
//!
//! `qualagents run` loads a directory of text documents, submits an
//! analysis batch, polls its status, and prints ranked insights.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use qual_agent::{AgentCatalog, AgentId, MockInsightGenerator};
use qual_document::{ChunkerConfig, Document, InMemorySource};
use qual_engine::{
    AnalysisEngine, AnalysisRequest, BatchResults, BatchStatus, EngineConfig, StatusPoller,
};
use qual_store::FileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Command::new("qualagents")
        .version(qual_engine::VERSION)
        .about("QualAgents batch analysis pipeline")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run an analysis over a directory of text documents")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .help("Directory holding .txt/.md documents"),
                )
                .arg(
                    Arg::new("agents")
                        .long("agents")
                        .default_value("grounded-theory,thematic-analysis")
                        .help("Comma-separated methodology agent slugs"),
                )
                .arg(
                    Arg::new("chunk-size")
                        .long("chunk-size")
                        .default_value("1000")
                        .value_parser(value_parser!(usize))
                        .help("Chunk window width in characters"),
                )
                .arg(
                    Arg::new("overlap")
                        .long("overlap")
                        .default_value("200")
                        .value_parser(value_parser!(usize))
                        .help("Characters shared between consecutive windows"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for reproducible mock generation"),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .default_value("2000")
                        .value_parser(value_parser!(u64))
                        .help("Status poll interval in milliseconds"),
                )
                .arg(
                    Arg::new("step-delay")
                        .long("step-delay")
                        .default_value("25")
                        .value_parser(value_parser!(u64))
                        .help("Simulated per-chunk latency in milliseconds"),
                )
                .arg(
                    Arg::new("store")
                        .long("store")
                        .help("Persist batch records as JSON under this directory"),
                ),
        )
        .subcommand(Command::new("agents").about("List the methodology catalog"));

    match cli.get_matches().subcommand() {
        Some(("run", args)) => run_analysis(args).await,
        Some(("agents", _)) => {
            list_agents();
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn run_analysis(args: &ArgMatches) -> Result<()> {
    let project_dir = PathBuf::from(args.get_one::<String>("project").unwrap());
    let project_id = project_dir
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("project")
        .to_string();

    let documents = load_documents(&project_dir)?;
    println!(
        "Loaded {} document(s) from {}",
        documents.len(),
        project_dir.display()
    );

    let agents: Vec<AgentId> = args
        .get_one::<String>("agents")
        .unwrap()
        .split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(AgentId::new)
        .collect();

    let chunker = ChunkerConfig::new()
        .with_chunk_size(*args.get_one::<usize>("chunk-size").unwrap())
        .with_overlap(*args.get_one::<usize>("overlap").unwrap());
    let config = EngineConfig::new()
        .with_chunker(chunker)
        .with_step_delay_ms(*args.get_one::<u64>("step-delay").unwrap())
        .with_poll_interval_ms(*args.get_one::<u64>("interval").unwrap());

    let source = InMemorySource::new();
    source.insert_project(&project_id, documents);

    let generator = match args.get_one::<u64>("seed") {
        Some(seed) => MockInsightGenerator::seeded(*seed),
        None => MockInsightGenerator::new(),
    };

    let mut builder = AnalysisEngine::builder()
        .with_config(config)
        .with_source(Arc::new(source))
        .with_generator(Arc::new(generator));
    if let Some(dir) = args.get_one::<String>("store") {
        let store =
            FileStore::open(dir).with_context(|| format!("cannot open store directory {dir}"))?;
        builder = builder.with_store(Arc::new(store));
    }
    let engine = Arc::new(builder.build());

    let batch_id = engine
        .start_analysis(AnalysisRequest::new(&project_id, agents))
        .await?;
    println!("Submitted batch {batch_id}");

    let poller = StatusPoller::new(engine.clone());
    let mut subscription = poller.subscribe(batch_id);
    while let Some(snapshot) = subscription.next_update().await {
        println!("  [{:>3}%] {:?}", snapshot.progress, snapshot.status);
    }

    let outcome = subscription
        .into_outcome()
        .await?
        .context("polling ended without a terminal state")?;

    if outcome.status.status == BatchStatus::Completed {
        let results = outcome.results.context("completed batch without results")?;
        print_results(&results);
        Ok(())
    } else {
        eprintln!(
            "Analysis failed: {}",
            outcome
                .status
                .error
                .unwrap_or_else(|| "unknown error".to_string())
        );
        std::process::exit(1);
    }
}

/// Load every `.txt`/`.md` file in `dir` as a document, in name order
fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read project directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "txt" | "md"))
        })
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read document {}", path.display()))?;
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("document")
            .to_string();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();
        tracing::debug!(path = %path.display(), chars = content.chars().count(), "loaded document");
        documents.push(Document::new(id, name, content));
    }
    Ok(documents)
}

fn print_results(results: &BatchResults) {
    println!();
    println!(
        "Documents: {}  Chunks: {}  Characters: {}",
        results.document_stats.documents,
        results.document_stats.chunks,
        results.document_stats.characters
    );

    if results.insights.is_empty() {
        println!("No insights generated.");
        return;
    }

    let mut current: Option<&AgentId> = None;
    for insight in &results.insights {
        if current != Some(&insight.agent_id) {
            println!();
            println!("{} ({})", insight.methodology, insight.agent_id);
            current = Some(&insight.agent_id);
        }
        println!("  [{:>3}] {}", insight.relevance, insight.text);
    }
}

fn list_agents() {
    println!("Known methodology agents:");
    for profile in AgentCatalog::all() {
        println!(
            "  {:<20} {} ({} templates)",
            profile.slug,
            profile.display_name,
            profile.templates.len()
        );
    }
}
