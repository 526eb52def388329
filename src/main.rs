use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use medtriage::agents::TriagePipeline;
use medtriage::config::Config;
use medtriage::graph::{sample_reviews, GraphRag, GraphStore, Neo4jStore};
use medtriage::llm::{LLMAdapter, LLMProviderConfig, LLM};
use medtriage::search::PubMedClient;
use medtriage::utils::init_logger;
use medtriage::{create_router, AppState};

const DEFAULT_GRAPH_QUESTION: &str = "Which hotels are located in Dubai?";

#[derive(Parser)]
#[command(name = "medtriage", version, about = "PubMed lookup, symptom triage and hotel graph chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Look up PubMed articles and print them as JSON
    Lookup {
        query: String,
        #[arg(long)]
        max_results: Option<usize>,
        /// Return a diagnostic entry instead of the simulated article
        #[arg(long)]
        no_fallback: bool,
    },
    /// Run the triage pipeline on a patient description
    Triage { description: String },
    /// Ingest the sample hotel reviews, answer one question and print the graph overview
    GraphDemo {
        #[arg(long, default_value = DEFAULT_GRAPH_QUESTION)]
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Lookup {
            query,
            max_results,
            no_fallback,
        } => {
            let client = PubMedClient::new(config.literature.clone())?;
            let max_results = max_results.unwrap_or(config.literature.max_results_default);
            let fallback_enabled = config.literature.fallback_enabled && !no_fallback;
            let outcome = client.lookup(&query, max_results, fallback_enabled).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Triage { description } => {
            let llm = build_llm(&config)?;
            let literature = PubMedClient::new(config.literature.clone())?;
            let pipeline = TriagePipeline::new(llm, &config.llm.model, literature);
            let report = pipeline.analyze(&description).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::GraphDemo { question } => {
            let graph_config = config.require_graph()?;
            let llm = build_llm(&config)?;
            let store: Arc<dyn GraphStore> = Arc::new(Neo4jStore::new(graph_config)?);
            let rag = GraphRag::new(llm, store, config.llm.graph_model.clone());

            let build = rag.build(&sample_reviews()).await?;
            let example = build.creation_queries.first().map(String::as_str);
            let answer = rag.ask(&question, example).await?;
            let overview = rag.overview().await?;

            let output = serde_json::json!({ "build": build, "answer": answer, "overview": overview });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

fn build_llm(config: &Config) -> anyhow::Result<Arc<dyn LLMAdapter>> {
    config.require_llm_key()?;
    let llm = LLM::new(LLMProviderConfig::from_config(&config.llm)?)?;
    info!(provider = %llm.provider(), model = %config.llm.model, "LLM client ready");
    Ok(Arc::new(llm))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);
    let llm = build_llm(&config)?;

    let graph_store: Option<Arc<dyn GraphStore>> = match config.require_graph() {
        Ok(graph_config) => Some(Arc::new(Neo4jStore::new(graph_config)?)),
        Err(e) => {
            warn!(error = %e, "Graph routes disabled");
            None
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, llm, graph_store)?;
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
