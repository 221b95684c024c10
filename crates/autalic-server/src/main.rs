//! Binary entry point: wires configuration, data files, the Ollama client,
//! and the tool registry into an agent, then serves the HTTP façade.
//!
//! Missing data files degrade the corresponding tool to an advisory reply
//! instead of failing start-up.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use tokio::net::TcpListener;

use autalic_core::{
    Agent, AgentConfig, ConfigLoader, Dataset, OllamaClient, Paper, PaperSearchTool,
    SentenceExamplesTool, SessionStore, ToolRegistry,
};
use autalic_server::{build_router, shutdown_signal, AppState};

#[derive(Parser, Debug)]
#[clap(author, version, about = "AUTALIC Agent server")]
struct Cli {
    #[clap(long, short, default_value = "autalic.yaml")]
    config: String,

    #[clap(long, help = "Override the bind address from the config file")]
    bind_addr: Option<String>,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let config = ConfigLoader::from_file(&cli.config).await?;
    log::info!("Starting {}", config.agent.name);

    let dataset = match Dataset::load(&config.data.dataset_path) {
        Ok(dataset) => Some(Arc::new(dataset)),
        Err(e) => {
            log::warn!("{}. The sentence-examples tool will report it as unavailable.", e);
            None
        }
    };

    let paper = match Paper::load(&config.data.paper_path, config.data.paper_url.clone()) {
        Ok(paper) => Some(Arc::new(paper)),
        Err(e) => {
            log::warn!("{}. The paper-search tool will report it as unavailable.", e);
            None
        }
    };

    let mut llm = OllamaClient::new(config.model.base_url.clone(), config.model.model.clone());
    if let Some(temperature) = config.model.temperature {
        llm = llm.with_temperature(temperature);
    }

    let mut tools = ToolRegistry::new();
    tools.register_tool(Arc::new(SentenceExamplesTool::new(dataset)));
    tools.register_tool(Arc::new(PaperSearchTool::new(paper)));

    let agent = Agent::new(
        Arc::new(llm),
        tools,
        AgentConfig {
            max_round_trips: config.agent.max_round_trips,
            system_prompt: config.agent.system_prompt.clone(),
        },
    );

    let state = AppState::new(Arc::new(agent), Arc::new(SessionStore::new()));
    let router = build_router(state);

    let bind_addr = cli.bind_addr.unwrap_or(config.server.bind_addr);
    let socket_addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", bind_addr, e))?;

    let listener = TcpListener::bind(socket_addr).await?;
    log::info!("Serving on http://{}", socket_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down gracefully.");
    Ok(())
}
