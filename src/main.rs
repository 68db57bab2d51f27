//! llm-gateway CLI entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use llm_gateway::auth::has_usable_vertex_config;
use llm_gateway::gateway::DEFAULT_TEMPERATURE;
use llm_gateway::{ui, ChatMessage, Gateway, Profile, ProviderConfig};

#[derive(Parser)]
#[command(name = "llm-gateway")]
#[command(about = "Multi-provider language-model gateway")]
#[command(version)]
struct Cli {
    /// Profile file (defaults to ~/.llm-gateway/profile.json)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single chat message
    Chat {
        /// Message to send
        #[arg(short, long)]
        message: String,

        /// Optional system prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Sampling temperature
        #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,
    },

    /// List models offered by the configured provider
    Models,

    /// Show the resolved provider configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = cli
        .profile
        .unwrap_or_else(llm_gateway::config::profile_path);
    // Environment-only setups need no profile file
    let profile = if path.exists() {
        Profile::load(&path)?
    } else {
        tracing::debug!("No profile at {:?}, using environment only", path);
        Profile::default()
    }
    .with_env_overrides();

    match cli.command {
        Commands::Chat {
            message,
            system,
            temperature,
        } => {
            let config = ProviderConfig::resolve(&profile)?;
            let mut messages = Vec::new();
            if let Some(system) = system {
                messages.push(ChatMessage::system(system));
            }
            messages.push(ChatMessage::user(message));

            let result = Gateway::new()
                .chat_with_tools(&config, &messages, temperature, &[])
                .await?;

            println!("{}", result.text);
            for call in &result.tool_calls {
                ui::print_step(&format!("tool call {} {}({})", call.id, call.name, call.arguments));
            }
        }

        Commands::Models => {
            let config = ProviderConfig::resolve(&profile)?;
            let models = Gateway::new().fetch_models(&config).await?;
            if models.is_empty() {
                ui::print_warning("Provider returned no models");
            }
            for model in models {
                match model.owned_by {
                    Some(owner) => println!("{}  ({})", model.id, owner),
                    None => println!("{}", model.id),
                }
            }
        }

        Commands::Status => {
            if !print_status(&profile) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Print the resolved configuration. Returns false when it does not resolve.
fn print_status(profile: &Profile) -> bool {
    let vertex_usable = profile
        .ai_vertex_config
        .as_deref()
        .is_some_and(has_usable_vertex_config);

    let config = match ProviderConfig::resolve(profile) {
        Ok(config) => config,
        Err(e) => {
            ui::print_error(&e.to_string());
            return false;
        }
    };

    ui::print_header(config.format.as_str(), &config.model);
    ui::print_step(&format!("Base URL: {}", config.base_url));
    if config.api_key.is_empty() {
        ui::print_step("API key: not set");
    } else {
        ui::print_step(&format!("API key: {}", ui::mask_secret(&config.api_key)));
    }
    match config.active_vertex() {
        Some(vertex) => ui::print_success(&format!(
            "Vertex AI: {} ({})",
            vertex.project_id, vertex.location
        )),
        None if vertex_usable => {
            ui::print_step("Vertex AI: configured, used only with gemini format")
        }
        None => ui::print_step("Vertex AI: not configured"),
    }
    true
}
