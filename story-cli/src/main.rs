use headless::app::AppHeadless;
use clap::{Parser, Subcommand};
use storyteller_core::config::config::StoryConfig;
use storyteller_core::{Language, StoryRequest};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod headless;

#[derive(Parser)]
#[command(name = "storyteller")]
#[command(about = "Social good storytelling: turn a cause into an inspiring story")]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Read configuration from this file instead of ~/.config/storyteller/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Show version information
    #[arg(short, long)]
    version: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server hosting the story form (default)
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "7860")]
        port: u16,
        /// Interface to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Generate stories once and print them
    Generate {
        #[arg(long, default_value = "")]
        issue: String,
        #[arg(long, default_value = "")]
        impact: String,
        #[arg(long, default_value = "")]
        helpers: String,
        #[arg(long, default_value = "")]
        desired_change: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        facts: String,
        /// English or Hindi
        #[arg(long, default_value = "English")]
        language: Language,
        /// Number of story variations (1-3)
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        variations: i64,
        /// Also write the output to the export file
        #[arg(long)]
        save: bool,
    },
    /// Write text (or stdin with `-`) to the export file
    Export {
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.version {
        show_version()?;
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => StoryConfig::load_from(path)?,
        None => StoryConfig::load()?,
    };

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            handle_serve(config, host, port).await?;
        },
        Some(Commands::Generate { issue, impact, helpers, desired_change, location, facts, language, variations, save }) => {
            init_tracing("warn", true);
            let request = StoryRequest { issue, impact, helpers, desired_change, location, facts, language, variations };
            AppHeadless::new(config).run(request, save).await?;
        },
        Some(Commands::Export { text }) => {
            init_tracing("warn", true);
            handle_export(config, text)?;
        },
        None => {
            handle_serve(config, "127.0.0.1".to_string(), 7860).await?;
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str, stderr: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter);

    if stderr {
        builder.with_writer(io::stderr).init();
    } else {
        builder.init();
    }
}

fn show_version() -> Result<(), Box<dyn std::error::Error>> {
    println!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Ok(())
}

async fn handle_serve(config: StoryConfig, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for HTTP server logs
    init_tracing("storyteller_http=debug,storyteller_core=info,storyteller_llm=info,tower_http=info", false);

    let storyteller = config.storyteller()?;
    let addr = format!("{}:{}", host, port);
    let server_config = storyteller_http::ServerConfig::new(addr)
        .with_export_file(config.export_file.clone());

    storyteller_http::start_server(server_config, storyteller).await?;

    Ok(())
}

fn handle_export(config: StoryConfig, text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let story = match text.as_deref() {
        Some("-") | None => {
            if io::stdin().is_terminal() {
                return Err("nothing to export: pass the text or pipe it on stdin".into());
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        Some(text) => text.to_string(),
    };

    let path = storyteller_core::save_to_path(&config.export_file, &story)?;
    println!("{}", path.display());
    Ok(())
}
