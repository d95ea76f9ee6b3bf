use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib::channels::KakaoChannel;
use lib::config::{load_config, resolve_kakao_token, Config};
use lib::connection::ConfigConnectionSource;
use lib::message::MessageParams;
use lib::provider::provider_descriptor;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kako")]
#[command(about = "kako CLI — send KakaoTalk messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration file with defaults (connection table is empty; fill in login = REST API key, password = refresh token).
    Init {
        /// Config file path (default: KAKO_CONFIG_PATH or ~/.kako/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Print the connector registration descriptor as JSON.
    Provider,

    /// Send a message to yourself, or to friends when --receiver is given (chunked by 5).
    Send {
        /// Config file path (default: KAKO_CONFIG_PATH or ~/.kako/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Message text. Ignored when --template is given.
        #[arg(long)]
        text: Option<String>,

        /// Kakao template object as a JSON string (feed, list, commerce, ...).
        #[arg(long, value_name = "JSON")]
        template: Option<String>,

        /// Link URL for text messages.
        #[arg(long, value_name = "URL")]
        web_url: Option<String>,

        /// Mobile link URL for text messages (defaults to --web-url).
        #[arg(long, value_name = "URL")]
        mobile_web_url: Option<String>,

        /// Friend UUID to send to. Repeat for multiple receivers.
        #[arg(long = "receiver", value_name = "UUID")]
        receivers: Vec<String>,

        /// Connection id (default from config, falling back to "kakao_default").
        #[arg(long, value_name = "ID")]
        conn: Option<String>,

        /// Direct access token; skips the refresh-token exchange. Overrides KAKAO_ACCESS_TOKEN and the config token.
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("kako {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Provider) => {
            if let Err(e) = run_provider() {
                log::error!("provider failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            config,
            text,
            template,
            web_url,
            mobile_web_url,
            receivers,
            conn,
            token,
        }) => {
            if let Err(e) = run_send(
                config,
                text,
                template,
                web_url,
                mobile_web_url,
                receivers,
                conn,
                token,
            )
            .await
            {
                log::error!("send failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let config = Config::default();
    let s = serde_json::to_string_pretty(&config).context("serializing default config")?;
    std::fs::write(&path, s).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn run_provider() -> Result<()> {
    let json = serde_json::to_string_pretty(&provider_descriptor())
        .context("serializing provider descriptor")?;
    println!("{}", json);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_send(
    config_path: Option<std::path::PathBuf>,
    text: Option<String>,
    template: Option<String>,
    web_url: Option<String>,
    mobile_web_url: Option<String>,
    receivers: Vec<String>,
    conn: Option<String>,
    token: Option<String>,
) -> Result<()> {
    let (config, _path) = load_config(config_path)?;

    let conn_id = conn.unwrap_or_else(|| config.kakao.conn_id.clone());
    let token = token.or_else(|| resolve_kakao_token(&config));

    let params = MessageParams {
        text,
        template_object: template.map(serde_json::Value::String),
        web_url,
        mobile_web_url,
    };

    let source = Arc::new(ConfigConnectionSource::new(config.connections.clone()));
    let channel = KakaoChannel::new(source, Some(conn_id), token);

    let receivers = if receivers.is_empty() {
        None
    } else {
        Some(receivers.as_slice())
    };
    let results = channel.send_message(receivers, &params).await?;

    for result in &results {
        println!("{}", serde_json::to_string(result).context("serializing result")?);
    }
    Ok(())
}
