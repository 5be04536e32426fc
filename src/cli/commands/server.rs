use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::CliConfig;
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at an API server")]
    Set {
        #[arg(help = "Server URL, e.g. http://localhost:5000")]
        url: String,
    },

    #[command(about = "Show the selected server")]
    Show,

    #[command(about = "Check server health via /health")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = CliConfig::load()?;

    match cmd {
        ServerCommands::Set { url } => {
            let url = url.trim_end_matches('/').to_string();
            // Validate before persisting
            ApiClient::new(&url, None)?;

            if config.server_url != url {
                config.server_url = url.clone();
                // A token from another server is useless here
                config.clear_session();
            }
            config.save()?;
            output_success(
                output_format,
                &format!("Server set to {}", url),
                Some(json!({ "server_url": url })),
            )
        }
        ServerCommands::Show => match output_format {
            OutputFormat::Json => output_json(&json!({
                "server_url": config.server_url,
                "email": config.email,
                "logged_in": config.token.is_some(),
            })),
            OutputFormat::Text => {
                println!("Server: {}", config.server_url);
                match &config.email {
                    Some(email) => println!("User:   {}", email),
                    None => println!("User:   (not logged in)"),
                }
                Ok(())
            }
        },
        ServerCommands::Ping => {
            let client = ApiClient::from_config(&config)?;
            let health = client.get("/health").await?;
            output_success(
                output_format,
                &format!("{} is up", config.server_url),
                Some(json!({ "health": health })),
            )
        }
    }
}
