use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::CliConfig;
use crate::cli::utils::{output_success, output_user, password_or_prompt};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and log in")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Log in and store the token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show the logged-in user")]
    Whoami,

    #[command(about = "Delete your account (notes are kept)")]
    Delete,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = CliConfig::load()?;

    match cmd {
        AuthCommands::Register { name, email, password } => {
            let password = password_or_prompt(password, "Password")?;
            let client = ApiClient::from_config(&config)?;
            let res = client
                .post("/api/auth/register", &json!({ "name": name, "email": email, "password": password }))
                .await?;

            store_session(&mut config, &res)?;
            output_success(
                output_format,
                &format!("Registered {}", config.email.as_deref().unwrap_or(&email)),
                Some(json!({ "_id": res["_id"], "email": res["email"] })),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password, "Password")?;
            let client = ApiClient::from_config(&config)?;
            let res = client
                .post("/api/auth/login", &json!({ "email": email, "password": password }))
                .await?;

            store_session(&mut config, &res)?;
            output_success(
                output_format,
                &format!("Logged in as {}", config.email.as_deref().unwrap_or(&email)),
                Some(json!({ "_id": res["_id"], "email": res["email"] })),
            )
        }
        AuthCommands::Logout => {
            config.clear_session();
            config.save()?;
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let client = ApiClient::authenticated(&config)?;
            let user = client.get("/api/auth/profile").await?;
            output_user(output_format, &user)
        }
        AuthCommands::Delete => {
            let client = ApiClient::authenticated(&config)?;
            let res = client.delete("/api/auth/delete").await?;
            config.clear_session();
            config.save()?;

            let message = res["message"].as_str().unwrap_or("User deleted");
            output_success(output_format, message, None)
        }
    }
}

fn store_session(config: &mut CliConfig, res: &Value) -> anyhow::Result<()> {
    let token = res["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("server response did not include a token"))?;
    let email = res["email"].as_str().unwrap_or_default();

    config.set_session(email.to_string(), token.to_string());
    config.save()
}
