use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::CliConfig;
use crate::cli::utils::{output_note, output_notes, output_success, read_stdin_if_missing};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum NoteCommands {
    #[command(about = "List your notes, newest first")]
    List,

    #[command(about = "Show one note")]
    Get {
        #[arg(help = "Note id")]
        id: String,
    },

    #[command(about = "Create a note")]
    Create {
        #[arg(help = "Title")]
        title: String,
        #[arg(long, help = "Content (read from stdin if omitted)")]
        content: Option<String>,
    },

    #[command(about = "Change a note's title and/or content")]
    Update {
        #[arg(help = "Note id")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },

    #[command(about = "Delete a note")]
    Delete {
        #[arg(help = "Note id")]
        id: String,
    },
}

pub async fn handle(cmd: NoteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = CliConfig::load()?;
    let client = ApiClient::authenticated(&config)?;

    match cmd {
        NoteCommands::List => {
            let notes = client.get("/api/notes").await?;
            output_notes(output_format, &notes)
        }
        NoteCommands::Get { id } => {
            let note = client.get(&note_path(&id)).await?;
            output_note(output_format, &note)
        }
        NoteCommands::Create { title, content } => {
            let content = read_stdin_if_missing(content)?;
            let note = client
                .post("/api/notes", &json!({ "title": title, "content": content }))
                .await?;
            output_note(output_format, &note)
        }
        NoteCommands::Update { id, title, content } => {
            let patch = update_body(title, content);
            let note = client.put(&note_path(&id), &patch).await?;
            output_note(output_format, &note)
        }
        NoteCommands::Delete { id } => {
            let res = client.delete(&note_path(&id)).await?;
            let message = res["message"].as_str().unwrap_or("Note deleted");
            output_success(output_format, message, Some(json!({ "_id": id })))
        }
    }
}

fn note_path(id: &str) -> String {
    format!("/api/notes/{}", id)
}

// Only flags that were given end up in the body
fn update_body(title: Option<String>, content: Option<String>) -> Value {
    let mut body = Map::new();
    if let Some(title) = title {
        body.insert("title".into(), Value::String(title));
    }
    if let Some(content) = content {
        body.insert("content".into(), Value::String(content));
    }
    Value::Object(body)
}
