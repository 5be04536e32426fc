use std::io::{self, Read};

use dialoguer::Password;

use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "message": message });
            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Pretty JSON, regardless of format
pub fn output_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_note(output_format: OutputFormat, note: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(note),
        OutputFormat::Text => {
            println!("{}  {}", field(note, "_id"), field(note, "title"));
            println!("updated {}", field(note, "updatedAt"));
            println!();
            println!("{}", field(note, "content"));
            Ok(())
        }
    }
}

pub fn output_notes(output_format: OutputFormat, notes: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(notes),
        OutputFormat::Text => {
            let items = notes.as_array().map(Vec::as_slice).unwrap_or_default();
            if items.is_empty() {
                println!("No notes yet");
            }
            for note in items {
                println!("{}  {}  {}", field(note, "_id"), field(note, "updatedAt"), field(note, "title"));
            }
            Ok(())
        }
    }
}

pub fn output_user(output_format: OutputFormat, user: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(user),
        OutputFormat::Text => {
            println!("Name:  {}", field(user, "name"));
            println!("Email: {}", field(user, "email"));
            println!("Id:    {}", field(user, "_id"));
            Ok(())
        }
    }
}

fn field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Use the flag value or prompt for a password without echoing it
pub fn password_or_prompt(provided: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = provided {
        return Ok(value);
    }

    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Use the flag value or read all of stdin
pub fn read_stdin_if_missing(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = provided {
        return Ok(value);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_password_skips_the_prompt() {
        let password = password_or_prompt(Some("secret123".to_string()), "Password").unwrap();
        assert_eq!(password, "secret123");
    }

    #[test]
    fn provided_content_skips_stdin() {
        assert_eq!(read_stdin_if_missing(Some("body".to_string())).unwrap(), "body");
    }
}
