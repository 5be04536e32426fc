use clap::Parser;
use notes_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    notes_api::init_tracing("warn");

    let cli = Cli::parse();

    if let Err(e) = notes_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
