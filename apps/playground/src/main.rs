use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, PageLoadParams, PlaygroundClient};
use shared::{
    domain::{AssemblyFlavor, Channel, CompileTarget, Mode},
    event::{Event, Phase},
};
use tracing::debug;
use url::Url;

#[derive(Parser, Debug)]
#[command(about = "Run, compile and share Rust snippets through a playground backend")]
struct Args {
    /// Overrides the configured backend address.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    channel: Option<Channel>,
    #[arg(long, global = true)]
    mode: Option<Mode>,
    #[arg(long, global = true)]
    flavor: Option<AssemblyFlavor>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run { file: PathBuf },
    Asm { file: PathBuf },
    LlvmIr { file: PathBuf },
    Mir { file: PathBuf },
    Fmt { file: PathBuf },
    Clippy { file: PathBuf },
    Crates,
    /// Saves the file as a gist and prints its id and url.
    Share { file: PathBuf },
    /// Restores state from a deep link such as `http://host/?gist=abc&version=nightly`.
    Open { url: String },
}

impl Command {
    fn source_file(&self) -> Option<&PathBuf> {
        match self {
            Command::Run { file }
            | Command::Asm { file }
            | Command::LlvmIr { file }
            | Command::Mir { file }
            | Command::Fmt { file }
            | Command::Clippy { file }
            | Command::Share { file } => Some(file),
            Command::Crates | Command::Open { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let client = PlaygroundClient::from_settings(&settings)?;

    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            debug!(event = event.name(), "event dispatched");
        }
    });

    if let Some(channel) = args.channel {
        client.dispatch(Event::ChangeChannel { channel });
    }
    if let Some(mode) = args.mode {
        client.dispatch(Event::ChangeMode { mode });
    }
    if let Some(assembly_flavor) = args.flavor {
        client.dispatch(Event::ChangeAssemblyFlavor { assembly_flavor });
    }
    if let Some(file) = args.command.source_file() {
        let code = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        client.dispatch(Event::edit_code(code));
    }

    let terminal = match args.command {
        Command::Run { .. } => client.perform_execute().await,
        Command::Asm { .. } => client.perform_compile(CompileTarget::Assembly).await,
        Command::LlvmIr { .. } => client.perform_compile(CompileTarget::LlvmIr).await,
        Command::Mir { .. } => client.perform_compile(CompileTarget::Mir).await,
        Command::Fmt { .. } => client.perform_format().await,
        Command::Clippy { .. } => client.perform_clippy().await,
        Command::Crates => client.perform_crates_load().await,
        Command::Share { .. } => client.perform_gist_save().await,
        Command::Open { url } => {
            let url = Url::parse(&url).with_context(|| format!("invalid deep link {url}"))?;
            match client.index_page_load(PageLoadParams::from_url(&url)) {
                Some(load) => load.await,
                None => {
                    let state = client.state();
                    println!("{}", state.code);
                    eprintln!(
                        "channel={} mode={}",
                        state.configuration.channel, state.configuration.mode
                    );
                    return Ok(ExitCode::SUCCESS);
                }
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&terminal)?);
    match terminal.lifecycle() {
        Some((_, Phase::Failed)) => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}
