//! Parley CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use parley::agent::{AgentEvent, AgentLoop, AgentSession};
use parley::cli::render::render_event;
use parley::cli::repl::{resolve_provider_key, ReplCommand, HELP};
use parley::cli::{ChatArgs, Cli, Commands};
use parley::config::{AgentSettings, FileSettings, SessionConfig};
use parley::conversation::ErrorTurnPolicy;
use parley::error::ParleyError;
use parley::provider::{ProviderId, ProviderRegistry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(chat_args) => handle_chat(chat_args).await,
        Commands::Providers => {
            handle_providers();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = e.recovery_suggestion().hint() {
            eprintln!("  {hint}");
        }
        std::process::exit(1);
    }
}

fn handle_providers() {
    let registry = ProviderRegistry::from_env();
    for id in ProviderId::ALL {
        let entry = registry.entry(id);
        println!(
            "{:<10} {:<24} tools={:<5} {}",
            id.as_str(),
            id.default_model(),
            entry.supports_tools,
            entry.base_url
        );
    }
}

async fn handle_chat(args: ChatArgs) -> Result<(), ParleyError> {
    let mut session_config = SessionConfig::from_env()?;
    let mut settings = AgentSettings::default();
    let mut registry = ProviderRegistry::from_env();

    let settings_path = args.config.clone().unwrap_or_else(FileSettings::default_path);
    if let Some(file) = FileSettings::load(&settings_path)? {
        file.apply_to_session(&mut session_config)?;
        file.apply_to_settings(&mut settings)?;
        file.apply_to_registry(&mut registry)?;
    }

    if let Some(raw) = &args.provider {
        let provider: ProviderId = raw.parse()?;
        if provider != session_config.provider {
            session_config = SessionConfig::for_provider(provider).with_api_key(
                std::env::var(provider.api_key_env()).unwrap_or_default(),
            );
        }
    }
    if let Some(model) = args.model {
        session_config.model = model;
    }
    if let Some(max_rounds) = args.max_rounds {
        settings.max_rounds = max_rounds;
    }
    if args.include_errors {
        settings.error_turn_policy = ErrorTurnPolicy::Include;
    }
    settings.validate()?;

    let agent = AgentLoop::new(registry)
        .with_settings(settings)
        .with_event_sink(Arc::new(print_event));
    let session = AgentSession::new(agent, session_config);

    match args.prompt {
        Some(prompt) => {
            submit(&session, &prompt).await?;
            Ok(())
        }
        None => repl(&session).await,
    }
}

fn print_event(event: AgentEvent) {
    if let Some(line) = render_event(&event) {
        line.print();
    }
}

/// Run one message; Ctrl-C cancels the run without exiting.
async fn submit(session: &AgentSession, text: &str) -> Result<(), ParleyError> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = session.submit_with_cancel(text, &cancel).await;
    watcher.abort();
    result.map(|_| ())
}

async fn repl(session: &AgentSession) -> Result<(), ParleyError> {
    let config = session.config().snapshot();
    eprintln!(
        "parley: {} / {} (type /help for commands)",
        config.provider, config.model
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ReplCommand::parse(&line) {
            Ok(ReplCommand::Empty) => {}
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Help) => eprintln!("{HELP}"),
            Ok(ReplCommand::Reset) => {
                session.reset().await;
                eprintln!("conversation cleared");
            }
            Ok(ReplCommand::Configure(mut update)) => {
                resolve_provider_key(&mut update, |name| std::env::var(name).ok());
                session.set_session_config(update);
                let config = session.config().snapshot();
                eprintln!("now using {} / {}", config.provider, config.model);
            }
            Ok(ReplCommand::Message(text)) => match submit(session, &text).await {
                Ok(()) => {}
                Err(ParleyError::Cancelled) => eprintln!("(cancelled)"),
                Err(e) => eprintln!("❌ {e}"),
            },
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}
