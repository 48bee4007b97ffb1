use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use halfmarathon_predictor::application::Session;
use halfmarathon_predictor::cli::{build_handler, submit, AppError, Cli, Command, Messages, Repl, Reveal};
use halfmarathon_predictor::config::AppConfig;
use halfmarathon_predictor::ports::CredentialError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG wins over the configured level; stdout stays for the user
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let messages = Messages::new(cli.locale.unwrap_or(config.app.locale));
    let reveal = Reveal::from_config(&config.app, config.app.animate && !cli.no_animate);

    match run(cli, &config, messages, reveal).await {
        Ok(code) => code,
        Err(AppError::Credentials(CredentialError::Unavailable { .. })) => {
            eprintln!("{}", messages.api_key_missing());
            ExitCode::FAILURE
        }
        Err(AppError::Model(err)) => {
            eprintln!("{}", messages.model_unavailable(&err));
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %err, "fatal error");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    cli: Cli,
    config: &AppConfig,
    messages: Messages,
    reveal: Reveal,
) -> Result<ExitCode, AppError> {
    let mut session = Session::new();
    let handler = build_handler(config, &mut session, messages.api_key_prompt()).await?;
    let flush_timeout = config.telemetry.timeout();

    match cli.command {
        Some(Command::Predict { text }) => {
            let predicted = submit(
                &handler,
                &mut session,
                &messages,
                &reveal,
                &text,
                &mut io::stdout(),
            )
            .await?;
            handler.flush_traces(flush_timeout).await;
            Ok(if predicted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        None => {
            let mut repl = Repl::new(handler, session, messages, reveal);
            repl.run().await?;
            repl.handler().flush_traces(flush_timeout).await;
            Ok(ExitCode::SUCCESS)
        }
    }
}
