//! aptbook CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::Level;

use aptbook_app::cli::{Cli, Command};
use aptbook_app::config::AppConfig;
use aptbook_app::error::AppResult;
use aptbook_app::notify::{NotifyConfig, ReminderNotifier};
use aptbook_app::session::Session;
use aptbook_app::{actions, AppError};
use aptbook_core::{TracingConfig, init_tracing};
use aptbook_store::HttpStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if matches!(cli.command, Some(Command::Watch { .. })) {
        TracingConfig::watch()
    } else {
        TracingConfig::default().with_level(Level::WARN)
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = match cli.config {
        Some(ref path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(url) = cli.service_url {
        config.service.url = url;
    }

    let store = HttpStore::new(&config.service.url, config.service.timeout())
        .map_err(AppError::Store)?;
    let notifier = ReminderNotifier::new(
        NotifyConfig::default()
            .with_app_name(config.notifications.app_name.clone())
            .with_timeout(config.notifications.timeout_secs)
            .with_enabled(config.notifications.enabled),
    );
    let session = Session::new(Arc::new(store), notifier);

    match cli.command {
        None | Some(Command::Dashboard) => actions::dashboard(&session).await,
        Some(Command::Calendar { year, month }) => actions::calendar(&session, year, month).await,
        Some(Command::List { search }) => actions::list(&session, search).await,
        Some(Command::Add {
            title,
            description,
            date,
            time,
            duration,
            alarm_offset,
        }) => {
            actions::add(
                &session,
                title,
                description,
                date,
                time,
                duration,
                alarm_offset,
            )
            .await
        }
        Some(Command::Edit {
            id,
            title,
            description,
            date,
            time,
            duration,
            alarm_offset,
            no_alarm,
        }) => {
            actions::edit(
                &session,
                id,
                title,
                description,
                date,
                time,
                duration,
                alarm_offset,
                no_alarm,
            )
            .await
        }
        Some(Command::Remove { id }) => actions::remove(&session, id).await,
        Some(Command::Watch { interval_secs }) => {
            let interval = interval_secs
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| config.alarms.tick_interval());
            actions::watch(Arc::new(session), interval).await
        }
    }
}
