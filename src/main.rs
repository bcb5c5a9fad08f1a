// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// rustycatcher - live terminal client for a MailCatcher-compatible server
///
/// Keeps the captured message list in sync over the push channel (or by
/// polling) and reads navigation commands from stdin, one per line.
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::io::BufRead;
use std::process::exit;
use std::sync::Arc;
use tokio::sync::mpsc;

use rustycatcher::api::client::{HttpMailboxClient, MailboxApi};
use rustycatcher::api::endpoints::Endpoints;
use rustycatcher::app::{App, Output};
use rustycatcher::config::Settings;
use rustycatcher::error::CatcherError;
use rustycatcher::preferences::Preferences;
use rustycatcher::transport::{self, TransportMode};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Live terminal client for MailCatcher-compatible mail capture servers",
    long_about = None
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, env = "CATCHER_CONFIG")]
    config: Option<String>,

    /// Base URL of the capture server.
    #[arg(long, env = "CATCHER_URL")]
    url: Option<String>,

    /// How to receive mailbox updates.
    #[arg(long, value_enum, env = "CATCHER_TRANSPORT")]
    transport: Option<TransportMode>,

    /// Polling period when the push channel is not used.
    #[arg(long, env = "CATCHER_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Log filter, overridden by RUST_LOG.
    #[arg(long, env = "CATCHER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::new(cli.config.as_deref()).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        exit(1);
    });
    if let Some(url) = cli.url {
        settings.base_url = url;
    }
    if let Some(mode) = cli.transport {
        settings.transport = mode;
    }
    if let Some(ms) = cli.poll_interval_ms.filter(|ms| *ms > 0) {
        settings.poll_interval_ms = ms;
    }
    if let Some(level) = cli.log_level {
        settings.log.level = level;
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log.level.as_str()))
        .init();

    if let Err(e) = run(settings).await {
        error!("{}", e);
        exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), CatcherError> {
    let endpoints = Endpoints::new(&settings.base_url)?;
    info!("Connecting to {}", endpoints.base());
    let api: Arc<dyn MailboxApi> = Arc::new(HttpMailboxClient::new(endpoints.clone())?);

    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let transport = transport::start(
        settings.transport,
        &endpoints,
        api.clone(),
        settings.poll_interval(),
        inbound_tx,
    )
    .await?;
    info!("Transport state: {:?}", transport.state());

    let preferences = settings
        .state_dir()
        .or_else(Preferences::default_dir)
        .map(Preferences::new);

    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let app = App::new(api, endpoints, &settings.default_format, preferences, output_tx);
    let printer = tokio::spawn(print_output(output_rx));

    // Plain thread: a blocked stdin read must not hold up runtime shutdown
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    let result = app.run(inbound_rx, input_rx).await;
    transport.abort();
    let _ = printer.await;
    result
}

async fn print_output(mut rx: mpsc::UnboundedReceiver<Output>) {
    while let Some(output) = rx.recv().await {
        match output {
            Output::Screen(screen) => println!("\n{}", screen.trim_end()),
            Output::Alert(message) => println!("!! {}", message),
            Output::Prompt(question) => println!("{}", question),
            Output::Info(text) => println!("{}", text),
        }
    }
}
