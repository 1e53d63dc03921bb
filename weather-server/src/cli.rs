use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use cep_weather_core::{Config, WeatherService, provider::providers_from_config};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::api;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "Current temperature by Brazilian postal code")]
pub struct Cli {
    /// Config file to use instead of the one in the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:8080". Overrides config and environment.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Store the WeatherAPI key and listen address in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match self.command.unwrap_or(Command::Serve { listen: None }) {
            Command::Serve { listen } => serve(config, listen).await,
            Command::Configure => configure(config, self.config),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

async fn serve(mut config: Config, listen: Option<String>) -> anyhow::Result<()> {
    config.apply_env();
    if let Some(addr) = listen {
        config.listen_addr = Some(addr);
    }
    tracing::debug!(?config, "effective configuration");

    let addr = config.listen_addr()?;
    let api_key = config.weather_api_key().map(str::to_owned);
    if api_key.is_none() {
        tracing::warn!("No WeatherAPI key configured; /weather will answer 500 until one is set");
    }

    let (resolver, weather) = providers_from_config(&config)?;
    let service = WeatherService::new(Arc::new(resolver), Arc::new(weather), api_key);
    let app = api::routes(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherAPI key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_weather_api_key(api_key.trim().to_string());

    let current = config.listen_addr()?.to_string();
    let listen = Text::new("Listen address:")
        .with_default(&current)
        .prompt()
        .context("Failed to read listen address")?;
    config.listen_addr = Some(listen.trim().to_string());
    // Reject a bad address before it lands on disk.
    config.listen_addr()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
