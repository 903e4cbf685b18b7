use std::process::ExitCode;

use anyhow::Context;
use assistant_core::{
    Config, FormView, HttpBackend, RecommendationBackend,
    render::{Screen, SubmitControl},
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use inquire::{DateSelect, InquireError, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-assistant", version, about = "Personal weather assistant")]
pub struct Cli {
    /// Backend base URL; overrides the configured one.
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the form interactively (default).
    Form,

    /// Ask once for a city and print the result.
    Ask {
        /// City name.
        city: String,

        /// Date as YYYY-MM-DD; omitted means none is sent.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Set the backend URL.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Form) {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Form => {
                let backend = backend(self.backend_url.as_deref())?;
                run_form(&backend).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Ask { city, date } => {
                let backend = backend(self.backend_url.as_deref())?;

                let mut view = FormView::new();
                view.set_city(city);
                view.set_date(date);
                submit(&mut view, &backend).await;

                print!("{}", Screen(&view));
                if view.error().is_some() { Ok(ExitCode::FAILURE) } else { Ok(ExitCode::SUCCESS) }
            }
        }
    }
}

fn backend(override_url: Option<&str>) -> anyhow::Result<HttpBackend> {
    let config = match override_url {
        Some(_) => Config::default(),
        None => Config::load()?,
    };

    let backend = HttpBackend::new(config.backend_url(override_url));
    tracing::debug!(url = backend.url(), "using backend");
    Ok(backend)
}

/// Drive one submission, showing the disabled submit control while waiting.
async fn submit(view: &mut FormView, backend: &dyn RecommendationBackend) {
    let Some(request) = view.begin_submit() else {
        return;
    };

    eprintln!("{}", SubmitControl(view));
    let outcome = backend.fetch(&request).await;
    view.finish(outcome);
}

async fn run_form(backend: &dyn RecommendationBackend) -> anyhow::Result<()> {
    let mut view = FormView::new();

    loop {
        let city = match Text::new("City:").with_initial_value(view.city()).prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        let start = view.date().unwrap_or_else(|| Local::now().date_naive());
        let date = match DateSelect::new("Date (Esc for none):")
            .with_starting_date(start)
            .prompt_skippable()
        {
            Ok(date) => date,
            Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read date"),
        };

        view.set_city(city);
        view.set_date(date);
        submit(&mut view, backend).await;

        println!();
        print!("{}", Screen(&view));
        println!();
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let url = Text::new("Backend URL:")
        .with_default(config.backend_url(None))
        .prompt()
        .context("Failed to read backend URL")?;

    config.set_backend_url(&url)?;
    let path = config.save()?;

    println!("Saved backend URL to {}", path.display());
    Ok(())
}
