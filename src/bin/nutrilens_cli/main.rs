// ABOUTME: NutriLens CLI - command-line front end for meal logging and intake tracking
// ABOUTME: Classifies meal photos, logs meals, and reports progress and recommendations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Classify a photo and accept the prediction
//! nutrilens-cli classify lunch.jpg --accept
//!
//! # Pick one of the ranked alternates instead
//! nutrilens-cli classify lunch.jpg --pick 된장찌개
//!
//! # Log a meal by name
//! nutrilens-cli log 비빔밥
//!
//! # Today's progress and recommendations
//! nutrilens-cli progress
//! nutrilens-cli recommend --limit 5
//!
//! # Recent classification attempts
//! nutrilens-cli uploads --limit 20
//!
//! # Set the profile used for daily targets
//! nutrilens-cli profile set --age 30 --height 175 --weight 70 --gender M
//! ```

mod commands;
mod helpers;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use nutrilens::config::{AppConfig, DatabaseUrl};
use nutrilens::errors::AppResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use commands::CliContext;

#[derive(Parser)]
#[command(
    name = "nutrilens-cli",
    about = "NutriLens meal tracker",
    long_about = "Log meals from photos or by name, track daily nutrient intake, and get food recommendations."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// List or search the foods the classifier supports
    Foods {
        /// Case-insensitive substring filter
        #[arg(long)]
        query: Option<String>,
    },

    /// Classify a meal photo and optionally log the result
    Classify {
        /// Path to the image
        image: PathBuf,

        /// Log the top prediction
        #[arg(long, conflicts_with_all = ["pick", "manual"])]
        accept: bool,

        /// Log one of the ranked predictions
        #[arg(long, conflicts_with = "manual")]
        pick: Option<String>,

        /// Log a food chosen from the catalog instead
        #[arg(long)]
        manual: Option<String>,
    },

    /// Log a meal by food name
    Log {
        /// Food name as it appears in the nutrient table
        food: String,

        /// Classifier confidence (0-100); omitted for manual entries
        #[arg(long)]
        confidence: Option<f64>,
    },

    /// Show logged meals, most recent first
    History {
        /// Only meals of this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Maximum number of meals
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Delete one meal
    Delete {
        /// Meal id
        id: String,
    },

    /// Delete every meal of a day
    Reset {
        /// Day to reset (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show intake against targets
    Progress {
        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Recommend foods for today's deficiencies
    Recommend {
        /// Maximum number of foods
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Profile management commands
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Show recent classification attempts and their success rate
    Uploads {
        /// Maximum number of attempts
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Delete meals older than the retention window
    Purge {
        /// Whole days of meals to keep
        #[arg(long)]
        keep_days: Option<u32>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ProfileCommand {
    /// Store the profile and show the derived targets
    Set {
        /// Age in years
        #[arg(long)]
        age: u32,

        /// Height in centimetres
        #[arg(long)]
        height: f64,

        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        /// M or F
        #[arg(long)]
        gender: String,

        /// low, moderate, or high
        #[arg(long, default_value = "moderate")]
        activity: String,

        /// lose, maintain, or gain
        #[arg(long, default_value = "maintain")]
        goal: String,

        /// Dietary restriction (repeatable)
        #[arg(long = "restriction")]
        restrictions: Vec<String>,
    },

    /// Show the stored profile and its targets
    Show,

    /// Remove the stored profile
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            helpers::display::report_error(error, json);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = AppConfig::from_env()?;
    if cli.verbose {
        config.logging.level = "debug".into();
    }
    if let Err(e) = config.logging.init() {
        eprintln!("Logging unavailable: {e}");
    }

    if let Some(url) = cli.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url);
    }
    config.log_summary();

    let ctx = CliContext::initialize(config, cli.json).await?;
    debug!("CLI context ready");

    match cli.command {
        Command::Foods { query } => commands::classify::foods(&ctx, query.as_deref()).await?,
        Command::Classify {
            image,
            accept,
            pick,
            manual,
        } => {
            let choice = commands::classify::Choice::from_flags(accept, pick, manual);
            commands::classify::classify(&ctx, &image, choice).await?;
        }
        Command::Log { food, confidence } => {
            commands::meals::log(&ctx, food, confidence).await?;
        }
        Command::History { date, limit } => commands::meals::history(&ctx, date, limit).await?,
        Command::Delete { id } => commands::meals::delete(&ctx, &id).await?,
        Command::Reset { date } => commands::meals::reset(&ctx, date).await?,
        Command::Progress { date } => commands::meals::progress(&ctx, date).await?,
        Command::Recommend { limit } => commands::meals::recommend(&ctx, limit).await?,
        Command::Profile { action } => match action {
            ProfileCommand::Set {
                age,
                height,
                weight,
                gender,
                activity,
                goal,
                restrictions,
            } => {
                let args = commands::profile::ProfileArgs {
                    age,
                    height_cm: height,
                    weight_kg: weight,
                    gender,
                    activity,
                    goal,
                    restrictions,
                };
                commands::profile::set(&ctx, args).await?;
            }
            ProfileCommand::Show => commands::profile::show(&ctx).await?,
            ProfileCommand::Clear => commands::profile::clear(&ctx).await?,
        },
        Command::Uploads { limit } => commands::uploads::uploads(&ctx, limit).await?,
        Command::Purge { keep_days } => commands::meals::purge(&ctx, keep_days).await?,
    }

    Ok(())
}
