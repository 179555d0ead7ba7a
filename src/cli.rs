use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use site_survey::state::data::TERRAIN_TYPES;

#[derive(Parser)]
#[command(name = "site-survey")]
#[command(about = "Record and browse field survey site observations")]
#[command(version)]
pub(crate) struct Args {
    /// Database file (overrides SURVEY_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Save a new survey entry
    Add(AddArgs),

    /// List saved entries
    List {
        /// Print entries as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print the last known position
    Locate,

    /// Delete every saved entry
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

/// Fields of a new entry. Missing required fields are reported by validation.
#[derive(clap::Args)]
pub(crate) struct AddArgs {
    /// Site or location name
    #[arg(short, long)]
    pub site: Option<String>,

    /// Survey date (free-form)
    #[arg(short, long, conflicts_with = "today")]
    pub date: Option<String>,

    /// Use today's date
    #[arg(long)]
    pub today: bool,

    /// Description of the site
    #[arg(long)]
    pub description: Option<String>,

    /// Terrain category
    #[arg(short, long, value_parser = PossibleValuesParser::new(TERRAIN_TYPES))]
    pub terrain: Option<String>,

    /// Free-text observations
    #[arg(short, long)]
    pub observations: Option<String>,

    /// Site is in good condition
    #[arg(long)]
    pub good: bool,

    /// Site is damaged
    #[arg(long)]
    pub damaged: bool,

    /// Site is in average condition
    #[arg(long)]
    pub average: bool,

    /// Capture the last known position into the entry
    #[arg(short, long)]
    pub locate: bool,
}
