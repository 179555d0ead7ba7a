use chrono::Local;
use clap::Parser;
use log::info;
use std::error::Error;
use std::process::ExitCode;

mod cli;

use crate::cli::{AddArgs, Args, Command};
use site_survey::config::Config;
use site_survey::controller::condition::ConditionFlag;
use site_survey::controller::entry::{EntryController, LocationNotice};
use site_survey::controller::list::ListController;
use site_survey::display::{JsonDisplay, TextDisplay};
use site_survey::error::SubmitError;
use site_survey::location::StaticLocationProvider;
use site_survey::state::store::RecordStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    // Initialize logger
    env_logger::init();

    let config = Config::from_env()?;

    // CLI flag wins over the environment
    let db_path = match args.db.clone().or_else(|| config.db_path.clone()) {
        Some(path) => path,
        None => RecordStore::default_path()?,
    };

    // The app cannot do anything without its store, so failures here are fatal
    let store = RecordStore::open(&db_path)?;
    info!("🗺️  Site survey ready with {} entries", store.count()?);

    match args.command {
        Command::Add(add) => run_add(&store, &config, add).await,
        Command::List { json } => run_list(&store, json),
        Command::Locate => run_locate(&store, &config).await,
        Command::Reset { yes } => run_reset(&store, yes),
    }
}

/// Fill the entry form from the arguments and save it
async fn run_add(
    store: &RecordStore,
    config: &Config,
    add: AddArgs,
) -> Result<ExitCode, Box<dyn Error>> {
    let provider = StaticLocationProvider::new(config.location);
    let mut controller = EntryController::new(store, provider, config.location_permission);

    let date = if add.today {
        Local::now().format("%Y-%m-%d").to_string()
    } else {
        add.date.unwrap_or_default()
    };

    let form = controller.form_mut();
    form.site_name = add.site.unwrap_or_default();
    form.date = date;
    form.description = add.description.unwrap_or_default();
    form.terrain_type = add.terrain.unwrap_or_default();
    form.observations = add.observations.unwrap_or_default();

    // Clicked in this order, so the last checked flag wins
    let clicks = [
        (ConditionFlag::Good, add.good),
        (ConditionFlag::Damaged, add.damaged),
        (ConditionFlag::Average, add.average),
    ];
    for (flag, clicked) in clicks {
        if clicked {
            controller.condition_mut().toggle(flag);
        }
    }

    if add.locate {
        let mut notice = controller.request_location();
        if notice == LocationNotice::Pending {
            notice = controller.wait_for_location(config.location_timeout).await;
        }
        // Location problems are only notices; the entry is saved anyway
        report_location(&notice);
    }

    let result = controller.submit();
    let condition = controller.condition().resolve();
    controller.dispose();

    match result {
        Ok(id) => {
            println!("✅ Entry saved successfully! (id {}, {})", id, condition);
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::Validation { field, message }) => {
            eprintln!("⚠️  {} ({})", message, field);
            Ok(ExitCode::from(2))
        }
        Err(e @ SubmitError::Persistence(_)) => {
            eprintln!("❌ {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_list(store: &RecordStore, json: bool) -> Result<ExitCode, Box<dyn Error>> {
    let controller = ListController::new(store);
    let stdout = std::io::stdout().lock();

    if json {
        controller.present(&mut JsonDisplay::new(stdout))?;
    } else {
        controller.present(&mut TextDisplay::new(stdout))?;
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_locate(store: &RecordStore, config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let provider = StaticLocationProvider::new(config.location);
    let mut controller = EntryController::new(store, provider, config.location_permission);

    let mut notice = controller.request_location();
    if notice == LocationNotice::Pending {
        notice = controller.wait_for_location(config.location_timeout).await;
    }
    controller.dispose();

    report_location(&notice);
    match notice {
        LocationNotice::Captured(_) => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}

fn run_reset(store: &RecordStore, yes: bool) -> Result<ExitCode, Box<dyn Error>> {
    if !yes {
        eprintln!(
            "⚠️  This deletes all {} entries. Re-run with --yes to confirm.",
            store.count()?
        );
        return Ok(ExitCode::FAILURE);
    }

    let dropped = store.reset()?;
    println!("🗑️  Deleted {} entries.", dropped);
    Ok(ExitCode::SUCCESS)
}

/// Print a one-line notice for the outcome of a location request
fn report_location(notice: &LocationNotice) {
    match notice {
        LocationNotice::Captured(coordinates) => println!("📍 {}", coordinates),
        LocationNotice::Pending => eprintln!("⏳ No location received yet."),
        LocationNotice::Unavailable => eprintln!("⚠️  Unable to get the location."),
        LocationNotice::Failed(reason) => {
            eprintln!("⚠️  Error while getting the location: {}", reason)
        }
        LocationNotice::PermissionDenied => eprintln!("🚫 Location permission denied."),
        LocationNotice::NotRequested => {}
    }
}
