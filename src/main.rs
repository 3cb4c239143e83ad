//! ASE Migration - per-customer ASE policy mode report
//!
//! Menu ("Akamai"):
//!   add-customer   Prompt for an account switch key and add a customer sheet
//!   about          Help -> About
//!
//! Environment:
//!   AKAMAI_EDGERC          - credentials file (default: ~/.edgerc)
//!   AKAMAI_EDGERC_SECTION  - credentials section (default: default)
//!   ASE_WORKBOOK           - output workbook (default: ase-migration.xlsx)
//!   ASE_HTTP_TIMEOUT_SECS  - per-request timeout (default: 30)
//!   RUST_LOG               - log level (default: info)
//!
//! Exit status is 2 for errors fixable by the user (credentials, unknown
//! account, existing sheet) and 1 for everything else.

use ase_migration::dialog::{about_text, choose_menu_item};
use ase_migration::utils::constants::{APP_NAME, APP_VERSION};
use ase_migration::{
    AccountSwitchKey, AppConfig, AppSecClient, DialogController, MenuItem, PresetPrompt, Prompt,
    TerminalPrompt,
};

use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "ase-migration", version, about = "Report Akamai ASE policy modes per customer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Credentials file
    #[arg(long, global = true)]
    edgerc: Option<PathBuf>,

    /// Credentials section
    #[arg(long, global = true)]
    section: Option<String>,

    /// Workbook to add the customer sheet to
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a customer sheet for an account switch key
    AddCustomer {
        /// Answer the prompt with this "accountId:contractTypeId"
        #[arg(long)]
        key: Option<String>,
    },
    /// Show usage help
    About,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    info!("🚀 {} v{}", APP_NAME, APP_VERSION);
    let config = AppConfig::default().with_overrides(cli.edgerc, cli.section, cli.workbook);

    let mut terminal = TerminalPrompt::stdio();
    let (item, preset_key) = match cli.command {
        Some(Command::AddCustomer { key }) => (MenuItem::AddCustomer, key),
        Some(Command::About) => (MenuItem::About, None),
        None => match choose_menu_item(&mut terminal)? {
            Some(item) => (item, None),
            None => return Ok(()),
        },
    };

    match item {
        MenuItem::About => {
            println!("{}", about_text());
            Ok(())
        }
        MenuItem::AddCustomer => {
            let key = match preset_key {
                Some(key) => DialogController::prompt_for_key(&mut PresetPrompt::answer(key))?,
                None => DialogController::prompt_for_key(&mut terminal as &mut dyn Prompt)?,
            };
            match key {
                Some(key) => add_customer(&config, key).await,
                None => Ok(()),
            }
        }
    }
}

async fn add_customer(config: &AppConfig, key: AccountSwitchKey) -> Result<()> {
    let client = AppSecClient::from_config(config)?;

    match DialogController::run_and_save(&client, &config.workbook_path, key).await {
        Ok(report) => {
            info!(
                "✅ Sheet \"{}\" written with {} policies",
                report.sheet_name,
                report.rows.len()
            );
            println!(
                "Added \"{}\" ({} policies) to {}",
                report.sheet_name,
                report.rows.len(),
                config.workbook_path.display()
            );
            Ok(())
        }
        Err(e) if e.code.is_user_correctable() => {
            error!("❌ Add Customer failed: {}", e);
            eprintln!("{}", e.message);
            std::process::exit(2);
        }
        Err(e) => {
            error!("❌ Add Customer failed: {}", e);
            Err(e.into())
        }
    }
}
