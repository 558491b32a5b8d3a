use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use tally::audit::AuditLogger;
use tally::cli::{Console, Menu};
use tally::config::{Settings, TallyPaths};
use tally::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Multi-user personal income and expense ledger",
    long_about = "Tally keeps a small income and expense ledger for several users \
                  in one data directory. Sign up, sign in and manage your \
                  transactions from an interactive menu."
)]
struct Cli {
    /// Data directory (overrides TALLY_DATA_DIR and the platform default)
    #[arg(long, global = true, env = "TALLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level for diagnostics on stderr when RUST_LOG is not set
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive sign-in menu (default)
    Menu,

    /// Create the data directory and write default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let paths = match cli.data_dir {
        Some(dir) => TallyPaths::with_base_dir(dir),
        None => TallyPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let mut storage = Storage::new(paths, &settings)?;
            let mut menu = Menu::new(&mut storage, Console::stdio());
            menu.run()?;
        }
        Commands::Init => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'tally' to sign up and start recording transactions.");
        }
        Commands::Config => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!("Users file:        {}", paths.users_file().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Record layout: {:?}", settings.record_layout);
            println!("  Atomic save:   {}", settings.atomic_save);
            println!("  Audit log:     {}", settings.audit_log);
        }
        Commands::Audit { limit } => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries found.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}

/// Send diagnostics to stderr, honoring RUST_LOG when it is set
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
