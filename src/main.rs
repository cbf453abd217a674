//! Bookshop CLI - load the bookshop database and search sales by publisher

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use bookshop::config::{self, BookshopConfig};
use bookshop::seed;
use bookshop::shell;
use bookshop::storage::BookshopStore;
use bookshop::ui::{self, Icons};
use bookshop::SalesQuery;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bookshop")]
#[command(version)]
#[command(about = "Bookshop sales database - seed loader and publisher sales search")]
#[command(long_about = r#"
Bookshop keeps publishers, books, shops, stock and sales in SQLite and answers
one question: where and for how much were a publisher's books sold?

Example usage:
  bookshop init --database bookshop.db
  bookshop reset --force
  bookshop load --file tests_data.json
  bookshop seed-demo
  bookshop sales --publisher "Пушкин"
  bookshop shell
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "bookshop.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned columns: title | shop | price | date
    Text,
    /// Pretty-printed JSON array of sale records
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the schema (keeps existing data)
    Init {
        /// Path to the database file
        #[arg(short, long, default_value = "bookshop.db")]
        database: PathBuf,

        /// Default fixture file for `load`
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// DESTRUCTIVE: drop all tables and recreate an empty schema
    Reset {
        /// Confirm that every row in the database may be deleted
        #[arg(long)]
        force: bool,
    },

    /// Load a JSON fixture file in one transaction
    Load {
        /// Fixture file (defaults to `fixtures` from the config)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Insert the built-in demo graph
    SeedDemo,

    /// List sales of books whose publisher name contains a substring
    Sales {
        /// Publisher name substring (case-sensitive, empty matches all)
        #[arg(short, long, default_value = "")]
        publisher: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Search sales interactively; enter 0 to stop
    Shell,

    /// Show row counts per table
    Stats {
        /// Also print the schema DDL
        #[arg(long)]
        schema: bool,
    },

    /// DESTRUCTIVE: reset, load fixtures, seed the demo graph, then open the shell
    Demo {
        /// Fixture file (defaults to `fixtures` from the config)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { database, fixtures, force } => {
            run_init(&cli.config, &database, fixtures.as_deref(), force)
        }
        command => run_command(&cli.config, command),
    }
}

fn run_command(config_path: &Path, command: Commands) -> anyhow::Result<()> {
    // No database work without a config file
    let settings = config::load_config(config_path)?;
    let database = settings.database_path();
    tracing::info!("Using database {}", database.display());

    let mut store = BookshopStore::open(&database)?;

    match command {
        Commands::Init { .. } => anyhow::bail!("init runs before a store is opened"),

        Commands::Reset { force } => {
            if !force {
                anyhow::bail!(
                    "reset deletes every row in {}; re-run with --force to confirm",
                    database.display()
                );
            }
            store.reset_schema()?;
            ui::success("Schema dropped and recreated (all data removed)");
        }

        Commands::Load { file } => {
            let path = fixture_path(file, &settings)?;
            load_fixtures(&mut store, &path)?;
        }

        Commands::SeedDemo => {
            let summary = store.commit(&seed::demo_batch())?;
            ui::success(&format!("{} Demo graph inserted ({} rows)", Icons::SEED, summary.counts.total()));
        }

        Commands::Sales { publisher, format } => {
            let rows = SalesQuery::new(&store).by_publisher(&publisher)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Text if rows.is_empty() => ui::no_sales(shell::NO_PURCHASES),
                OutputFormat::Text => {
                    println!("{} Sales for publisher {:?}:", Icons::SEARCH, publisher);
                    println!("{}", ui::sales_table(&rows));
                }
            }
        }

        Commands::Shell => {
            let answered = shell::run_shell(&store, std::io::stdin().lock(), std::io::stdout())?;
            tracing::debug!("Shell answered {} searches", answered);
        }

        Commands::Stats { schema } => {
            let counts = store.stats()?;
            ui::section(&format!("{} Bookshop Statistics", Icons::STATS));
            ui::info("Database", &database.display().to_string());
            println!("{}", counts);

            if schema {
                ui::section(&format!("{} Schema", Icons::DATABASE));
                for ddl in store.schema_sql()? {
                    println!("{};", ddl.trim());
                }
            }
        }

        Commands::Demo { file } => {
            ui::warn("Demo mode resets the database first");
            store.reset_schema()?;

            match file.or_else(|| settings.fixtures_path()) {
                Some(path) => load_fixtures(&mut store, &path)?,
                None => tracing::info!("No fixture file configured, skipping file load"),
            }

            let summary = store.commit(&seed::demo_batch())?;
            ui::success(&format!("{} Demo graph inserted ({} rows)", Icons::SEED, summary.counts.total()));

            shell::run_shell(&store, std::io::stdin().lock(), std::io::stdout())?;
        }
    }

    store.close()?;
    Ok(())
}

fn run_init(config_path: &Path, database: &Path, fixtures: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let settings = BookshopConfig {
        database: Some(database.display().to_string()),
        fixtures: fixtures.map(|p| p.display().to_string()),
    };
    config::write_config(config_path, &settings, force)?;
    config::ensure_db_dir(database)?;

    // Opening creates any missing tables
    let store = BookshopStore::open(database)?;
    store.close()?;

    ui::header("Bookshop initialized");
    ui::summary_row("Config:", &config_path.display().to_string());
    ui::summary_row("Database:", &database.display().to_string());
    Ok(())
}

fn fixture_path(file: Option<PathBuf>, settings: &BookshopConfig) -> anyhow::Result<PathBuf> {
    match file.or_else(|| settings.fixtures_path()) {
        Some(path) => Ok(path),
        None => anyhow::bail!("no fixture file given; pass --file or set `fixtures` in the config"),
    }
}

fn load_fixtures(store: &mut BookshopStore, path: &Path) -> anyhow::Result<()> {
    let batch = seed::load_fixture_file(path)?;
    let summary = store.commit(&batch)?;

    ui::success(&format!("Loaded {} records from {}", summary.counts.total(), path.display()));
    println!("{}", summary.counts);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_format(args: &[&str]) -> Result<OutputFormat, clap::Error> {
        match Cli::try_parse_from(args)?.command {
            Commands::Sales { format, .. } => Ok(format),
            _ => panic!("expected the sales subcommand"),
        }
    }

    #[test]
    fn test_sales_format_flag() {
        assert_eq!(sales_format(&["bookshop", "sales"]).unwrap(), OutputFormat::Text);
        assert_eq!(
            sales_format(&["bookshop", "sales", "-p", "Пушкин", "--format", "json"]).unwrap(),
            OutputFormat::Json
        );
        assert!(sales_format(&["bookshop", "sales", "--format", "xml"]).is_err());
    }
}
