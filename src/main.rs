use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use gdp_etl::config::Config;
use gdp_etl::db::Database;
use gdp_etl::logging;
use gdp_etl::pipeline::{Pipeline, PipelineReport};

#[derive(Parser)]
#[command(name = "gdp_etl")]
#[command(about = "ETL pipeline for the archived largest-banks GDP table")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extract-transform-load pipeline
    Run {
        /// Path to a TOML config file (defaults to config.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run an ad-hoc SQL query against the output database
    Query {
        /// SQL statement to execute
        #[arg(long)]
        sql: String,
        /// Path to a TOML config file (defaults to config.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn print_report(report: &PipelineReport) {
    println!("\n📊 ETL Results:");
    println!("   Tables found: {}", report.tables_found);
    println!("   Rows extracted: {}", report.rows_extracted);
    println!("   CSV output: {}", report.csv_path.display());
    println!(
        "   Database: {} (table: {})",
        report.db_path.display(),
        report.table_name
    );
    match report.fifth_largest_mc_eur {
        Some(value) => println!(
            "   Market capitalization of the 5th largest bank in billion EUR: {value}"
        ),
        None => println!(
            "   Not enough rows to report the 5th largest bank's market capitalization in EUR"
        ),
    }

    println!("\n{}", report.sample_query);
    print!("{}", report.query_output);
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            println!("🚀 Running ETL pipeline...");
            let config = Config::load_or_default(config.as_deref())?;
            let pipeline = Pipeline::new(config);

            match pipeline.run() {
                Ok(report) => {
                    print_report(&report);
                }
                Err(e) => {
                    error!("ETL run failed: {}", e);
                    println!("❌ ETL run failed: {e}");
                    return Err(e.into());
                }
            }
        }
        Commands::Query { sql, config } => {
            let config = Config::load_or_default(config.as_deref())?;
            let db = Database::open(&config.db_path)?;

            println!("{sql}");
            match db.run_query(&sql) {
                Ok(output) => {
                    if output.is_empty() {
                        println!("(no rows)");
                    } else {
                        print!("{output}");
                    }
                }
                Err(e) => {
                    error!("Query failed: {}", e);
                    println!("❌ Query failed: {e}");
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}
