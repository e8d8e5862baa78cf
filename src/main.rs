use baremo::scoring::{self, RawMeasurement, ReferenceTable, Sex};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade a set of measurements
    Calc {
        /// Sex category of the reference table to use
        #[arg(short, long, value_enum)]
        sex: Sex,

        /// Jump distance
        #[arg(long, default_value = "")]
        jump: String,

        /// Push-up count
        #[arg(long, default_value = "")]
        push_ups: String,

        /// Sprint time
        #[arg(long, default_value = "")]
        sprint: String,

        /// 1000m time ("3:45", "345" or minutes)
        #[arg(long = "run-1000", default_value = "")]
        run_1000m: String,

        /// Swim time
        #[arg(long, default_value = "")]
        swim: String,

        /// 6000m time ("24:30", "2430" or minutes)
        #[arg(long = "run-6000", default_value = "")]
        run_6000m: String,

        /// Concept bonus added to the final grade (clamped to 0-1)
        #[arg(long)]
        concept: Option<String>,

        /// Save the evaluation to the history
        #[arg(long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved evaluations, newest first
    History,
    /// Delete a saved evaluation by its index number
    Delete {
        /// Index number of the evaluation (1-based, as shown in history)
        index: usize,
    },
    /// Export saved evaluations as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "baremo")]
#[command(about = "Grade physical fitness tests against reference tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/baremo/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the reference tables JSON (overrides the config file)
    #[arg(short, long, global = true)]
    baremos: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parse a numeric argument, falling back to 0 like the rest of the engine
fn measurement(name: &str, input: &str) -> f64 {
    let parsed = scoring::parse_measurement(input);
    if parsed.is_defaulted() && !input.trim().is_empty() {
        tracing::warn!(field = name, input = %input, "not a number, using 0");
    }
    parsed.value()
}

/// Load the reference tables, degrading to an empty table on failure
async fn load_tables(path: &Path) -> ReferenceTable {
    match scoring::load_reference_table(path).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("{:#}", e);
            eprintln!("Could not load reference tables, every test will score 0.");
            ReferenceTable::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match baremo::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let baremos_path = cli.baremos.unwrap_or_else(|| config.baremos_path());
    let history_path = config.history_path();
    let use_colors = baremo::output::should_use_colors();

    match cli.command {
        Commands::Calc {
            sex,
            jump,
            push_ups,
            sprint,
            run_1000m,
            swim,
            run_6000m,
            concept,
            save,
            json,
        } => {
            let table = load_tables(&baremos_path).await;

            let raw = RawMeasurement {
                jump: measurement("jump", &jump),
                push_ups: measurement("push-ups", &push_ups),
                sprint: measurement("sprint", &sprint),
                run_1000m,
                swim: measurement("swim", &swim),
                run_6000m,
            };

            let mut result = scoring::calculate_grades(&table, sex, &raw);
            if let Some(concept) = concept {
                result = result.apply_concept(measurement("concept", &concept));
            }

            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Failed to serialize result: {}", e);
                        std::process::exit(EXIT_IO);
                    }
                }
            } else {
                println!("{}", baremo::output::format_scores_table(result.scores(), use_colors));
                println!();
                println!("{}", baremo::output::format_messages(result.messages(), use_colors));
                println!();
                println!("{}", baremo::output::format_summary(&result, use_colors));
            }

            if save {
                let saved = baremo::history::update_history(&history_path, |state| {
                    state.record(&result);
                    Ok(())
                });
                if let Err(e) = saved {
                    eprintln!("Failed to save evaluation: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
                eprintln!("Evaluation saved to {}", history_path.display());
            }
        }
        Commands::History => {
            let state = match baremo::history::load_history(&history_path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("History error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };
            println!("{}", baremo::output::format_history(&state, use_colors));
        }
        Commands::Delete { index } => {
            let state = match baremo::history::load_history(&history_path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("History error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };

            // Validate index bounds (1-based)
            let listed = state.newest_first();
            if index < 1 || index > listed.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    listed.len()
                );
                std::process::exit(EXIT_USAGE);
            }
            let id = listed[index - 1].id;

            let removed =
                baremo::history::update_history(&history_path, |state| Ok(state.remove(id)));
            if let Err(e) = removed {
                eprintln!("Failed to save history: {:#}", e);
                std::process::exit(EXIT_IO);
            }
            println!("Deleted evaluation {}.", index);
        }
        Commands::Export { output } => {
            let state = match baremo::history::load_history(&history_path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("History error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };
            let csv = match baremo::output::format_csv(&state) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Export failed: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };

            match output {
                Some(path) => {
                    if let Err(e) = baremo::config::write_atomic(&path, csv.as_bytes()) {
                        eprintln!("Export failed: {:#}", e);
                        std::process::exit(EXIT_IO);
                    }
                    eprintln!("Exported {} evaluations to {}", state.len(), path.display());
                }
                None => print!("{}", csv),
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
