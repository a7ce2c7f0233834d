use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use force_deprecation_check::{Config, OutputFormat};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "force-deprecation")]
#[command(about = "Flag imports of deprecated modules and exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a JavaScript/TypeScript project for deprecated imports
    Check(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Check(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Running deprecation check (using {} threads)", num_threads);
            debug!("Config: root={:?}, config={:?}", cfg.root, cfg.config);

            let result = force_deprecation_check::run_deprecation_check(cfg.clone())?;
            debug!("Found {} warnings", result.warnings.len());

            let elapsed_ms = start.elapsed().as_millis();

            if cfg.format == OutputFormat::Json {
                force_deprecation_check::print_json(&mut stdout, &result.warnings)?;
            } else {
                if result.warnings.is_empty() {
                    force_deprecation_check::print_no_deprecations_message(
                        &mut stdout,
                        result.files_analyzed,
                    )?;
                } else {
                    force_deprecation_check::print_warnings_tree(
                        &mut stdout,
                        &result.warnings,
                        &cfg,
                    )?;
                }
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files with {} rules (using {} threads).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    result.files_analyzed.to_string().cyan(),
                    result.rules.to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            if !result.warnings.is_empty() {
                // Non-zero exit to fail CI
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
