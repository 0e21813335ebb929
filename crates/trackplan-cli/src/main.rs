//! trackplan CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use trackplan_compiler::{
    aggregate_workspace, Generator, GeneratorConfig, SchemaValidator, CONFIG_FILE_NAME,
};

mod ui;

#[derive(Parser)]
#[command(name = "trackplan")]
#[command(about = "trackplan - generate tracking code and schema lock files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate configured outputs and write the package lock file
    Generate {
        /// Package directory containing the configuration
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Configuration file name, relative to the package directory
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: String,

        /// Reject events that declare no properties
        #[arg(long)]
        require_properties: bool,
    },

    /// Parse and validate schema sources without writing anything
    Check {
        /// Package directory containing the configuration
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Configuration file name, relative to the package directory
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: String,
    },

    /// Aggregate all package lock files into a monorepo lock file
    Monorepo {
        /// Monorepo root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            dir,
            config,
            require_properties,
        } => {
            let spinner = ui::spinner("Generating...");
            let generator_config = GeneratorConfig::load(&dir, &config)?;
            let validator = SchemaValidator { require_properties };

            let report = Generator::new(generator_config, validator).generate()?;
            spinner.finish_and_clear();

            ui::done(&format!(
                "Generated {} target{}",
                report.targets.len(),
                if report.targets.len() == 1 { "" } else { "s" }
            ));
            for target in &report.targets {
                ui::target_line(&target.output, target.previous, target.version, target.changed);
            }
            match report.previous {
                Some(previous) if previous != report.version => ui::detail(
                    "lock",
                    &format!("{previous} {} {}", ui::symbols::ARROW, report.version),
                ),
                _ => ui::detail("lock", &report.version.to_string()),
            }
            ui::detail("wrote", &report.lock_path.display().to_string());
        }

        Commands::Check { dir, config } => {
            let spinner = ui::spinner("Checking schema sources...");
            let generator_config = GeneratorConfig::load(&dir, &config)?;

            let report = Generator::new(generator_config, SchemaValidator::new()).check()?;
            spinner.finish_and_clear();

            ui::done("Schema sources are valid");
            ui::detail(
                "checked",
                &format!(
                    "{} target{} {} {} event{}",
                    report.targets,
                    if report.targets == 1 { "" } else { "s" },
                    ui::symbols::DOT,
                    report.events,
                    if report.events == 1 { "" } else { "s" }
                ),
            );
        }

        Commands::Monorepo { root } => {
            let spinner = ui::spinner("Aggregating package lock files...");
            let report = aggregate_workspace(&root)?;
            spinner.finish_and_clear();

            ui::done(&format!(
                "Aggregated {} package{}",
                report.packages,
                if report.packages == 1 { "" } else { "s" }
            ));
            match report.previous {
                Some(previous) if previous != report.version => ui::detail(
                    "lock",
                    &format!("{previous} {} {}", ui::symbols::ARROW, report.version),
                ),
                _ => ui::detail("lock", &report.version.to_string()),
            }
            ui::detail("toolVersion", &report.tool_version);
            ui::detail("wrote", &report.lock_path.display().to_string());
        }
    }

    Ok(())
}
