//! layergen CLI - YAML-based scaffolding of layered ASP.NET Core services
//!
//! Reads a solution description and generates entities, DTOs, repositories,
//! controllers, a DbContext with seed data and the project files, then runs
//! the `dotnet` migration and solution commands.

use clap::Parser;
use layergen::codegen::{generate_from_yaml, GenerationReport, GeneratorOptions};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "layergen")]
#[command(version, about = "YAML-based scaffolding of layered ASP.NET Core services", long_about = None)]
struct Cli {
    /// Path to the YAML solution configuration
    config: Option<PathBuf>,

    /// Parent directory for the solution (overrides solution.outputPath)
    #[arg(short, long, env = "LAYERGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Skip migrations and solution file creation
    #[arg(long, env = "LAYERGEN_SKIP_TOOLCHAIN")]
    no_toolchain: bool,

    /// Fail when a toolchain command fails instead of warning
    #[arg(long, env = "LAYERGEN_STRICT_TOOLCHAIN")]
    strict_toolchain: bool,

    /// Timeout in seconds for each toolchain command
    #[arg(long, env = "LAYERGEN_TOOLCHAIN_TIMEOUT", default_value_t = 300)]
    toolchain_timeout: u64,

    /// Toolchain executable
    #[arg(long, env = "LAYERGEN_DOTNET", default_value = "dotnet")]
    dotnet: String,

    /// Exit with an error status when any warning was reported
    #[arg(long)]
    deny_warnings: bool,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            output_override: self.output.clone(),
            run_toolchain: !self.no_toolchain,
            strict_toolchain: self.strict_toolchain,
            toolchain_timeout: Duration::from_secs(self.toolchain_timeout),
            dotnet_program: self.dotnet.clone(),
        }
    }
}

fn main() {
    // Load environment variables before parsing so they can back the flags
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(config) = cli.config.clone() else {
        println!("Please provide the path to the YAML file as a command-line argument.");
        return;
    };

    let result = generate_from_yaml(&config, &cli.options())
        .map_err(|e| e.to_string())
        .and_then(|report| summarize(&report, cli.deny_warnings));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Print what was written and every warning
fn summarize(report: &GenerationReport, deny_warnings: bool) -> Result<(), String> {
    println!("\n📁 Output: {}", report.output_root.display());
    println!("  ✓ {} files written", report.files_written.len());

    if !report.has_warnings() {
        return Ok(());
    }

    println!("\n⚠️  {} warning(s):", report.warnings().len());
    for warning in report.warnings() {
        println!("  - {}", warning);
    }

    if deny_warnings {
        return Err(format!(
            "{} warning(s) reported and --deny-warnings is set",
            report.warnings().len()
        ));
    }
    Ok(())
}
