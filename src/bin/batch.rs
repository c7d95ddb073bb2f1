use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shapecheck::validator::{ShapefileValidator, ValidationRun};

#[derive(Parser, Debug)]
#[command(
    name = "shapecheck-batch",
    version,
    about = "Validate shapefiles in ZIP archives"
)]
struct Cli {
    /// Path to a ZIP file, or to a directory of ZIP files with --batch
    input: PathBuf,

    #[arg(long, help = "Process all ZIP files in the input directory")]
    batch: bool,

    #[arg(short, long, help = "Print the full report for passing archives too")]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();
    let validator = ShapefileValidator::new();

    if cli.batch {
        run_batch(&validator, &cli.input, cli.verbose)
    } else {
        run_single(&validator, &cli.input)
    }
}

fn run_single(validator: &ShapefileValidator, input: &Path) -> anyhow::Result<ExitCode> {
    if !input.exists() {
        eprintln!("ERROR: File not found: {}", input.display());
        return Ok(ExitCode::FAILURE);
    }

    println!("Validating: {}", input.display());
    println!("{}", "=".repeat(50));

    let run = validator
        .validate(input)
        .with_context(|| format!("validating {}", input.display()))?;

    print_shapefile_list(&run);

    println!();
    println!("{}", run.report());
    println!();

    if run.is_valid() {
        println!("Validation PASSED for {}", input.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Validation FAILED for {}", input.display());
        Ok(ExitCode::FAILURE)
    }
}

fn run_batch(
    validator: &ShapefileValidator,
    input: &Path,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    if !input.is_dir() {
        eprintln!("ERROR: {} is not a directory", input.display());
        return Ok(ExitCode::FAILURE);
    }

    let mut zip_files = collect_zip_files(input)
        .with_context(|| format!("listing ZIP files in {}", input.display()))?;
    zip_files.sort();

    if zip_files.is_empty() {
        eprintln!("No ZIP files found in {}", input.display());
        return Ok(ExitCode::FAILURE);
    }

    println!("Found {} ZIP files to validate", zip_files.len());

    let mut all_valid = true;
    for zip_file in &zip_files {
        println!();
        println!("{}", "=".repeat(50));
        println!("Processing: {}", zip_file.display());
        println!("{}", "=".repeat(50));

        let run = validator
            .validate(zip_file)
            .with_context(|| format!("validating {}", zip_file.display()))?;

        if !run.is_valid() {
            all_valid = false;
        }

        if verbose || !run.is_valid() {
            print_shapefile_list(&run);
            println!("{}", run.report());
        }
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("BATCH SUMMARY");
    println!("{}", "=".repeat(50));
    if all_valid {
        println!("All ZIP files passed validation");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Some ZIP files failed validation");
        Ok(ExitCode::FAILURE)
    }
}

fn collect_zip_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut zip_files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_zip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("zip"))
            .unwrap_or(false);
        if path.is_file() && is_zip {
            zip_files.push(path);
        }
    }
    Ok(zip_files)
}

fn print_shapefile_list(run: &ValidationRun) {
    if run.shapefiles().is_empty() {
        return;
    }
    println!();
    println!("Found {} shapefile(s):", run.shapefiles().len());
    for shapefile in run.shapefiles() {
        println!("  - {shapefile}");
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shapecheck=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
