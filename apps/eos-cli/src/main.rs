use clap::{Parser, Subcommand, ValueEnum};
use eos_clean::{
    CleanConfig, CleanError, CleanSummary, DerivsMode, Smoothing, SoundSpeedMode, clean_table,
    validate_table,
};
use eos_io::{TableIoError, compare_tables, ensure_tables_equal, read_table, write_table};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "eos-cli")]
#[command(about = "Stellar-collapse EOS table cleaner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a table: median-filter, recompute sound speed, validate, write
    Clean {
        /// Path to the input HDF5 table
        input: PathBuf,
        /// Output path (defaults to the input with a `_clean.h5` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Which quantities to median-filter
        #[arg(short, long, value_enum, default_value_t = SmoothingArg::Derivs)]
        smoothing: SmoothingArg,
        /// What to do with the derivative fields
        #[arg(short, long, value_enum, default_value_t = DerivsArg::Smooth)]
        derivs: DerivsArg,
        /// Use the legacy non-relativistic sound-speed formula
        #[arg(long)]
        legacy_cs2: bool,
        /// Print the cleaning summary as JSON
        #[arg(long)]
        json: bool,
        /// Skip the write-then-reread self-check
        #[arg(long)]
        no_self_check: bool,
    },
    /// Load a table and run the physical-admissibility checks only
    Validate {
        /// Path to the HDF5 table
        table: PathBuf,
    },
    /// Compare two tables bitwise
    Diff {
        /// First table
        table1: PathBuf,
        /// Second table
        table2: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SmoothingArg {
    All,
    Derivs,
    Hydro,
    None,
}

impl From<SmoothingArg> for Smoothing {
    fn from(arg: SmoothingArg) -> Self {
        match arg {
            SmoothingArg::All => Smoothing::All,
            SmoothingArg::Derivs => Smoothing::DerivsOnly,
            SmoothingArg::Hydro => Smoothing::HydroOnly,
            SmoothingArg::None => Smoothing::None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DerivsArg {
    Smooth,
    Recompute,
    None,
}

impl From<DerivsArg> for DerivsMode {
    fn from(arg: DerivsArg) -> Self {
        match arg {
            DerivsArg::Smooth => DerivsMode::Smooth,
            DerivsArg::Recompute => DerivsMode::Recompute,
            DerivsArg::None => DerivsMode::DoNothing,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] TableIoError),

    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error("Could not serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Self-check failed: written table does not match memory")]
    SelfCheck,
}

impl CliError {
    /// Distinct exit codes per error category.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Io(_) => 2,
            CliError::Clean(CleanError::Unsupported { .. }) => 3,
            CliError::Clean(_) => 4,
            CliError::Json(_) => 5,
            CliError::SelfCheck => 6,
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            smoothing,
            derivs,
            legacy_cs2,
            json,
            no_self_check,
        } => {
            let config = CleanConfig {
                smoothing: smoothing.into(),
                derivs: derivs.into(),
                sound_speed: if legacy_cs2 {
                    SoundSpeedMode::NonRelativistic
                } else {
                    SoundSpeedMode::Relativistic
                },
            };
            cmd_clean(&input, output.as_deref(), &config, json, !no_self_check)
        }
        Commands::Validate { table } => cmd_validate(&table),
        Commands::Diff { table1, table2 } => cmd_diff(&table1, &table2),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn cmd_clean(
    input: &Path,
    output: Option<&Path>,
    config: &CleanConfig,
    json: bool,
    self_check: bool,
) -> Result<(), CliError> {
    // Configuration errors abort before the table is even read.
    if config.derivs == DerivsMode::Recompute {
        return Err(CleanError::Unsupported {
            feature: "recomputing derivatives from thermodynamic potentials",
        }
        .into());
    }

    let default_output;
    let output = match output {
        Some(path) => path,
        None => {
            default_output = default_output_path(input);
            &default_output
        }
    };
    println!("Input table  : {}", input.display());
    println!("Output table : {}", output.display());

    let mut table = read_table(input)?;
    let summary = clean_table(&mut table, config)?;
    write_table(output, &table)?;

    if self_check {
        let reread = read_table(output)?;
        if !compare_tables(&table, &reread).is_equal() {
            return Err(CliError::SelfCheck);
        }
        println!("✓ Self-check passed: written table matches memory bit for bit");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn cmd_validate(table_path: &Path) -> Result<(), CliError> {
    let table = read_table(table_path)?;
    let report = validate_table(&table);
    for axis in &report.axes {
        println!(
            "axis {:<8}: {} non-monotonic pairs out of {} points",
            axis.axis, axis.defects, axis.points
        );
    }
    for field in &report.fields {
        println!(
            "field {:<9}: {} non-finite values out of {} points",
            field.quantity, field.non_finite, field.points
        );
    }
    if report.is_clean() {
        println!("✓ Table is physically admissible");
    } else {
        println!(
            "✗ Found {} monotonicity and {} finiteness defects",
            report.monotonicity_defects(),
            report.finiteness_defects()
        );
    }
    Ok(())
}

fn cmd_diff(table1: &Path, table2: &Path) -> Result<(), CliError> {
    let report = ensure_tables_equal(table1, table2)?;
    if report.is_equal() {
        println!("✓ Tables are bitwise identical");
    } else {
        println!(
            "✗ Tables differ: {} scalar and {} field mismatches",
            report.scalar_mismatches, report.field_mismatches
        );
    }
    Ok(())
}

fn print_summary(summary: &CleanSummary) {
    for filter in &summary.filters {
        println!(
            "filter {:<9}: replaced {} of {} interior points",
            filter.quantity, filter.replaced, filter.interior_points
        );
    }
    println!(
        "sound speed  : negative={} superluminal={}",
        summary.sound_speed.negative_found, summary.sound_speed.superluminal_found
    );
    let validation = &summary.validation;
    if validation.is_clean() {
        println!("✓ Cleaned table is physically admissible");
    } else {
        println!(
            "✗ Cleaned table still has {} monotonicity and {} finiteness defects",
            validation.monotonicity_defects(),
            validation.finiteness_defects()
        );
    }
}

/// `foo/table.h5` becomes `foo/table_clean.h5`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    input.with_file_name(format!("{stem}_clean.h5"))
}
