use clap::{Parser, Subcommand};
use pf_air::{
    AirState, InputKind, InputSpec, Resolution, SolveReport, SweepDefinition, SweepType,
    barometric_pressure_kpa,
};
use pf_app::{
    AppError, AppResult, AppSettings, BatchOutcome, BatchProgressEvent, BatchRow, BatchStage,
    export_results, load_settings_or_default, parse_rows, resolve_batch, resolve_single,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PsychroFlow CLI - moist-air property calculator", long_about = None)]
struct Cli {
    /// Settings file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one air state from a measured pair
    #[command(allow_negative_numbers = true)]
    Resolve {
        /// Input kind: dbt_wbt, dbt_rh, dbt_dpt or wbt_rh
        kind: InputKind,
        value1: f64,
        value2: f64,
        /// Altitude above sea level [m]
        #[arg(long, default_value_t = 0.0)]
        altitude: f64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve every row of a CSV file
    Batch {
        /// Input CSV with InputType,Value1,Value2,Altitude columns
        input: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Step the first value between two bounds and resolve each point
    #[command(allow_negative_numbers = true)]
    Sweep {
        kind: InputKind,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
        #[arg(long, default_value_t = 11)]
        points: usize,
        /// Second value, held fixed
        #[arg(long)]
        fixed: f64,
        #[arg(long, default_value_t = 0.0)]
        altitude: f64,
        /// Logarithmic spacing
        #[arg(long)]
        log: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective settings as YAML
    Settings,
    /// Barometric pressure at an altitude
    #[command(allow_negative_numbers = true)]
    Pressure {
        /// Altitude above sea level [m]
        altitude: f64,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = load_settings_or_default(cli.settings.as_deref())?;

    match cli.command {
        Commands::Resolve {
            kind,
            value1,
            value2,
            altitude,
            json,
        } => cmd_resolve(
            &settings,
            &InputSpec::new(kind, value1, value2, altitude),
            json,
        ),
        Commands::Batch { input, output } => cmd_batch(&settings, &input, output.as_deref()),
        Commands::Sweep {
            kind,
            start,
            end,
            points,
            fixed,
            altitude,
            log,
            output,
        } => {
            let sweep_type = if log {
                SweepType::Logarithmic
            } else {
                SweepType::Linear
            };
            let sweep = SweepDefinition::new(start, end, points, sweep_type)?;
            cmd_sweep(&settings, kind, &sweep, fixed, altitude, output.as_deref())
        }
        Commands::Settings => cmd_settings(&settings),
        Commands::Pressure { altitude } => cmd_pressure(&settings, altitude),
    }
}

#[derive(Serialize)]
struct ResolveView<'a> {
    input: &'a InputSpec,
    pressure_kpa: f64,
    state: AirState,
    report: &'a SolveReport,
}

fn cmd_resolve(settings: &AppSettings, spec: &InputSpec, json: bool) -> AppResult<()> {
    let resolution = resolve_single(spec, settings)?;

    if json {
        let view = ResolveView {
            input: &resolution.spec,
            pressure_kpa: resolution.pressure_kpa(),
            state: resolution.rounded(),
            report: &resolution.report,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_resolution(&resolution);
    Ok(())
}

fn print_resolution(resolution: &Resolution) {
    let spec = &resolution.spec;
    let s = resolution.rounded();

    println!("Input: {}", spec.kind.label());
    println!("  {}: {}", spec.kind.first_label(), spec.value1);
    println!("  {}: {}", spec.kind.second_label(), spec.value2);
    println!(
        "  Altitude: {} m  (pressure {:.3} kPa)",
        spec.altitude_m,
        resolution.pressure_kpa()
    );
    println!();
    println!("  Dry-bulb temperature:  {:>9.1} °C", s.dry_bulb_c);
    println!("  Wet-bulb temperature:  {:>9.1} °C", s.wet_bulb_c);
    println!("  Relative humidity:     {:>9.1} %", s.relative_humidity_pct);
    println!("  Dew-point temperature: {:>9.1} °C", s.dew_point_c);
    println!("  Humidity ratio:        {:>9.4} kg/kg", s.humidity_ratio);
    println!("  Enthalpy:              {:>9.1} kJ/kg", s.enthalpy_kj_per_kg);
    println!("  Specific volume:       {:>9.3} m³/kg", s.specific_volume_m3_per_kg);
    println!("  Vapor pressure:        {:>9.2} kPa", s.vapor_pressure_kpa);

    let report = &resolution.report;
    if let Some(solver) = report.solver {
        println!();
        println!(
            "Solver: {}  iterations={}  residual={:.3e}  converged={}",
            solver, report.iterations, report.residual, report.converged
        );
        if report.fallback_used {
            println!("Warning: solver result rejected, value is a linear estimate");
        }
    }
}

fn cmd_batch(settings: &AppSettings, input: &Path, output: Option<&Path>) -> AppResult<()> {
    let text = std::fs::read_to_string(input).map_err(|source| AppError::FileRead {
        path: input.to_path_buf(),
        source,
    })?;
    let rows = parse_rows(&text, &settings.limits)?;
    info!(path = %input.display(), rows = rows.len(), "loaded batch input");

    let outcome = run_with_progress(settings, rows);
    write_output(&export_results(&outcome), output)?;
    print_batch_summary(&outcome);
    Ok(())
}

fn cmd_sweep(
    settings: &AppSettings,
    kind: InputKind,
    sweep: &SweepDefinition,
    fixed: f64,
    altitude: f64,
    output: Option<&Path>,
) -> AppResult<()> {
    eprintln!("{} {} (fixed {} = {})", kind.label(), sweep, kind.second_label(), fixed);
    let rows = sweep
        .rows(kind, fixed, altitude)
        .into_iter()
        .enumerate()
        .map(|(i, spec)| BatchRow::checked(i + 1, spec, &settings.limits))
        .collect();

    let outcome = run_with_progress(settings, rows);
    write_output(&export_results(&outcome), output)?;
    print_batch_summary(&outcome);
    Ok(())
}

fn cmd_settings(settings: &AppSettings) -> AppResult<()> {
    print!("{}", settings.to_yaml()?);
    Ok(())
}

fn cmd_pressure(settings: &AppSettings, altitude: f64) -> AppResult<()> {
    settings.limits.altitude_m.check("altitude", altitude)?;
    println!("{:.3} kPa", barometric_pressure_kpa(altitude));
    Ok(())
}

fn run_with_progress(settings: &AppSettings, rows: Vec<BatchRow>) -> BatchOutcome {
    let outcome = resolve_batch(
        rows,
        &settings.batch,
        &settings.solver,
        Some(&mut |event| render_cli_progress(&event)),
        None,
    );
    clear_progress_line();
    outcome
}

fn write_output(csv: &str, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv).map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        eprintln!("Wrote {}", path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn print_batch_summary(outcome: &BatchOutcome) {
    eprintln!(
        "{} of {} rows resolved, {} failed",
        outcome.successes.len(),
        outcome.rows_total,
        outcome.errors.len()
    );
    let unreliable: Vec<usize> = outcome.unreliable().map(|s| s.row_number).collect();
    if !unreliable.is_empty() {
        eprintln!("Rows with unconverged or fallback solutions: {:?}", unreliable);
    }
    for row in &outcome.errors {
        eprintln!("  Row {}: {}", row.row_number, row.error);
    }
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(80));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &BatchProgressEvent) {
    if !matches!(event.stage, BatchStage::RowCompleted) {
        return;
    }
    let width = 28usize;
    let filled = ((event.fraction_complete * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    eprint!(
        "\r[{}] {:>6.2}%  row {}/{}",
        bar,
        event.fraction_complete * 100.0,
        event.rows_done,
        event.rows_total
    );
    let _ = io::stderr().flush();
}
