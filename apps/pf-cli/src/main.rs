use clap::{Parser, Subcommand};
use pf_app::{AppError, AppResult, RunReport, Scenario, run_service, scenario_service};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "procflow CLI - steady-state heater flowsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and values
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Build and solve a scenario
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Log every solver iteration
        #[arg(long)]
        tee: bool,
        /// Print the run summary as JSON instead of the unit report
        #[arg(long)]
        json: bool,
    },
    /// Solve the built-in reference heater case
    Reference {
        /// Log every solver iteration
        #[arg(long)]
        tee: bool,
        /// Print the run summary as JSON instead of the unit report
        #[arg(long)]
        json: bool,
    },
    /// Write the reference scenario to a YAML file
    Init {
        /// Output path
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            tee,
            json,
        } => cmd_run(&scenario_path, tee, json),
        Commands::Reference { tee, json } => {
            let mut scenario = Scenario::reference();
            scenario.solver.tee |= tee;
            run_and_print(&scenario, json)
        }
        Commands::Init { output } => cmd_init(&output),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<bool> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    scenario_service::validate_scenario(&scenario)?;
    // Construction checks the unit configuration against its schema
    let case = run_service::build_flowsheet(&scenario)?;
    println!("✓ Scenario is valid");
    println!(
        "  Degrees of freedom: {}",
        case.flowsheet.degrees_of_freedom()
    );
    Ok(true)
}

fn cmd_run(scenario_path: &Path, tee: bool, json: bool) -> AppResult<bool> {
    let mut scenario = scenario_service::load_scenario(scenario_path)?;
    debug!(path = %scenario_path.display(), name = %scenario.name, "loaded scenario");
    scenario.solver.tee |= tee;
    run_and_print(&scenario, json)
}

fn cmd_init(output: &Path) -> AppResult<bool> {
    if output.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            output.display()
        )));
    }
    scenario_service::save_scenario(output, &Scenario::reference())?;
    println!("✓ Wrote reference scenario to {}", output.display());
    Ok(true)
}

fn run_and_print(scenario: &Scenario, json: bool) -> AppResult<bool> {
    let report = run_service::run_scenario(scenario)?;
    if json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
    }
    Ok(report.passed())
}

fn print_summary(report: &RunReport) {
    println!("Scenario: {}", report.scenario);
    println!(
        "  Solver: {} ({}, {} iterations, residual {:.3e})",
        report.solver, report.termination, report.iterations, report.residual_norm
    );
    print!("{}", report.report_text);
    match &report.expectation {
        Some(e) if e.passed => println!(
            "✓ Outlet temperature {:.4} within {} of {}",
            e.actual, e.tolerance, e.expected
        ),
        Some(e) => println!(
            "✗ Outlet temperature {:.4} differs from {} by more than {}",
            e.actual, e.expected, e.tolerance
        ),
        None => {}
    }
    if !report.optimal {
        println!("✗ Solver did not reach an optimal point");
    }
}
