use clap::{Parser, Subcommand};
use cs_app::{AppError, AppResult, RunRequest, config_service, query, run_service};
use cs_core::timing::{StageTimings, enable_timing};
use cs_pipeline::{DashboardPayload, PipelineOutput};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(about = "cellscope CLI - battery simulation dashboard payloads", long_about = None)]
struct Cli {
    /// Report stage durations
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file syntax and values
    Validate {
        /// Path to the configuration file (YAML or JSON)
        config_path: PathBuf,
    },
    /// List configured models
    Models {
        /// Path to the configuration file (YAML or JSON)
        config_path: PathBuf,
    },
    /// Run a model and assemble the dashboard payload
    Run {
        /// Path to the configuration file (YAML or JSON)
        config_path: PathBuf,
        /// Model ID from the configuration
        model_id: String,
        /// Applied current in amperes (positive discharges, negative charges)
        #[arg(long, allow_hyphen_values = true)]
        current: f64,
        /// Write the full payload JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the time slice at this display index
        #[arg(long)]
        slice: Option<usize>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        enable_timing();
    }

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Models { config_path } => cmd_models(&config_path),
        Commands::Run {
            config_path,
            model_id,
            current,
            output,
            slice,
        } => cmd_run(&config_path, &model_id, current, output.as_deref(), slice),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = config_service::load_config(config_path)?;
    println!("✓ Configuration is valid ({} models)", config.models.len());
    Ok(())
}

fn cmd_models(config_path: &Path) -> AppResult<()> {
    let config = config_service::load_config(config_path)?;
    let models = config_service::list_models(&config)?;
    if models.is_empty() {
        println!("No models found in configuration");
    } else {
        println!("Models in configuration:");
        for m in models {
            println!(
                "  {} - {} [{}] ({}+{} particles, {} radial nodes, stride {})",
                m.id,
                m.name,
                m.preset,
                m.positive_particles,
                m.negative_particles,
                m.radial_nodes,
                m.display_stride
            );
        }
    }
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    model_id: &str,
    current: f64,
    output: Option<&Path>,
    slice: Option<usize>,
) -> AppResult<()> {
    let config = config_service::load_config(config_path)?;
    let request = RunRequest {
        config: &config,
        model_id,
        current_a: current,
    };
    let response = run_service::simulate(&request)?;

    let payload = match &response.output {
        PipelineOutput::Idle => {
            println!("Zero current: nothing to simulate");
            return Ok(());
        }
        PipelineOutput::Ready(payload) => payload,
    };
    print_summary(payload, &response.timing);

    if let Some(path) = output {
        std::fs::write(path, to_json(payload)?)?;
        tracing::debug!(path = %path.display(), "payload written");
        println!("  Payload written to {}", path.display());
    }

    if let Some(index) = slice {
        let slice = query::time_slice(payload, index, config.pipeline.marker_span_v)?;
        println!("{}", to_json(&slice)?);
    }
    Ok(())
}

fn print_summary(payload: &DashboardPayload, timing: &StageTimings) {
    let s = &payload.summary;
    println!(
        "✓ {} {} at {:.2} A",
        s.model,
        s.direction.as_str(),
        s.current_a
    );
    println!("  Display points: {}", s.display_points);
    println!("  Raw points: {}", s.raw_points);
    match s.capacity_ah {
        Some(q) => println!("  Capacity: {q:.2} Ah"),
        None => println!("  Capacity: n/a"),
    }
    if cs_core::timing::is_enabled() {
        println!(
            "  Timing: simulate={:.3}s resample={:.3}s assemble={:.3}s total={:.3}s",
            timing.simulate_s,
            timing.resample_s,
            timing.assemble_s,
            timing.total_s()
        );
    }
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Serialization(e.to_string()))
}
