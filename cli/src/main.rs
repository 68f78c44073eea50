use clap::{Parser, Subcommand};
use groute_common::db::benchmark::Benchmark;
use groute_common::util::config::Config;
use groute_common::util::generator::{self, GeneratorParams};
use groute_common::util::{check, logger, route_file};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Route the benchmark named in the config (or on the command line).
    Route {
        #[arg(long)]
        benchmark: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a random benchmark.
    Generate {
        #[arg(long, default_value_t = 2)]
        layers: u8,
        #[arg(long, default_value_t = 64)]
        columns: u32,
        #[arg(long, default_value_t = 64)]
        rows: u32,
        #[arg(long, default_value_t = 1000)]
        nets: usize,
        #[arg(long, default_value_t = 4)]
        capacity: u32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value = "inputs/random.toml")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config: Config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Route {
        benchmark: None,
        output: None,
    });

    match command {
        Commands::Generate {
            layers,
            columns,
            rows,
            nets,
            capacity,
            seed,
            output,
        } => {
            if layers < 2 {
                log::warn!(
                    "Only {} layer requested; nets needing both directions will use fallback routes.",
                    layers
                );
            }
            prepare_output_dir(&output)?;
            let params = GeneratorParams {
                layers,
                columns,
                rows,
                nets,
                capacity,
                seed,
            };
            generator::generate_random_benchmark(&output, &params)?;
            log::info!("Generated: {:?}", output);
        }
        Commands::Route { benchmark, output } => {
            let benchmark =
                benchmark.unwrap_or_else(|| PathBuf::from(&config.input.benchmark_file));
            let output = output.unwrap_or_else(|| PathBuf::from(&config.input.output_route));
            if !benchmark.exists() {
                return Err(anyhow::anyhow!("Benchmark file missing: {:?}", benchmark));
            }
            prepare_output_dir(&output)?;
            run_routing(&config, &benchmark, &output)?;
        }
    }

    Ok(())
}

fn prepare_output_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn run_routing(config: &Config, benchmark: &Path, output: &Path) -> anyhow::Result<()> {
    let bench = Benchmark::load(benchmark)?;

    log::info!("Starting Routing...");
    let outcome = groute_router::route(&bench, config)?;

    let nets = bench.nets();
    check::run_route_check(&nets, &outcome.result)
        .map_err(|e| anyhow::anyhow!("Verification Failed: {}", e))?;

    let stats = &outcome.stats;
    log::info!(
        "Routing finished ({:?}) in {} iterations, {:.1}s: overflow {}, wirelength {}, {} segments",
        stats.stop_reason,
        stats.iterations.len(),
        stats.elapsed.as_secs_f32(),
        stats.best.overflow,
        stats.best.cost,
        outcome.result.total_segments()
    );

    log::info!("Writing routes to {:?}", output);
    route_file::write_route_file(output, &outcome.result)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output, e))?;

    Ok(())
}
