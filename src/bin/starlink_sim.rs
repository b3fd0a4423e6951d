use clap::Parser;
use starlink_sim::config::SimConfig;
use starlink_sim::net::SimStack;
use starlink_sim::report::{OutputPaths, write_all};
use starlink_sim::slice::SliceContext;
use starlink_sim::topo::{load_demands, load_links};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "starlink-sim",
    about = "Route traffic demands over a satellite topology snapshot and simulate it"
)]
struct Args {
    /// Link parameter CSV
    #[arg(long, default_value = "scratch/starlink/data/input/link_params.csv")]
    link_params: PathBuf,

    /// Traffic demand CSV
    #[arg(long, default_value = "scratch/starlink/data/input/traffic_demands.csv")]
    demands: PathBuf,

    /// Flow results CSV
    #[arg(long, default_value = "scratch/starlink/data/output/flow_results.csv")]
    output: PathBuf,

    /// Simulation time (s); overrides the config file
    #[arg(long)]
    sim_time: Option<f64>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for link_stats.csv, route_paths.csv, link_monitor.csv and
    /// ip_to_satellite.json (defaults to the directory of --output)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Queue sampling interval (s)
    #[arg(long)]
    monitor_interval: Option<f64>,

    /// RNG seed for loss injection and on/off periods
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn sim_config(&self) -> starlink_sim::Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => SimConfig::from_json_file(path)?,
            None => SimConfig::default(),
        };
        if let Some(t) = self.sim_time {
            cfg.sim_time_sec = t;
        }
        if let Some(t) = self.monitor_interval {
            cfg.monitor_interval_sec = t;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        Ok(cfg)
    }

    fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => self
                .output
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

fn run(args: &Args) -> starlink_sim::Result<()> {
    let cfg = args.sim_config()?;
    info!("Loading data...");
    let topology = load_links(&args.link_params)?;
    let demands = load_demands(&args.demands)?;

    let mut stack = SimStack::new(cfg.seed);
    let report = SliceContext::new(topology, demands, cfg).run(&mut stack);

    let paths = OutputPaths::new(&args.output, &args.output_dir());
    write_all(&report, &paths)?;
    info!(output = %args.output.display(), "Simulation completed");
    Ok(())
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
