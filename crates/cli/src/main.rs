//! Cache controller simulator CLI.
//!
//! This binary drives one simulation per invocation. It performs:
//! 1. **Run:** Replay a request trace through the cache and print statistics.
//! 2. **Geometry check:** Validate a configuration and print the derived cache shape.

use clap::{ArgAction, Parser, Subcommand};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use microcache_core::config::Config;
use microcache_core::sim::{Simulator, load_trace};
use microcache_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "mcsim",
    author,
    version,
    about = "Blocking write-back cache controller simulator",
    long_about = "Replay a request trace through a set-associative write-back cache in front of main memory.\n\nConfiguration is JSON; omitted fields take built-in defaults.\n\nExamples:\n  mcsim run traces/stream.trace\n  mcsim run --config dram.json --json traces/conflict.trace\n  mcsim geometry --config small.json"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and report statistics.
    Run {
        /// Trace file to replay.
        trace: String,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<String>,

        /// Print statistics as JSON instead of the text report.
        #[arg(long)]
        json: bool,

        /// Text report sections to print (default: all).
        #[arg(long, value_delimiter = ',', value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS))]
        stats: Vec<String>,
    },

    /// Validate a configuration and print the cache geometry.
    Geometry {
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            trace,
            config,
            json,
            stats,
        } => cmd_run(&trace, config.as_deref(), json, &stats),
        Commands::Geometry { config } => cmd_geometry(config.as_deref()),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read config '{}': {}", path, e);
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Invalid config '{}': {}", path, e);
        process::exit(1);
    })
}

fn cmd_run(trace_path: &str, config_path: Option<&str>, json: bool, sections: &[String]) {
    let config = load_config(config_path);
    let trace = load_trace(trace_path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not load trace '{}': {}", trace_path, e);
        process::exit(1);
    });

    let mut sim = Simulator::new(&config, trace).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {}", e);
        process::exit(1);
    });
    let stats = sim.run().unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Simulation aborted: {}", e);
        process::exit(1);
    });

    if json {
        let report = serde_json::json!({
            "stats": stats,
            "hit_rate": stats.hit_rate(),
            "memory": sim.memory.log(),
        });
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("\n[!] FATAL: Could not encode report: {}", e);
                process::exit(1);
            }
        }
    } else {
        stats.print_sections(sections);
    }
}

fn cmd_geometry(config_path: Option<&str>) {
    let config = load_config(config_path);
    if let Err(e) = config.validate() {
        eprintln!("\n[!] FATAL: {}", e);
        process::exit(1);
    }
    println!("size_bytes   {}", config.cache.size_bytes);
    println!("ways         {}", config.cache.ways);
    println!("sets         {}", config.cache.num_sets());
    println!("latency      {}", config.cache.latency);
    println!("memory       {:?}", config.memory.controller);
}
