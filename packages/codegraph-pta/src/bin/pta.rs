//! Pointer Analysis CLI
//!
//! # Usage
//!
//! ```bash
//! # Context-insensitive analysis, JSON report on stdout
//! cargo run --bin pta -- analyze --program program.json
//!
//! # 2-object sensitivity from the command line, DOT call graph to a file
//! cargo run --bin pta -- analyze --program program.json --cs 2-obj --dot cg.dot
//!
//! # Settings from YAML
//! cargo run --bin pta -- analyze --program program.json --config pta.yaml
//!
//! # CHA call graph
//! cargo run --bin pta -- cha --program program.json
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=codegraph_pta=debug`).

use clap::{Parser, Subcommand};
use codegraph_pta::config::{ContextSensitivity, Preset, PtaConfig, Validatable, WorklistOrder};
use codegraph_pta::features::call_graph::build_cha;
use codegraph_pta::features::points_to::PointerAnalysis;
use codegraph_pta::ir::World;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pta")]
#[command(about = "Context-sensitive pointer analysis with on-the-fly call graph construction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pointer analysis and print a JSON report
    Analyze {
        /// Program in JSON form
        #[arg(short, long)]
        program: PathBuf,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Named preset (fast, balanced, precise); ignored with --config
        #[arg(long)]
        preset: Option<Preset>,

        /// Context sensitivity override, e.g. ci, 1-call, 2-obj, 2-type
        #[arg(long)]
        cs: Option<ContextSensitivity>,

        /// Worklist order override (fifo, lifo)
        #[arg(long)]
        order: Option<WorklistOrder>,

        /// Write the context-insensitive call graph as Graphviz DOT
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Build the class hierarchy analysis call graph
    Cha {
        /// Program in JSON form
        #[arg(short, long)]
        program: PathBuf,

        /// Write the call graph as Graphviz DOT
        #[arg(long)]
        dot: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ChaSummary {
    reachable_methods: Vec<String>,
    call_edges: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            program,
            config,
            preset,
            cs,
            order,
            dot,
        } => {
            let mut config = match (config, preset) {
                (Some(path), _) => PtaConfig::from_yaml_file(path)?,
                (None, Some(preset)) => PtaConfig::preset(preset),
                (None, None) => PtaConfig::default(),
            };
            if let Some(cs) = cs {
                config = config.context_sensitivity(cs);
            }
            if let Some(order) = order {
                config = config.worklist_order(order);
            }
            config.validate()?;

            let world = load_world(&program)?;
            let result = PointerAnalysis::new(config)?.analyze(&world)?;

            if let Some(path) = dot {
                let dot = result
                    .ci_call_graph()
                    .to_dot(|m| world.program().method_signature(m));
                std::fs::write(path, dot)?;
            }
            println!("{}", serde_json::to_string_pretty(&result.report(&world))?);
        }
        Commands::Cha { program, dot } => {
            let world = load_world(&program)?;
            let call_graph = build_cha(&world);

            if let Some(path) = dot {
                std::fs::write(path, call_graph.to_dot(|m| world.program().method_signature(m)))?;
            }
            let summary = ChaSummary {
                reachable_methods: call_graph
                    .reachable_methods()
                    .map(|m| world.program().method_signature(m))
                    .collect(),
                call_edges: call_graph.edge_count(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn load_world(path: &Path) -> Result<World, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(World::from_json(&json)?)
}
