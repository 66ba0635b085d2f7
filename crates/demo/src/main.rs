//! Context switching demo entry point.
//!
//! Builds the demo tree (a parallel holding a context switch beside a
//! two-action sequence) and either renders it to a Graphviz dot file
//! (`--render`) or drives it for a fixed number of ticks, printing the
//! coloured tree state after each one.

mod context_switch;
mod presentation;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::style;

use context_switch::ContextSwitch;
use ticktree::builder::{count, parallel, sequence};
use ticktree::{display, BehaviourTree, Node, ParallelPolicy};

/// Demonstrates context switching with parallels and sequences.
#[derive(Parser)]
#[command(name = "context-switching")]
#[command(about = "Demonstrates context switching with parallels and sequences")]
#[command(version)]
struct Cli {
    /// Render the dot tree to a file and exit
    #[arg(short, long)]
    render: bool,

    /// Number of ticks to drive
    #[arg(long, default_value_t = 5)]
    ticks: u32,

    /// Delay between ticks, in seconds
    #[arg(long, default_value_t = 1.0)]
    period: f64,
}

fn description() -> String {
    let content = "Demonstrates context switching with parallels and sequences";
    let banner = style("*".repeat(79)).green();
    let title = style(format!("{:^79}", "Context Switching")).white().bold();
    format!("\n{banner}\n{title}\n{banner}\n\n{content}\n\n{banner}")
}

fn create_tree() -> Node {
    parallel(
        "Parallel",
        ParallelPolicy::SucceedOnOne,
        vec![
            Box::new(ContextSwitch::new("Context")),
            sequence(
                "Sequence",
                vec![
                    count("Action 1", 0, 2, 10),
                    count("Action 2", 0, 2, 10),
                ],
            ),
        ],
    )
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging();
    println!("{}", description());

    let mut tree = BehaviourTree::new(create_tree());

    if args.render {
        let path = "parallel.dot";
        std::fs::write(path, display::dot_graph(&tree.snapshot()))?;
        println!("rendered tree to {path}");
        return Ok(());
    }

    tree.setup(Duration::from_secs(15))?;

    let period = Duration::from_secs_f64(args.period);
    for tick in 1..=args.ticks {
        println!("\n--------- Tick {tick} ---------\n");
        tree.tick_once();
        println!();
        print!("{}", presentation::coloured_tree(&tree.snapshot()));
        if tick == args.ticks {
            break;
        }
        // Interruption stops the loop between ticks; no further terminate
        // propagation is attempted since the process is exiting.
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping");
                break;
            }
            _ = tokio::time::sleep(period) => {}
        }
    }
    println!();
    Ok(())
}
