use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use gridnet::config::{DEFAULT_BACKGROUND, PlotConfig};
use gridnet::graph::Network;
use gridnet::reader::{ElectricReader, NetworkReader, TextReader};
use gridnet::render::plot_network;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Station directories plus a `connections` directory
    Electric,
    /// One `source,dest;weight,...` record per line
    Text,
}

/// Builds a network from disk, prints its size and arcs, and draws the
/// electricity grid over a background map.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[arg(default_value = "nz_network")]
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Electric)]
    format: Format,

    #[arg(short, long, default_value = "electricity_network.png")]
    output: PathBuf,

    /// Show the map in the terminal instead of writing it
    #[arg(long, conflicts_with = "no_plot")]
    interactive: bool,

    #[arg(long)]
    no_plot: bool,

    #[arg(long, env = "GRIDNET_BACKGROUND", default_value = DEFAULT_BACKGROUND)]
    background: PathBuf,

    #[arg(long, default_value_t = 0.5)]
    min_width: f64,

    #[arg(long, default_value_t = 10.0)]
    max_width: f64,

    /// Long side of a PNG map in pixels
    #[arg(long, default_value_t = 3000)]
    size: u32,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn plot_config(&self) -> PlotConfig {
        PlotConfig {
            background: self.background.clone(),
            min_line_width: self.min_width,
            max_line_width: self.max_width,
            size_px: self.size,
            ..PlotConfig::default()
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report<V>(network: &Network<V>) {
    println!("Nodes: {}", network.node_count());
    println!("Arcs: {}", network.arc_count());
    for arc in network.arcs() {
        println!("{}", network.display_arc(arc.id()));
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.format {
        Format::Text => {
            let network: Network<Option<String>> = TextReader.read_network(&cli.input)?;
            report(&network);
        }
        Format::Electric => {
            let mut network = ElectricReader.read_network(&cli.input)?;
            if !cli.no_plot {
                let destination = (!cli.interactive).then_some(cli.output.as_path());
                plot_network(&mut network, destination, &cli.plot_config())?;
            }
            report(&network);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
