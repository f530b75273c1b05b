//! zynqgen: processing-system wiring generator.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "zynqgen", version, about = "Zynq processing-system wiring generator")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a port declaration file and list its ports
    Ports {
        /// Port declaration file (Verilog-style)
        file: PathBuf,
        /// Only ports whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Generate the layout artifact for a hard core
    Layout {
        /// Port declaration file (Verilog-style)
        file: PathBuf,
        /// Core profile name or .core.toml path
        #[arg(long, default_value = "zynq-mp")]
        core: String,
        /// Channels to include (default: every declared channel present)
        #[arg(long = "channel")]
        channels: Vec<String>,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Inspect hard-core profiles
    Core {
        #[command(subcommand)]
        action: CoreAction,
    },
    /// Allocate resources and emit the netlist described by a design file
    Build {
        /// Design configuration (TOML)
        #[arg(long)]
        config: PathBuf,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output format (json, text)
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum CoreAction {
    /// List built-in profiles
    List,
    /// Show a profile
    Describe {
        /// Profile name or .core.toml path
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Ports {
            file,
            prefix,
            format,
        } => commands::ports::run(&file, prefix.as_deref(), format.as_deref()),

        Commands::Layout {
            file,
            core,
            channels,
            output,
        } => commands::layout::run(&file, &core, &channels, output.as_deref()),

        Commands::Core { action } => match action {
            CoreAction::List => commands::core::list(),
            CoreAction::Describe { name, format } => {
                commands::core::describe(&name, format.as_deref())
            }
        },

        Commands::Build {
            config,
            output,
            format,
        } => commands::build::run(&config, output.as_deref(), format.as_deref()),
    }
}
