use clap::{Parser as ClapParser, Subcommand};
use mongo_expr::cli::{self, CliError, MergeOptions, RenderOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "mexpr")]
#[command(about = "mexpr - Normalize and combine MongoDB filter documents")]
#[command(version)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "mongo_expr=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a filter document
    Render {
        /// JSON filter (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Merge several filters under $and (or $or)
    Merge {
        /// JSON filters to merge
        #[arg(required = true)]
        filters: Vec<String>,

        /// Combine with $or instead of $and
        #[arg(long)]
        or: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Render { input, pretty } => run_render(input, pretty),
        Commands::Merge { filters, or, pretty } => cli::execute_merge(&MergeOptions {
            filters,
            any: or,
            pretty,
        }),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn run_render(input: Option<String>, pretty: bool) -> Result<String, CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    cli::execute_render(&RenderOptions { input, pretty })
}
