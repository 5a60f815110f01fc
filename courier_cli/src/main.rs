use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::session::{InputArgs, Session};

mod menu;
mod parsers;
mod plan;
mod session;
mod status;
mod tables;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    inputs: InputArgs,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the day and print the summary, trip timeline and configured snapshots
    Plan {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Mileage ceiling to check the total against
        #[arg(long)]
        max_miles: Option<f64>,
    },
    /// Status of every package at a clock time
    Status {
        /// Clock time, e.g. "10:05" or "9:05 AM"
        #[arg(short, long, value_parser = parsers::parse_clock)]
        at: jiff::civil::Time,
    },
    /// Status of a single package
    Lookup {
        #[arg(short, long)]
        id: u32,

        /// Clock time, defaults to the end of the day
        #[arg(short, long, value_parser = parsers::parse_clock)]
        at: Option<jiff::civil::Time>,
    },
    /// Interactive menu
    #[command(visible_alias = "m")]
    Menu,
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let session = Session::load(&cli.inputs)?;

    match cli.command {
        Some(Commands::Plan { json, max_miles }) => plan::run(&session, json, max_miles)?,
        Some(Commands::Status { at }) => status::print_status(&session, at),
        Some(Commands::Lookup { id, at }) => status::print_lookup(&session, id, at)?,
        Some(Commands::Menu) => {
            let stdin = std::io::stdin();
            menu::run(&session, stdin.lock(), std::io::stdout())?
        }
        None => plan::run(&session, false, None)?,
    }

    Ok(())
}
