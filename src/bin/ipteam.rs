use clap::{Parser, Subcommand};
use ipteam::lens::utils::OutputFormat;
use ipteam::IpteamConfig;
use tracing::Level;

mod commands;

use commands::add::{AddArgs, AddCidrArgs};
use commands::config::ConfigArgs;
use commands::import::ImportArgs;
use commands::lookup::LookupArgs;
use commands::ranges::{DeleteArgs, ListArgs, PurgeTeamArgs, ShowArgs, UpdateArgs};
use ipteam::lens::resolve::TeamQueryArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.ipteam/ipteam.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign an address range (START to END, inclusive) to a team
    Add(AddArgs),

    /// Assign a CIDR block to a team
    AddCidr(AddCidrArgs),

    /// Bulk-assign addresses, ranges and CIDR blocks to a team
    Import(ImportArgs),

    /// Replace the bounds and team of a stored range
    Update(UpdateArgs),

    /// Delete a stored range by id
    Delete(DeleteArgs),

    /// Show a stored range by id
    Show(ShowArgs),

    /// List stored ranges
    List(ListArgs),

    /// Summarize ranges and address counts per team
    Teams,

    /// Delete every range owned by a team
    PurgeTeam(PurgeTeamArgs),

    /// Find the team owning a single address
    Lookup(LookupArgs),

    /// Resolve addresses, ranges and CIDR blocks to owning teams
    Query(TeamQueryArgs),

    /// Show configuration and database status
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level TRACE or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let config = match IpteamConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let format = cli.format;

    match cli.command {
        Commands::Add(args) => commands::add::run(&config, args, format),
        Commands::AddCidr(args) => commands::add::run_cidr(&config, args, format),
        Commands::Import(args) => commands::import::run(&config, args, format),
        Commands::Update(args) => commands::ranges::run_update(&config, args, format),
        Commands::Delete(args) => commands::ranges::run_delete(&config, args, format),
        Commands::Show(args) => commands::ranges::run_show(&config, args, format),
        Commands::List(args) => commands::ranges::run_list(&config, args, format),
        Commands::Teams => commands::teams::run(&config, format),
        Commands::PurgeTeam(args) => commands::ranges::run_purge(&config, args, format),
        Commands::Lookup(args) => commands::lookup::run(&config, args, format),
        Commands::Query(args) => commands::query::run(&config, args, format),
        Commands::Config(args) => commands::config::run(&config, args, format),
    }
}
