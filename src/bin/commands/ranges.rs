use clap::Args;
use ipteam::lens::inventory::InventoryLens;
use ipteam::lens::utils::{format_json_value, OutputFormat};
use ipteam::IpteamConfig;

use super::{fail, open_database};

/// Arguments for the Update command
#[derive(Args)]
pub struct UpdateArgs {
    /// Range id
    pub id: i64,

    /// New first address
    #[clap(value_name = "START")]
    pub start: String,

    /// New last address, inclusive
    #[clap(value_name = "END")]
    pub end: String,

    /// New owning team
    #[clap(short, long)]
    pub team: String,
}

/// Arguments for the Delete command
#[derive(Args)]
pub struct DeleteArgs {
    /// Range id
    pub id: i64,
}

/// Arguments for the Show command
#[derive(Args)]
pub struct ShowArgs {
    /// Range id
    pub id: i64,
}

/// Arguments for the List command
#[derive(Args)]
pub struct ListArgs {
    /// Only list ranges owned by this team
    #[clap(short, long)]
    pub team: Option<String>,
}

/// Arguments for the PurgeTeam command
#[derive(Args)]
pub struct PurgeTeamArgs {
    /// Team whose ranges are deleted
    pub team: String,
}

pub fn run_update(config: &IpteamConfig, args: UpdateArgs, output_format: OutputFormat) {
    let UpdateArgs {
        id,
        start,
        end,
        team,
    } = args;

    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.update_range(id, &start, &end, &team) {
        Ok(range) => println!("{}", lens.format_ranges(&[range], output_format)),
        Err(e) => fail(&format!("failed to update range #{}", id), e),
    }
}

pub fn run_delete(config: &IpteamConfig, args: DeleteArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.delete_range(args.id) {
        Ok(range) => {
            if output_format.is_json() {
                println!("{}", lens.format_ranges(&[range], output_format));
            } else {
                println!("Deleted range #{} ({})", range.id, range.display_range());
            }
        }
        Err(e) => fail(&format!("failed to delete range #{}", args.id), e),
    }
}

pub fn run_show(config: &IpteamConfig, args: ShowArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.get(args.id) {
        Ok(Some(range)) => println!("{}", lens.format_ranges(&[range], output_format)),
        Ok(None) => {
            eprintln!("No range with id {}", args.id);
            std::process::exit(1);
        }
        Err(e) => fail("failed to read range", e),
    }
}

pub fn run_list(config: &IpteamConfig, args: ListArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.list(args.team.as_deref()) {
        Ok(ranges) => {
            if ranges.is_empty() && !output_format.is_json() {
                println!("No ranges stored");
                return;
            }
            println!("{}", lens.format_ranges(&ranges, output_format));
        }
        Err(e) => fail("failed to list ranges", e),
    }
}

pub fn run_purge(config: &IpteamConfig, args: PurgeTeamArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.purge_team(&args.team) {
        Ok(removed) => {
            if output_format.is_json() {
                let value = serde_json::json!({ "team": args.team.trim(), "removed": removed });
                println!("{}", format_json_value(&value, output_format));
            } else {
                println!("Removed {} ranges of team '{}'", removed, args.team.trim());
            }
        }
        Err(e) => fail("failed to purge team", e),
    }
}
