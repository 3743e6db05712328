use clap::Args;
use ipteam::lens::inventory::InventoryLens;
use ipteam::lens::utils::OutputFormat;
use ipteam::IpteamConfig;

use super::{fail, open_database};

/// Arguments for the Add command
#[derive(Args)]
pub struct AddArgs {
    /// First address of the range
    #[clap(value_name = "START")]
    pub start: String,

    /// Last address of the range, inclusive
    #[clap(value_name = "END")]
    pub end: String,

    /// Owning team
    #[clap(short, long)]
    pub team: String,
}

/// Arguments for the AddCidr command
#[derive(Args)]
pub struct AddCidrArgs {
    /// CIDR block, e.g. 10.50.0.0/24
    #[clap(value_name = "CIDR")]
    pub cidr: String,

    /// Owning team
    #[clap(short, long)]
    pub team: String,
}

pub fn run(config: &IpteamConfig, args: AddArgs, output_format: OutputFormat) {
    let AddArgs { start, end, team } = args;

    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.add_range(&start, &end, &team) {
        Ok(range) => println!("{}", lens.format_ranges(&[range], output_format)),
        Err(e) => fail("failed to add range", e),
    }
}

pub fn run_cidr(config: &IpteamConfig, args: AddCidrArgs, output_format: OutputFormat) {
    let AddCidrArgs { cidr, team } = args;

    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.add_cidr(&cidr, &team) {
        Ok(range) => println!("{}", lens.format_ranges(&[range], output_format)),
        Err(e) => fail("failed to add CIDR block", e),
    }
}
