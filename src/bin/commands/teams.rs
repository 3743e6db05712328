use ipteam::lens::inventory::InventoryLens;
use ipteam::lens::utils::OutputFormat;
use ipteam::IpteamConfig;

use super::{fail, open_database};

pub fn run(config: &IpteamConfig, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = InventoryLens::new(&repo);

    match lens.teams() {
        Ok(teams) => {
            if teams.is_empty() && !output_format.is_json() {
                println!("No teams have ranges");
                return;
            }
            println!("{}", lens.format_teams(&teams, output_format));
        }
        Err(e) => fail("failed to summarize teams", e),
    }
}
