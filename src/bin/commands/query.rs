use ipteam::lens::resolve::{ResolveLens, TeamQueryArgs};
use ipteam::lens::utils::OutputFormat;
use ipteam::IpteamConfig;

use super::{fail, open_database};

pub fn run(config: &IpteamConfig, args: TeamQueryArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = ResolveLens::new(&repo);

    match lens.query(&args) {
        Ok(results) => println!("{}", lens.format_results(&results, output_format)),
        Err(e) => fail("query failed", e),
    }
}
