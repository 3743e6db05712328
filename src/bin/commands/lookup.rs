use clap::Args;
use ipteam::lens::resolve::ResolveLens;
use ipteam::lens::utils::{format_json_value, OutputFormat};
use ipteam::IpteamConfig;

use super::{fail, open_database};

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupArgs {
    /// IPv4 address in dotted-quad form
    #[clap(value_name = "IP")]
    pub ip: String,
}

pub fn run(config: &IpteamConfig, args: LookupArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let repo = db.ranges();
    let lens = ResolveLens::new(&repo);

    let team = match lens.get_team_by_ip(&args.ip) {
        Ok(team) => team,
        Err(e) => fail("lookup failed", e),
    };

    if output_format.is_json() {
        let value = serde_json::json!({ "ip": args.ip.trim(), "team": team });
        println!("{}", format_json_value(&value, output_format));
        return;
    }

    match team {
        Some(team) => println!("{}", team),
        None => {
            eprintln!("No team owns {}", args.ip.trim());
            std::process::exit(1);
        }
    }
}
