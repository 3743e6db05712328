use std::io::Read;

use clap::Args;
use ipteam::lens::ingest::{IngestArgs, IngestLens};
use ipteam::lens::utils::OutputFormat;
use ipteam::IpteamConfig;

use super::{fail, open_database};

/// Arguments for the Import command
#[derive(Args)]
pub struct ImportArgs {
    #[clap(flatten)]
    pub ingest: IngestArgs,

    /// Read additional entries from a file, `-` for stdin
    #[clap(long, value_name = "PATH")]
    pub file: Option<String>,
}

fn read_source(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

pub fn run(config: &IpteamConfig, args: ImportArgs, output_format: OutputFormat) {
    let ImportArgs { mut ingest, file } = args;

    if let Some(path) = file {
        match read_source(&path) {
            Ok(text) => ingest.entries.push(text),
            Err(e) => fail(&format!("unable to read {}", path), e),
        }
    }

    let db = open_database(config);
    let repo = db.ranges();
    let lens = IngestLens::new(&repo);

    let report = lens.ingest(&ingest);
    println!("{}", lens.format_report(&report, output_format));

    if !report.success {
        std::process::exit(1);
    }
}
