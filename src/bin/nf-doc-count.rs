//! Count the documents in a Wikipedia extractor dump
//!
//! No analysis, just the markup: how many documents there are and how many were left open or
//! closed twice. Handy to check a dump before a long noun count.

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate nounfreq;

use std::path::PathBuf;
use clap::Arg;

use nounfreq::corpus::{self, Progress};
use nounfreq::errors::*;

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}

pub fn inner_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = app_from_crate!()
        .arg(Arg::from_usage("[input] 'directory holding the extracted shards'")
            .default_value(corpus::DEFAULT_ROOT))
        .arg(Arg::from_usage("--pattern=[GLOB] 'shard files, relative to the input directory'")
            .default_value(corpus::DEFAULT_PATTERN))
        .get_matches();

    let root = PathBuf::from(args.value_of("input").unwrap_or(corpus::DEFAULT_ROOT));
    let pattern = args.value_of("pattern").unwrap_or(corpus::DEFAULT_PATTERN);
    let paths = corpus::discover(&root, pattern)?;

    info!("Found {} files under {}", paths.len(), root.display());

    let summary = corpus::scan_corpus(&paths, &Progress::default())?;
    println!("files {}", summary.files);
    println!("documents {}", summary.scan.documents);
    println!("unterminated {}", summary.scan.unterminated);
    println!("stray_ends {}", summary.scan.stray_ends);
    Ok(())
}
