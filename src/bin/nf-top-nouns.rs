//! Most frequent nouns in a Wikipedia extractor dump
//!
//! Every shard under the input directory (`*/wiki_*` by default) is split into articles, each
//! article goes through MeCab, and the proper and common nouns are counted. Once everything has
//! been read the top nouns are printed as `noun count`, most frequent first. Progress goes to
//! stderr; set RUST_LOG to change how much.

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate nounfreq;

use std::io;
use std::path::PathBuf;
use clap::Arg;

use nounfreq::analyzer::NounFilter;
use nounfreq::corpus::{self, Progress};
use nounfreq::errors::*;
use nounfreq::freq;
use nounfreq::mecab::{MecabConfig, MecabProcess};

pub fn main() {
    // Main can't return a Result, and the ? operator needs the enclosing function to return Result
    inner_main().expect("Could not recover. Exiting.");
}

fn positive(value: String) -> ::std::result::Result<(), String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(format!("expected a positive whole number, not {:?}", value)),
    }
}

pub fn inner_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = app_from_crate!()
        .arg(Arg::from_usage("[input] 'directory holding the extracted shards'")
            .default_value(corpus::DEFAULT_ROOT))
        .arg(Arg::from_usage("-k, --top=[K] 'how many nouns to print'")
            .default_value("30")
            .validator(positive))
        .arg(Arg::from_usage("--pattern=[GLOB] 'shard files, relative to the input directory'")
            .default_value(corpus::DEFAULT_PATTERN))
        .arg(Arg::from_usage("-j, --jobs=[N] 'files to analyze at once'")
            .default_value("1")
            .validator(positive))
        .arg(Arg::from_usage("--mecab=[CMD] 'MeCab executable'")
            .default_value("mecab"))
        .arg(Arg::from_usage("--dicdir=[DIR] 'MeCab dictionary directory'"))
        .arg(Arg::from_usage("--mecab-buffer=[BYTES] 'MeCab input buffer; longer lines are cut before they are sent'")
            .default_value("8192")
            .validator(positive))
        .arg(Arg::from_usage("--tagset=[TAGSET] 'part of speech names used by the dictionary'")
            .possible_values(&["ipadic", "unidic"])
            .default_value("ipadic"))
        .get_matches();

    let top = value_t!(args, "top", usize).unwrap_or_else(|e| e.exit());
    let jobs = value_t!(args, "jobs", usize).unwrap_or_else(|e| e.exit());
    let input_buffer = value_t!(args, "mecab-buffer", usize).unwrap_or_else(|e| e.exit());
    let root = PathBuf::from(args.value_of("input").unwrap_or(corpus::DEFAULT_ROOT));
    let pattern = args.value_of("pattern").unwrap_or(corpus::DEFAULT_PATTERN);
    let tagset = args.value_of("tagset").unwrap_or("ipadic");
    let filter = NounFilter::named(tagset)
        .ok_or_else(|| Error::Other(format!("Unknown tag set {}", tagset)))?;
    let config = MecabConfig {
        command: args.value_of("mecab").unwrap_or("mecab").to_string(),
        dicdir: args.value_of("dicdir").map(PathBuf::from),
        input_buffer: input_buffer,
        ..MecabConfig::default()
    };

    let paths = corpus::discover(&root, pattern)?;
    info!("Found {} files under {}", paths.len(), root.display());

    let progress = Progress::default();
    let (table, summary) = corpus::count_corpus(&paths,
                                                || MecabProcess::spawn(&config),
                                                &filter,
                                                jobs,
                                                &progress)?;
    info!("Read {} files and {} documents: {} nouns, {} of them distinct",
        summary.files, summary.scan.documents, table.total(), table.len());
    if summary.scan.unterminated > 0 || summary.scan.stray_ends > 0 {
        warn!("Skipped {} unterminated documents and {} stray end markers",
            summary.scan.unterminated, summary.scan.stray_ends);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    freq::write_report(&mut out, &table.top_k(top))?;
    Ok(())
}
