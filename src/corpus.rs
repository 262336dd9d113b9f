//! Walking a corpus: find the shards, count the nouns in every document
//!
//! One file at a time and one document at a time. With more than one job the files are spread
//! over a thread pool instead, each file counted into its own table, and the tables are merged
//! back in file order so the result is the same as a sequential run.
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use glob::{self, Pattern};
use rayon::prelude::*;
use rayon;
use analyzer::{Analyzer, NounFilter, nouns};
use docs::{self, Documents, ScanStats};
use errors::*;
use freq::FrequencyTable;

/// Where the extracted articles are, relative to where we run
pub const DEFAULT_ROOT: &str = "../articles";

/// Shards live one directory down, as the Wikipedia extractor writes them: `AA/wiki_00`
pub const DEFAULT_PATTERN: &str = "*/wiki_*";

/// How often to say how far along we are, in documents
pub const PROGRESS_EVERY: usize = 10000;

/// List the shard files under `root`, in sorted order
///
/// A missing root is not an error, it is just an empty corpus.
pub fn discover<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        warn!("{} is not a directory, there is nothing to read", root.display());
    }
    let root_str = root.to_str()
        .ok_or_else(|| Error::Other(format!("Input path {} is not valid UTF-8", root.display())))?;
    // The root is taken literally, only the pattern gets to use wildcards
    let full = Path::new(&Pattern::escape(root_str)).join(pattern);
    let full = full.to_string_lossy();

    let mut paths = vec![];
    for entry in glob::glob(&full)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    debug!("{} files match {}", paths.len(), full);
    Ok(paths)
}

/// Document counter shared by every worker
#[derive(Debug)]
pub struct Progress {
    processed: AtomicUsize,
    every: usize,
}

impl Progress {
    pub fn new(every: usize) -> Self {
        Progress { processed: AtomicUsize::new(0), every: every }
    }

    pub fn document_done(&self) {
        let n = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.every > 0 && n % self.every == 0 {
            info!("{} documents were processed.", n);
        }
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Progress::new(PROGRESS_EVERY)
    }
}

/// What a run went through
#[derive(PartialEq,Eq,Debug,Clone,Copy,Default)]
pub struct Summary {
    pub files: usize,
    pub scan: ScanStats,
    /// Nouns counted, which is also how much the table's total grew
    pub terms: u64,
}

impl Summary {
    pub fn add(&mut self, other: &Summary) {
        self.files += other.files;
        self.scan.add(&other.scan);
        self.terms += other.terms;
    }
}

/// Count the nouns of every document in a stream
pub fn count_documents<A, L>(analyzer: &mut A,
                             filter: &NounFilter,
                             documents: &mut Documents<L>,
                             table: &mut FrequencyTable,
                             progress: &Progress)
                             -> Result<u64>
    where A: Analyzer + ?Sized, L: Iterator<Item = io::Result<String>> {
    let mut terms = 0;
    for doc in documents {
        let doc = doc?;
        terms += table.update(nouns(analyzer, filter, &doc.body)?);
        progress.document_done();
    }
    Ok(terms)
}

/// Count the nouns of one shard file into `table`
pub fn count_file<A: Analyzer + ?Sized>(analyzer: &mut A,
                                        filter: &NounFilter,
                                        path: &Path,
                                        table: &mut FrequencyTable,
                                        progress: &Progress)
                                        -> Result<Summary> {
    info!("Processing {}...", path.display());
    let mut documents = docs::open(path)?;
    let terms = count_documents(analyzer, filter, &mut documents, table, progress)?;
    Ok(Summary {
        files: 1,
        scan: documents.stats(),
        terms: terms,
    })
}

/// Read through one shard without analyzing it, just to see its markup
pub fn scan_file(path: &Path, progress: &Progress) -> Result<Summary> {
    info!("Processing {}...", path.display());
    let mut documents = docs::open(path)?;
    for doc in documents.by_ref() {
        doc?;
        progress.document_done();
    }
    Ok(Summary {
        files: 1,
        scan: documents.stats(),
        terms: 0,
    })
}

/// `scan_file` for every shard, in order
pub fn scan_corpus(paths: &[PathBuf], progress: &Progress) -> Result<Summary> {
    let mut summary = Summary::default();
    for path in paths {
        summary.add(&scan_file(path, progress)?);
    }
    Ok(summary)
}

/// Count a whole corpus
///
/// An empty corpus never starts an analyzer. Otherwise `make_analyzer` is called once for a
/// sequential run, or at least once per worker with `jobs > 1`. Every analyzer is warmed up
/// before it sees a document.
pub fn count_corpus<A, F>(paths: &[PathBuf],
                          make_analyzer: F,
                          filter: &NounFilter,
                          jobs: usize,
                          progress: &Progress)
                          -> Result<(FrequencyTable, Summary)>
    where A: Analyzer, F: Fn() -> Result<A> + Sync {
    if paths.is_empty() {
        info!("No input files, nothing to count");
        return Ok((FrequencyTable::new(), Summary::default()));
    }
    if jobs <= 1 {
        let mut analyzer = make_analyzer()?;
        analyzer.warm_up()?;
        let mut table = FrequencyTable::new();
        let mut summary = Summary::default();
        for path in paths {
            summary.add(&count_file(&mut analyzer, filter, path, &mut table, progress)?);
        }
        return Ok((table, summary));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| Error::Other(format!("Could not start {} workers: {}", jobs, err)))?;
    info!("Counting {} files with {} workers", paths.len(), jobs);
    pool.install(|| {
        paths.par_iter()
            .map_init(
                || make_analyzer().and_then(|mut analyzer| {
                    analyzer.warm_up()?;
                    Ok(analyzer)
                }),
                |analyzer, path| {
                    let analyzer = match *analyzer {
                        Ok(ref mut analyzer) => analyzer,
                        Err(ref err) => return Err(Error::Other(
                            format!("Analyzer failed to start: {}", err))),
                    };
                    let mut table = FrequencyTable::new();
                    let summary = count_file(analyzer, filter, path, &mut table, progress)?;
                    Ok((table, summary))
                })
            // Reduction keeps file order, which keeps the tie order of a sequential run
            .try_reduce(|| (FrequencyTable::new(), Summary::default()),
                        |(mut table, mut summary), (other_table, other_summary)| {
                table.merge(other_table);
                summary.add(&other_summary);
                Ok((table, summary))
            })
    })
}
