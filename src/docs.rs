//! Wikipedia extractor dump parser
//!
//! Shard files hold many articles back to back, each one wrapped as
//!
//! ```text
//! <doc id="5" url="https://ja.wikipedia.org/wiki?curid=5" title="アンパサンド">
//! ...article text...
//! </doc>
//! ```
//!
//! Only the text between the markers is returned. Nested markers are not supported: a start
//! marker inside a document is just more text. A document still open at the end of the input is
//! dropped and a stray end marker is skipped; both are logged since they mean a damaged shard.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::mem;
use std::path::Path;
use regex::Regex;
use errors::*;

const START_MARKER: &str = "<doc ";
const END_MARKER: &str = "</doc>";

/// One article (we keep the body and where it came from)
#[derive(PartialEq,Eq,Debug,Clone)]
pub struct Document {
    /// The start marker line, verbatim
    pub header: String,
    /// Line number of the start marker, starting from 1
    pub line: usize,
    /// Every line between the markers, each followed by a newline
    pub body: String,
}

impl Document {
    /// Look up an attribute of the start marker, like `title` or `id`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        header_attribute(&self.header, name)
    }
}

lazy_static! {
    static ref ATTRIBUTE: Regex = Regex::new(r#"(\w+)="([^"]*)""#).expect("attribute pattern");
}

/// Read `name="value"` out of a `<doc ...>` line
///
/// Names match whole, so `id` is never found inside `url="...?curid=5"`.
pub fn header_attribute<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE.captures_iter(header)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2))
        .map(|value| value.as_str())
}

/// Short human label for log lines
fn describe(header: &str) -> String {
    match (header_attribute(header, "id"), header_attribute(header, "title")) {
        (Some(id), Some(title)) => format!("id={} {:?}", id, title),
        (Some(id), None) => format!("id={}", id),
        (None, Some(title)) => format!("{:?}", title),
        (None, None) => format!("{:?}", header),
    }
}

#[derive(PartialEq,Eq,Debug,Clone,Copy)]
pub enum State {
    Outside,
    Inside,
}

/// What a scan ran into, including the markup it had to skip
#[derive(PartialEq,Eq,Debug,Clone,Copy,Default)]
pub struct ScanStats {
    pub documents: usize,
    pub unterminated: usize,
    pub stray_ends: usize,
}

impl ScanStats {
    pub fn add(&mut self, other: &ScanStats) {
        self.documents += other.documents;
        self.unterminated += other.unterminated;
        self.stray_ends += other.stray_ends;
    }
}

/// Line-at-a-time document scanner
///
/// Feed it lines without their line terminator. It hands back a `Document` whenever an end
/// marker closes one.
#[derive(Debug)]
pub struct Scanner {
    source: String,
    state: State,
    header: String,
    start_line: usize,
    buffer: String,
    line_no: usize,
    stats: ScanStats,
}

impl Scanner {
    /// `source` only shows up in warnings
    pub fn new<S: Into<String>>(source: S) -> Self {
        Scanner {
            source: source.into(),
            state: State::Outside,
            header: String::new(),
            start_line: 0,
            buffer: String::new(),
            line_no: 0,
            stats: ScanStats::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn feed(&mut self, line: &str) -> Option<Document> {
        self.line_no += 1;
        match self.state {
            State::Outside => {
                if line.starts_with(START_MARKER) {
                    self.state = State::Inside;
                    self.buffer.clear();
                    self.header.clear();
                    self.header.push_str(line);
                    self.start_line = self.line_no;
                } else if line.starts_with(END_MARKER) {
                    self.stats.stray_ends += 1;
                    warn!("{}:{}: end marker without a document, skipping it",
                        self.source, self.line_no);
                }
                None
            }
            State::Inside => {
                if line.starts_with(END_MARKER) {
                    self.state = State::Outside;
                    self.stats.documents += 1;
                    Some(Document {
                        header: mem::replace(&mut self.header, String::new()),
                        line: self.start_line,
                        body: mem::replace(&mut self.buffer, String::new()),
                    })
                } else {
                    self.buffer.push_str(line);
                    self.buffer.push('\n');
                    None
                }
            }
        }
    }

    /// The input is over. Anything still open is thrown away.
    pub fn finish(&mut self) {
        if self.state == State::Inside {
            self.stats.unterminated += 1;
            warn!("{}:{}: document {} never ended, dropping it ({} bytes)",
                self.source, self.start_line, describe(&self.header), self.buffer.len());
            self.buffer.clear();
            self.header.clear();
            self.state = State::Outside;
        }
    }
}

/// Stream documents out of lines (probably from one shard file)
///
/// Single pass: once the lines run out (or fail) it stays finished.
pub struct Documents<L> {
    lines: L,
    scanner: Scanner,
    done: bool,
}

impl<L> Documents<L> where L: Iterator<Item = io::Result<String>> {
    pub fn new<S: Into<String>>(lines: L, source: S) -> Self {
        Documents {
            lines: lines,
            scanner: Scanner::new(source),
            done: false,
        }
    }

    /// Counts so far, final once the iterator has returned `None`
    pub fn stats(&self) -> ScanStats {
        self.scanner.stats()
    }
}

impl<L> Iterator for Documents<L> where L: Iterator<Item = io::Result<String>> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if let Some(doc) = self.scanner.feed(&line) {
                        return Some(Ok(doc));
                    } // else loop
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.scanner.finish();
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

/// Documents from any buffered reader
pub fn documents_in<R: BufRead, S: Into<String>>(reader: R, source: S) -> Documents<Lines<R>> {
    Documents::new(reader.lines(), source)
}

/// Documents from a shard file. Lines must be UTF-8, anything else is an IO error.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Documents<Lines<BufReader<File>>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    Ok(documents_in(BufReader::new(file), path.display().to_string()))
}
