//! MeCab as a long running child process
//!
//! MeCab reads a line, prints one `surface<TAB>feature` line per unit and then `EOS`. We send one
//! line at a time and read up to its `EOS` before sending the next, so neither side can fill a
//! pipe while the other is stuck writing.
//!
//! MeCab only reads `-b` bytes of a line at once and gives every piece of a longer line its own
//! `EOS`. We pass `-b` ourselves and cut long lines before sending them, so one line sent is always
//! exactly one `EOS` back.
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use analyzer::{Analyzer, Unit};
use errors::*;

const END_OF_SENTENCE: &str = "EOS";

/// MeCab's own default for `-b`
pub const DEFAULT_INPUT_BUFFER: usize = 8192;
const MIN_INPUT_BUFFER: usize = 16;

/// How to start MeCab
#[derive(Debug,Clone)]
pub struct MecabConfig {
    /// Executable name or path
    pub command: String,
    /// Extra arguments, passed before ours
    pub args: Vec<String>,
    /// Dictionary directory (`-d`), if not MeCab's default
    pub dicdir: Option<PathBuf>,
    /// Input buffer size in bytes (`-b`)
    pub input_buffer: usize,
}

impl Default for MecabConfig {
    fn default() -> Self {
        MecabConfig {
            command: "mecab".to_string(),
            args: vec![],
            dicdir: None,
            input_buffer: DEFAULT_INPUT_BUFFER,
        }
    }
}

/// Morphological analyzer backed by a `mecab` process
pub struct MecabProcess {
    command: String,
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    stdout: BufReader<ChildStdout>,
    line: String,
    // Longest line MeCab reads in one go
    max_line: usize,
}

impl MecabProcess {
    pub fn spawn(config: &MecabConfig) -> Result<Self> {
        if config.input_buffer < MIN_INPUT_BUFFER {
            return Err(Error::Other(format!("MeCab input buffer must be at least {} bytes, not {}",
                MIN_INPUT_BUFFER, config.input_buffer)));
        }
        let mut command = Command::new(&config.command);
        command.args(&config.args);
        if let Some(ref dicdir) = config.dicdir {
            command.arg("-d").arg(dicdir);
        }
        command.arg("-b").arg(config.input_buffer.to_string());
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| Error::AnalyzerUnavailable(config.command.clone(), err))?;
        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => return Err(Error::Other(format!("`{}` started without pipes", config.command))),
        };
        debug!("Started {} (pid {})", config.command, child.id());
        Ok(MecabProcess {
            command: config.command.clone(),
            child: child,
            stdin: Some(BufWriter::new(stdin)),
            stdout: BufReader::new(stdout),
            line: String::new(),
            // A full buffer holds the line and its terminator, keep one more byte of slack
            max_line: config.input_buffer - 2,
        })
    }

    /// Send one line (without a newline in it) and collect its units
    fn analyze_line(&mut self, text: &str, units: &mut Vec<Unit>) -> Result<()> {
        {
            let stdin = match self.stdin {
                Some(ref mut stdin) => stdin,
                None => return Err(Error::Other(format!("`{}` is already closed", self.command))),
            };
            stdin.write_all(text.as_bytes())?;
            stdin.write_all(b"\n")?;
            stdin.flush()?;
        }
        loop {
            self.line.clear();
            if self.stdout.read_line(&mut self.line)? == 0 {
                return Err(Error::IOError(io::Error::new(io::ErrorKind::UnexpectedEof,
                    format!("`{}` exited in the middle of a sentence", self.command))));
            }
            match parse_line(&self.line)? {
                Some(unit) => units.push(unit),
                None => return Ok(()),
            }
        }
    }
}

impl Analyzer for MecabProcess {
    fn analyze(&mut self, text: &str) -> Result<Vec<Unit>> {
        let mut units = vec![];
        for line in text.lines() {
            for piece in pieces(line, self.max_line) {
                // Blank lines only ever give back EOS
                if !piece.trim().is_empty() {
                    self.analyze_line(piece, &mut units)?;
                }
            }
        }
        Ok(units)
    }

    /// Push an empty line through so we know the process is up before the real work
    fn warm_up(&mut self) -> Result<()> {
        let mut units = vec![];
        self.analyze_line("", &mut units)
    }
}

impl Drop for MecabProcess {
    fn drop(&mut self) {
        // Closing stdin is how MeCab knows to quit
        drop(self.stdin.take());
        match self.child.wait() {
            Ok(status) if !status.success() => warn!("`{}` exited with {}", self.command, status),
            Err(err) => warn!("Could not wait for `{}`: {}", self.command, err),
            _ => (),
        }
    }
}

/// Cut a line into pieces of at most `max` bytes
///
/// Pieces end after whitespace or `。`/`、` where there is one, so words stay whole. A run with
/// no break at all is cut at a character boundary.
pub fn pieces(line: &str, max: usize) -> Vec<&str> {
    let mut pieces = vec![];
    let mut rest = line;
    while rest.len() > max {
        let mut cut = max;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // Never stall, even if one character is wider than `max`
            cut = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(rest.len());
        }
        let end = rest[..cut].char_indices()
            .filter(|&(_, c)| c.is_whitespace() || c == '。' || c == '、')
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or_else(|| {
                debug!("No place to break a {} byte line, cutting at {} bytes", rest.len(), cut);
                cut
            });
        pieces.push(&rest[..end]);
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

/// One output line: a unit, or `None` at the end of the sentence
pub fn parse_line(line: &str) -> Result<Option<Unit>> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);
    if line == END_OF_SENTENCE {
        return Ok(None);
    }
    let mut parts = line.splitn(2, '\t');
    match (parts.next(), parts.next()) {
        (Some(surface), Some(feature)) => Ok(Some(Unit::new(surface, feature))),
        _ => Err(Error::MalformedOutput(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile;

    #[test]
    fn parses_units() {
        let unit = parse_line("東京\t名詞,固有名詞,地域,一般,*,*,東京,トウキョウ,トーキョー\n")
            .unwrap()
            .unwrap();
        assert_eq!(unit.surface, "東京");
        assert_eq!(unit.classification().unwrap(), ("名詞", "固有名詞"));
    }

    #[test]
    fn eos_ends_the_sentence() {
        assert_eq!(parse_line("EOS\n").unwrap(), None);
        assert_eq!(parse_line("EOS\r\n").unwrap(), None);
    }

    #[test]
    fn surface_can_look_like_eos() {
        let unit = parse_line("EOS\t名詞,固有名詞,組織,*,*,*,*\n").unwrap().unwrap();
        assert_eq!(unit.surface, "EOS");
    }

    #[test]
    fn garbage_is_an_error() {
        match parse_line("not mecab output\n") {
            Err(Error::MalformedOutput(ref line)) => assert_eq!(line, "not mecab output"),
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn missing_executable_is_reported() {
        let config = MecabConfig {
            command: "nounfreq-no-such-analyzer".to_string(),
            ..MecabConfig::default()
        };
        match MecabProcess::spawn(&config) {
            Err(Error::AnalyzerUnavailable(ref cmd, _)) => assert_eq!(cmd, "nounfreq-no-such-analyzer"),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("a missing executable should not start"),
        }
    }

    #[test]
    fn tiny_buffer_is_refused() {
        let config = MecabConfig { input_buffer: 4, ..MecabConfig::default() };
        assert!(MecabProcess::spawn(&config).is_err());
    }

    #[test]
    fn short_lines_stay_whole() {
        assert_eq!(pieces("東京 大阪", 100), vec!["東京 大阪"]);
        assert!(pieces("", 100).is_empty());
    }

    #[test]
    fn long_lines_break_between_words() {
        let words: Vec<String> = (0..100).map(|i| format!("w{}", i)).collect();
        let line = words.join(" ");
        let cut = pieces(&line, 30);
        assert!(cut.len() > 1);
        assert!(cut.iter().all(|piece| piece.len() <= 30));
        assert_eq!(cut.concat(), line);
        let rejoined: Vec<&str> = cut.iter().flat_map(|piece| piece.split_whitespace()).collect();
        assert_eq!(rejoined, words);
    }

    #[test]
    fn japanese_breaks_after_punctuation() {
        let line = "東京は都市である。大阪も都市である。京都は古い。";
        let cut = pieces(line, 30);
        assert_eq!(cut, vec!["東京は都市である。", "大阪も都市である。", "京都は古い。"]);
    }

    #[test]
    fn unbroken_runs_cut_on_characters() {
        let line = "あ".repeat(10);
        let cut = pieces(&line, 8);
        // Three bytes a character, so two characters a piece
        assert_eq!(cut.len(), 5);
        assert!(cut.iter().all(|piece| *piece == "ああ"));
        assert_eq!(pieces("あ", 2), vec!["あ"]);
    }

    /// Stands in for MeCab: every space separated word is a common noun. Like MeCab it reads
    /// `-b` bytes at most, and a line that doesn't fit gets an extra sentence (and `EOS`).
    const FAKE_MECAB: &str = r#"
set -f
b=
while [ $# -gt 0 ]; do
    case "$1" in
        -b) b="$2"; shift 2 ;;
        *) shift ;;
    esac
done
[ -n "$b" ] || { echo "no -b given" >&2; exit 2; }
while IFS= read -r line; do
    if [ "${#line}" -ge "$((b - 1))" ]; then
        printf 'overflow\t記号,一般,*,*\nEOS\n'
    fi
    for word in $line; do
        printf '%s\t名詞,一般,*,*,*,*\n' "$word"
    done
    echo EOS
done
"#;

    fn surfaces(units: Vec<Unit>) -> Vec<String> {
        units.into_iter().map(|unit| unit.surface).collect()
    }

    #[cfg(unix)]
    #[test]
    fn stays_in_step_with_the_process() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-mecab.sh");
        fs::write(&script, FAKE_MECAB).unwrap();
        let config = MecabConfig {
            command: "sh".to_string(),
            args: vec![script.to_string_lossy().into_owned()],
            dicdir: None,
            input_buffer: 64,
        };
        let mut mecab = MecabProcess::spawn(&config).unwrap();
        mecab.warm_up().unwrap();

        // Documents one after another, blank lines included
        assert_eq!(surfaces(mecab.analyze("東京 大阪\n\n京都\n").unwrap()),
                   vec!["東京", "大阪", "京都"]);
        assert_eq!(surfaces(mecab.analyze("\n   \n").unwrap()), Vec::<String>::new());
        assert_eq!(surfaces(mecab.analyze("猫").unwrap()), vec!["猫"]);

        // Far longer than the input buffer
        let words: Vec<String> = (0..300).map(|i| format!("w{}", i)).collect();
        let text = words.join(" ") + "\n";
        assert!(text.len() > 10 * config.input_buffer);
        assert_eq!(surfaces(mecab.analyze(&text).unwrap()), words);

        // Nothing is left over for the next document
        assert_eq!(surfaces(mecab.analyze("東京\n").unwrap()), vec!["東京"]);

        // Even with nowhere to break
        let solid = "x".repeat(150);
        let units = surfaces(mecab.analyze(&solid).unwrap());
        assert_eq!(units.len(), 3);
        assert_eq!(units.concat(), solid);
        assert_eq!(surfaces(mecab.analyze("大阪").unwrap()), vec!["大阪"]);
    }
}
