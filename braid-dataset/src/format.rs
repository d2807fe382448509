use braid_engine::BraidWord;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors produced at the dataset boundary.
///
/// Per-entry problems never surface here: malformed entry lines are skipped
/// by the loader (with a warning) so one bad line cannot poison a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset is missing a header line")]
    MissingHeader,
    #[error("malformed header '{line}': {reason}")]
    Header { line: String, reason: String },
    #[error("malformed entry line '{line}'")]
    Entry { line: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Dataset header: `count,n_strands,crossings,difficulty[,optimal=<bool>]`.
///
/// `optimal` records whether entry lines carry an optimal step count
/// alongside each word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DatasetHeader {
    pub count: usize,
    pub n_strands: usize,
    pub crossings: usize,
    pub difficulty: usize,
    pub optimal: bool,
}

impl DatasetHeader {
    /// Parses a header line.
    pub fn parse(line: &str) -> Result<Self, DatasetError> {
        let malformed = |reason: &str| DatasetError::Header {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() < 4 || fields.len() > 5 {
            return Err(malformed("expected 4 or 5 comma-separated fields"));
        }

        let parse_field = |s: &str, name: &str| {
            s.parse::<usize>()
                .map_err(|_| malformed(&format!("{name} is not a non-negative integer")))
        };

        let count = parse_field(fields[0], "count")?;
        let n_strands = parse_field(fields[1], "n_strands")?;
        let crossings = parse_field(fields[2], "crossings")?;
        let difficulty = parse_field(fields[3], "difficulty")?;

        if n_strands < 2 {
            return Err(malformed("n_strands must be at least 2"));
        }

        let optimal = match fields.get(4) {
            None => false,
            Some(flag) => match flag.strip_prefix("optimal=") {
                Some("true") => true,
                Some("false") => false,
                _ => return Err(malformed("fifth field must be optimal=<bool>")),
            },
        };

        Ok(DatasetHeader {
            count,
            n_strands,
            crossings,
            difficulty,
            optimal,
        })
    }

    /// Renders the header back to its line form.
    pub fn render(&self) -> String {
        if self.optimal {
            format!(
                "{},{},{},{},optimal=true",
                self.count, self.n_strands, self.crossings, self.difficulty
            )
        } else {
            format!(
                "{},{},{},{}",
                self.count, self.n_strands, self.crossings, self.difficulty
            )
        }
    }
}

/// One persisted word, optionally labeled with its optimal move count.
///
/// `optimal_steps` is `None` for bare word lines; `Some(-1)` is the
/// persisted marker for "no solution found within the generation deadline"
/// and any other value is the solver's minimal move count.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    pub word: BraidWord,
    pub optimal_steps: Option<i32>,
}

/// A loaded dataset: the header plus every entry line that survived parsing.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub header: DatasetHeader,
    pub entries: Vec<DatasetEntry>,
}

// Master pattern for entry lines. Two shapes:
// - bare word:     "[1, -2, 3]"   (also the empty word "[]")
// - labeled tuple: "([1, -2, 3], 4)"  with -1 = unsolved within deadline
lazy_static! {
    static ref ENTRY_REGEX: Regex = Regex::new(
        r"^(?:\[(?P<bare>[^\]]*)\]|\(\s*\[(?P<word>[^\]]*)\]\s*,\s*(?P<steps>-?\d+)\s*\))$"
    )
    .expect("invalid dataset entry pattern");
}

/// Parses one entry line against the header's strand count.
///
/// Returns `Err` for lines that do not match the entry shapes or whose
/// generators are invalid on `n_strands` strands (code 0, magnitude out of
/// range). Callers decide whether to skip or abort; the loader skips.
pub fn parse_entry(line: &str, n_strands: usize) -> Result<DatasetEntry, DatasetError> {
    let malformed = || DatasetError::Entry {
        line: line.to_string(),
    };

    let caps = ENTRY_REGEX.captures(line.trim()).ok_or_else(malformed)?;

    let (body, steps) = if let Some(bare) = caps.name("bare") {
        (bare.as_str(), None)
    } else {
        let steps = caps
            .name("steps")
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .ok_or_else(malformed)?;
        (caps.name("word").ok_or_else(malformed)?.as_str(), Some(steps))
    };

    let mut codes: Vec<i32> = Vec::new();
    for token in body.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue; // the empty word renders as "[]"
        }
        codes.push(token.parse::<i32>().map_err(|_| malformed())?);
    }

    let word = BraidWord::from_ints(n_strands, &codes).ok_or_else(malformed)?;
    Ok(DatasetEntry {
        word,
        optimal_steps: steps,
    })
}

/// Renders one entry back to its line form.
pub fn render_entry(entry: &DatasetEntry) -> String {
    let codes: Vec<String> = entry.word.as_ints().iter().map(i32::to_string).collect();
    let word = format!("[{}]", codes.join(", "));
    match entry.optimal_steps {
        Some(steps) => format!("({word}, {steps})"),
        None => word,
    }
}

/// Loads a dataset file.
///
/// The first line must be a valid header. Malformed entry lines are skipped
/// with a warning; everything else still loads. Only I/O failures and a
/// bad/missing header abort the load.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let file = File::open(&path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or(DatasetError::MissingHeader)??;
    let header = DatasetHeader::parse(&header_line)?;

    let mut entries = Vec::new();
    for (number, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_entry(&line, header.n_strands) {
            Ok(entry) => entries.push(entry),
            Err(_) => {
                // Entry lines are independent; one bad line is not fatal.
                log::warn!("skipping malformed dataset line {}: {}", number + 2, line);
            }
        }
    }

    Ok(Dataset { header, entries })
}

/// Writes a dataset file in the exact line shapes `load_dataset` reads.
pub fn write_dataset<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<(), DatasetError> {
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", dataset.header.render())?;
    for entry in &dataset.entries {
        writeln!(writer, "{}", render_entry(entry))?;
    }
    writer.flush()?;
    Ok(())
}
