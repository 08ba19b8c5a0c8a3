//! Plain-text session files.
//!
//! A session is written one value per line. Each iteration is a scan block
//! followed by a move block:
//!
//! ```text
//! sample rate
//! value count
//! value            (repeated value count times)
//! position x
//! position y
//! heading
//! rotate
//! travel
//! new x            (map frame, relative to the origin)
//! new y
//! new heading
//! ```
//!
//! Only the final scan may be left without a move block. Floating point values
//! use the shortest representation that parses back to the same bits, so a
//! replayed session is identical to the live one.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use ogm_mapping::scan::validate_sample_rate;
use ogm_mapping::{MoveCommand, OccupancyGrid, Scan, WorldPoint};
use ogm_odometry::Pose;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("history cannot be saved: {0}")]
    Inconsistent(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One scan and the move that followed it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub scan: Scan,
    pub command: Option<MoveCommand>,
}

/// Serializes a scan and command history.
///
/// Command `i` is the move made after scan `i`.
pub fn encode(scans: &[Scan], commands: &[MoveCommand]) -> Result<String, PersistenceError> {
    if commands.len() > scans.len() {
        return Err(PersistenceError::Inconsistent("more moves than scans"));
    }
    if commands.len() + 1 < scans.len() {
        return Err(PersistenceError::Inconsistent("consecutive scans without a move between them"));
    }

    let mut lines: Vec<String> = Vec::new();
    for (i, scan) in scans.iter().enumerate() {
        lines.push(scan.sample_rate().to_string());
        lines.push(scan.len().to_string());
        lines.extend(scan.values().iter().map(|v| v.to_string()));
        lines.push(scan.position().x.to_string());
        lines.push(scan.position().y.to_string());
        lines.push(scan.heading().to_string());

        if let Some(command) = commands.get(i) {
            let pose = command
                .result()
                .ok_or(PersistenceError::Inconsistent("move was never executed"))?;
            lines.push(command.rotate().to_string());
            lines.push(command.travel().to_string());
            lines.push(pose.x.to_string());
            lines.push(pose.y.to_string());
            lines.push(pose.heading.to_string());
        }
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Reads values from the session text while tracking the line number.
struct Reader<'a> {
    lines: std::iter::Peekable<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Reader {
            lines: text.trim_end().lines().peekable(),
            line: 0,
        }
    }

    fn at_end(&mut self) -> bool {
        self.lines.peek().is_none()
    }

    fn error(&self, reason: impl Into<String>) -> PersistenceError {
        PersistenceError::Parse {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, PersistenceError> {
        let raw = self.lines.next();
        self.line += 1;
        let raw = raw.ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))?;
        raw.trim()
            .parse::<T>()
            .map_err(|_| self.error(format!("invalid {}: {:?}", what, raw)))
    }

    fn next_f64(&mut self, what: &str) -> Result<f64, PersistenceError> {
        let value: f64 = self.next(what)?;
        if !value.is_finite() {
            return Err(self.error(format!("{} must be finite", what)));
        }
        Ok(value)
    }

    fn scan(&mut self) -> Result<Scan, PersistenceError> {
        let rate: u32 = self.next("sample rate")?;
        validate_sample_rate(rate).map_err(|e| self.error(e.to_string()))?;
        let count: usize = self.next("value count")?;
        if count.checked_mul(rate as usize) != Some(360) {
            return Err(self.error(format!("{} values do not fit sample rate {}", count, rate)));
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.next::<i32>("scan value")?);
        }
        let x = self.next_f64("position x")?;
        let y = self.next_f64("position y")?;
        let heading = self.next_f64("heading")?;

        Scan::new(rate, values, WorldPoint::new(x, y), heading).map_err(|e| self.error(e.to_string()))
    }

    fn command(&mut self) -> Result<MoveCommand, PersistenceError> {
        let rotate: i32 = self.next("rotate command")?;
        let travel: i32 = self.next("travel command")?;
        let x = self.next_f64("new x")?;
        let y = self.next_f64("new y")?;
        let heading = self.next_f64("new heading")?;
        Ok(MoveCommand::executed(rotate, travel, Pose { x, y, heading }))
    }
}

/// Parses a session file. Nothing is returned unless the whole text is valid.
pub fn decode(text: &str) -> Result<Vec<SessionRecord>, PersistenceError> {
    let mut reader = Reader::new(text);
    let mut records = Vec::new();

    while !reader.at_end() {
        let scan = reader.scan()?;
        let command = if reader.at_end() { None } else { Some(reader.command()?) };
        records.push(SessionRecord { scan, command });
    }

    debug!(records = records.len(), lines = reader.line, "Decoded session");
    Ok(records)
}

/// Writes the grid's scan and command history to `path`.
pub fn save(path: &Path, grid: &OccupancyGrid) -> Result<(), PersistenceError> {
    let text = encode(grid.scans(), grid.commands())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    info!(
        path = %path.display(),
        scans = grid.scans().len(),
        commands = grid.commands().len(),
        "Session saved"
    );
    Ok(())
}

/// Reads and decodes a session file.
pub fn load(path: &Path) -> Result<Vec<SessionRecord>, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let records = decode(&text)?;
    info!(path = %path.display(), records = records.len(), "Session loaded");
    Ok(records)
}
