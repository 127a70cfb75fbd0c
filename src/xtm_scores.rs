// Score log persistence, rankings and player statistics
// The log is plain text, one `name difficulty seconds outcome` record per line

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("score log unavailable: {0}")]
    Unavailable(#[from] io::Error),
    #[error("malformed score record: {0:?}")]
    Malformed(String),
    #[error("field {0:?} must be a single word")]
    NotAToken(String),
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
        })
    }
}

impl FromStr for Outcome {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Win" => Ok(Outcome::Win),
            "Loss" => Ok(Outcome::Loss),
            _ => Err(ScoreError::Malformed(s.to_string())),
        }
    }
}

/// One completed game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub difficulty: String,
    pub secs: u64,
    pub outcome: Outcome,
}

fn single_token(s: &str) -> Result<String, ScoreError> {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return Err(ScoreError::NotAToken(s.to_string()));
    }
    Ok(s.to_string())
}

impl PlayerRecord {
    /// Build a record; name and difficulty must be single words
    pub fn new(name: &str, difficulty: &str, secs: u64, outcome: Outcome) -> Result<Self, ScoreError> {
        Ok(PlayerRecord {
            name: single_token(name)?,
            difficulty: single_token(difficulty)?,
            secs,
            outcome,
        })
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.name, self.difficulty, self.secs, self.outcome)
    }
}

impl FromStr for PlayerRecord {
    type Err = ScoreError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, difficulty, secs, outcome] = fields[..] else {
            return Err(ScoreError::Malformed(line.to_string()));
        };
        let secs = secs
            .parse()
            .map_err(|_| ScoreError::Malformed(line.to_string()))?;
        PlayerRecord::new(name, difficulty, secs, outcome.parse()?)
    }
}

/// Aggregated results for one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub average_secs: u64,
}

/// Append-only score log file
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    /// Score log at `path`; nothing is touched until the first read or append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScoreLog { path: path.into() }
    }

    /// File the log reads from and appends to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file (and its directory) on first use
    pub fn append(&self, record: &PlayerRecord) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", record)?;
        log::info!("recorded `{}` in {}", record, self.path.display());
        Ok(())
    }

    /// Read every well-formed record; malformed lines are skipped
    pub fn load(&self) -> Result<Vec<PlayerRecord>, ScoreError> {
        let bytes = fs::read(&self.path)?;
        let mut records = Vec::new();
        // decode line by line so one bad byte only costs its own line
        for (n, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("{}:{}: not valid UTF-8: {}", self.path.display(), n + 1, e);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<PlayerRecord>() {
                Ok(r) => records.push(r),
                Err(e) => log::warn!("{}:{}: {}", self.path.display(), n + 1, e),
            }
        }
        Ok(records)
    }
}

/// Winning records for a difficulty (case-insensitive), fastest first
pub fn winners(records: &[PlayerRecord], difficulty: &str) -> Vec<PlayerRecord> {
    let mut wins: Vec<PlayerRecord> = records
        .iter()
        .filter(|r| r.outcome == Outcome::Win && r.difficulty.eq_ignore_ascii_case(difficulty.trim()))
        .cloned()
        .collect();
    // stable: equal times keep log order
    wins.sort_by_key(|r| r.secs);
    wins
}

/// The `n` fastest wins for a difficulty
pub fn top_winners(records: &[PlayerRecord], difficulty: &str, n: usize) -> Vec<PlayerRecord> {
    let mut wins = winners(records, difficulty);
    wins.truncate(n);
    wins
}

/// Totals for a player name (case-insensitive); None when the player has no games
pub fn player_stats(records: &[PlayerRecord], name: &str) -> Option<PlayerStats> {
    let mine: Vec<&PlayerRecord> = records
        .iter()
        .filter(|r| r.name.to_lowercase() == name.trim().to_lowercase())
        .collect();
    if mine.is_empty() {
        return None;
    }
    let wins = mine.iter().filter(|r| r.outcome == Outcome::Win).count();
    let total: u64 = mine.iter().map(|r| r.secs).sum();
    Some(PlayerStats {
        games: mine.len(),
        wins,
        losses: mine.len() - wins,
        average_secs: total / mine.len() as u64,
    })
}
