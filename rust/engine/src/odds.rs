//! Starting-hand classes and the persisted win-frequency table.
//!
//! A table is stored as headerless CSV, one `class,frequency` row per
//! observed class, in any order, in a file named `odds_{n}_handed.csv` for
//! an `n`-handed table.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::cards::{all_ranks, Card, Rank};
use crate::config::validate_players;
use crate::errors::GameError;

/// Number of distinct starting-hand classes.
pub const CLASS_COUNT: usize = 169;

/// Starting-hand bucket such as `"AA"`, `"AKs"` or `"T9o"`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandClass {
    high: Rank,
    low: Rank,
    suited: bool,
}

impl HandClass {
    /// `None` when the ranks are a pair and `suited` is set.
    pub fn new(a: Rank, b: Rank, suited: bool) -> Option<HandClass> {
        if a == b && suited {
            return None;
        }
        let (high, low) = if a >= b { (a, b) } else { (b, a) };
        Some(HandClass { high, low, suited })
    }

    pub fn from_pocket(a: Card, b: Card) -> HandClass {
        let (high, low) = if a.rank >= b.rank {
            (a.rank, b.rank)
        } else {
            (b.rank, a.rank)
        };
        HandClass {
            high,
            low,
            suited: high != low && a.suit == b.suit,
        }
    }

    pub fn high(&self) -> Rank {
        self.high
    }
    pub fn low(&self) -> Rank {
        self.low
    }
    pub fn is_pair(&self) -> bool {
        self.high == self.low
    }
    pub fn is_suited(&self) -> bool {
        self.suited
    }

    /// Dense index in 0..169 on the usual 13x13 grid: pairs on the diagonal,
    /// suited above it, offsuit below.
    pub fn index(&self) -> usize {
        let row = (14 - self.high.value()) as usize;
        let col = (14 - self.low.value()) as usize;
        if self.suited {
            row * 13 + col
        } else {
            col * 13 + row
        }
    }

    pub fn from_index(index: usize) -> Option<HandClass> {
        if index >= CLASS_COUNT {
            return None;
        }
        let (row, col) = (index / 13, index % 13);
        let rank = |i: usize| Rank::from_u8(14 - i as u8);
        match row.cmp(&col) {
            std::cmp::Ordering::Equal => HandClass::new(rank(row)?, rank(row)?, false),
            std::cmp::Ordering::Less => HandClass::new(rank(row)?, rank(col)?, true),
            std::cmp::Ordering::Greater => HandClass::new(rank(col)?, rank(row)?, false),
        }
    }

    /// Every class, strongest ranks first.
    pub fn all() -> Vec<HandClass> {
        let ranks = all_ranks();
        let mut classes = Vec::with_capacity(CLASS_COUNT);
        for (i, &high) in ranks.iter().enumerate().rev() {
            classes.push(HandClass {
                high,
                low: high,
                suited: false,
            });
            for &low in ranks[..i].iter().rev() {
                classes.push(HandClass { high, low, suited: true });
                classes.push(HandClass { high, low, suited: false });
            }
        }
        classes
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.high.symbol(), self.low.symbol())?;
        if !self.is_pair() {
            f.write_str(if self.suited { "s" } else { "o" })?;
        }
        Ok(())
    }
}

/// Why a string is not a hand class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHandClassError {
    #[error("unknown rank {rank:?} in {input:?}")]
    UnknownRank { rank: char, input: String },
    #[error("{0:?} needs an s or o suffix")]
    MissingSuffix(String),
    #[error("pair {0:?} takes no suffix")]
    PairWithSuffix(String),
    #[error("invalid class {0:?}")]
    Invalid(String),
}

impl FromStr for HandClass {
    type Err = ParseHandClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        let rank = |c: char| {
            Rank::from_symbol(c).ok_or_else(|| ParseHandClassError::UnknownRank {
                rank: c,
                input: s.to_string(),
            })
        };
        let invalid = || ParseHandClassError::Invalid(s.to_string());
        match chars.as_slice() {
            [a, b] => {
                let (a, b) = (rank(*a)?, rank(*b)?);
                if a != b {
                    return Err(ParseHandClassError::MissingSuffix(s.to_string()));
                }
                HandClass::new(a, b, false).ok_or_else(invalid)
            }
            [a, b, kind @ ('s' | 'o')] => {
                let (a, b) = (rank(*a)?, rank(*b)?);
                if a == b {
                    return Err(ParseHandClassError::PairWithSuffix(s.to_string()));
                }
                HandClass::new(a, b, *kind == 's').ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsRow {
    pub class: HandClass,
    /// Empirical win frequency in [0, 1]
    pub win_rate: f64,
    /// Trials behind the estimate; 0 for rows loaded from disk
    pub trials: u64,
}

/// Win frequency per observed class for one table size, strongest first.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsTable {
    players: usize,
    rows: Vec<OddsRow>,
}

impl OddsTable {
    pub fn new(players: usize, mut rows: Vec<OddsRow>) -> Result<OddsTable, GameError> {
        validate_players(players)?;
        rows.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
        Ok(OddsTable { players, rows })
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn rows(&self) -> &[OddsRow] {
        &self.rows
    }

    /// Observed classes.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `None` for a class that was never observed.
    pub fn win_rate(&self, class: HandClass) -> Option<f64> {
        self.row(class).map(|r| r.win_rate)
    }

    pub fn row(&self, class: HandClass) -> Option<&OddsRow> {
        self.rows.iter().find(|r| r.class == class)
    }

    pub fn ranked(&self) -> RankedHands {
        RankedHands::new(self)
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<(), GameError> {
        for row in &self.rows {
            writeln!(out, "{},{}", row.class, row.win_rate)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Parses `class,frequency` rows. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// [`GameError::MalformedOddsData`] naming the 1-based line of the first
    /// row that is not a known class followed by a frequency in [0, 1], or of a
    /// class listed twice.
    pub fn read_csv<R: BufRead>(players: usize, input: R) -> Result<OddsTable, GameError> {
        let mut rows: Vec<OddsRow> = Vec::new();
        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let malformed = |reason: String| GameError::MalformedOddsData {
                line: line_no,
                reason,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (class, rate) = line
                .split_once(',')
                .ok_or_else(|| malformed(format!("expected class,frequency, got {:?}", line)))?;
            let class: HandClass = class
                .trim()
                .parse()
                .map_err(|e: ParseHandClassError| malformed(e.to_string()))?;
            let win_rate: f64 = rate
                .trim()
                .parse()
                .map_err(|_| malformed(format!("frequency {:?} is not a number", rate.trim())))?;
            if !(0.0..=1.0).contains(&win_rate) {
                return Err(malformed(format!("frequency {} outside [0, 1]", win_rate)));
            }
            if rows.iter().any(|r| r.class == class) {
                return Err(malformed(format!("{} listed twice", class)));
            }
            rows.push(OddsRow {
                class,
                win_rate,
                trials: 0,
            });
        }
        OddsTable::new(players, rows)
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf, GameError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(odds_file_name(self.players));
        let file = fs::File::create(&path)?;
        self.write_csv(std::io::BufWriter::new(file))?;
        debug!(path = %path.display(), classes = self.len(), "odds table written");
        Ok(path)
    }

    pub fn load(dir: &Path, players: usize) -> Result<OddsTable, GameError> {
        validate_players(players)?;
        let path = dir.join(odds_file_name(players));
        let file = fs::File::open(&path)?;
        let table = OddsTable::read_csv(players, BufReader::new(file))?;
        debug!(path = %path.display(), classes = table.len(), "odds table loaded");
        Ok(table)
    }
}

pub fn odds_file_name(players: usize) -> String {
    format!("odds_{}_handed.csv", players)
}

/// Classes ordered by win frequency, for grading a starting hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedHands {
    order: Vec<HandClass>,
}

impl RankedHands {
    pub fn new(table: &OddsTable) -> RankedHands {
        RankedHands {
            order: table.rows.iter().map(|r| r.class).collect(),
        }
    }

    pub fn classes(&self) -> &[HandClass] {
        &self.order
    }

    /// 1 for the strongest class.
    pub fn rank(&self, class: HandClass) -> Option<usize> {
        self.order.iter().position(|&c| c == class).map(|i| i + 1)
    }

    /// Share of ranked classes this one is at least as strong as, in (0, 1].
    pub fn percentile(&self, class: HandClass) -> Option<f64> {
        let rank = self.rank(class)?;
        let n = self.order.len() as f64;
        Some((n - rank as f64 + 1.0) / n)
    }

    /// Whether `class` falls within the strongest `fraction` of classes.
    pub fn in_top(&self, class: HandClass, fraction: f64) -> bool {
        self.rank(class)
            .is_some_and(|rank| (rank as f64) <= (fraction * self.order.len() as f64).ceil())
    }
}

/// Loaded odds tables keyed by table size. Owned by the caller; nothing is
/// cached globally.
#[derive(Debug, Clone)]
pub struct OddsCache {
    dir: PathBuf,
    tables: HashMap<usize, OddsTable>,
}

impl OddsCache {
    pub fn new(dir: impl Into<PathBuf>) -> OddsCache {
        OddsCache {
            dir: dir.into(),
            tables: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Table for `players`, read from disk on first use.
    pub fn get(&mut self, players: usize) -> Result<&OddsTable, GameError> {
        validate_players(players)?;
        if !self.tables.contains_key(&players) {
            let table = OddsTable::load(&self.dir, players)?;
            self.tables.insert(players, table);
        }
        self.tables
            .get(&players)
            .ok_or_else(|| GameError::InvalidState(format!("odds for {} players", players)))
    }

    /// Inserts a freshly computed table, replacing any loaded one.
    pub fn insert(&mut self, table: OddsTable) {
        self.tables.insert(table.players(), table);
    }

    pub fn is_loaded(&self, players: usize) -> bool {
        self.tables.contains_key(&players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn class_from_pocket_orders_ranks() {
        let cards = parse_cards("Kh Ah").unwrap();
        assert_eq!(HandClass::from_pocket(cards[0], cards[1]).to_string(), "AKs");
        let cards = parse_cards("7c 9d").unwrap();
        assert_eq!(HandClass::from_pocket(cards[0], cards[1]).to_string(), "97o");
        let cards = parse_cards("Qc Qd").unwrap();
        assert_eq!(HandClass::from_pocket(cards[0], cards[1]).to_string(), "QQ");
    }

    #[test]
    fn all_classes_have_distinct_indices() {
        let all = HandClass::all();
        assert_eq!(all.len(), CLASS_COUNT);
        let mut seen = [false; CLASS_COUNT];
        for class in &all {
            let i = class.index();
            assert!(!seen[i], "{} collides", class);
            seen[i] = true;
            assert_eq!(HandClass::from_index(i), Some(*class));
            assert_eq!(class.to_string().parse::<HandClass>().unwrap(), *class);
        }
        assert_eq!(all[0].to_string(), "AA");
        assert_eq!(all[1].to_string(), "AKs");
    }

    #[test]
    fn class_parse_rejects_bad_suffixes() {
        assert_eq!(
            "AK".parse::<HandClass>(),
            Err(ParseHandClassError::MissingSuffix("AK".into()))
        );
        assert_eq!(
            "AAs".parse::<HandClass>(),
            Err(ParseHandClassError::PairWithSuffix("AAs".into()))
        );
        assert_eq!(
            "AKx".parse::<HandClass>(),
            Err(ParseHandClassError::Invalid("AKx".into()))
        );
        assert!(matches!(
            "ZZ".parse::<HandClass>(),
            Err(ParseHandClassError::UnknownRank { rank: 'Z', .. })
        ));
    }

    #[test]
    fn percentile_of_strongest_is_one() {
        let rows = ["AA", "KK", "72o", "QQ"]
            .iter()
            .zip([0.9, 0.8, 0.1, 0.7])
            .map(|(c, r)| OddsRow {
                class: c.parse().unwrap(),
                win_rate: r,
                trials: 1,
            })
            .collect();
        let table = OddsTable::new(3, rows).unwrap();
        let ranked = table.ranked();
        let aa = "AA".parse().unwrap();
        let seven_two = "72o".parse().unwrap();
        assert_eq!(ranked.rank(seven_two), Some(4));
        assert_eq!(ranked.percentile(aa), Some(1.0));
        assert!(ranked.in_top(aa, 0.25));
        assert!(!ranked.in_top(seven_two, 0.5));
        assert_eq!(ranked.rank("AKs".parse().unwrap()), None);
    }
}
