//! The 24 solar terms and a file-backed table of their civil moments.
//!
//! The engine never computes solar longitude itself. Term moments come from
//! a [`SolarTermSource`]; [`SolarTermTable`] is the bundled implementation,
//! loaded from a plain text almanac extract:
//!
//! ```text
//! # civil time (UTC+8)   term
//! 1986-04-05 10:06:12    清明
//! 1986-05-06 03:30:42    lixia
//! ```
//!
//! Terms may be named in Chinese or pinyin. Lines starting with `#` and
//! blank lines are ignored. Entries need not be sorted.

use chrono::{Duration, NaiveDateTime};

use crate::civil::parse_civil;
use crate::error::TimeError;

/// Longest possible gap between consecutive jie terms, with margin.
const MAX_JIE_GAP_DAYS: i64 = 32;

/// The 24 solar terms, starting from 立春.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolarTerm {
    LiChun,
    YuShui,
    JingZhe,
    ChunFen,
    QingMing,
    GuYu,
    LiXia,
    XiaoMan,
    MangZhong,
    XiaZhi,
    XiaoShu,
    DaShu,
    LiQiu,
    ChuShu,
    BaiLu,
    QiuFen,
    HanLu,
    ShuangJiang,
    LiDong,
    XiaoXue,
    DaXue,
    DongZhi,
    XiaoHan,
    DaHan,
}

/// All 24 terms in order (index 0 = 立春).
pub const ALL_SOLAR_TERMS: [SolarTerm; 24] = [
    SolarTerm::LiChun,
    SolarTerm::YuShui,
    SolarTerm::JingZhe,
    SolarTerm::ChunFen,
    SolarTerm::QingMing,
    SolarTerm::GuYu,
    SolarTerm::LiXia,
    SolarTerm::XiaoMan,
    SolarTerm::MangZhong,
    SolarTerm::XiaZhi,
    SolarTerm::XiaoShu,
    SolarTerm::DaShu,
    SolarTerm::LiQiu,
    SolarTerm::ChuShu,
    SolarTerm::BaiLu,
    SolarTerm::QiuFen,
    SolarTerm::HanLu,
    SolarTerm::ShuangJiang,
    SolarTerm::LiDong,
    SolarTerm::XiaoXue,
    SolarTerm::DaXue,
    SolarTerm::DongZhi,
    SolarTerm::XiaoHan,
    SolarTerm::DaHan,
];

const CHINESE_NAMES: [&str; 24] = [
    "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑", "大暑",
    "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒",
];

const PINYIN_NAMES: [&str; 24] = [
    "lichun",
    "yushui",
    "jingzhe",
    "chunfen",
    "qingming",
    "guyu",
    "lixia",
    "xiaoman",
    "mangzhong",
    "xiazhi",
    "xiaoshu",
    "dashu",
    "liqiu",
    "chushu",
    "bailu",
    "qiufen",
    "hanlu",
    "shuangjiang",
    "lidong",
    "xiaoxue",
    "daxue",
    "dongzhi",
    "xiaohan",
    "dahan",
];

impl SolarTerm {
    /// 0-based index (立春=0 .. 大寒=23).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Chinese name.
    pub fn name(self) -> &'static str {
        CHINESE_NAMES[self.index() as usize]
    }

    /// Pinyin name, lowercase without tones.
    pub fn pinyin(self) -> &'static str {
        PINYIN_NAMES[self.index() as usize]
    }

    /// Whether this term is a jie (节), i.e. opens a month.
    pub fn is_jie(self) -> bool {
        self.index() % 2 == 0
    }

    /// Branch index (0=子 .. 11=亥) of the month a jie opens.
    ///
    /// Returns `None` for the qi (中气) terms.
    pub fn month_branch_index(self) -> Option<u8> {
        if self.is_jie() {
            Some((2 + self.index() / 2) % 12)
        } else {
            None
        }
    }

    /// Look up a term by Chinese or pinyin name.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        CHINESE_NAMES
            .iter()
            .position(|n| *n == lower)
            .or_else(|| PINYIN_NAMES.iter().position(|n| *n == lower))
            .map(|i| ALL_SOLAR_TERMS[i])
    }
}

/// A solar term at a civil moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTermEvent {
    pub term: SolarTerm,
    pub at: NaiveDateTime,
}

/// Source of jie boundaries around a moment.
///
/// `prev_jie` is the latest jie at or before `at`; `next_jie` the earliest
/// strictly after it.
pub trait SolarTermSource: Send + Sync {
    fn prev_jie(&self, at: &NaiveDateTime) -> Result<SolarTermEvent, TimeError>;
    fn next_jie(&self, at: &NaiveDateTime) -> Result<SolarTermEvent, TimeError>;
}

/// Sorted table of solar-term moments.
#[derive(Debug, Clone)]
pub struct SolarTermTable {
    /// Jie events only, ascending by moment.
    jie: Vec<SolarTermEvent>,
    /// Total events read, jie and qi.
    total: usize,
}

impl SolarTermTable {
    /// Load a table file from disk.
    pub fn load(path: &std::path::Path) -> Result<Self, TimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a table from its text content.
    pub fn parse(content: &str) -> Result<Self, TimeError> {
        let mut events = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            events.push(parse_line(trimmed).map_err(|e| {
                TimeError::TermTableParse(format!("line {}: {e}", lineno + 1))
            })?);
        }
        Self::from_events(events)
    }

    /// Build a table from already-parsed events.
    pub fn from_events(mut events: Vec<SolarTermEvent>) -> Result<Self, TimeError> {
        let total = events.len();
        events.retain(|e| e.term.is_jie());
        if events.is_empty() {
            return Err(TimeError::TermTableParse("no jie terms found".to_string()));
        }
        events.sort_by_key(|e| e.at);
        Ok(Self { jie: events, total })
    }

    /// Number of events read, including qi terms.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether the table holds no events.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// First and last jie moments covered.
    pub fn range(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.jie[0].at, self.jie[self.jie.len() - 1].at)
    }
}

impl SolarTermSource for SolarTermTable {
    fn prev_jie(&self, at: &NaiveDateTime) -> Result<SolarTermEvent, TimeError> {
        let idx = self.jie.partition_point(|e| e.at <= *at);
        if idx == 0 {
            return Err(TimeError::TermOutOfRange);
        }
        let event = self.jie[idx - 1];
        if *at - event.at > Duration::days(MAX_JIE_GAP_DAYS) {
            return Err(TimeError::TermOutOfRange);
        }
        Ok(event)
    }

    fn next_jie(&self, at: &NaiveDateTime) -> Result<SolarTermEvent, TimeError> {
        let idx = self.jie.partition_point(|e| e.at <= *at);
        let event = self.jie.get(idx).copied().ok_or(TimeError::TermOutOfRange)?;
        if event.at - *at > Duration::days(MAX_JIE_GAP_DAYS) {
            return Err(TimeError::TermOutOfRange);
        }
        Ok(event)
    }
}

/// Parse `YYYY-MM-DD HH:MM[:SS] <term>`.
fn parse_line(line: &str) -> Result<SolarTermEvent, String> {
    let (stamp, name) = line
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| format!("expected '<date> <time> <term>', got {line:?}"))?;
    let term = SolarTerm::from_name(name).ok_or_else(|| format!("unknown solar term {name:?}"))?;
    let at = parse_civil(stamp).map_err(|e| e.to_string())?;
    Ok(SolarTermEvent { term, at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::civil_time;

    fn snippet() -> &'static str {
        "# spring 1986\n\
         1986-03-06 05:12:00 惊蛰\n\
         1986-03-21 06:03:00 chunfen\n\
         \n\
         1986-05-06 03:30:42 立夏\n\
         1986-04-05 10:06:12 qingming\n"
    }

    #[test]
    fn term_metadata() {
        assert_eq!(SolarTerm::LiChun.name(), "立春");
        assert_eq!(SolarTerm::XiaoHan.pinyin(), "xiaohan");
        assert!(SolarTerm::QingMing.is_jie());
        assert!(!SolarTerm::ChunFen.is_jie());
        assert_eq!(SolarTerm::LiChun.month_branch_index(), Some(2));
        assert_eq!(SolarTerm::QingMing.month_branch_index(), Some(4));
        assert_eq!(SolarTerm::DaXue.month_branch_index(), Some(0));
        assert_eq!(SolarTerm::XiaoHan.month_branch_index(), Some(1));
        assert_eq!(SolarTerm::DaHan.month_branch_index(), None);
    }

    #[test]
    fn names_round_trip() {
        for term in ALL_SOLAR_TERMS {
            assert_eq!(SolarTerm::from_name(term.name()), Some(term));
            assert_eq!(SolarTerm::from_name(term.pinyin()), Some(term));
        }
        assert_eq!(SolarTerm::from_name("LiXia"), Some(SolarTerm::LiXia));
        assert_eq!(SolarTerm::from_name("monsoon"), None);
    }

    #[test]
    fn parse_sorts_and_keeps_jie() {
        let table = SolarTermTable::parse(snippet()).unwrap();
        assert_eq!(table.len(), 4);
        let (first, last) = table.range();
        assert_eq!(first, civil_time(1986, 3, 6, 5, 12, 0).unwrap());
        assert_eq!(last, civil_time(1986, 5, 6, 3, 30, 42).unwrap());
    }

    #[test]
    fn bracketing_lookup() {
        let table = SolarTermTable::parse(snippet()).unwrap();
        let at = civil_time(1986, 4, 6, 0, 20, 0).unwrap();
        let prev = table.prev_jie(&at).unwrap();
        let next = table.next_jie(&at).unwrap();
        assert_eq!(prev.term, SolarTerm::QingMing);
        assert_eq!(next.term, SolarTerm::LiXia);
    }

    #[test]
    fn moment_on_boundary_is_previous() {
        let table = SolarTermTable::parse(snippet()).unwrap();
        let at = civil_time(1986, 4, 5, 10, 6, 12).unwrap();
        assert_eq!(table.prev_jie(&at).unwrap().term, SolarTerm::QingMing);
        assert_eq!(table.next_jie(&at).unwrap().term, SolarTerm::LiXia);
    }

    #[test]
    fn out_of_range() {
        let table = SolarTermTable::parse(snippet()).unwrap();
        let before = civil_time(1986, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(table.prev_jie(&before), Err(TimeError::TermOutOfRange));
        let after = civil_time(1986, 5, 20, 0, 0, 0).unwrap();
        assert_eq!(table.next_jie(&after), Err(TimeError::TermOutOfRange));
        let far_after = civil_time(1986, 8, 1, 0, 0, 0).unwrap();
        assert_eq!(table.prev_jie(&far_after), Err(TimeError::TermOutOfRange));
    }

    #[test]
    fn bad_lines_report_line_number() {
        let err = SolarTermTable::parse("1986-04-05 10:06:12 清明\n1986-05-06 lixia\n").unwrap_err();
        match err {
            TimeError::TermTableParse(msg) => assert!(msg.starts_with("line 2"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(SolarTermTable::parse("1986-04-05 10:06:12 monsoon").is_err());
        assert!(SolarTermTable::parse("1986-03-21 06:03:00 chunfen").is_err());
    }
}
