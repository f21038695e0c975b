//! Heavenly stems, earthly branches and the sexagenary (干支) cycle.
//!
//! The 60 pairs cycle continuously from 甲子 (index 0). A stem and branch
//! form a valid pair only when they share polarity.

use crate::element::{Element, Polarity};
use crate::error::BaziError;

/// The ten heavenly stems (天干).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

/// All ten stems in order (index 0 = 甲).
pub const ALL_STEMS: [Stem; 10] = [
    Stem::Jia,
    Stem::Yi,
    Stem::Bing,
    Stem::Ding,
    Stem::Wu,
    Stem::Ji,
    Stem::Geng,
    Stem::Xin,
    Stem::Ren,
    Stem::Gui,
];

const STEM_CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

impl Stem {
    /// 0-based index (甲=0 .. 癸=9).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Stem at `index` mod 10.
    pub const fn from_index(index: u8) -> Self {
        ALL_STEMS[(index % 10) as usize]
    }

    pub const fn symbol(self) -> char {
        STEM_CHARS[self as usize]
    }

    /// Recognise a stem character.
    pub fn from_symbol(c: char) -> Option<Self> {
        STEM_CHARS.iter().position(|&s| s == c).map(|i| ALL_STEMS[i])
    }

    /// Pairs of consecutive stems share an element: 甲乙 Wood .. 壬癸 Water.
    pub const fn element(self) -> Element {
        match self {
            Self::Jia | Self::Yi => Element::Wood,
            Self::Bing | Self::Ding => Element::Fire,
            Self::Wu | Self::Ji => Element::Earth,
            Self::Geng | Self::Xin => Element::Metal,
            Self::Ren | Self::Gui => Element::Water,
        }
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }
}

impl std::fmt::Display for Stem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The twelve earthly branches (地支).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// All twelve branches in order (index 0 = 子).
pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Zi,
    Branch::Chou,
    Branch::Yin,
    Branch::Mao,
    Branch::Chen,
    Branch::Si,
    Branch::Wu,
    Branch::Wei,
    Branch::Shen,
    Branch::You,
    Branch::Xu,
    Branch::Hai,
];

const BRANCH_CHARS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

impl Branch {
    /// 0-based index (子=0 .. 亥=11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Branch at `index` mod 12.
    pub const fn from_index(index: u8) -> Self {
        ALL_BRANCHES[(index % 12) as usize]
    }

    pub const fn symbol(self) -> char {
        BRANCH_CHARS[self as usize]
    }

    /// Recognise a branch character.
    pub fn from_symbol(c: char) -> Option<Self> {
        BRANCH_CHARS.iter().position(|&b| b == c).map(|i| ALL_BRANCHES[i])
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Yin | Self::Mao => Element::Wood,
            Self::Si | Self::Wu => Element::Fire,
            Self::Chen | Self::Xu | Self::Chou | Self::Wei => Element::Earth,
            Self::Shen | Self::You => Element::Metal,
            Self::Hai | Self::Zi => Element::Water,
        }
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }

    /// Hidden stems (藏干).
    pub const fn hidden_stems(self) -> &'static [Stem] {
        use Stem::*;
        match self {
            Self::Zi => &[Gui],
            Self::Chou => &[Ji, Gui, Xin],
            Self::Yin => &[Jia, Bing, Wu],
            Self::Mao => &[Yi],
            Self::Chen => &[Wu, Yi, Gui],
            Self::Si => &[Bing, Geng, Wu],
            Self::Wu => &[Ding, Ji],
            Self::Wei => &[Ji, Ding, Yi],
            Self::Shen => &[Geng, Ren, Wu],
            Self::You => &[Xin],
            Self::Xu => &[Xin, Ding, Wu],
            Self::Hai => &[Ren, Jia],
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Nayin (纳音) names, one per consecutive pair of the cycle.
const NAYIN_NAMES: [&str; 30] = [
    "海中金", "炉中火", "大林木", "路旁土", "剑锋金", "山头火", "涧下水", "城头土", "白蜡金", "杨柳木",
    "泉中水", "屋上土", "霹雳火", "松柏木", "长流水", "沙中金", "山下火", "平地木", "壁上土", "金箔金",
    "覆灯火", "天河水", "大驿土", "钗钏金", "桑柘木", "大溪水", "沙中土", "天上火", "石榴木", "大海水",
];

/// A stem-branch pair of the sexagenary cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GanZhi {
    pub stem: Stem,
    pub branch: Branch,
}

impl GanZhi {
    /// Pair a stem and a branch; `None` when their polarities differ.
    pub fn new(stem: Stem, branch: Branch) -> Option<Self> {
        if stem.polarity() == branch.polarity() {
            Some(Self { stem, branch })
        } else {
            None
        }
    }

    /// Pair at `index` of the cycle (mod 60).
    pub const fn from_index(index: u8) -> Self {
        let i = index % 60;
        Self {
            stem: Stem::from_index(i % 10),
            branch: Branch::from_index(i % 12),
        }
    }

    /// Sexagenary index (甲子=0 .. 癸亥=59).
    ///
    /// Solves index = stem (mod 10), index = branch (mod 12).
    pub const fn index(self) -> u8 {
        let raw = 6 * self.stem.index() as i16 - 5 * self.branch.index() as i16;
        raw.rem_euclid(60) as u8
    }

    /// Step `delta` positions along the cycle, wrapping in both directions.
    pub fn offset(self, delta: i64) -> Self {
        Self::from_index((i64::from(self.index()) + delta).rem_euclid(60) as u8)
    }

    /// Pair for a Gregorian sexagenary year: 4 CE is 甲子.
    pub fn for_year(year: i32) -> Self {
        Self::from_index((i64::from(year) - 4).rem_euclid(60) as u8)
    }

    /// Parse a two-symbol pillar such as `庚辰`.
    ///
    /// Symbols beyond the first two are rejected.
    pub fn parse(text: &str) -> Result<Self, BaziError> {
        let mut chars = text.trim().chars();
        let (Some(s), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(BaziError::MalformedInput(format!(
                "pillar {text:?} must be exactly one stem and one branch"
            )));
        };
        let stem = Stem::from_symbol(s)
            .ok_or_else(|| BaziError::MalformedInput(format!("{s:?} is not a heavenly stem")))?;
        let branch = Branch::from_symbol(b)
            .ok_or_else(|| BaziError::MalformedInput(format!("{b:?} is not an earthly branch")))?;
        Self::new(stem, branch).ok_or_else(|| {
            BaziError::MalformedInput(format!("{s}{b} mixes yin and yang; not a sexagenary pair"))
        })
    }

    /// Nayin label.
    pub fn nayin(self) -> &'static str {
        NAYIN_NAMES[(self.index() / 2) as usize]
    }

    /// First pair of this pair's ten-day xun (always a 甲 stem).
    pub fn xun_head(self) -> Self {
        Self::from_index(self.index() - self.stem.index())
    }

    /// The two branches the xun leaves uncovered (空亡).
    pub fn void_branches(self) -> [Branch; 2] {
        let first = (self.branch.index() + 12 - self.stem.index() + 10) % 12;
        [Branch::from_index(first), Branch::from_index(first + 1)]
    }
}

impl std::fmt::Display for GanZhi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}
