//! Twelve life stages (十二长生) of a stem across the branches.
//!
//! Yang stems advance through the branches from their 长生 branch; yin
//! stems walk the branches backwards from theirs.

use crate::element::Polarity;
use crate::ganzhi::{Branch, Stem};

/// One of the twelve stages, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwelveStage {
    ChangSheng,
    MuYu,
    GuanDai,
    LinGuan,
    DiWang,
    Shuai,
    Bing,
    Si,
    Mu,
    Jue,
    Tai,
    Yang,
}

/// All twelve stages in cycle order (index 0 = 长生).
pub const ALL_TWELVE_STAGES: [TwelveStage; 12] = [
    TwelveStage::ChangSheng,
    TwelveStage::MuYu,
    TwelveStage::GuanDai,
    TwelveStage::LinGuan,
    TwelveStage::DiWang,
    TwelveStage::Shuai,
    TwelveStage::Bing,
    TwelveStage::Si,
    TwelveStage::Mu,
    TwelveStage::Jue,
    TwelveStage::Tai,
    TwelveStage::Yang,
];

impl TwelveStage {
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ChangSheng => "长生",
            Self::MuYu => "沐浴",
            Self::GuanDai => "冠带",
            Self::LinGuan => "临官",
            Self::DiWang => "帝旺",
            Self::Shuai => "衰",
            Self::Bing => "病",
            Self::Si => "死",
            Self::Mu => "墓",
            Self::Jue => "绝",
            Self::Tai => "胎",
            Self::Yang => "养",
        }
    }

    /// 长生, 临官 or 帝旺: the stem takes root in the branch.
    pub const fn is_root(self) -> bool {
        matches!(self, Self::ChangSheng | Self::LinGuan | Self::DiWang)
    }
}

impl std::fmt::Display for TwelveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Branch where `stem` is at 长生.
pub const fn birth_branch(stem: Stem) -> Branch {
    match stem {
        Stem::Jia => Branch::Hai,
        Stem::Bing | Stem::Wu => Branch::Yin,
        Stem::Geng => Branch::Si,
        Stem::Ren => Branch::Shen,
        Stem::Yi => Branch::Wu,
        Stem::Ding | Stem::Ji => Branch::You,
        Stem::Xin => Branch::Zi,
        Stem::Gui => Branch::Mao,
    }
}

/// Stage of `stem` on `branch`.
pub fn twelve_stage(stem: Stem, branch: Branch) -> TwelveStage {
    let start = birth_branch(stem).index();
    let b = branch.index();
    let steps = match stem.polarity() {
        Polarity::Yang => (b + 12 - start) % 12,
        Polarity::Yin => (start + 12 - b) % 12,
    };
    ALL_TWELVE_STAGES[steps as usize]
}
