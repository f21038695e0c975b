//! Seasons and the five seasonal status ranks (旺相休囚死).

use crate::element::Element;
use crate::ganzhi::Branch;

/// Season selected by the month branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// 寅卯辰 Spring, 巳午未 Summer, 申酉戌 Autumn, 亥子丑 Winter.
    pub const fn from_month_branch(branch: Branch) -> Self {
        match branch {
            Branch::Yin | Branch::Mao | Branch::Chen => Self::Spring,
            Branch::Si | Branch::Wu | Branch::Wei => Self::Summer,
            Branch::Shen | Branch::You | Branch::Xu => Self::Autumn,
            Branch::Hai | Branch::Zi | Branch::Chou => Self::Winter,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "春",
            Self::Summer => "夏",
            Self::Autumn => "秋",
            Self::Winter => "冬",
        }
    }

    /// Elements ordered Dominant, Supported, Resting, Confined, Deceased.
    pub const fn status_order(self) -> [Element; 5] {
        use Element::*;
        match self {
            Self::Spring => [Wood, Fire, Water, Metal, Earth],
            Self::Summer => [Fire, Earth, Wood, Water, Metal],
            Self::Autumn => [Metal, Water, Earth, Fire, Wood],
            Self::Winter => [Water, Wood, Metal, Earth, Fire],
        }
    }

    /// The element at its peak this season.
    pub const fn dominant(self) -> Element {
        self.status_order()[0]
    }

    /// Status rank of `element` in this season.
    ///
    /// Relative to the dominant element: its child is Supported, its mother
    /// Resting, its controller Confined and what it controls Deceased.
    pub fn status_of(self, element: Element) -> StatusRank {
        let d = self.dominant();
        if element == d {
            StatusRank::Dominant
        } else if element == d.generates() {
            StatusRank::Supported
        } else if element == d.generated_by() {
            StatusRank::Resting
        } else if element == d.overcome_by() {
            StatusRank::Confined
        } else {
            StatusRank::Deceased
        }
    }

    /// Full element → status map, in generate-cycle order of elements.
    pub fn status_map(self) -> [(Element, StatusRank); 5] {
        crate::element::ALL_ELEMENTS.map(|e| (e, self.status_of(e)))
    }
}

/// Seasonal status of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusRank {
    Deceased = 1,
    Confined = 2,
    Resting = 3,
    Supported = 4,
    Dominant = 5,
}

/// Ranks from strongest to weakest.
pub const ALL_STATUS_RANKS: [StatusRank; 5] = [
    StatusRank::Dominant,
    StatusRank::Supported,
    StatusRank::Resting,
    StatusRank::Confined,
    StatusRank::Deceased,
];

impl StatusRank {
    /// Numeric weight, 5 (Dominant) down to 1 (Deceased).
    pub const fn weight(self) -> u32 {
        self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dominant => "旺",
            Self::Supported => "相",
            Self::Resting => "休",
            Self::Confined => "囚",
            Self::Deceased => "死",
        }
    }

    /// Dominant or Supported: the element commands the season (得令).
    pub const fn commands_season(self) -> bool {
        matches!(self, Self::Dominant | Self::Supported)
    }
}
