//! Day-master strength after Wei Qianli (韦千里).
//!
//! Three signals feed an eight-way level table:
//! - whether the day master commands the season (得令)
//! - whether it is rooted on the year, day or hour branch (得地)
//! - the seasonally weighted balance of allied against opposed elements
//!
//! Weighted comparisons are exact integer ratios (x10), so `a >= 1.1 * b`
//! is evaluated as `10a >= 11b`.

use tracing::debug;

use crate::chart::{Chart, PillarPosition};
use crate::element::{ALL_ELEMENTS, Element};
use crate::ganzhi::{Branch, Stem};
use crate::season::{Season, StatusRank};
use crate::twelve_stages::{TwelveStage, twelve_stage};

/// Element occurrences over the four stems and every hidden stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementCounts([u32; 5]);

impl ElementCounts {
    /// Count a chart's stems and the hidden stems of its branches.
    pub fn of_chart(chart: &Chart) -> Self {
        let mut counts = [0u32; 5];
        for stem in chart.stems() {
            counts[stem.element().index() as usize] += 1;
        }
        for branch in chart.branches() {
            for hidden in branch.hidden_stems() {
                counts[hidden.element().index() as usize] += 1;
            }
        }
        Self(counts)
    }

    pub const fn get(&self, element: Element) -> u32 {
        self.0[element.index() as usize]
    }

    /// (element, count) pairs in generate-cycle order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        ALL_ELEMENTS.iter().map(|&e| (e, self.get(e)))
    }
}

/// One element inside a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionMember {
    pub element: Element,
    pub count: u32,
    pub status: StatusRank,
}

/// A group of elements with its raw and seasonally weighted totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub members: Vec<PartitionMember>,
    pub count: u32,
    pub weighted: u32,
}

impl Partition {
    fn new(elements: &[Element], counts: &ElementCounts, season: Season) -> Self {
        let members: Vec<PartitionMember> = elements
            .iter()
            .map(|&element| PartitionMember {
                element,
                count: counts.get(element),
                status: season.status_of(element),
            })
            .collect();
        let count = members.iter().map(|m| m.count).sum();
        let weighted = members.iter().map(|m| m.count * m.status.weight()).sum();
        Self {
            members,
            count,
            weighted,
        }
    }

    pub fn elements(&self) -> Vec<Element> {
        self.members.iter().map(|m| m.element).collect()
    }
}

/// Coarse lean of the weighted balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bias {
    LeaningStrong,
    LeaningWeak,
    Balanced,
}

impl Bias {
    pub const fn name(self) -> &'static str {
        match self {
            Self::LeaningStrong => "偏强",
            Self::LeaningWeak => "偏弱",
            Self::Balanced => "平和",
        }
    }
}

/// Eight-way strength level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrengthLevel {
    Strongest,
    ModeratelyStrong,
    SlightlyStrong,
    Balanced,
    LeaningWeak,
    SlightlyWeak,
    ModeratelyWeak,
    Weakest,
}

impl StrengthLevel {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strongest => "最强",
            Self::ModeratelyStrong => "中强",
            Self::SlightlyStrong => "次强",
            Self::Balanced => "中和",
            Self::LeaningWeak => "偏弱",
            Self::SlightlyWeak => "次弱",
            Self::ModeratelyWeak => "中弱",
            Self::Weakest => "最弱",
        }
    }
}

/// Level from the four boolean signals.
///
/// Multi-support wins over multi-hostile; the root only matters when
/// neither applies.
pub const fn strength_level(
    commands_season: bool,
    multi_support: bool,
    multi_hostile: bool,
    rooted: bool,
) -> StrengthLevel {
    match (commands_season, multi_support, multi_hostile, rooted) {
        (true, true, _, _) => StrengthLevel::Strongest,
        (true, false, true, _) => StrengthLevel::ModeratelyWeak,
        (true, false, false, false) => StrengthLevel::SlightlyWeak,
        (true, false, false, true) => StrengthLevel::Balanced,
        (false, true, _, _) => StrengthLevel::ModeratelyStrong,
        (false, false, true, _) => StrengthLevel::Weakest,
        (false, false, false, true) => StrengthLevel::SlightlyStrong,
        (false, false, false, false) => StrengthLevel::LeaningWeak,
    }
}

/// Why the favourable elements were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavourRationale {
    /// Weak day master: prop it up with companions and resources.
    Support,
    /// Strong day master: drain it through output and wealth.
    Drain,
    /// Balanced: no strong preference.
    Neutral,
}

/// Favourable (喜用) and unfavourable (忌) elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavourableElements {
    pub rationale: FavourRationale,
    pub favourable: Vec<Element>,
    pub unfavourable: Vec<Element>,
}

/// Full strength record for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthAssessment {
    pub day_master: Stem,
    pub element: Element,
    pub month_branch: Branch,
    pub season: Season,
    pub status: StatusRank,
    pub commands_season: bool,
    /// Day master's stage on the year, day and hour branches.
    pub root_stages: [(PillarPosition, TwelveStage); 3],
    pub rooted: bool,
    pub counts: ElementCounts,
    /// Day master element, then its mother.
    pub allied: Partition,
    /// Its controller, what it controls, then its child.
    pub opposed: Partition,
    pub multi_support: bool,
    pub multi_hostile: bool,
    pub bias: Bias,
    pub level: StrengthLevel,
    pub status_map: [(Element, StatusRank); 5],
}

const ROOT_POSITIONS: [PillarPosition; 3] =
    [PillarPosition::Year, PillarPosition::Day, PillarPosition::Hour];

/// Assess the day master's strength.
pub fn assess(chart: &Chart) -> StrengthAssessment {
    let day_master = chart.day_master();
    let element = day_master.element();
    let month_branch = chart.month().branch;
    let season = Season::from_month_branch(month_branch);
    let status = season.status_of(element);
    let commands_season = status.commands_season();

    let root_stages =
        ROOT_POSITIONS.map(|pos| (pos, twelve_stage(day_master, chart.pillar(pos).branch)));
    let rooted = root_stages.iter().any(|(_, stage)| stage.is_root());

    let counts = ElementCounts::of_chart(chart);
    let allied = Partition::new(&[element, element.generated_by()], &counts, season);
    let opposed = Partition::new(
        &[element.overcome_by(), element.overcomes(), element.generates()],
        &counts,
        season,
    );

    let (a, o) = (u64::from(allied.weighted), u64::from(opposed.weighted));
    // A zero denominator counts as satisfied.
    let multi_support = o == 0 || a * 10 >= o * 12;
    let multi_hostile = a == 0 || o * 10 >= a * 12;
    let bias = if a * 10 >= o * 11 {
        Bias::LeaningStrong
    } else if o * 10 >= a * 11 {
        Bias::LeaningWeak
    } else {
        Bias::Balanced
    };

    let level = strength_level(commands_season, multi_support, multi_hostile, rooted);
    debug!(
        %day_master,
        allied = a,
        opposed = o,
        commands_season,
        rooted,
        multi_support,
        multi_hostile,
        bias = bias.name(),
        level = level.name(),
        "assessed strength"
    );

    StrengthAssessment {
        day_master,
        element,
        month_branch,
        season,
        status,
        commands_season,
        root_stages,
        rooted,
        counts,
        allied,
        opposed,
        multi_support,
        multi_hostile,
        bias,
        level,
        status_map: season.status_map(),
    }
}

impl StrengthAssessment {
    /// Favourable elements for this assessment's bias.
    pub fn favourable(&self) -> FavourableElements {
        let dm = self.element;
        match self.bias {
            Bias::LeaningWeak => FavourableElements {
                rationale: FavourRationale::Support,
                favourable: self.allied.elements(),
                unfavourable: self.opposed.elements(),
            },
            Bias::LeaningStrong => FavourableElements {
                rationale: FavourRationale::Drain,
                favourable: vec![dm.generates(), dm.overcomes()],
                unfavourable: self.allied.elements(),
            },
            Bias::Balanced => FavourableElements {
                rationale: FavourRationale::Neutral,
                favourable: vec![dm],
                unfavourable: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> StrengthAssessment {
        assess(&Chart::parse("丙寅 壬辰 庚辰 丙子").unwrap())
    }

    #[test]
    fn reference_season_and_status() {
        let s = reference();
        assert_eq!(s.day_master, Stem::Geng);
        assert_eq!(s.element, Element::Metal);
        assert_eq!(s.month_branch, Branch::Chen);
        assert_eq!(s.season, Season::Spring);
        assert_eq!(s.status, StatusRank::Confined);
        assert!(!s.commands_season);
    }

    #[test]
    fn reference_roots() {
        let s = reference();
        let stages: Vec<_> = s.root_stages.iter().map(|(_, st)| *st).collect();
        assert_eq!(stages, vec![TwelveStage::Jue, TwelveStage::Yang, TwelveStage::Si]);
        assert!(!s.rooted);
    }

    #[test]
    fn reference_counts_and_partitions() {
        let s = reference();
        assert_eq!(s.counts.get(Element::Wood), 3);
        assert_eq!(s.counts.get(Element::Fire), 3);
        assert_eq!(s.counts.get(Element::Earth), 3);
        assert_eq!(s.counts.get(Element::Metal), 1);
        assert_eq!(s.counts.get(Element::Water), 4);

        assert_eq!(s.allied.elements(), vec![Element::Metal, Element::Earth]);
        assert_eq!(s.allied.count, 4);
        assert_eq!(s.allied.weighted, 5);
        assert_eq!(
            s.opposed.elements(),
            vec![Element::Fire, Element::Wood, Element::Water]
        );
        assert_eq!(s.opposed.count, 10);
        assert_eq!(s.opposed.weighted, 39);
    }

    #[test]
    fn reference_verdict() {
        let s = reference();
        assert!(!s.multi_support);
        assert!(s.multi_hostile);
        assert_eq!(s.bias, Bias::LeaningWeak);
        assert_eq!(s.level, StrengthLevel::Weakest);

        let fav = s.favourable();
        assert_eq!(fav.rationale, FavourRationale::Support);
        assert_eq!(fav.favourable, vec![Element::Metal, Element::Earth]);
        assert_eq!(
            fav.unfavourable,
            vec![Element::Fire, Element::Wood, Element::Water]
        );
    }

    #[test]
    fn level_table_is_total() {
        let mut seen = std::collections::HashSet::new();
        for bits in 0u8..16 {
            let level = strength_level(bits & 8 != 0, bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
            seen.insert(level);
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn level_table_rows() {
        use StrengthLevel::*;
        assert_eq!(strength_level(true, true, true, false), Strongest);
        assert_eq!(strength_level(true, false, true, true), ModeratelyWeak);
        assert_eq!(strength_level(true, false, false, false), SlightlyWeak);
        assert_eq!(strength_level(true, false, false, true), Balanced);
        assert_eq!(strength_level(false, true, false, false), ModeratelyStrong);
        assert_eq!(strength_level(false, false, true, true), Weakest);
        assert_eq!(strength_level(false, false, false, true), SlightlyStrong);
        assert_eq!(strength_level(false, false, false, false), LeaningWeak);
    }

    #[test]
    fn strong_metal_in_autumn() {
        // 庚申 month 酉: Metal dominant, rooted on 申.
        let s = assess(&Chart::parse("庚申 乙酉 庚申 辛巳").unwrap());
        assert_eq!(s.season, Season::Autumn);
        assert!(s.commands_season);
        assert!(s.rooted);
        assert_eq!(s.bias, Bias::LeaningStrong);
        assert_eq!(s.level, StrengthLevel::Strongest);
        let fav = s.favourable();
        assert_eq!(fav.rationale, FavourRationale::Drain);
        assert_eq!(fav.favourable, vec![Element::Water, Element::Wood]);
        assert_eq!(fav.unfavourable, vec![Element::Metal, Element::Earth]);
    }

    #[test]
    fn no_opposed_elements_counts_as_multi_support() {
        // Metal and Earth only: 辛 x2 + 酉 x4 hidden 辛, 己 x2.
        let s = assess(&Chart::parse("己酉 辛酉 辛酉 己酉").unwrap());
        assert_eq!(s.allied.weighted, 36);
        assert_eq!((s.opposed.count, s.opposed.weighted), (0, 0));
        assert!(s.multi_support);
        assert!(!s.multi_hostile);
        assert_eq!(s.bias, Bias::LeaningStrong);
        assert_eq!(s.level, StrengthLevel::Strongest);
    }

    #[test]
    fn balanced_within_ratio_band() {
        // Summer 甲: Wood 2 (休) + Water 4 (囚) = 14 against Earth 1 (相) + Fire 2 (旺) = 14.
        let s = assess(&Chart::parse("壬子 丙午 甲子 甲子").unwrap());
        assert_eq!((s.allied.count, s.allied.weighted), (6, 14));
        assert_eq!((s.opposed.count, s.opposed.weighted), (3, 14));
        assert!(!s.multi_support);
        assert!(!s.multi_hostile);
        assert_eq!(s.bias, Bias::Balanced);

        let fav = s.favourable();
        assert_eq!(fav.rationale, FavourRationale::Neutral);
        assert_eq!(fav.favourable, vec![Element::Wood]);
        assert!(fav.unfavourable.is_empty());
    }

    #[test]
    fn month_branch_root_does_not_count() {
        // 甲 is 帝旺 on the 卯 month branch but has no root on 子 or 午.
        let chart = Chart::parse("丙子 丁卯 甲午 庚午").unwrap();
        assert_eq!(twelve_stage(Stem::Jia, chart.month().branch), TwelveStage::DiWang);
        let s = assess(&chart);
        assert_eq!(
            s.root_stages.map(|(pos, _)| pos),
            [PillarPosition::Year, PillarPosition::Day, PillarPosition::Hour]
        );
        assert!(s.root_stages.iter().all(|(_, stage)| !stage.is_root()));
        assert!(!s.rooted);
    }

    #[test]
    fn counts_cover_every_symbol() {
        let chart = Chart::parse("丙寅 壬辰 庚辰 丙子").unwrap();
        let total: u32 = ElementCounts::of_chart(&chart).iter().map(|(_, n)| n).sum();
        let hidden: usize = chart.branches().iter().map(|b| b.hidden_stems().len()).sum();
        assert_eq!(total as usize, 4 + hidden);
    }
}
