//! Ten gods (十神): a stem's role relative to the day master.

use crate::ganzhi::Stem;
use crate::relation::{RelationCategory, classify};

/// Label shown for the day master's own stem.
pub const DAY_MASTER_LABEL: &str = "日主";

/// The ten roles a stem can play against the day master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenGod {
    Companion,
    RobWealth,
    EatingGod,
    HurtingOfficer,
    IndirectWealth,
    DirectWealth,
    SevenKillings,
    DirectOfficer,
    IndirectResource,
    DirectResource,
}

/// All ten gods in traditional order.
pub const ALL_TEN_GODS: [TenGod; 10] = [
    TenGod::Companion,
    TenGod::RobWealth,
    TenGod::EatingGod,
    TenGod::HurtingOfficer,
    TenGod::IndirectWealth,
    TenGod::DirectWealth,
    TenGod::SevenKillings,
    TenGod::DirectOfficer,
    TenGod::IndirectResource,
    TenGod::DirectResource,
];

impl TenGod {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Companion => "比肩",
            Self::RobWealth => "劫财",
            Self::EatingGod => "食神",
            Self::HurtingOfficer => "伤官",
            Self::IndirectWealth => "偏财",
            Self::DirectWealth => "正财",
            Self::SevenKillings => "七杀",
            Self::DirectOfficer => "正官",
            Self::IndirectResource => "偏印",
            Self::DirectResource => "正印",
        }
    }
}

impl std::fmt::Display for TenGod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of `other` relative to `day_master`.
///
/// The relation category picks the pair; matching polarity picks the
/// first of each pair (比肩 食神 偏财 七杀 偏印).
pub fn ten_god(day_master: Stem, other: Stem) -> TenGod {
    let same_polarity = day_master.polarity() == other.polarity();
    match (classify(day_master.element(), other.element()), same_polarity) {
        (RelationCategory::Same, true) => TenGod::Companion,
        (RelationCategory::Same, false) => TenGod::RobWealth,
        (RelationCategory::Generates, true) => TenGod::EatingGod,
        (RelationCategory::Generates, false) => TenGod::HurtingOfficer,
        (RelationCategory::Overcomes, true) => TenGod::IndirectWealth,
        (RelationCategory::Overcomes, false) => TenGod::DirectWealth,
        (RelationCategory::OvercomeBy, true) => TenGod::SevenKillings,
        (RelationCategory::OvercomeBy, false) => TenGod::DirectOfficer,
        (RelationCategory::GeneratedBy, true) => TenGod::IndirectResource,
        (RelationCategory::GeneratedBy, false) => TenGod::DirectResource,
    }
}
