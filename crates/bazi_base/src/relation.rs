//! Five-phase relations: day-master centred categories, neutral directional
//! relations, and the chart-wide flow report built from them.

use crate::chart::{ALL_POSITIONS, Chart, PillarPosition};
use crate::element::Element;
use crate::ganzhi::{Branch, Stem};

/// How another element stands relative to the day master's element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationCategory {
    /// Same element (帮).
    Same,
    /// The other element generates the day master (生).
    GeneratedBy,
    /// The day master generates the other element (泄).
    Generates,
    /// The day master overcomes the other element (耗).
    Overcomes,
    /// The other element overcomes the day master (克).
    OvercomeBy,
}

impl RelationCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Same => "帮",
            Self::GeneratedBy => "生",
            Self::Generates => "泄",
            Self::Overcomes => "耗",
            Self::OvercomeBy => "克",
        }
    }

    /// Flow group this category falls into.
    pub const fn group(self) -> FlowGroup {
        match self {
            Self::Same | Self::GeneratedBy => FlowGroup::Assist,
            Self::Generates => FlowGroup::Drain,
            Self::Overcomes | Self::OvercomeBy => FlowGroup::Hinder,
        }
    }
}

/// Classify `other` against the day master element `day`.
pub const fn classify(day: Element, other: Element) -> RelationCategory {
    use Element::*;
    use RelationCategory::*;
    match (day, other) {
        (Wood, Wood) => Same,
        (Wood, Water) => GeneratedBy,
        (Wood, Fire) => Generates,
        (Wood, Earth) => Overcomes,
        (Wood, Metal) => OvercomeBy,

        (Fire, Fire) => Same,
        (Fire, Wood) => GeneratedBy,
        (Fire, Earth) => Generates,
        (Fire, Metal) => Overcomes,
        (Fire, Water) => OvercomeBy,

        (Earth, Earth) => Same,
        (Earth, Fire) => GeneratedBy,
        (Earth, Metal) => Generates,
        (Earth, Water) => Overcomes,
        (Earth, Wood) => OvercomeBy,

        (Metal, Metal) => Same,
        (Metal, Earth) => GeneratedBy,
        (Metal, Water) => Generates,
        (Metal, Wood) => Overcomes,
        (Metal, Fire) => OvercomeBy,

        (Water, Water) => Same,
        (Water, Metal) => GeneratedBy,
        (Water, Wood) => Generates,
        (Water, Fire) => Overcomes,
        (Water, Earth) => OvercomeBy,
    }
}

/// Relation between two entities where neither side is privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionalRelation {
    Same,
    AGeneratesB,
    BGeneratesA,
    AOvercomesB,
    BOvercomesA,
}

impl DirectionalRelation {
    /// Verb joining the two sides: 同, 生 or 克.
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Same => "同",
            Self::AGeneratesB | Self::BGeneratesA => "生",
            Self::AOvercomesB | Self::BOvercomesA => "克",
        }
    }

    /// Whether side B acts on side A.
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::BGeneratesA | Self::BOvercomesA)
    }
}

/// Directional relation from `a`'s point of view.
pub const fn describe(a: Element, b: Element) -> DirectionalRelation {
    match classify(a, b) {
        RelationCategory::Same => DirectionalRelation::Same,
        RelationCategory::Generates => DirectionalRelation::AGeneratesB,
        RelationCategory::GeneratedBy => DirectionalRelation::BGeneratesA,
        RelationCategory::Overcomes => DirectionalRelation::AOvercomesB,
        RelationCategory::OvercomeBy => DirectionalRelation::BOvercomesA,
    }
}

/// Coarse grouping of relation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowGroup {
    /// Same or GeneratedBy (助力).
    Assist,
    /// Generates (疏泄).
    Drain,
    /// Overcomes or OvercomeBy (受阻).
    Hinder,
}

/// What a flow entry was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSource {
    Stem(PillarPosition, Stem),
    Branch(PillarPosition, Branch),
    Hidden(PillarPosition, Branch, Stem),
}

impl FlowSource {
    pub const fn element(self) -> Element {
        match self {
            Self::Stem(_, s) | Self::Hidden(_, _, s) => s.element(),
            Self::Branch(_, b) => b.element(),
        }
    }

    pub const fn position(self) -> PillarPosition {
        match self {
            Self::Stem(p, _) | Self::Branch(p, _) | Self::Hidden(p, _, _) => p,
        }
    }
}

/// One chart entity compared against the day master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEntry {
    pub source: FlowSource,
    /// Day master is side A.
    pub direction: DirectionalRelation,
    pub category: RelationCategory,
}

impl FlowEntry {
    fn against(day: Element, source: FlowSource) -> Self {
        let other = source.element();
        Self {
            source,
            direction: describe(day, other),
            category: classify(day, other),
        }
    }
}

/// Per-position categories of the stem, branch and hidden stems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionFlow {
    pub position: PillarPosition,
    pub stem: (Stem, RelationCategory),
    pub branch: (Branch, RelationCategory),
    pub hidden: Vec<(Stem, RelationCategory)>,
}

/// Chart-wide generate/overcome report centred on the day master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFlow {
    pub day_master: Stem,
    /// Each pillar's branch (side A) against its own stem.
    pub pillar_internal: [(PillarPosition, DirectionalRelation); 4],
    /// Year, month and hour stems.
    pub stems: Vec<FlowEntry>,
    /// Year, month and hour branches.
    pub branches: Vec<FlowEntry>,
    /// Every hidden stem of all four branches.
    pub hidden: Vec<FlowEntry>,
    pub positions: [PositionFlow; 4],
}

impl ChartFlow {
    /// All entries in report order: stems, branches, hidden stems.
    pub fn entries(&self) -> impl Iterator<Item = &FlowEntry> {
        self.stems.iter().chain(&self.branches).chain(&self.hidden)
    }

    /// Entries in `group`, preserving report order.
    pub fn group(&self, group: FlowGroup) -> Vec<FlowEntry> {
        self.entries()
            .filter(|e| e.category.group() == group)
            .copied()
            .collect()
    }
}

const OTHER_POSITIONS: [PillarPosition; 3] =
    [PillarPosition::Year, PillarPosition::Month, PillarPosition::Hour];

/// Build the flow report for `chart`.
pub fn chart_flow(chart: &Chart) -> ChartFlow {
    let day_master = chart.day_master();
    let day = day_master.element();

    let pillar_internal = ALL_POSITIONS.map(|pos| {
        let p = chart.pillar(pos);
        (pos, describe(p.branch.element(), p.stem.element()))
    });

    let stems = OTHER_POSITIONS
        .iter()
        .map(|&pos| FlowEntry::against(day, FlowSource::Stem(pos, chart.pillar(pos).stem)))
        .collect();
    let branches = OTHER_POSITIONS
        .iter()
        .map(|&pos| FlowEntry::against(day, FlowSource::Branch(pos, chart.pillar(pos).branch)))
        .collect();
    let hidden = ALL_POSITIONS
        .iter()
        .flat_map(|&pos| {
            let branch = chart.pillar(pos).branch;
            branch
                .hidden_stems()
                .iter()
                .map(move |&s| FlowEntry::against(day, FlowSource::Hidden(pos, branch, s)))
        })
        .collect();

    let positions = ALL_POSITIONS.map(|pos| {
        let p = chart.pillar(pos);
        PositionFlow {
            position: pos,
            stem: (p.stem, classify(day, p.stem.element())),
            branch: (p.branch, classify(day, p.branch.element())),
            hidden: p
                .branch
                .hidden_stems()
                .iter()
                .map(|&s| (s, classify(day, s.element())))
                .collect(),
        }
    });

    ChartFlow {
        day_master,
        pillar_internal,
        stems,
        branches,
        hidden,
        positions,
    }
}
