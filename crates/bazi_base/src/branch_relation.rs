//! Pairwise branch relations (合冲刑害破) and stem five-combinations.
//!
//! All pair tables are unordered; lookups check both orders so
//! `detect(a, b) == detect(b, a)`.

use crate::chart::{ALL_POSITIONS, Chart, PillarPosition};
use crate::ganzhi::Branch::{self, *};
use crate::ganzhi::Stem;

/// A relation between two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BranchRelation {
    SelfPunishment,
    SixCombination,
    Clash,
    Punishment,
    Harm,
    Break,
}

/// Relations in reporting order.
pub const ALL_BRANCH_RELATIONS: [BranchRelation; 6] = [
    BranchRelation::SelfPunishment,
    BranchRelation::SixCombination,
    BranchRelation::Clash,
    BranchRelation::Punishment,
    BranchRelation::Harm,
    BranchRelation::Break,
];

impl BranchRelation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SelfPunishment => "自刑",
            Self::SixCombination => "六合",
            Self::Clash => "冲",
            Self::Punishment => "刑",
            Self::Harm => "害",
            Self::Break => "破",
        }
    }
}

const SELF_PUNISHMENT: [Branch; 4] = [Chen, Wu, You, Hai];

const SIX_COMBINATION: [(Branch, Branch); 6] = [
    (Zi, Chou),
    (Yin, Hai),
    (Mao, Xu),
    (Chen, You),
    (Si, Shen),
    (Wu, Wei),
];

const CLASH: [(Branch, Branch); 6] = [
    (Zi, Wu),
    (Chou, Wei),
    (Yin, Shen),
    (Mao, You),
    (Chen, Xu),
    (Si, Hai),
];

/// 无礼之刑 (子卯), 恃势之刑 (寅巳申) and 无恩之刑 (丑未戌).
const PUNISHMENT: [(Branch, Branch); 7] = [
    (Zi, Mao),
    (Yin, Si),
    (Si, Shen),
    (Shen, Yin),
    (Chou, Wei),
    (Wei, Xu),
    (Xu, Chou),
];

const HARM: [(Branch, Branch); 6] = [
    (Zi, Wei),
    (Chou, Wu),
    (Yin, Si),
    (Mao, Chen),
    (Shen, Hai),
    (You, Xu),
];

const BREAK: [(Branch, Branch); 6] = [
    (Zi, You),
    (Chou, Chen),
    (Yin, Hai),
    (Mao, Wu),
    (Si, Shen),
    (Wei, Xu),
];

fn in_table(table: &[(Branch, Branch)], a: Branch, b: Branch) -> bool {
    table
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// All relations between `a` and `b`, in reporting order.
pub fn detect(a: Branch, b: Branch) -> Vec<BranchRelation> {
    let mut out = Vec::new();
    if a == b && SELF_PUNISHMENT.contains(&a) {
        out.push(BranchRelation::SelfPunishment);
    }
    let tables: [(&[(Branch, Branch)], BranchRelation); 5] = [
        (&SIX_COMBINATION, BranchRelation::SixCombination),
        (&CLASH, BranchRelation::Clash),
        (&PUNISHMENT, BranchRelation::Punishment),
        (&HARM, BranchRelation::Harm),
        (&BREAK, BranchRelation::Break),
    ];
    for (table, relation) in tables {
        if in_table(table, a, b) {
            out.push(relation);
        }
    }
    out
}

/// Whether two stems form one of the five combinations (甲己 乙庚 丙辛 丁壬 戊癸).
pub const fn stems_combine(a: Stem, b: Stem) -> bool {
    a.index().abs_diff(b.index()) == 5
}

/// Relations found between two chart positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRelations {
    pub first: PillarPosition,
    pub second: PillarPosition,
    pub stems: (Stem, Stem),
    pub branches: (Branch, Branch),
    pub stem_combination: bool,
    pub branch_relations: Vec<BranchRelation>,
}

impl PairRelations {
    pub fn is_empty(&self) -> bool {
        !self.stem_combination && self.branch_relations.is_empty()
    }
}

/// Scan the six position pairs of `chart`, keeping pairs with any relation.
pub fn chart_relations(chart: &Chart) -> Vec<PairRelations> {
    let mut out = Vec::new();
    for (i, &first) in ALL_POSITIONS.iter().enumerate() {
        for &second in &ALL_POSITIONS[i + 1..] {
            let p = chart.pillar(first);
            let q = chart.pillar(second);
            let pair = PairRelations {
                first,
                second,
                stems: (p.stem, q.stem),
                branches: (p.branch, q.branch),
                stem_combination: stems_combine(p.stem, q.stem),
                branch_relations: detect(p.branch, q.branch),
            };
            if !pair.is_empty() {
                out.push(pair);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ganzhi::{ALL_BRANCHES, ALL_STEMS};

    #[test]
    fn chen_with_itself_is_only_self_punishment() {
        assert_eq!(detect(Chen, Chen), vec![BranchRelation::SelfPunishment]);
    }

    #[test]
    fn non_self_punishing_pair_is_empty() {
        assert!(detect(Zi, Zi).is_empty());
        assert!(detect(Yin, Yin).is_empty());
    }

    #[test]
    fn symmetric_over_all_pairs() {
        for a in ALL_BRANCHES {
            for b in ALL_BRANCHES {
                assert_eq!(detect(a, b), detect(b, a), "{a}{b}");
            }
        }
    }

    #[test]
    fn multiple_tags_in_order() {
        assert_eq!(
            detect(Si, Shen),
            vec![
                BranchRelation::SixCombination,
                BranchRelation::Punishment,
                BranchRelation::Break
            ]
        );
        assert_eq!(
            detect(Hai, Yin),
            vec![BranchRelation::SixCombination, BranchRelation::Break]
        );
        assert_eq!(
            detect(Chou, Wei),
            vec![BranchRelation::Clash, BranchRelation::Punishment]
        );
        assert_eq!(
            detect(Yin, Si),
            vec![BranchRelation::Punishment, BranchRelation::Harm]
        );
    }

    #[test]
    fn every_branch_has_one_clash_and_one_combination() {
        for a in ALL_BRANCHES {
            let clashes = ALL_BRANCHES
                .iter()
                .filter(|&&b| detect(a, b).contains(&BranchRelation::Clash))
                .count();
            let combos = ALL_BRANCHES
                .iter()
                .filter(|&&b| detect(a, b).contains(&BranchRelation::SixCombination))
                .count();
            assert_eq!((clashes, combos), (1, 1), "{a}");
        }
    }

    #[test]
    fn stem_combinations() {
        assert!(stems_combine(Stem::Jia, Stem::Ji));
        assert!(stems_combine(Stem::Gui, Stem::Wu));
        assert!(!stems_combine(Stem::Jia, Stem::Geng));
        for s in ALL_STEMS {
            let partners = ALL_STEMS.iter().filter(|&&t| stems_combine(s, t)).count();
            assert_eq!(partners, 1);
        }
    }

    #[test]
    fn reference_chart_scan() {
        let chart = Chart::parse("丙寅 壬辰 庚辰 丙子").unwrap();
        let pairs = chart_relations(&chart);
        assert_eq!(pairs.len(), 1);
        let only = &pairs[0];
        assert_eq!(
            (only.first, only.second),
            (PillarPosition::Month, PillarPosition::Day)
        );
        assert!(!only.stem_combination);
        assert_eq!(only.branch_relations, vec![BranchRelation::SelfPunishment]);
    }
}
