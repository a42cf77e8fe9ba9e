//! Field name matching between two extracted type definitions.

use rapidfuzz::distance::levenshtein;

use crate::extract::FieldDecl;

/// Fuzzy candidates must be strictly closer than this edit distance.
pub const MAX_EDIT_DISTANCE: usize = 3;

/// How a candidate target field was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Same name ignoring case.
    Exact,
    /// Case-sensitive Levenshtein distance below [`MAX_EDIT_DISTANCE`].
    Fuzzy { distance: usize },
}

/// A proposed source to target field correspondence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: FieldDecl,
    pub target: FieldDecl,
    pub kind: MatchKind,
}

/// Candidates for every source field, in source declaration order.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub candidates: Vec<Candidate>,
    /// Source fields with no target within reach.
    pub unmatched: Vec<FieldDecl>,
}

/// Proposes a target for each source field.
///
/// Targets are never consumed, so two source fields may be offered the same
/// target field.
pub fn match_fields(sources: &[FieldDecl], targets: &[FieldDecl]) -> MatchResult {
    let mut result = MatchResult::default();
    for source in sources {
        match best_match(&source.name, targets) {
            Some((target, kind)) => result.candidates.push(Candidate {
                source: source.clone(),
                target: target.clone(),
                kind,
            }),
            None => result.unmatched.push(source.clone()),
        }
    }
    result
}

/// Best target for one source field name.
///
/// The first target equal to `name` ignoring case wins outright. Otherwise
/// the closest target under [`MAX_EDIT_DISTANCE`] is chosen; on equal
/// distance the earlier target is kept.
pub fn best_match<'a>(name: &str, targets: &'a [FieldDecl]) -> Option<(&'a FieldDecl, MatchKind)> {
    let mut best: Option<(&FieldDecl, usize)> = None;
    for target in targets {
        if eq_ignore_case(name, &target.name) {
            return Some((target, MatchKind::Exact));
        }
        let distance = levenshtein::distance(name.chars(), target.name.chars());
        if distance < MAX_EDIT_DISTANCE && best.is_none_or(|(_, current)| distance < current) {
            best = Some((target, distance));
        }
    }
    best.map(|(target, distance)| (target, MatchKind::Fuzzy { distance }))
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
