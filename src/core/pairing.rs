use std::collections::HashSet;
use crate::models::{Profile, ProfileId};

/// Unordered pair of profile ids, smaller id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(ProfileId, ProfileId);

impl PairKey {
    pub fn new(a: ProfileId, b: ProfileId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    pub fn ids(&self) -> (ProfileId, ProfileId) {
        (self.0, self.1)
    }
}

/// A candidate pair borrowed from the population
#[derive(Debug, Clone, Copy)]
pub struct CandidatePair<'a> {
    pub a: &'a Profile,
    pub b: &'a Profile,
}

impl CandidatePair<'_> {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.a.id, self.b.id)
    }
}

/// Enumerate every unordered pair of the population exactly once
///
/// Profiles at index i are paired only with profiles at index > i, in
/// population order. Pairs whose ids were already seen (duplicate records)
/// and pairs of a profile with itself are skipped.
pub fn unordered_pairs(profiles: &[Profile]) -> Vec<CandidatePair<'_>> {
    let mut processed: HashSet<PairKey> = HashSet::new();
    let mut pairs = Vec::with_capacity(profiles.len() * profiles.len().saturating_sub(1) / 2);

    for (i, a) in profiles.iter().enumerate() {
        for b in &profiles[i + 1..] {
            if a.id == b.id {
                continue;
            }
            if processed.insert(PairKey::new(a.id, b.id)) {
                pairs.push(CandidatePair { a, b });
            }
        }
    }

    tracing::debug!("Generated {} candidate pairs from {} profiles", pairs.len(), profiles.len());
    pairs
}

/// Pair a single target with every other profile in the population
///
/// The target is always profile A.
pub fn pairs_for_target<'a>(target: &'a Profile, profiles: &'a [Profile]) -> Vec<CandidatePair<'a>> {
    let mut processed: HashSet<PairKey> = HashSet::new();

    profiles
        .iter()
        .filter(|other| other.id != target.id)
        .filter(|other| processed.insert(PairKey::new(target.id, other.id)))
        .map(|other| CandidatePair { a: target, b: other })
        .collect()
}
