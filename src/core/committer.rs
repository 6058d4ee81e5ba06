use crate::core::matcher::MatchmakerError;
use crate::models::{CompatibilityScore, NewMatch, ProfileId, ReportedMatch};
use crate::services::store::MatchStore;
use std::sync::Arc;

/// A pair that passed the pre-filter and was scored
#[derive(Debug, Clone)]
pub struct ScoredPair {
    pub a: ProfileId,
    pub b: ProfileId,
    pub a_name: String,
    pub b_name: String,
    pub score: CompatibilityScore,
}

/// Matches kept by the committer
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub matches: Vec<ReportedMatch>,
    pub below_threshold: usize,
}

/// Applies the match threshold and persists qualifying pairs in one batch
#[derive(Clone)]
pub struct MatchCommitter {
    store: Arc<dyn MatchStore>,
    threshold: f64,
}

impl MatchCommitter {
    pub fn new(store: Arc<dyn MatchStore>, threshold: f64) -> Self {
        Self { store, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Keep pairs scoring at or above the threshold, in input order
    pub fn select(&self, scored: Vec<ScoredPair>) -> Selection {
        let mut selection = Selection::default();

        for pair in scored {
            if pair.score.total >= self.threshold {
                selection.matches.push(ReportedMatch {
                    record: NewMatch {
                        profile_a: pair.a,
                        profile_b: pair.b,
                        score: pair.score.total,
                        rationale: pair.score.rationale,
                    },
                    profile_a_name: pair.a_name,
                    profile_b_name: pair.b_name,
                });
            } else {
                tracing::debug!(
                    "Pair {} / {} scored {:.1}, below threshold {:.1}",
                    pair.a,
                    pair.b,
                    pair.score.total,
                    self.threshold
                );
                selection.below_threshold += 1;
            }
        }

        selection
    }

    /// Persist the selected matches as a single batch write
    ///
    /// Returns the number of matches created. A rejected batch is fatal.
    pub async fn persist(&self, matches: &[ReportedMatch]) -> Result<usize, MatchmakerError> {
        if matches.is_empty() {
            return Ok(0);
        }

        let records: Vec<NewMatch> = matches.iter().map(|m| m.record.clone()).collect();
        self.store
            .insert_matches(&records)
            .await
            .map(|written| written as usize)
            .map_err(|source| {
                tracing::error!("Failed to persist {} matches: {}", matches.len(), source);
                MatchmakerError::Persistence {
                    unpersisted: matches.len(),
                    source,
                }
            })
    }
}

impl std::fmt::Debug for MatchCommitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchCommitter")
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OracleAssessment;
    use crate::services::store::InMemoryStore;

    fn scored(a: i64, b: i64, total: f64) -> ScoredPair {
        ScoredPair {
            a,
            b,
            a_name: format!("User {}", a),
            b_name: format!("User {}", b),
            score: CompatibilityScore {
                total,
                deterministic: 30,
                oracle: OracleAssessment {
                    occupation: 0.0,
                    interests: 0.0,
                    names: 0.0,
                    personality: 0.0,
                    explanation: String::new(),
                },
                rationale: format!("{} and {}", a, b),
            },
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let committer = MatchCommitter::new(Arc::new(InMemoryStore::default()), 70.0);
        let selection = committer.select(vec![scored(1, 2, 70.0), scored(1, 3, 69.9), scored(2, 3, 95.5)]);

        assert_eq!(selection.below_threshold, 1);
        let pairs: Vec<_> = selection.matches.iter().map(|m| (m.record.profile_a, m.record.profile_b)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
        assert_eq!(selection.matches[1].record.score, 95.5);
        assert_eq!(selection.matches[1].profile_b_name, "User 3");
    }

    #[tokio::test]
    async fn test_persist_writes_one_batch() {
        let store = Arc::new(InMemoryStore::default());
        let committer = MatchCommitter::new(store.clone(), 50.0);
        let selection = committer.select(vec![scored(1, 2, 80.0), scored(3, 4, 90.0)]);

        assert_eq!(committer.persist(&selection.matches).await.unwrap(), 2);
        let stored = store.matches();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1], selection.matches[1].record);
    }

    #[tokio::test]
    async fn test_rejected_batch_reports_unpersisted_count() {
        let store = Arc::new(InMemoryStore::rejecting_writes(vec![]));
        let committer = MatchCommitter::new(store, 50.0);
        let selection = committer.select(vec![scored(1, 2, 80.0), scored(3, 4, 90.0)]);

        match committer.persist(&selection.matches).await {
            Err(MatchmakerError::Persistence { unpersisted, .. }) => assert_eq!(unpersisted, 2),
            other => panic!("expected persistence failure, got {:?}", other),
        }
    }
}
