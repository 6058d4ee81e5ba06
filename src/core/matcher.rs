use crate::core::{
    aggregator::{Aggregator, Compatibility},
    committer::{MatchCommitter, ScoredPair},
    filters::{EligibilityPolicy, OppositeGenderSameIntent},
    pairing::{pairs_for_target, unordered_pairs, CandidatePair},
};
use crate::models::{MatchingOptions, Profile, ProfileId, RunReport};
use crate::services::oracle::CompatibilityOracle;
use crate::services::store::{MatchStore, ProfileStore, StoreError};
use futures_util::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Profile a single-profile run is anchored on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileTarget {
    Id(ProfileId),
    /// Case-insensitive exact name
    Name(String),
}

impl fmt::Display for ProfileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileTarget::Id(id) => write!(f, "id {}", id),
            ProfileTarget::Name(name) => write!(f, "name {}", name),
        }
    }
}

/// Errors that terminate a matcher run
#[derive(Debug, Error)]
pub enum MatchmakerError {
    #[error("No profile found with {0}")]
    NotFound(ProfileTarget),

    #[error("{count} profiles are named {name}")]
    AmbiguousName { name: String, count: usize },

    #[error("Profile store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to persist {unpersisted} matches: {source}")]
    Persistence {
        unpersisted: usize,
        #[source]
        source: StoreError,
    },
}

/// Per-run counters for each terminal pair state
#[derive(Debug, Default)]
struct Tally {
    candidates: usize,
    pre_filtered_out: usize,
    undeterminable: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Pair generation (each unordered pair once)
/// 2. Eligibility pre-filter
/// 3. Deterministic + oracle scoring, bounded concurrency
/// 4. Threshold and single batch commit
#[derive(Clone)]
pub struct Matchmaker {
    profiles: Arc<dyn ProfileStore>,
    aggregator: Aggregator,
    committer: MatchCommitter,
    policy: Arc<dyn EligibilityPolicy>,
    max_concurrent: usize,
}

impl Matchmaker {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        matches: Arc<dyn MatchStore>,
        oracle: Arc<dyn CompatibilityOracle>,
        options: MatchingOptions,
    ) -> Self {
        Self {
            profiles,
            aggregator: Aggregator::new(oracle, options.oracle_timeout),
            committer: MatchCommitter::new(matches, options.threshold),
            policy: Arc::new(OppositeGenderSameIntent),
            max_concurrent: options.max_concurrent_oracle_calls.max(1),
        }
    }

    /// Replace the eligibility pre-filter
    pub fn with_policy(mut self, policy: Arc<dyn EligibilityPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Match the entire population
    pub async fn run_all(&self, dry_run: bool) -> Result<RunReport, MatchmakerError> {
        let started_at = chrono::Utc::now();
        let run_id = uuid::Uuid::new_v4();
        let profiles = self.profiles.list_profiles().await?;

        tracing::info!("Run {}: matching {} profiles", run_id, profiles.len());

        let pairs = unordered_pairs(&profiles);
        self.execute(run_id, None, pairs, dry_run, started_at).await
    }

    /// Match one profile against the rest of the population
    pub async fn run_for_profile(
        &self,
        target: &ProfileTarget,
        dry_run: bool,
    ) -> Result<RunReport, MatchmakerError> {
        let started_at = chrono::Utc::now();
        let run_id = uuid::Uuid::new_v4();
        let profile = self.resolve_target(target).await?;
        let profiles = self.profiles.list_profiles().await?;

        tracing::info!(
            "Run {}: matching {} against {} profiles",
            run_id,
            profile,
            profiles.len().saturating_sub(1)
        );

        let pairs = pairs_for_target(&profile, &profiles);
        self.execute(run_id, Some(profile.to_string()), pairs, dry_run, started_at)
            .await
    }

    /// Look up the profile a single-profile run targets
    pub async fn resolve_target(&self, target: &ProfileTarget) -> Result<Profile, MatchmakerError> {
        match target {
            ProfileTarget::Id(id) => self
                .profiles
                .get_profile(*id)
                .await?
                .ok_or_else(|| MatchmakerError::NotFound(target.clone())),
            ProfileTarget::Name(name) => {
                let mut found = self.profiles.find_by_name(name.trim()).await?;
                match found.len() {
                    0 => Err(MatchmakerError::NotFound(target.clone())),
                    1 => Ok(found.remove(0)),
                    count => Err(MatchmakerError::AmbiguousName {
                        name: name.clone(),
                        count,
                    }),
                }
            }
        }
    }

    async fn execute(
        &self,
        run_id: uuid::Uuid,
        target: Option<String>,
        pairs: Vec<CandidatePair<'_>>,
        dry_run: bool,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<RunReport, MatchmakerError> {
        let mut tally = Tally::default();
        let scored = self.score_pairs(pairs, &mut tally).await;
        let selection = self.committer.select(scored);

        let matches_created = if dry_run {
            selection.matches.len()
        } else {
            self.committer.persist(&selection.matches).await?
        };

        let report = RunReport {
            run_id,
            target,
            dry_run,
            started_at,
            finished_at: chrono::Utc::now(),
            candidates: tally.candidates,
            pre_filtered_out: tally.pre_filtered_out,
            undeterminable: tally.undeterminable,
            below_threshold: selection.below_threshold,
            matches_created,
            matches: selection.matches,
        };

        tracing::info!(
            "Run {} finished: {} candidates, {} pre-filtered, {} undeterminable, {} below threshold {:.1}, {} matches{}",
            run_id,
            report.candidates,
            report.pre_filtered_out,
            report.undeterminable,
            report.below_threshold,
            self.committer.threshold(),
            report.matches_created,
            if dry_run { " (dry run)" } else { "" }
        );

        Ok(report)
    }

    /// Pre-filter and score pairs, preserving pair order in the output
    async fn score_pairs(&self, pairs: Vec<CandidatePair<'_>>, tally: &mut Tally) -> Vec<ScoredPair> {
        tally.candidates = pairs.len();

        let eligible: Vec<CandidatePair<'_>> = pairs
            .into_iter()
            .filter(|pair| self.policy.is_eligible(pair.a, pair.b))
            .collect();
        tally.pre_filtered_out = tally.candidates - eligible.len();

        tracing::debug!(
            "{} of {} pairs eligible, scoring with up to {} concurrent oracle calls",
            eligible.len(),
            tally.candidates,
            self.max_concurrent
        );

        let outcomes: Vec<(CandidatePair<'_>, Compatibility)> = stream::iter(eligible)
            .map(|pair| async move { (pair, self.aggregator.evaluate(pair.a, pair.b).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        outcomes
            .into_iter()
            .filter_map(|(pair, outcome)| match outcome {
                Compatibility::Determined(score) => Some(ScoredPair {
                    a: pair.a.id,
                    b: pair.b.id,
                    a_name: pair.a.name.clone(),
                    b_name: pair.b.name.clone(),
                    score,
                }),
                Compatibility::Undeterminable(_) => {
                    tally.undeterminable += 1;
                    None
                }
            })
            .collect()
    }
}

impl fmt::Debug for Matchmaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matchmaker")
            .field("aggregator", &self.aggregator)
            .field("committer", &self.committer)
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, LookingFor, OracleAssessment, RelationshipStatus};
    use crate::services::oracle::OracleError;
    use crate::services::store::InMemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Oracle that scores every axis the same and counts calls
    struct CountingOracle {
        axis: f64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompatibilityOracle for CountingOracle {
        async fn assess(&self, a: &Profile, b: &Profile, _: u8) -> Result<OracleAssessment, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OracleAssessment {
                occupation: self.axis,
                interests: self.axis,
                names: self.axis,
                personality: self.axis,
                explanation: format!("{} and {} get along", a.name, b.name),
            })
        }
    }

    fn create_candidate(id: i64, name: &str, gender: Gender) -> Profile {
        Profile {
            id,
            name: name.to_string(),
            age: 30,
            gender,
            relationship_status: RelationshipStatus::Single,
            looking_for: LookingFor::LongTerm,
            settle_timeline: 24,
            occupation: "Engineer".to_string(),
            interests: "Hiking".to_string(),
        }
    }

    fn create_matchmaker(profiles: Vec<Profile>, axis: f64) -> (Matchmaker, Arc<InMemoryStore>, Arc<CountingOracle>) {
        let store = Arc::new(InMemoryStore::new(profiles));
        let oracle = Arc::new(CountingOracle { axis, calls: AtomicUsize::new(0) });
        let matchmaker = Matchmaker::new(store.clone(), store.clone(), oracle.clone(), MatchingOptions::default());
        (matchmaker, store, oracle)
    }

    #[tokio::test]
    async fn test_run_all_basic() {
        let (matchmaker, store, oracle) = create_matchmaker(
            vec![
                create_candidate(1, "John Doe", Gender::Male),
                create_candidate(2, "Jane Smith", Gender::Female),
                create_candidate(3, "Jim Beam", Gender::Male),
            ],
            10.0,
        );

        let report = matchmaker.run_all(false).await.unwrap();

        assert_eq!(report.candidates, 3);
        assert_eq!(report.pre_filtered_out, 1);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.matches_created, 2);
        assert_eq!(store.matches().len(), 2);
        assert_eq!(store.matches()[0].score, 80.0);
    }

    #[tokio::test]
    async fn test_dry_run_persists_nothing() {
        let (matchmaker, store, _) = create_matchmaker(
            vec![
                create_candidate(1, "John Doe", Gender::Male),
                create_candidate(2, "Jane Smith", Gender::Female),
            ],
            10.0,
        );

        let report = matchmaker.run_all(true).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.matches_created, 1);
        assert!(store.matches().is_empty());
    }

    #[tokio::test]
    async fn test_run_for_profile_by_name() {
        let (matchmaker, store, _) = create_matchmaker(
            vec![
                create_candidate(1, "John Doe", Gender::Male),
                create_candidate(2, "Jane Smith", Gender::Female),
                create_candidate(3, "Ann Lee", Gender::Female),
                create_candidate(4, "Jim Beam", Gender::Male),
            ],
            10.0,
        );

        let target = ProfileTarget::Name("JOHN DOE".to_string());
        let report = matchmaker.run_for_profile(&target, false).await.unwrap();

        assert_eq!(report.target.as_deref(), Some("John Doe (30)"));
        assert_eq!(report.candidates, 3);
        assert_eq!(report.matches_created, 2);
        assert!(store.matches().iter().all(|m| m.profile_a == 1));

        let partners: Vec<&str> = report.matches.iter().map(|m| m.partner_of(1)).collect();
        assert_eq!(partners, vec!["Jane Smith", "Ann Lee"]);
        assert!(report.matches.iter().all(|m| m.profile_a_name == "John Doe"));
    }

    #[tokio::test]
    async fn test_unknown_target_is_not_found() {
        let (matchmaker, _, oracle) = create_matchmaker(vec![create_candidate(1, "John Doe", Gender::Male)], 10.0);

        let by_name = matchmaker
            .run_for_profile(&ProfileTarget::Name("Nobody".to_string()), false)
            .await;
        assert!(matches!(by_name, Err(MatchmakerError::NotFound(ProfileTarget::Name(_)))));

        let by_id = matchmaker.run_for_profile(&ProfileTarget::Id(42), false).await;
        assert!(matches!(by_id, Err(MatchmakerError::NotFound(ProfileTarget::Id(42)))));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ambiguous_name() {
        let (matchmaker, _, _) = create_matchmaker(
            vec![
                create_candidate(1, "Sam Lee", Gender::Male),
                create_candidate(2, "sam lee", Gender::Female),
            ],
            10.0,
        );

        let result = matchmaker
            .run_for_profile(&ProfileTarget::Name("Sam Lee".to_string()), false)
            .await;
        assert!(matches!(result, Err(MatchmakerError::AmbiguousName { count: 2, .. })));
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let (matchmaker, _, oracle) = create_matchmaker(
            vec![
                create_candidate(1, "A", Gender::Male),
                create_candidate(2, "B", Gender::Male),
            ],
            10.0,
        );
        let matchmaker = matchmaker.with_policy(Arc::new(|_: &Profile, _: &Profile| true));

        let report = matchmaker.run_all(true).await.unwrap();

        assert_eq!(report.pre_filtered_out, 0);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }
}
