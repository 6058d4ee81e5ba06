use crate::core::scoring::deterministic_score;
use crate::models::{CompatibilityScore, Profile};
use crate::services::oracle::{CompatibilityOracle, OracleError};
use std::sync::Arc;
use std::time::Duration;

/// Rationale used when the oracle returns an empty explanation
pub const FALLBACK_RATIONALE: &str =
    "These profiles seem compatible based on their interests and preferences.";

/// Outcome of aggregating a pair
#[derive(Debug, Clone, PartialEq)]
pub enum Compatibility {
    Determined(CompatibilityScore),
    /// The oracle failed; the pair must be treated as not matched
    Undeterminable(OracleError),
}

/// Combines the deterministic sub-score with oracle sub-scores
#[derive(Clone)]
pub struct Aggregator {
    oracle: Arc<dyn CompatibilityOracle>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(oracle: Arc<dyn CompatibilityOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Score a pair. Oracle failures and timeouts yield `Undeterminable`.
    pub async fn evaluate(&self, a: &Profile, b: &Profile) -> Compatibility {
        let deterministic = deterministic_score(a, b);

        let outcome = match tokio::time::timeout(self.timeout, self.oracle.assess(a, b, deterministic)).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Unavailable(format!(
                "no response within {}s",
                self.timeout.as_secs_f64()
            ))),
        };

        match outcome {
            Ok(assessment) => {
                let total = (f64::from(deterministic) + assessment.total()).clamp(0.0, 100.0);
                let rationale = if assessment.explanation.is_empty() {
                    FALLBACK_RATIONALE.to_string()
                } else {
                    assessment.explanation.clone()
                };

                Compatibility::Determined(CompatibilityScore {
                    total,
                    deterministic,
                    oracle: assessment,
                    rationale,
                })
            }
            Err(e) => {
                tracing::warn!("Pair {} / {} undeterminable: {}", a.id, b.id, e);
                Compatibility::Undeterminable(e)
            }
        }
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, LookingFor, OracleAssessment, RelationshipStatus};
    use async_trait::async_trait;

    struct FixedOracle(Result<OracleAssessment, OracleError>);

    #[async_trait]
    impl CompatibilityOracle for FixedOracle {
        async fn assess(&self, _: &Profile, _: &Profile, _: u8) -> Result<OracleAssessment, OracleError> {
            self.0.clone()
        }
    }

    struct SlowOracle;

    #[async_trait]
    impl CompatibilityOracle for SlowOracle {
        async fn assess(&self, _: &Profile, _: &Profile, _: u8) -> Result<OracleAssessment, OracleError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(OracleError::Unavailable("unreachable".into()))
        }
    }

    fn assessment(each: f64, explanation: &str) -> OracleAssessment {
        OracleAssessment {
            occupation: each,
            interests: each,
            names: each,
            personality: each,
            explanation: explanation.to_string(),
        }
    }

    fn create_test_profile(id: i64, gender: Gender) -> Profile {
        Profile {
            id,
            name: format!("User {}", id),
            age: 30,
            gender,
            relationship_status: RelationshipStatus::Single,
            looking_for: LookingFor::LongTerm,
            settle_timeline: 12,
            occupation: "Teacher".to_string(),
            interests: "Cooking".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sums_components() {
        let aggregator = Aggregator::new(
            Arc::new(FixedOracle(Ok(assessment(10.0, "Great fit")))),
            Duration::from_secs(5),
        );
        let a = create_test_profile(1, Gender::Male);
        let b = create_test_profile(2, Gender::Female);

        match aggregator.evaluate(&a, &b).await {
            Compatibility::Determined(score) => {
                assert_eq!(score.deterministic, 40);
                assert_eq!(score.total, 80.0);
                assert_eq!(score.rationale, "Great fit");
            }
            other => panic!("expected a score, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clamps_to_hundred() {
        let aggregator = Aggregator::new(
            Arc::new(FixedOracle(Ok(assessment(50.0, "")))),
            Duration::from_secs(5),
        );
        let a = create_test_profile(1, Gender::Male);
        let b = create_test_profile(2, Gender::Female);

        match aggregator.evaluate(&a, &b).await {
            Compatibility::Determined(score) => {
                assert_eq!(score.total, 100.0);
                assert_eq!(score.rationale, FALLBACK_RATIONALE);
            }
            other => panic!("expected a score, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oracle_failure_is_undeterminable() {
        let aggregator = Aggregator::new(
            Arc::new(FixedOracle(Err(OracleError::Malformed("bad json".into())))),
            Duration::from_secs(5),
        );
        let a = create_test_profile(1, Gender::Male);
        let b = create_test_profile(2, Gender::Female);

        assert_eq!(
            aggregator.evaluate(&a, &b).await,
            Compatibility::Undeterminable(OracleError::Malformed("bad json".into()))
        );
    }

    #[tokio::test]
    async fn test_timeout_is_undeterminable() {
        let aggregator = Aggregator::new(Arc::new(SlowOracle), Duration::from_millis(50));
        let a = create_test_profile(1, Gender::Male);
        let b = create_test_profile(2, Gender::Female);

        assert!(matches!(
            aggregator.evaluate(&a, &b).await,
            Compatibility::Undeterminable(OracleError::Unavailable(_))
        ));
    }
}
