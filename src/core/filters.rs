use crate::models::Profile;

/// Cheap eligibility gate applied to a pair before the oracle is consulted
pub trait EligibilityPolicy: Send + Sync {
    fn is_eligible(&self, a: &Profile, b: &Profile) -> bool;
}

impl<F> EligibilityPolicy for F
where
    F: Fn(&Profile, &Profile) -> bool + Send + Sync,
{
    fn is_eligible(&self, a: &Profile, b: &Profile) -> bool {
        self(a, b)
    }
}

/// Default policy: genders differ and looking-for values are identical.
///
/// Same-tier looking-for values (e.g. long-term and short-term) are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct OppositeGenderSameIntent;

impl EligibilityPolicy for OppositeGenderSameIntent {
    #[inline]
    fn is_eligible(&self, a: &Profile, b: &Profile) -> bool {
        a.gender != b.gender && a.looking_for == b.looking_for
    }
}
