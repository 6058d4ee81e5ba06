use crate::models::Profile;

/// Maximum points per deterministic rule
pub const LOOKING_FOR_MAX: u8 = 15;
pub const LOOKING_FOR_TIER: u8 = 7;
pub const TIMELINE_MAX: u8 = 10;
pub const AGE_MAX: u8 = 10;
pub const STATUS_MAX: u8 = 5;

/// Nominal size of the deterministic point pool.
///
/// The rules above only hand out 40 of these points; the match threshold is
/// tuned against that, so the remaining headroom stays unassigned.
pub const DETERMINISTIC_POOL: u8 = 50;

/// Calculate the deterministic sub-score for a pair of profiles
///
/// Scoring rules (independent, summed):
/// - looking-for alignment: exact 15, same commitment tier 7
/// - settle-timeline proximity: up to 10
/// - age proximity: up to 10
/// - relationship status equal: 5
///
/// Symmetric in its arguments and free of side effects.
pub fn deterministic_score(a: &Profile, b: &Profile) -> u8 {
    looking_for_score(a, b)
        + timeline_score(a.settle_timeline, b.settle_timeline)
        + age_score(a.age, b.age)
        + status_score(a, b)
}

#[inline]
fn looking_for_score(a: &Profile, b: &Profile) -> u8 {
    if a.looking_for == b.looking_for {
        LOOKING_FOR_MAX
    } else if a.looking_for.tier() == b.looking_for.tier() {
        LOOKING_FOR_TIER
    } else {
        0
    }
}

/// Score settle-timeline proximity (months apart)
#[inline]
pub fn timeline_score(a_months: u8, b_months: u8) -> u8 {
    match a_months.abs_diff(b_months) {
        0 => TIMELINE_MAX,
        1..=6 => 8,
        7..=12 => 5,
        13..=24 => 2,
        _ => 0,
    }
}

/// Score age proximity (years apart)
#[inline]
pub fn age_score(a_age: u8, b_age: u8) -> u8 {
    match a_age.abs_diff(b_age) {
        0..=2 => AGE_MAX,
        3..=5 => 8,
        6..=10 => 5,
        11..=15 => 2,
        _ => 0,
    }
}

#[inline]
fn status_score(a: &Profile, b: &Profile) -> u8 {
    if a.relationship_status == b.relationship_status {
        STATUS_MAX
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, LookingFor, RelationshipStatus};

    fn create_test_profile(age: u8, looking_for: LookingFor, timeline: u8) -> Profile {
        Profile {
            id: 1,
            name: "Test User".to_string(),
            age,
            gender: Gender::Male,
            relationship_status: RelationshipStatus::Single,
            looking_for,
            settle_timeline: timeline,
            occupation: "Engineer".to_string(),
            interests: "Reading, Hiking".to_string(),
        }
    }

    #[test]
    fn test_identical_profiles_score_forty() {
        let a = create_test_profile(30, LookingFor::LongTerm, 24);
        let b = create_test_profile(30, LookingFor::LongTerm, 24);

        assert_eq!(deterministic_score(&a, &b), 40);
    }

    #[test]
    fn test_looking_for_tiers() {
        let lt = create_test_profile(30, LookingFor::LongTerm, 24);
        let st = create_test_profile(30, LookingFor::ShortTerm, 24);
        let casual = create_test_profile(30, LookingFor::Casual, 24);

        assert_eq!(looking_for_score(&lt, &st), LOOKING_FOR_TIER);
        assert_eq!(looking_for_score(&lt, &casual), 0);
        assert_eq!(deterministic_score(&lt, &casual), 25);
    }

    #[test]
    fn test_timeline_brackets() {
        assert_eq!(timeline_score(12, 12), 10);
        assert_eq!(timeline_score(12, 18), 8);
        assert_eq!(timeline_score(0, 12), 5);
        assert_eq!(timeline_score(60, 36), 2);
        assert_eq!(timeline_score(0, 25), 0);
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(age_score(30, 28), 10);
        assert_eq!(age_score(30, 35), 8);
        assert_eq!(age_score(20, 30), 5);
        assert_eq!(age_score(45, 30), 2);
        assert_eq!(age_score(18, 65), 0);
    }

    #[test]
    fn test_symmetry() {
        let a = create_test_profile(24, LookingFor::Friendship, 3);
        let mut b = create_test_profile(37, LookingFor::Casual, 40);
        b.relationship_status = RelationshipStatus::Divorced;

        assert_eq!(deterministic_score(&a, &b), deterministic_score(&b, &a));
    }
}
