use peer_match::insight::Adjustment;
use peer_match::scoring::{CompatibilityScorer, ScoringPipeline, MAX_REASONS};
use peer_match::user::{ExperienceLevel, UserProfile};
use peer_match::RecommendationType;

fn profile(id: &str, symptoms: &[&str], engagement: f64) -> UserProfile {
    let mut profile = UserProfile::new(id);
    profile.symptoms = symptoms.iter().map(|s| s.to_string()).collect();
    profile.activity.engagement_score = engagement;
    profile
}

fn adjustment(factor: f64) -> Adjustment {
    Adjustment {
        insight: "test".to_string(),
        adjustment_factor: factor,
        confidence: 90.0,
        fallback: false,
    }
}

#[test]
fn base_score_matches_weighted_formula() {
    let pipeline = ScoringPipeline::default();
    let mut user = profile("me", &["itching", "fatigue"], 60.0);
    user.preferences.interests = vec!["Nutrition".to_string(), "Reading".to_string()];
    user.preferences.communication_style = "casual".to_string();
    user.demographics.experience_level = ExperienceLevel::NewlyDiagnosed;

    let mut candidate = profile("peer", &["itching", "brain fog", "fatigue"], 40.0);
    candidate.preferences.interests = vec!["Nutrition".to_string()];
    candidate.preferences.communication_style = "direct".to_string();
    candidate.demographics.experience_level = ExperienceLevel::Experienced;

    let scored = pipeline.score_candidate(&user, &candidate);
    let b = scored.breakdown;
    assert!((b.symptom_overlap - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(b.interest_alignment, 0.5);
    assert_eq!(b.communication_match, 0.5);
    assert_eq!(b.experience_match, 0.7);
    assert!((b.activity_match - 0.8).abs() < 1e-9);

    let expected =
        100.0 * (0.35 * (2.0 / 3.0) + 0.25 * 0.5 + 0.15 * 0.5 + 0.15 * 0.7 + 0.10 * 0.8);
    assert!((scored.base_score - expected).abs() < 1e-9);
    assert_eq!(scored.score, scored.base_score);
    assert_eq!(scored.recommendation_type, RecommendationType::PeerBuddy);
}

#[test]
fn sub_scores_and_base_stay_in_range() {
    let pipeline = ScoringPipeline::new(CompatibilityScorer::default());
    let pool = [
        profile("a", &[], 0.0),
        profile("b", &["rash"], 100.0),
        profile("c", &["rash", "rash", "nausea"], 250.0),
        profile("d", &["headache", "nausea", "insomnia", "rash"], -40.0),
    ];
    for user in &pool {
        for candidate in &pool {
            let scored = pipeline.score_candidate(user, candidate);
            let b = scored.breakdown;
            for value in [
                b.symptom_overlap,
                b.interest_alignment,
                b.communication_match,
                b.experience_match,
                b.activity_match,
            ] {
                assert!((0.0..=1.0).contains(&value), "sub-score {} out of range", value);
            }
            assert!((0.0..=100.0).contains(&scored.base_score));
            assert!(scored.reasons.len() <= MAX_REASONS);
        }
    }
}

#[test]
fn adjustment_is_bounded_and_final_score_clamped() {
    let pipeline = ScoringPipeline::default();
    let mut user = profile("me", &["itching"], 50.0);
    user.preferences.interests = vec!["Reading".to_string()];
    user.preferences.communication_style = "casual".to_string();
    user.demographics.experience_level = ExperienceLevel::LongTerm;
    let candidate = {
        let mut c = user.clone();
        c.user_id = "twin".to_string();
        c
    };

    let mut scored = pipeline.score_candidate(&user, &candidate);
    assert!((scored.base_score - 100.0).abs() < 1e-9);

    scored.apply(adjustment(5.0));
    assert_eq!(scored.score, 100.0);

    scored.apply(adjustment(0.1));
    assert!((scored.score - 80.0).abs() < 1e-9);
}

#[test]
fn rank_sorts_descending_with_stable_ties_and_truncates() {
    let pipeline = ScoringPipeline::default();
    let user = profile("me", &["itching"], 50.0);

    let mut scored = Vec::new();
    for idx in 0..14 {
        let mut candidate = pipeline.score_candidate(&user, &profile(&format!("c{}", idx), &[], 50.0));
        candidate.score = if idx % 2 == 0 { 40.0 } else { 60.0 };
        scored.push(candidate);
    }

    let ranked = pipeline.rank(scored, 10);
    assert_eq!(ranked.len(), 10);
    let ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["c1", "c3", "c5", "c7", "c9", "c11", "c13", "c0", "c2", "c4"]
    );
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}
