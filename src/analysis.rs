use serde::{Deserialize, Serialize};

use crate::{ConnectionRequest, ConnectionStatus};

const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAnalysis {
    pub success_rate: f64,
    pub preferred_types: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Summarizes how a member's past connection requests turned out.
pub fn analyze_connection_success(
    user_id: &str,
    connections: &[ConnectionRequest],
) -> ConnectionAnalysis {
    let sent: Vec<&ConnectionRequest> = connections
        .iter()
        .filter(|request| request.from_user_id == user_id)
        .collect();

    if sent.is_empty() {
        return ConnectionAnalysis {
            success_rate: 0.0,
            preferred_types: Vec::new(),
            recommendations: vec![
                "Start connecting with peers who share your symptoms to build your support network."
                    .to_string(),
            ],
        };
    }

    let accepted: Vec<&ConnectionRequest> = sent
        .iter()
        .copied()
        .filter(|request| request.status == ConnectionStatus::Accepted)
        .collect();
    let success_rate = accepted.len() as f64 / sent.len() as f64;

    // (type, count) in first-seen order; the stable sort keeps ties that way.
    let mut tallies: Vec<(String, usize)> = Vec::new();
    for request in &accepted {
        match tallies
            .iter_mut()
            .find(|(kind, _)| *kind == request.connection_type)
        {
            Some((_, count)) => *count += 1,
            None => tallies.push((request.connection_type.clone(), 1)),
        }
    }
    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    let preferred_types: Vec<String> = tallies.into_iter().map(|(kind, _)| kind).collect();

    let mut recommendations = Vec::with_capacity(MAX_RECOMMENDATIONS);
    if success_rate < 0.3 {
        recommendations.push(
            "Try connecting with peers who share more of your symptoms and interests.".to_string(),
        );
        recommendations.push(
            "Complete your profile so others can see what you have in common.".to_string(),
        );
    } else if success_rate < 0.6 {
        recommendations.push(
            "Personalize your connection messages by mentioning shared experiences.".to_string(),
        );
    } else {
        recommendations.push(
            "Your connections are going well - keep reaching out to similar peers.".to_string(),
        );
    }

    if let Some(top) = preferred_types.first() {
        recommendations.push(format!(
            "Your most successful connections are {} matches - look for more of these.",
            top.replace('_', " ")
        ));
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);

    ConnectionAnalysis {
        success_rate,
        preferred_types,
        recommendations,
    }
}
