use std::collections::HashSet;
use std::path::PathBuf;

use peer_match::store::CommunityStore;
use peer_match::user::{generate_community, EntryKind, ProfileEntry, UserProfile};
use peer_match::{ConnectionRequest, ConnectionStatus};

const NOW: i64 = 1_700_000_000_000;

fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("peer-match-store-{}", std::process::id()))
        .join(format!("{}.json", name));
    let _ = std::fs::remove_file(&path);
    path
}

#[tokio::test]
async fn missing_file_loads_empty() {
    let store = CommunityStore::load(temp_path("missing")).await.unwrap();
    assert!(store.list_profiles().await.is_empty());
    assert!(store.get_profile("anyone").await.is_err());
}

#[tokio::test]
async fn profiles_and_connections_persist_across_loads() {
    let path = temp_path("persist");
    let store = CommunityStore::load(path.clone()).await.unwrap();

    let mut profile = UserProfile::new("u1");
    profile.symptoms = vec!["fatigue".to_string()];
    store.upsert_profile(profile.clone()).await.unwrap();
    profile.symptoms.push("insomnia".to_string());
    store.upsert_profile(profile).await.unwrap();
    store
        .record_connection(ConnectionRequest {
            from_user_id: "u1".to_string(),
            to_user_id: "u2".to_string(),
            connection_type: "peer_buddy".to_string(),
            status: ConnectionStatus::Declined,
            created_at: NOW,
        })
        .await
        .unwrap();

    let reloaded = CommunityStore::load(path).await.unwrap();
    let profiles = reloaded.list_profiles().await;
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].symptoms, vec!["fatigue", "insomnia"]);
    assert_eq!(reloaded.connections_from("u1").await.len(), 1);
    assert!(reloaded.connections_from("u2").await.is_empty());
}

#[tokio::test]
async fn candidates_respect_limit_and_order() {
    let store = CommunityStore::load(temp_path("candidates")).await.unwrap();
    let mut profiles = generate_community(30, 5, NOW);
    for profile in profiles.iter_mut() {
        profile.preferences.privacy_level = Default::default();
    }
    store.replace_all(profiles, Vec::new()).await.unwrap();

    let exclude = HashSet::from(["user_001".to_string()]);
    let candidates = store.candidates_for("user_000", &exclude, 20).await;
    assert_eq!(candidates.len(), 20);
    assert_eq!(candidates[0].user_id, "user_002");
    assert_eq!(candidates[19].user_id, "user_021");
}

#[tokio::test]
async fn refresh_activity_recomputes_engagement() {
    let store = CommunityStore::load(temp_path("refresh")).await.unwrap();
    let mut profile = UserProfile::new("u1");
    profile.activity.engagement_score = 99.0;
    profile.recent_entries = vec![
        ProfileEntry {
            kind: EntryKind::Journal,
            text: "note".to_string(),
            created_at: NOW - 1_000,
        },
        ProfileEntry {
            kind: EntryKind::Symptom,
            text: "rash".to_string(),
            created_at: NOW - 2_000,
        },
    ];
    store.upsert_profile(profile).await.unwrap();

    assert_eq!(store.refresh_activity(NOW).await.unwrap(), 1);
    let refreshed = store.get_profile("u1").await.unwrap();
    assert_eq!(refreshed.activity.engagement_score, 10.0);
    assert_eq!(refreshed.activity.last_active, NOW - 1_000);
}

#[tokio::test]
async fn failed_write_leaves_memory_unchanged() {
    let blocker = temp_path("blocker");
    std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = CommunityStore::load(blocker.join("data.json")).await.unwrap();

    let profiles = generate_community(3, 5, NOW);
    assert!(store.replace_all(profiles, Vec::new()).await.is_err());
    assert!(store.upsert_profile(UserProfile::new("u1")).await.is_err());
    assert!(store
        .record_connection(ConnectionRequest {
            from_user_id: "u1".to_string(),
            to_user_id: "u2".to_string(),
            connection_type: "peer_buddy".to_string(),
            status: ConnectionStatus::Declined,
            created_at: NOW,
        })
        .await
        .is_err());

    assert!(store.list_profiles().await.is_empty());
    assert!(store.get_profile("u1").await.is_err());
    assert!(store.connections_from("u1").await.is_empty());
}
