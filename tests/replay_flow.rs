use std::sync::Arc;

use emotion_fusion::io::parse_recording_json;
use emotion_fusion::session::HISTORY_KEY;
use emotion_fusion::{
    aggregate, distribution, parse_session_file, timeline, write_session_json, Emotion,
    FileStore, FusionWeight, HistoryStore, ImmediateRefresh, KeyValueStore, LoopState,
    ReplayCapture, ReplayDetector, SamplerConfig, SamplingLoop, SteppedClock,
};

const RECORDING: &str = r#"{"frames": [
    {"expressions": {"happy": 0.9, "neutral": 0.1}, "audio": [128, 128, 128, 128]},
    {"expressions": null, "audio": [128, 128, 128, 128]},
    {"expressions": {"sad": 0.8, "neutral": 0.2}, "audio": null},
    {"expressions": {"sad": 0.6, "angry": 0.3, "neutral": 0.1}}
]}"#;

fn sampler(
    audio_weight: u8,
) -> SamplingLoop<ReplayCapture, ReplayDetector, SteppedClock> {
    let recording = Arc::new(parse_recording_json(RECORDING).unwrap());
    let config = SamplerConfig {
        audio_weight: FusionWeight::new(audio_weight),
        ..Default::default()
    };
    SamplingLoop::new(
        ReplayCapture::new(recording.clone()),
        ReplayDetector::new(recording),
        SteppedClock::new(10_000, 1_000),
        config,
    )
}

#[tokio::test]
async fn test_replay_persists_and_summarizes() {
    let dir = tempfile::tempdir().unwrap();
    let mut history = HistoryStore::open(FileStore::open(dir.path()).unwrap(), false);

    let mut sampler = sampler(0);
    let (_handle, mut commands) = sampler.handle();
    sampler.start().await.unwrap();
    let summary = sampler
        .run(&mut history, &mut ImmediateRefresh, &mut commands)
        .await;

    assert_eq!(summary.ticks, 4);
    assert_eq!(sampler.state(), LoopState::Idle);
    assert_eq!(sampler.capture().frames_played(), 4);

    let dominants: Vec<Emotion> = history.all().iter().map(|s| s.dominant_emotion).collect();
    assert_eq!(
        dominants,
        vec![Emotion::Happy, Emotion::Neutral, Emotion::Sad, Emotion::Sad]
    );

    let stats = aggregate(history.all());
    assert_eq!(stats.duration_secs, 3);
    assert_eq!(stats.switches, 2);
    assert_eq!(stats.dominant_emotion, Some(Emotion::Sad));

    let buckets = distribution(history.all());
    assert_eq!(buckets.len(), 3);
    let total: usize = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, 4);

    let points = timeline(history.all(), &chrono::Utc);
    assert_eq!(points.len(), 4);
    assert!((points[0].value(Emotion::Happy) - 90.0).abs() < 1e-6);

    // Persisted copy survives a reopen
    assert!(history.storage().get(HISTORY_KEY).is_some());
    let reopened = HistoryStore::open(FileStore::open(dir.path()).unwrap(), false);
    assert_eq!(reopened.len(), 4);
    assert_eq!(reopened.latest().unwrap().timestamp, 13_000);
}

#[tokio::test]
async fn test_replay_export_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut history = HistoryStore::open(FileStore::open(dir.path()).unwrap(), true);

    let mut sampler = sampler(100);
    let (_handle, mut commands) = sampler.handle();
    sampler.start().await.unwrap();
    sampler
        .run(&mut history, &mut ImmediateRefresh, &mut commands)
        .await;

    // Audio-only fusion over silence or missing audio is always Neutral
    assert!(history
        .all()
        .iter()
        .all(|s| s.dominant_emotion == Emotion::Neutral));

    // Privacy mode never touched the store
    assert!(history.storage().get(HISTORY_KEY).is_none());

    let path = dir.path().join("session.json");
    write_session_json(history.all(), &path).unwrap();
    let exported = parse_session_file(&path).unwrap();

    assert_eq!(exported.len(), history.len());
    for (exported, original) in exported.iter().zip(history.all()) {
        assert_eq!(exported.timestamp, original.timestamp);
        assert_eq!(exported.dominant_emotion, original.dominant_emotion);
        assert!((exported.confidence - original.confidence).abs() < 1e-12);
    }
}

#[tokio::test]
async fn test_reset_then_restart_appends_fresh_samples() {
    let dir = tempfile::tempdir().unwrap();
    let mut history = HistoryStore::open(FileStore::open(dir.path()).unwrap(), false);

    let mut first = sampler(50);
    let (_handle, mut commands) = first.handle();
    first.start().await.unwrap();
    first
        .run(&mut history, &mut ImmediateRefresh, &mut commands)
        .await;
    assert_eq!(history.len(), 4);

    history.reset();
    assert!(history.storage().get(HISTORY_KEY).is_none());

    let mut second = sampler(50);
    let (_handle, mut commands) = second.handle();
    second.start().await.unwrap();
    second
        .run(&mut history, &mut ImmediateRefresh, &mut commands)
        .await;

    assert_eq!(history.len(), 4);
    let reopened = HistoryStore::open(FileStore::open(dir.path()).unwrap(), false);
    assert_eq!(reopened.len(), 4);
}
