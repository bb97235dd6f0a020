use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;

use shared_config::AppConfig;
use video_conferencing_cell::models::{CallPhase, StartOutcome, VideoConferencingError, WidgetEvent};
use video_conferencing_cell::services::{ScriptLoader, SessionWidgetAdapter};
use video_conferencing_cell::test_support::{recording_adapter, StubScriptSource, TEST_DOMAIN};

#[tokio::test]
async fn test_start_session_activates_call() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    assert_eq!(adapter.phase().await, CallPhase::Idle);
    assert!(!adapter.is_in_call().await);

    let outcome = adapter
        .start_session("NiramyaConsultation_abc", Some("Asha"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Started {
            room_name: "NiramyaConsultation_abc".to_string()
        }
    );
    assert!(adapter.is_in_call().await);
    assert_eq!(stats.created(), 1);

    let embed = adapter.embed().await.unwrap();
    assert_eq!(embed.domain, TEST_DOMAIN);
    assert_eq!(embed.room_name, "NiramyaConsultation_abc");
    assert_eq!(embed.options.user_info.display_name, "Asha");
}

#[tokio::test]
async fn test_at_most_one_live_session_across_starts() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    for i in 0..5 {
        adapter
            .start_session(&format!("room-{}", i), None)
            .await
            .unwrap();
        assert_eq!(stats.live(), 1);
    }

    assert_eq!(stats.created(), 5);
    assert_eq!(stats.disposed(), 4);
    assert_eq!(stats.peak_live(), 1);
    assert_eq!(adapter.embed().await.unwrap().room_name, "room-4");
}

#[tokio::test]
async fn test_concurrent_starts_while_loading_keep_only_the_last() {
    let source = Arc::new(StubScriptSource::delayed(Duration::from_millis(50)));
    let (adapter, stats, _) = recording_adapter(source.clone());

    let (a, b, c) = tokio::join!(
        adapter.start_session("room-a", None),
        adapter.start_session("room-b", None),
        adapter.start_session("room-c", None),
    );

    assert_eq!(a.unwrap(), StartOutcome::Superseded);
    assert_eq!(b.unwrap(), StartOutcome::Superseded);
    assert_eq!(
        c.unwrap(),
        StartOutcome::Started {
            room_name: "room-c".to_string()
        }
    );
    assert_eq!(source.loads(), 1);
    assert_eq!(adapter.loader().injections(), 1);
    assert_eq!(stats.created(), 1);
    assert_eq!(stats.rooms(), vec!["room-c".to_string()]);
}

#[tokio::test]
async fn test_hang_up_is_idempotent() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    adapter.start_session("room", None).await.unwrap();

    adapter.hang_up().await;
    assert_eq!(adapter.phase().await, CallPhase::Idle);
    assert!(adapter.embed().await.is_none());

    adapter.hang_up().await;
    assert_eq!(adapter.phase().await, CallPhase::Idle);
    assert_eq!(stats.disposed(), 1);
    assert_eq!(stats.live(), 0);
}

#[tokio::test]
async fn test_hang_up_without_session_is_noop() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    adapter.hang_up().await;

    assert!(!adapter.is_in_call().await);
    assert_eq!(stats.disposed(), 0);
}

#[tokio::test]
async fn test_either_termination_event_ends_the_call() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    for event in WidgetEvent::TERMINATION {
        adapter.start_session("room", None).await.unwrap();
        assert!(adapter.is_in_call().await);

        let fired = adapter.dispatch_widget_event(event).await;

        assert_eq!(fired, 1);
        assert_eq!(adapter.phase().await, CallPhase::Idle);
    }

    assert_eq!(stats.disposed(), 2);
}

#[tokio::test]
async fn test_event_after_hang_up_is_ignored() {
    let (adapter, _, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    adapter.start_session("room", None).await.unwrap();
    adapter.hang_up().await;

    assert_eq!(adapter.dispatch_widget_event(WidgetEvent::ReadyToClose).await, 0);
    assert_eq!(adapter.phase().await, CallPhase::Idle);
}

#[tokio::test]
async fn test_late_signal_from_replaced_session_does_not_end_new_call() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    adapter.start_session("room-old", None).await.unwrap();
    adapter.start_session("room-new", None).await.unwrap();

    // The old widget's callback fires after it was replaced.
    assert_eq!(stats.fire_captured("room-old", WidgetEvent::VideoConferenceLeft), 1);
    assert_eq!(adapter.process_signals().await, 0);

    assert!(adapter.is_in_call().await);
    assert_eq!(adapter.embed().await.unwrap().room_name, "room-new");

    // The current widget's callback still ends the call.
    assert_eq!(stats.fire_captured("room-new", WidgetEvent::ReadyToClose), 1);
    assert_eq!(adapter.process_signals().await, 1);
    assert!(!adapter.is_in_call().await);
}

#[tokio::test]
async fn test_script_load_failure_returns_to_idle() {
    let (adapter, stats, _) = recording_adapter(Arc::new(StubScriptSource::failing(1)));

    let result = adapter.start_session("room", None).await;

    assert_matches!(result, Err(VideoConferencingError::ScriptLoad { .. }));
    assert_eq!(adapter.phase().await, CallPhase::Idle);
    assert!(!adapter.is_in_call().await);
    assert_eq!(stats.created(), 0);

    adapter.start_session("room", None).await.unwrap();
    assert!(adapter.is_in_call().await);
}

#[tokio::test]
async fn test_widget_construction_failure_returns_to_idle() {
    let (adapter, _, factory) = recording_adapter(Arc::new(StubScriptSource::instant()));
    factory.fail_next();

    let result = adapter.start_session("room", None).await;

    assert_matches!(result, Err(VideoConferencingError::WidgetUnavailable { .. }));
    assert_eq!(adapter.phase().await, CallPhase::Idle);
}

#[tokio::test]
async fn test_hang_up_while_connecting_cancels_creation() {
    let source = Arc::new(StubScriptSource::delayed(Duration::from_millis(100)));
    let (adapter, stats, _) = recording_adapter(source);

    let pending = {
        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move { adapter.start_session("room", None).await })
    };

    while adapter.phase().await != CallPhase::Connecting {
        tokio::task::yield_now().await;
    }
    assert!(!adapter.is_in_call().await);

    adapter.hang_up().await;

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, StartOutcome::Superseded);
    assert_eq!(adapter.phase().await, CallPhase::Idle);
    assert_eq!(stats.created(), 0);
}

#[tokio::test]
async fn test_hang_up_while_connecting_hides_later_load_failure() {
    let source = Arc::new(StubScriptSource::delayed_failing(Duration::from_millis(100), 1));
    let (adapter, stats, _) = recording_adapter(source);

    let pending = {
        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move { adapter.start_session("room", None).await })
    };

    while adapter.phase().await != CallPhase::Connecting {
        tokio::task::yield_now().await;
    }
    adapter.hang_up().await;

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, StartOutcome::Superseded);
    assert_eq!(adapter.phase().await, CallPhase::Idle);
    assert_eq!(stats.created(), 0);
}

#[tokio::test]
async fn test_phase_transitions_are_broadcast() {
    let (adapter, _, _) = recording_adapter(Arc::new(StubScriptSource::instant()));
    let mut phases = adapter.subscribe();

    adapter.start_session("room", None).await.unwrap();
    adapter.hang_up().await;

    let mut seen = Vec::new();
    while let Ok(phase) = phases.try_recv() {
        seen.push(phase);
    }

    assert_eq!(
        seen,
        vec![
            CallPhase::Connecting,
            CallPhase::Active,
            CallPhase::Ending,
            CallPhase::Idle
        ]
    );
}

#[tokio::test]
async fn test_room_and_display_name_validation() {
    let (adapter, _, _) = recording_adapter(Arc::new(StubScriptSource::instant()));

    assert_matches!(
        adapter.start_session("   ", Some("Asha")).await,
        Err(VideoConferencingError::InvalidRoom)
    );
    assert_eq!(adapter.phase().await, CallPhase::Idle);

    adapter.start_session("room", Some("  ")).await.unwrap();
    let embed = adapter.embed().await.unwrap();
    assert_eq!(embed.options.user_info.display_name, "Patient");
}

#[test]
fn test_adapter_requires_video_configuration() {
    let config = AppConfig {
        jitsi_domain: String::new(),
        ..AppConfig::default()
    };
    let loader = Arc::new(ScriptLoader::from_config(&AppConfig::default()).unwrap());

    assert!(matches!(
        SessionWidgetAdapter::from_config(&config, loader),
        Err(VideoConferencingError::NotConfigured)
    ));
}
