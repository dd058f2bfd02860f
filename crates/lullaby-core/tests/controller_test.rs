#![allow(clippy::unwrap_used)]
// Controller integration tests against a mocked device.

use std::net::TcpListener;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lullaby_core::{
    Command, CommandResult, Controller, ControllerConfig, CoreError, LedDescriptor, LedId,
    PlaybackState, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> ControllerConfig {
    let mut config = ControllerConfig::new(Url::parse(&server.uri()).unwrap());
    config.timeout = Duration::from_secs(2);
    config
}

async fn mount_status(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/led_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Connected controller with both LEDs off.
async fn connected(server: &MockServer) -> Controller {
    mount_status(server, json!({ "led1": false, "led2": false })).await;
    let controller = Controller::new(config_for(server));
    controller.connect().await.unwrap();
    controller
}

fn led_states(controller: &Controller) -> Vec<(String, bool)> {
    controller
        .snapshot()
        .leds
        .iter()
        .map(|l| (l.id.to_string(), l.on))
        .collect()
}

/// Answer `method path` slower than the 2s client timeout.
async fn mount_stalled(server: &MockServer, verb: &str, route: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(server)
        .await;
}

async fn start_playing(server: &MockServer, controller: &Controller) {
    Mock::given(method("POST"))
        .and(path("/white_noise/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(server)
        .await;
    controller.start_white_noise().await.unwrap();
}

// ── Hydration ───────────────────────────────────────────────────────

#[tokio::test]
async fn connect_hydrates_known_leds() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "led1": true, "led3": true })).await;

    let controller = Controller::new(config_for(&server));
    controller.connect().await.unwrap();

    // led2 absent from the payload -> off; led3 unknown -> ignored
    assert_eq!(
        led_states(&controller),
        vec![("led1".to_owned(), true), ("led2".to_owned(), false)]
    );
    assert!(controller.store().last_led_sync().is_some());
}

#[tokio::test]
async fn refresh_follows_device_state() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    server.reset().await;
    mount_status(&server, json!({ "led1": false, "led2": true })).await;

    let result = controller.execute(Command::RefreshLeds).await.unwrap();

    assert_eq!(result, CommandResult::Refreshed);
    assert_eq!(
        led_states(&controller),
        vec![("led1".to_owned(), false), ("led2".to_owned(), true)]
    );
}

#[tokio::test]
async fn custom_descriptors_define_tracked_leds() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "night": true, "led1": true })).await;

    let mut config = config_for(&server);
    config.leds = vec![LedDescriptor::new("night", "Night light", "amber")];
    let controller = Controller::new(config);
    controller.connect().await.unwrap();

    assert_eq!(led_states(&controller), vec![("night".to_owned(), true)]);
}

// ── LED toggles ─────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_applies_confirmed_state() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/toggle_led/led1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "led": "led1",
            "state": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = controller
        .execute(Command::ToggleLed {
            id: LedId::new("led1"),
        })
        .await
        .unwrap();

    assert_eq!(
        result,
        CommandResult::LedToggled {
            id: LedId::new("led1"),
            on: true
        }
    );
    assert_eq!(
        led_states(&controller),
        vec![("led1".to_owned(), true), ("led2".to_owned(), false)]
    );
}

#[tokio::test]
async fn rejected_toggle_leaves_state_unchanged() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/toggle_led/led1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "state": true
        })))
        .mount(&server)
        .await;

    let before = controller.snapshot();
    let err = controller.toggle_led(&LedId::new("led1")).await.unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(*controller.snapshot(), *before);
}

#[tokio::test]
async fn unknown_led_is_refused_without_request() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller.toggle_led(&LedId::new("led9")).await.unwrap_err();

    match err {
        CoreError::UnknownLed { id, known } => {
            assert_eq!(id, "led9");
            assert_eq!(known, "led1, led2");
        }
        other => panic!("expected UnknownLed, got {other:?}"),
    }
}

// ── White noise ─────────────────────────────────────────────────────

#[tokio::test]
async fn start_sends_store_volume_and_marks_playing() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/white_noise/start"))
        .and(body_json(json!({ "volume": 0.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!controller.store().is_playing());
    controller.start_white_noise().await.unwrap();
    assert!(controller.store().is_playing());
}

#[tokio::test]
async fn start_applies_volume_echoed_by_device() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    controller.set_volume(1.4).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/white_noise/start"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "volume": 1.0 })),
        )
        .mount(&server)
        .await;

    controller.start_white_noise().await.unwrap();

    assert!((controller.store().volume() - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn rejected_start_stays_stopped() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/white_noise/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = controller.start_white_noise().await.unwrap_err();

    assert!(matches!(err, CoreError::Rejected { .. }));
    assert!(!controller.store().is_playing());
}

#[tokio::test]
async fn stop_marks_stopped() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    start_playing(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/white_noise/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let result = controller.execute(Command::StopWhiteNoise).await.unwrap();

    assert_eq!(result, CommandResult::Playback(PlaybackState::Stopped));
    assert!(!controller.store().is_playing());
}

// ── Volume ──────────────────────────────────────────────────────────

#[tokio::test]
async fn volume_while_stopped_makes_no_request() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/white_noise/volume"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = controller.set_volume(0.3).await.unwrap();

    assert_eq!(result, CommandResult::VolumeSkipped(0.3));
    assert!((controller.store().volume() - 0.3).abs() < f64::EPSILON);
}

#[tokio::test]
async fn volume_while_playing_posts_once() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    start_playing(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/white_noise/volume"))
        .and(body_json(json!({ "volume": 0.8 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let result = controller
        .execute(Command::SetVolume { volume: 0.8 })
        .await
        .unwrap();

    assert_eq!(result, CommandResult::VolumeSent(0.8));
}

#[tokio::test]
async fn volume_failure_status_is_ignored() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    start_playing(&server, &controller).await;

    Mock::given(method("POST"))
        .and(path("/white_noise/volume"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = controller.set_volume(0.1).await.unwrap();

    assert_eq!(result, CommandResult::VolumeSent(0.1));
    assert!((controller.store().volume() - 0.1).abs() < f64::EPSILON);
}

// ── Failure handling ────────────────────────────────────────────────

#[tokio::test]
async fn network_failure_leaves_store_untouched() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    start_playing(&server, &controller).await;
    let before = controller.snapshot();

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let err = controller.toggle_led(&LedId::new("led2")).await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout { timeout_secs: 2 }));

    let err = controller.stop_white_noise().await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout { .. }));

    assert_eq!(*controller.snapshot(), *before);
}

#[tokio::test]
async fn failed_refresh_keeps_hydrated_leds() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "led1": true, "led2": false })).await;
    let controller = Controller::new(config_for(&server));
    controller.connect().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/led_status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(controller.refresh_leds().await.is_err());
    assert_eq!(
        led_states(&controller),
        vec![("led1".to_owned(), true), ("led2".to_owned(), false)]
    );
}

#[tokio::test]
async fn start_transport_failure_stays_stopped() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    let before = controller.snapshot();
    mount_stalled(&server, "POST", "/white_noise/start").await;

    let err = controller.start_white_noise().await.unwrap_err();

    assert!(matches!(err, CoreError::Timeout { .. }));
    assert_eq!(controller.snapshot().playback, PlaybackState::Stopped);
    assert_eq!(*controller.snapshot(), *before);
}

#[tokio::test]
async fn volume_transport_failure_while_playing_keeps_playing() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    start_playing(&server, &controller).await;
    mount_stalled(&server, "POST", "/white_noise/volume").await;

    let err = controller.set_volume(0.7).await.unwrap_err();

    assert!(matches!(err, CoreError::Timeout { .. }));
    assert!(controller.store().is_playing());
    // The local volume edit is not rolled back
    assert!((controller.store().volume() - 0.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unreachable_device_reports_connection_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let controller = Controller::new(ControllerConfig::new(url));

    let err = controller.connect().await.unwrap_err();

    assert!(matches!(err, CoreError::ConnectionFailed { .. }));
    // Still usable with default state
    assert_eq!(
        led_states(&controller),
        vec![("led1".to_owned(), false), ("led2".to_owned(), false)]
    );
    controller.disconnect().await;
}

#[tokio::test]
async fn operations_before_connect_fail() {
    let server = MockServer::start().await;
    let controller = Controller::new(config_for(&server));

    let err = controller.stop_white_noise().await.unwrap_err();

    assert!(matches!(err, CoreError::ControllerDisconnected));
}

// ── Subscriptions and lifecycle ─────────────────────────────────────

#[tokio::test]
async fn subscribers_see_confirmed_changes() {
    let server = MockServer::start().await;
    let controller = connected(&server).await;
    let mut updates = controller.subscribe();

    start_playing(&server, &controller).await;

    let snap = updates.changed().await.unwrap();
    assert_eq!(snap.playback, PlaybackState::Playing);
}

#[tokio::test]
async fn oneshot_runs_closure_after_hydration() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "led1": true, "led2": true })).await;

    let on = Controller::oneshot(config_for(&server), |ctrl| async move {
        Ok(ctrl.snapshot().leds.iter().filter(|l| l.on).count())
    })
    .await
    .unwrap();

    assert_eq!(on, 2);
}

#[tokio::test]
async fn oneshot_runs_closure_when_hydration_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/led_status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/white_noise/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (synced, playback) = Controller::oneshot(config_for(&server), |ctrl| async move {
        ctrl.stop_white_noise().await?;
        let state = ctrl.snapshot();
        Ok((ctrl.store().last_led_sync().is_some(), state.playback))
    })
    .await
    .unwrap();

    assert!(!synced);
    assert_eq!(playback, PlaybackState::Stopped);
}

#[tokio::test]
async fn oneshot_stops_when_client_cannot_be_built() {
    let mut config = ControllerConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
    config.tls = TlsVerification::CustomCa("/nonexistent/ca.pem".into());

    // The closure would succeed, so an error means it never ran
    let result = Controller::oneshot(config, |_ctrl| async move { Ok(()) }).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn background_refresh_picks_up_external_changes() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "led1": false, "led2": false })).await;

    let mut config = config_for(&server);
    config.refresh_interval_secs = 1;
    let controller = Controller::new(config);
    controller.connect().await.unwrap();
    let mut updates = controller.subscribe();

    server.reset().await;
    mount_status(&server, json!({ "led1": true, "led2": false })).await;

    let snap = tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(snap.leds[0].on);

    controller.disconnect().await;
}

#[tokio::test]
async fn reconnect_restarts_background_refresh() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "led1": false, "led2": false })).await;

    let mut config = config_for(&server);
    config.refresh_interval_secs = 1;
    let controller = Controller::new(config);
    controller.connect().await.unwrap();
    controller.disconnect().await;
    controller.connect().await.unwrap();
    let mut updates = controller.subscribe();

    server.reset().await;
    mount_status(&server, json!({ "led1": false, "led2": true })).await;

    let snap = tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(snap.leds[1].on);

    controller.disconnect().await;
}

#[tokio::test]
async fn repeated_connect_keeps_a_single_refresh_task() {
    let server = MockServer::start().await;
    mount_status(&server, json!({ "led1": false, "led2": false })).await;

    let mut config = config_for(&server);
    config.refresh_interval_secs = 1;
    let controller = Controller::new(config);
    controller.connect().await.unwrap();
    controller.connect().await.unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    controller.disconnect().await;

    // Two hydrations plus at most two ticks of one task
    let polls = server.received_requests().await.unwrap().len();
    assert!((2..=4).contains(&polls), "unexpected poll count {polls}");
}
