#![allow(clippy::unwrap_used)]
// Integration tests for `KioskClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kioskhub_api::{Error, KioskClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, KioskClient, String) {
    let server = MockServer::start().await;
    let client = KioskClient::with_client(reqwest::Client::new());
    let addr = server.address().to_string();
    (server, client, addr)
}

fn status_body() -> serde_json::Value {
    json!({
        "success": true,
        "timestamp": 1_718_000_000,
        "data": {
            "battery": { "level": 87, "charging": true, "plugged": "AC" },
            "screen": { "on": true, "brightness": 180, "screensaverActive": false },
            "audio": { "volume": 40 },
            "webview": { "currentUrl": "https://dash.local", "canGoBack": false, "loading": false },
            "device": {
                "ip": "10.0.0.5",
                "hostname": "kiosk-lobby",
                "version": "1.4.2",
                "isDeviceOwner": true,
                "kioskMode": true
            },
            "wifi": {
                "ssid": "venue",
                "signalStrength": -61,
                "signalLevel": 3,
                "connected": true,
                "linkSpeed": 144,
                "frequency": 5180
            },
            "rotation": { "enabled": false, "interval": 30, "currentIndex": 0 },
            "sensors": { "light": 120.5, "proximity": 5.0, "accelerometer": { "x": 0.1, "y": 9.8, "z": 0.2 } },
            "autoBrightness": { "enabled": true, "min": 10.0, "max": 255.0, "currentLightLevel": 120.5 },
            "storage": { "totalMB": 32000, "availableMB": 20000, "usedMB": 12000, "usedPercent": 37 },
            "memory": { "totalMB": 4000, "availableMB": 1500, "usedMB": 2500, "usedPercent": 62, "lowMemory": false }
        }
    })
}

// ── Status tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_status_decodes_all_sections() {
    let (server, client, addr) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let status = client.fetch_status(&addr).await.unwrap();

    assert!(status.success);
    assert_eq!(status.data.battery.level, 87);
    assert_eq!(status.data.battery.plugged, "AC");
    assert!(status.data.screen.on);
    assert_eq!(status.data.webview.current_url, "https://dash.local");
    assert_eq!(status.data.device.version, "1.4.2");
    assert_eq!(status.data.wifi.signal_strength, -61);
    assert!((status.data.sensors.accelerometer.y - 9.8).abs() < f64::EPSILON);
    assert!(status.data.auto_brightness.enabled);
    assert_eq!(status.data.storage.used_percent, 37);
    assert_eq!(status.data.memory.total_mb, 4000);
}

#[tokio::test]
async fn test_fetch_status_tolerates_missing_sections() {
    let (server, client, addr) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "device": { "version": "0.9.0" } }
        })))
        .mount(&server)
        .await;

    let status = client.fetch_status(&addr).await.unwrap();
    assert_eq!(status.data.device.version, "0.9.0");
    assert_eq!(status.data.battery.level, 0);
}

#[tokio::test]
async fn test_fetch_status_non_200() {
    let (server, client, addr) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client.fetch_status(&addr).await;
    assert!(
        matches!(result, Err(Error::Http { status: 503, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_status_malformed_body() {
    let (server, client, addr) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    match client.fetch_status(&addr).await {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("not json")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_status_success_false() {
    let (server, client, addr) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let result = client.fetch_status(&addr).await;
    assert!(matches!(result, Err(Error::Rejected { .. })));
}

#[tokio::test]
async fn test_fetch_status_unreachable() {
    let client = KioskClient::with_client(reqwest::Client::new());

    // Port 9 (discard) on localhost is closed in test environments.
    let err = client.fetch_status("127.0.0.1:9").await.unwrap_err();
    assert!(err.is_unreachable(), "expected connect error, got: {err:?}");
}

// ── Command tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_post_command_with_body() {
    let (server, client, addr) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/url"))
        .and(body_json(json!({ "url": "https://menu.local" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "executed": true, "command": "navigate" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .post_command(&addr, "/api/url", Some(&json!({ "url": "https://menu.local" })))
        .await
        .unwrap();

    assert!(resp.executed());
    assert_eq!(resp.data.command, "navigate");
}

#[tokio::test]
async fn test_post_command_not_executed() {
    let (server, client, addr) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/reboot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "executed": false, "command": "reboot" }
        })))
        .mount(&server)
        .await;

    let result = client
        .post_command::<serde_json::Value>(&addr, "/api/reboot", None)
        .await;

    match result {
        Err(Error::NotExecuted { command, .. }) => assert_eq!(command, "reboot"),
        other => panic!("expected NotExecuted, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_post_command_rejected() {
    let (server, client, addr) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/audio/beep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": { "executed": true, "command": "beep" }
        })))
        .mount(&server)
        .await;

    let err = client
        .post_command::<serde_json::Value>(&addr, "/api/audio/beep", None)
        .await
        .unwrap_err();
    assert!(err.is_refusal());
}

// ── Camera / transport tests ────────────────────────────────────────

#[tokio::test]
async fn test_take_photo_returns_bytes() {
    let (server, client, addr) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/camera/photo"))
        .and(query_param("camera", "front"))
        .and(query_param("quality", "80"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&server)
        .await;

    let photo = client.take_photo(&addr, "front", 80).await.unwrap();
    assert_eq!(&photo[..], &[0xFF_u8, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_api_key("s3cret".to_string().into());
    let client = KioskClient::new(&transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("X-Api-Key", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .expect(1)
        .mount(&server)
        .await;

    client
        .fetch_status(&server.address().to_string())
        .await
        .unwrap();
}
