//! HTTP-level tests for the REST routes, backed by fake speakers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;
use sonos_actions::testing::{FakeNetwork, FakeSpeaker};
use sonos_actions::{Device, LayerVersion, SpeakerResolver};
use sonos_rest_api::{routes, RestServer, SpeakerDirectory};
use warp::http::StatusCode;

struct TestDirectory {
    network: FakeNetwork,
    rediscovered: AtomicUsize,
}

impl TestDirectory {
    fn new(speakers: &[&FakeSpeaker]) -> Arc<Self> {
        let network = FakeNetwork::new();
        for speaker in speakers {
            network.add(speaker);
        }
        Arc::new(Self {
            network,
            rediscovered: AtomicUsize::new(0),
        })
    }
}

impl SpeakerResolver for TestDirectory {
    fn resolve(&self, name: &str, use_local_cache: bool) -> Option<Box<dyn Device>> {
        self.network.resolve(name, use_local_cache)
    }

    fn layer_version(&self) -> LayerVersion {
        self.network.layer_version()
    }
}

impl SpeakerDirectory for TestDirectory {
    fn speaker_names(&self) -> Vec<String> {
        self.network.names()
    }

    fn rediscover(&self) {
        self.rediscovered.fetch_add(1, Ordering::SeqCst);
    }
}

async fn get(directory: &Arc<TestDirectory>, path: &str) -> (StatusCode, Value) {
    let api = routes(directory.clone(), false);
    let response = warp::test::request().method("GET").path(path).reply(&api).await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    (response.status(), body)
}

#[tokio::test]
async fn test_root_reports_version() {
    let directory = TestDirectory::new(&[]);
    let (status, body) = get(&directory, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["info"],
        format!("Sonos Actions HTTP REST API Server v{}", env!("CARGO_PKG_VERSION"))
    );
}

#[tokio::test]
async fn test_rediscover_lists_speakers() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let study = FakeSpeaker::new("Study", "192.168.1.11");
    let directory = TestDirectory::new(&[&kitchen, &study]);

    let (status, body) = get(&directory, "/rediscover").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Speakers discovered"], serde_json::json!(["Kitchen", "Study"]));
    assert_eq!(directory.rediscovered.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_volume() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let directory = TestDirectory::new(&[&kitchen]);

    let (status, body) = get(&directory, "/kitchen/volume/37").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "speaker": "Kitchen",
            "action": "volume",
            "args": ["37"],
            "exit_code": 0,
            "result": "",
            "error_msg": "",
        })
    );
    assert_eq!(kitchen.state().volume, 37);
}

#[tokio::test]
async fn test_read_volume() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let directory = TestDirectory::new(&[&kitchen]);

    let (_, body) = get(&directory, "/Kitchen/volume").await;

    assert_eq!(body["exit_code"], 0);
    assert_eq!(body["result"], "10");
    assert!(kitchen.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_volume_leaves_speaker_untouched() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let directory = TestDirectory::new(&[&kitchen]);

    let (status, body) = get(&directory, "/Kitchen/volume/150").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exit_code"], 1);
    assert_eq!(body["error_msg"], "Error: Action 'volume' takes parameter(s): 0 to 100");
    assert!(kitchen.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_speaker() {
    let directory = TestDirectory::new(&[]);

    let (status, body) = get(&directory, "/Garage/volume").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["speaker"], "Garage");
    assert_eq!(body["exit_code"], 1);
    assert_eq!(body["error_msg"], "Speaker 'Garage' not found");
}

#[tokio::test]
async fn test_unknown_action() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let directory = TestDirectory::new(&[&kitchen]);

    let (_, body) = get(&directory, "/Kitchen/dance").await;

    assert_eq!(body["exit_code"], 1);
    assert_eq!(body["error_msg"], "Error: Action 'dance' not found");
}

#[tokio::test]
async fn test_segments_are_percent_decoded() {
    let living_room = FakeSpeaker::new("Living Room", "192.168.1.12").with_favourites(&["Jazz Classics"]);
    let directory = TestDirectory::new(&[&living_room]);

    let (_, body) = get(&directory, "/living%20room/lf").await;

    assert_eq!(body["speaker"], "Living Room");
    assert_eq!(body["exit_code"], 0);
    assert_eq!(body["result"], "  1: Jazz Classics");
}

#[tokio::test]
async fn test_empty_segment_keeps_argument_positions() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let directory = TestDirectory::new(&[&kitchen]);

    let (status, body) = get(&directory, "/Kitchen/play_uri//My%20Station").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["args"], serde_json::json!(["", "My Station"]));
    assert_eq!(kitchen.calls(), vec!["play_uri()"]);
}

#[tokio::test]
async fn test_wrong_shape_is_not_found() {
    let kitchen = FakeSpeaker::new("Kitchen", "192.168.1.10");
    let directory = TestDirectory::new(&[&kitchen]);

    for path in ["/Kitchen", "/Kitchen/volume/1/2/3/4"] {
        let (status, body) = get(&directory, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
        assert!(body["error"].as_str().unwrap().starts_with("Not found"));
    }
}

#[tokio::test]
async fn test_bad_encoding_is_rejected() {
    let directory = TestDirectory::new(&[]);

    let (status, body) = get(&directory, "/Kitchen/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("%FF"));
}

#[tokio::test]
async fn test_server_start_and_shutdown() {
    let directory = TestDirectory::new(&[]);

    let server = RestServer::start(directory, 0).await.unwrap();

    assert_ne!(server.port(), 0);
    server.shutdown().await.unwrap();
}
