//! Record-replay round trip through the whole generate pipeline.
//!
//! 1. Build a figma cassette with `CassetteRecorder` from captured payloads.
//! 2. Replay it with `ServiceContext::replaying_from` into a temp directory.
//! 3. Assert the three token files.
//! 4. Replay into a second directory and assert byte-identical output.
//!
//! A live-shaped run is also recorded through `RecordingSession` and replayed
//! from its session directory, as `generate --replay` does.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use figma_tokens::adapters::live::filesystem::LiveFileSystem;
use figma_tokens::adapters::recording::RecordingFigmaApi;
use figma_tokens::cassette::config::CassetteConfig;
use figma_tokens::cassette::recorder::CassetteRecorder;
use figma_tokens::cassette::session::RecordingSession;
use figma_tokens::commands::generate::{
    GenerateArtifacts, ADMIN_DARK_PATH, ADMIN_FILE_KEY, ADMIN_LIGHT_PATH, PRIMITIVES_PATH,
    PRIMITIVE_FILE_KEY,
};
use figma_tokens::context::ServiceContext;
use figma_tokens::figma::LocalVariablesResponse;
use figma_tokens::ports::{FigmaApi, FigmaFuture, PortError};

const PRIMITIVES: &str = include_str!("fixtures/primitives.local-variables.json");
const ADMIN: &str = include_str!("fixtures/admin.local-variables.json");

fn record_session(dir: &Path) -> PathBuf {
    let path = dir.join("figma.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, "roundtrip-figma", "abc123");

    for (file_key, payload) in [(PRIMITIVE_FILE_KEY, PRIMITIVES), (ADMIN_FILE_KEY, ADMIN)] {
        let body: Value = serde_json::from_str(payload).unwrap();
        recorder.record(
            "figma",
            "local_variables",
            json!({ "file_key": file_key }),
            json!({ "Ok": body }),
        );
    }

    recorder.finish().expect("recording should succeed")
}

async fn replay_into(session: &Path, out: &Path) {
    let config = CassetteConfig::from_session_dir(session).unwrap();
    let ctx = ServiceContext::replaying_from(&config, out).unwrap();
    GenerateArtifacts::new(&ctx).execute().await.unwrap();
}

fn read(out: &Path, artifact: &str) -> String {
    fs::read_to_string(out.join(artifact)).unwrap()
}

fn read_json(out: &Path, artifact: &str) -> Value {
    serde_json::from_str(&read(out, artifact)).unwrap()
}

#[tokio::test]
async fn replayed_session_writes_token_files() {
    let session = tempfile::tempdir().unwrap();
    let written = record_session(session.path());
    assert_eq!(written, session.path().join("figma.cassette.yaml"));

    let out = tempfile::tempdir().unwrap();
    replay_into(session.path(), out.path()).await;

    assert_eq!(
        read_json(out.path(), PRIMITIVES_PATH),
        json!({
            "color": {
                "neutral": {
                    "0": { "$type": "color", "$value": "#ffffff" },
                    "900": { "$type": "color", "$value": "#101828" }
                },
                "blue": {
                    "500": { "$type": "color", "$value": "#0066ff", "$description": "Brand blue" },
                    "300": { "$type": "color", "$value": "#6699ff" }
                }
            }
        })
    );

    let light = read_json(out.path(), ADMIN_LIGHT_PATH);
    assert_eq!(light["background"]["default"]["$value"], "{color.neutral.0}");
    assert_eq!(light["action"]["primary"]["$value"], "{color.blue.500}");
    assert_eq!(light["action"]["focus-ring"]["$value"], "{action.primary}");

    let dark = read_json(out.path(), ADMIN_DARK_PATH);
    assert_eq!(dark["background"]["default"]["$value"], "{color.neutral.900}");
    assert_eq!(dark["action"]["primary"]["$value"], "{color.blue.300}");

    for payload in [&light, &dark] {
        assert!(payload.get("$type").is_none(), "top-level $type is stripped");
        assert!(payload.get("color").is_none(), "remote variables are not emitted");
    }
}

#[tokio::test]
async fn replaying_twice_is_deterministic() {
    let session = tempfile::tempdir().unwrap();
    record_session(session.path());

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    replay_into(session.path(), first.path()).await;
    replay_into(session.path(), second.path()).await;

    for artifact in [PRIMITIVES_PATH, ADMIN_LIGHT_PATH, ADMIN_DARK_PATH] {
        assert_eq!(
            read(first.path(), artifact),
            read(second.path(), artifact),
            "determinism: {artifact} differs between replays"
        );
    }
}

#[tokio::test]
async fn replayed_failure_writes_nothing() {
    let session = tempfile::tempdir().unwrap();
    let mut recorder =
        CassetteRecorder::new(session.path().join("figma.cassette.yaml"), "failing", "abc123");
    recorder.record(
        "figma",
        "local_variables",
        json!({ "file_key": PRIMITIVE_FILE_KEY }),
        json!({ "Err": "Figma API error (403): Invalid token" }),
    );
    let body: Value = serde_json::from_str(ADMIN).unwrap();
    recorder.record(
        "figma",
        "local_variables",
        json!({ "file_key": ADMIN_FILE_KEY }),
        json!({ "Ok": body }),
    );
    recorder.finish().unwrap();

    let out = tempfile::tempdir().unwrap();
    let config = CassetteConfig::from_session_dir(session.path()).unwrap();
    let ctx = ServiceContext::replaying_from(&config, out.path()).unwrap();
    let err = GenerateArtifacts::new(&ctx).execute().await.unwrap_err();

    assert!(err.to_string().contains("Invalid token"));
    assert!(!out.path().join("tokens").exists());
}

/// Answers from the fixtures, admin first so recording order differs from
/// request order.
struct FixtureFigmaApi;

impl FixtureFigmaApi {
    async fn respond(&self, file_key: &str) -> Result<LocalVariablesResponse, PortError> {
        if file_key == PRIMITIVE_FILE_KEY {
            tokio::task::yield_now().await;
            return Ok(serde_json::from_str(PRIMITIVES)?);
        }
        Ok(serde_json::from_str(ADMIN)?)
    }
}

impl FigmaApi for FixtureFigmaApi {
    fn local_variables<'a>(&'a self, file_key: &'a str) -> FigmaFuture<'a> {
        Box::pin(self.respond(file_key))
    }
}

#[tokio::test]
async fn recorded_session_replays_into_real_files() {
    let cassettes = tempfile::tempdir().unwrap();
    let recorded_out = tempfile::tempdir().unwrap();

    let session = RecordingSession::in_dir(cassettes.path()).unwrap();
    let ctx = ServiceContext::new(
        Box::new(LiveFileSystem::new(recorded_out.path())),
        Box::new(RecordingFigmaApi::new(Box::new(FixtureFigmaApi), session.figma.clone())),
    );
    GenerateArtifacts::new(&ctx).execute().await.unwrap();
    drop(ctx);
    let session_dir = session.finish().unwrap();

    let replayed_out = tempfile::tempdir().unwrap();
    replay_into(&session_dir, replayed_out.path()).await;

    for artifact in [PRIMITIVES_PATH, ADMIN_LIGHT_PATH, ADMIN_DARK_PATH] {
        assert_eq!(
            read(replayed_out.path(), artifact),
            read(recorded_out.path(), artifact),
            "replay of {artifact} differs from the recorded run"
        );
    }
}
