//! End-to-end session flows: load, edit, move, diff, serialize.

use relman_core::manifest::validate::InvalidField;
use relman_core::{DiffEntry, PullClient, SourceKind, TagCache, TagClient};
use relman_editor::{EditorSession, MemoryClipboard, TagService};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned responses keyed by a request-line substring.
type StubRoute = (&'static str, u16, &'static str);

/// Minimal loopback HTTP server answering each request with the first
/// matching canned route, or 404. Connections are closed per request.
async fn spawn_stub_server(routes: &'static [StubRoute]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let mut read = 0;
                loop {
                    match stream.read(&mut buf[read..]).await {
                        Ok(0) => break,
                        Ok(n) => {
                            read += n;
                            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n")
                                || read == buf.len()
                            {
                                break;
                            }
                        }
                        Err(_) => return,
                    }
                }
                let head = String::from_utf8_lossy(&buf[..read]);
                let request_line = head.lines().next().unwrap_or_default();
                let (status, body) = routes
                    .iter()
                    .find(|(path, _, _)| request_line.contains(path))
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, "{}"));
                let reason = if status == 200 { "OK" } else { "Not Found" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    addr
}

fn manifest_json() -> String {
    serde_json::json!({
        "PlatformVersion": "3.1.0",
        "PlatformImage": "registry.example.io/platform/runtime",
        "ManifestVersion": "1.4",
        "ModuleSources": ["primary", "mirror"],
        "Sources": [
            {
                "Kind": "BlobStorage",
                "Container": "modules",
                "Endpoint": "https://blobs.example.net",
                "Modules": ["Alpha_1.2.3.zip"]
            },
            {
                "Kind": "ReleaseFeed",
                "Feeds": ["https://feeds.example.net/v4"],
                "Modules": [
                    { "Name": "Foo", "Version": "1.2.3" }
                ]
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn edit_version_shows_up_in_serialized_output() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session
        .edit_value("Foo", SourceKind::ReleaseFeed, "1.2.4")
        .await
        .unwrap();

    let output = session.serialized().await.unwrap();
    assert!(output.contains(r#""Version": "1.2.4""#));
    assert!(!output.contains(r#""Version": "1.2.3""#));
}

#[tokio::test]
async fn move_to_blob_storage_leaves_placeholder_until_filled() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session
        .move_module("Foo", SourceKind::ReleaseFeed, SourceKind::BlobStorage)
        .await
        .unwrap();

    let record = session
        .records()
        .await
        .into_iter()
        .find(|r| r.identifier == "Foo")
        .unwrap();
    assert_eq!(record.kind, SourceKind::BlobStorage);
    assert_eq!(record.value, "");

    let output = session.serialized().await.unwrap();
    assert!(output.contains(r#""Foo_""#));

    // Placeholder is invalid until a suffix is supplied.
    assert!(session.has_invalid_inputs().await);
    assert_eq!(
        session.first_invalid_field().await,
        Some(InvalidField::Module {
            identifier: "Foo".to_string(),
            kind: SourceKind::BlobStorage,
        })
    );

    session
        .edit_value("Foo", SourceKind::BlobStorage, "2.0.0.zip")
        .await
        .unwrap();
    assert!(!session.has_invalid_inputs().await);
}

#[tokio::test]
async fn diff_reports_platform_field_and_module_changes() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session
        .edit_platform_field(relman_editor::PlatformField::PlatformVersion, "3.2.0")
        .await
        .unwrap();
    session
        .edit_value("Foo", SourceKind::ReleaseFeed, "1.2.4")
        .await
        .unwrap();

    let entries = session.diff().await;
    assert_eq!(
        entries,
        vec![
            DiffEntry::FieldChanged {
                field: "PlatformVersion",
                old: "3.1.0".to_string(),
                new: "3.2.0".to_string(),
            },
            DiffEntry::ModuleValueChanged {
                identifier: "Foo".to_string(),
                kind: SourceKind::ReleaseFeed,
                old: "1.2.3".to_string(),
                new: "1.2.4".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn move_round_trip_restores_kind_with_empty_value() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session
        .move_module("Foo", SourceKind::ReleaseFeed, SourceKind::BlobStorage)
        .await
        .unwrap();
    session
        .move_module("Foo", SourceKind::BlobStorage, SourceKind::ReleaseFeed)
        .await
        .unwrap();

    let record = session
        .records()
        .await
        .into_iter()
        .find(|r| r.identifier == "Foo")
        .unwrap();
    assert_eq!(record.kind, SourceKind::ReleaseFeed);
    assert_eq!(record.value, "");
}

#[tokio::test]
async fn parse_failure_on_replace_keeps_prior_state() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session
        .edit_value("Foo", SourceKind::ReleaseFeed, "1.2.4")
        .await
        .unwrap();

    let err = session.replace("{broken").await.unwrap_err();
    assert!(matches!(err, relman_core::RelmanError::Parse { .. }));

    // Prior edits survive the failed replace.
    let output = session.serialized().await.unwrap();
    assert!(output.contains(r#""Version": "1.2.4""#));
}

#[tokio::test]
async fn replace_rebuilds_projection() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    let mut edited: serde_json::Value = serde_json::from_str(&manifest_json()).unwrap();
    edited["Sources"][1]["Modules"] = serde_json::json!([
        { "Name": "Bar", "Version": "2.0.0" }
    ]);

    session.replace(&edited.to_string()).await.unwrap();
    let records = session.records().await;
    assert!(records.iter().any(|r| r.identifier == "Bar"));
    assert!(!records.iter().any(|r| r.identifier == "Foo"));
    // A replace resets the diff baseline.
    assert!(session.diff().await.is_empty());
}

#[tokio::test]
async fn remove_module_shows_in_diff() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session
        .remove_module("Alpha", SourceKind::BlobStorage)
        .await
        .unwrap();

    let entries = session.diff().await;
    assert_eq!(
        entries,
        vec![DiffEntry::ModuleRemoved {
            identifier: "Alpha".to_string(),
            kind: SourceKind::BlobStorage,
        }]
    );
}

#[tokio::test]
async fn unsorted_output_preserves_manifest_order() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    session.set_sort_enabled(false).await;
    assert!(!session.sort_enabled().await);

    let output = session.serialized().await.unwrap();
    // BlobStorage was declared first and sorting is off.
    assert!(output.find("BlobStorage").unwrap() < output.find("ReleaseFeed").unwrap());
}

#[tokio::test]
async fn copy_to_clipboard_writes_serialized_manifest() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    let clipboard = MemoryClipboard::new();
    session.copy_to_clipboard(&clipboard).await.unwrap();

    let contents = clipboard.contents().unwrap();
    assert!(contents.contains(r#""PlatformVersion": "3.1.0""#));
}

#[tokio::test]
async fn refresh_without_collaborator_is_a_config_error() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    let err = session.refresh_all_tags().await.unwrap_err();
    assert!(matches!(err, relman_core::RelmanError::Config { .. }));
    assert_eq!(session.refresh_progress(), (0, 0));
}

#[tokio::test]
async fn import_with_unrecognized_url_is_a_lookup_error() {
    let session = EditorSession::load(&manifest_json()).unwrap();
    let err = session
        .import_pull_request("no url in here")
        .await
        .unwrap_err();
    assert!(matches!(err, relman_core::RelmanError::Lookup { .. }));
}

#[tokio::test]
async fn fetch_tags_serves_from_seeded_cache() {
    let dir = TempDir::new().unwrap();
    let cache = TagCache::new(dir.path().to_path_buf());
    cache.put("Foo", vec!["2.1.0".to_string(), "1.9.9".to_string()]);

    let service = TagService::new(TagClient::new().unwrap(), cache);
    let session =
        EditorSession::load(&manifest_json()).unwrap().with_tag_service(Arc::new(service));

    session.fetch_tags_for("Foo").await.unwrap();

    let records = session.records().await;
    let record = records.iter().find(|r| r.identifier == "Foo").unwrap();
    assert_eq!(
        record.tags,
        Some(vec!["2.1.0".to_string(), "1.9.9".to_string()])
    );
    assert!(!record.loading);

    // A subsequent edit rebuilds the records but keeps the tags.
    session
        .edit_value("Foo", SourceKind::ReleaseFeed, "1.9.9")
        .await
        .unwrap();
    let records = session.records().await;
    let record = records.iter().find(|r| r.identifier == "Foo").unwrap();
    assert_eq!(record.value, "1.9.9");
    assert!(record.tags.is_some());
}

static TAG_ROUTES: &[StubRoute] = &[(
    "relman-alpha/tags",
    200,
    r#"[{"name": "v1.0.0"}, {"name": "release-candidate"}]"#,
)];

#[tokio::test]
async fn refresh_sweep_tolerates_failures_and_tracks_progress() {
    let addr = spawn_stub_server(TAG_ROUTES).await;
    let dir = TempDir::new().unwrap();
    let client = TagClient::new()
        .unwrap()
        .with_api_base(format!("http://{addr}"));
    let service = TagService::new(client, TagCache::new(dir.path().to_path_buf()));
    let session =
        EditorSession::load(&manifest_json()).unwrap().with_tag_service(Arc::new(service));

    // Alpha resolves against the stub; Foo's repository is unknown there
    // and must not abort the sweep.
    session.refresh_all_tags().await.unwrap();
    assert_eq!(session.refresh_progress(), (2, 2));

    let records = session.records().await;
    let alpha = records.iter().find(|r| r.identifier == "Alpha").unwrap();
    // The non-version tag name is filtered out.
    assert_eq!(alpha.tags, Some(vec!["1.0.0".to_string()]));
    assert!(!alpha.loading);

    let foo = records.iter().find(|r| r.identifier == "Foo").unwrap();
    assert_eq!(foo.tags, None);
    assert!(!foo.loading);
}

static PULL_ROUTES: &[StubRoute] = &[(
    "acme/widgets/pulls/7",
    200,
    r#"{"body": "Artifacts:\r\nhttps://cdn.example.net/packages/Foo_2.0.0.zip"}"#,
)];

#[tokio::test]
async fn import_moves_module_to_blob_storage_with_parsed_suffix() {
    let addr = spawn_stub_server(PULL_ROUTES).await;
    let client = PullClient::new()
        .unwrap()
        .with_api_base(format!("http://{addr}"));
    let session =
        EditorSession::load(&manifest_json()).unwrap().with_pull_client(Arc::new(client));

    session
        .import_pull_request("see https://github.com/acme/widgets/pull/7")
        .await
        .unwrap();

    let records = session.records().await;
    let foo = records.iter().find(|r| r.identifier == "Foo").unwrap();
    assert_eq!(foo.kind, SourceKind::BlobStorage);
    assert_eq!(foo.value, "2.0.0.zip");

    let output = session.serialized().await.unwrap();
    assert!(output.contains(r#""Foo_2.0.0.zip""#));
    // The release feed no longer lists the module.
    assert!(!output.contains(r#""Name": "Foo""#));
}

#[tokio::test]
async fn move_to_release_feed_marks_record_loading_until_tags_arrive() {
    let dir = TempDir::new().unwrap();
    let cache = TagCache::new(dir.path().to_path_buf());
    cache.put("Alpha", vec!["1.0.0".to_string()]);
    let service = TagService::new(TagClient::new().unwrap(), cache);
    let session =
        EditorSession::load(&manifest_json()).unwrap().with_tag_service(Arc::new(service));

    session
        .move_module("Alpha", SourceKind::BlobStorage, SourceKind::ReleaseFeed)
        .await
        .unwrap();

    // The move is visible immediately, with the fetch still outstanding.
    let records = session.records().await;
    let alpha = records.iter().find(|r| r.identifier == "Alpha").unwrap();
    assert_eq!(alpha.kind, SourceKind::ReleaseFeed);
    assert!(alpha.loading);

    // The enrichment completes in the background (served from cache).
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let records = session.records().await;
        let alpha = records.iter().find(|r| r.identifier == "Alpha").unwrap();
        if !alpha.loading {
            assert_eq!(alpha.tags, Some(vec!["1.0.0".to_string()]));
            return;
        }
    }
    panic!("tag enrichment never completed");
}

#[tokio::test]
async fn fetch_tags_for_unknown_module_is_a_lookup_error() {
    let dir = TempDir::new().unwrap();
    let service = TagService::new(
        TagClient::new().unwrap(),
        TagCache::new(dir.path().to_path_buf()),
    );
    let session =
        EditorSession::load(&manifest_json()).unwrap().with_tag_service(Arc::new(service));

    let err = session.fetch_tags_for("Nonexistent").await.unwrap_err();
    assert!(matches!(err, relman_core::RelmanError::Lookup { .. }));
}
