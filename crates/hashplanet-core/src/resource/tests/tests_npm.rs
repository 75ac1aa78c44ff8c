//! Tests for npm ingestion

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::Job;
use crate::filter::PathFilter;
use crate::hasher::hash_bytes;
use crate::resource::npm::ingest_from;
use crate::resource::{NpmRegistry, Resource, hash_tarball, order_releases};
use crate::store::{FingerprintStore, MemoryStore};

fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    builder
        .append_data(&mut dir, "package/lib/", std::io::empty())
        .expect("append dir");

    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, path, content.as_bytes())
            .expect("append file");
    }

    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

#[test]
fn test_hash_tarball_strips_package_root() {
    let archive = tarball(&[
        ("package/dist/jquery.js", "jquery"),
        ("package/lib/util.js", "util"),
    ]);

    let mut hashed = hash_tarball(&archive, &PathFilter::default(), "3.7.1").expect("valid archive");
    hashed.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(hashed.len(), 2);
    assert_eq!(hashed[0].path, "dist/jquery.js");
    assert_eq!(hashed[0].tag, "3.7.1");
    assert_eq!(hashed[0].digest, hash_bytes(b"jquery"));
    assert_eq!(hashed[1].path, "lib/util.js");
}

#[test]
fn test_hash_tarball_skips_rejected_empty_and_rootless() {
    let archive = tarball(&[
        ("package/README.md", "# readme"),
        ("package/empty.js", ""),
        ("toplevel.js", "no root"),
        ("package/keep.css", "body {}"),
    ]);

    let hashed = hash_tarball(&archive, &PathFilter::default(), "1.0.0").expect("valid archive");

    let paths: Vec<&str> = hashed.iter().map(|h| h.path.as_str()).collect();
    assert_eq!(paths, vec!["keep.css"]);
}

#[test]
fn test_hash_tarball_rejects_garbage() {
    assert!(hash_tarball(b"not a tarball", &PathFilter::default(), "1.0.0").is_err());
}

#[test]
fn test_order_releases_by_publish_time() {
    let document = r#"{
        "name": "demo",
        "time": {
            "created": "2019-01-01T00:00:00.000Z",
            "modified": "2022-01-01T00:00:00.000Z",
            "1.0.0": "2020-01-01T00:00:00.000Z",
            "0.9.1": "2021-06-01T00:00:00.000Z",
            "2.0.0": "2021-01-01T00:00:00.000Z"
        },
        "versions": {
            "1.0.0": {"dist": {"tarball": "https://r/demo-1.0.0.tgz"}},
            "0.9.1": {"dist": {"tarball": "https://r/demo-0.9.1.tgz"}},
            "2.0.0": {"dist": {"tarball": "https://r/demo-2.0.0.tgz"}},
            "3.0.0": {"dist": {"tarball": "https://r/demo-3.0.0.tgz"}}
        }
    }"#;

    let releases = order_releases(document).expect("valid document");
    let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();

    assert_eq!(versions, vec!["1.0.0", "2.0.0", "0.9.1"]);
    assert_eq!(releases[0].tarball, "https://r/demo-1.0.0.tgz");
}

#[test]
fn test_order_releases_empty_document() {
    assert!(order_releases("{}").expect("valid document").is_empty());
}

#[test]
fn test_package_url_escapes_scope() {
    let registry = NpmRegistry::new(Duration::from_secs(1))
        .expect("client")
        .with_base_url("http://localhost:4873/");

    assert_eq!(registry.package_url("jquery"), "http://localhost:4873/jquery");
    assert_eq!(
        registry.package_url("@angular/core"),
        "http://localhost:4873/@angular%2Fcore"
    );
}

/// Serve fixed bodies by request path; unknown paths get a 404
fn serve(listener: TcpListener, routes: HashMap<String, Vec<u8>>) {
    let routes = Arc::new(routes);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = match routes.get(path) {
                    Some(body) => ("200 OK", body.clone()),
                    None => ("404 Not Found", b"not found".to_vec()),
                };
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });
}

#[tokio::test]
async fn test_ingest_from_registry() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));

    let document = serde_json::json!({
        "time": {
            "1.0.0": "2020-01-01T00:00:00.000Z",
            "1.1.0": "2020-02-01T00:00:00.000Z",
            "1.2.0": "2020-03-01T00:00:00.000Z"
        },
        "versions": {
            "1.0.0": {"dist": {"tarball": format!("{base}/demo-1.0.0.tgz")}},
            "1.1.0": {"dist": {"tarball": format!("{base}/demo-1.1.0.tgz")}},
            "1.2.0": {"dist": {"tarball": format!("{base}/demo-1.2.0.tgz")}}
        }
    });

    let mut routes = HashMap::new();
    routes.insert("/demo".to_string(), document.to_string().into_bytes());
    routes.insert(
        "/demo-1.0.0.tgz".to_string(),
        tarball(&[("package/index.js", "v1"), ("package/lib/util.js", "util")]),
    );
    routes.insert(
        "/demo-1.1.0.tgz".to_string(),
        tarball(&[("package/index.js", "v2"), ("package/lib/util.js", "util")]),
    );
    serve(listener, routes);

    let registry = NpmRegistry::new(Duration::from_secs(5))
        .expect("client")
        .with_base_url(&base);
    let store = MemoryStore::new();
    let job = Job {
        resource: Resource::Npm,
        target: "demo".to_string(),
        technology: "demo".to_string(),
        filter: PathFilter::default(),
    };

    let run = ingest_from(&registry, &store, &job).await.expect("ingest");
    assert_eq!(run.tags_processed, 2);
    assert_eq!(run.files_hashed, 4);

    {
        let mut session = store.begin().await.expect("Failed to begin");
        assert_eq!(
            session.get_versions("demo").await.expect("get_versions"),
            vec!["1.0.0".to_string(), "1.1.0".to_string()]
        );
        let util = session
            .find_hash(&hash_bytes(b"util"))
            .await
            .expect("find_hash")
            .expect("hash exists");
        assert_eq!(util.versions, vec!["1.0.0".to_string(), "1.1.0".to_string()]);
        assert_eq!(session.stats().await.expect("stats").hashes, 3);
    }

    let again = ingest_from(&registry, &store, &job).await.expect("ingest");
    assert!(again.is_noop());
}
