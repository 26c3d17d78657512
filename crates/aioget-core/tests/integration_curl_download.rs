//! Integration test: local HTTP server, libcurl streams, real files.
//!
//! Runs the scheduler end to end with `CurlOpener` and `DirSinkOpener` and
//! checks results and file contents.

mod common;

use std::sync::Arc;

use aioget_core::http::{CurlOpener, CurlOptions};
use aioget_core::progress::NullProgress;
use aioget_core::scheduler::Scheduler;
use aioget_core::sink::DirSinkOpener;
use aioget_core::{TransferError, TransferState};
use common::body_server::{self, BodyServerOptions};
use tempfile::tempdir;

fn payload() -> Vec<u8> {
    (0u8..100).cycle().take(10_000).collect()
}

fn scheduler(dir: &std::path::Path) -> Scheduler<CurlOpener, DirSinkOpener> {
    Scheduler::new(
        CurlOpener::new(CurlOptions::default()),
        DirSinkOpener::new(dir),
        Arc::new(NullProgress),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn three_files_complete_and_match() {
    let body = payload();
    let base = body_server::start(body.clone());
    let urls: Vec<String> = ["one.bin", "two.bin", "three.bin"]
        .iter()
        .map(|name| format!("{}{}", base, name))
        .collect();
    let dir = tempdir().unwrap();

    let results = scheduler(dir.path()).run_all(&urls, 2).await.unwrap();

    assert_eq!(results.len(), 3);
    for (result, url) in results.iter().zip(&urls) {
        assert_eq!(&result.url, url);
        assert_eq!(result.state, TransferState::Completed, "{:?}", result.error);
        assert_eq!(result.total_size, Some(10_000));
        assert_eq!(result.bytes_transferred, 10_000);
        let content = std::fs::read(dir.path().join(&result.destination_name)).unwrap();
        assert_eq!(content, body);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_content_length_is_unknown_size() {
    let body = payload();
    let base = body_server::start_with_options(
        body.clone(),
        BodyServerOptions {
            send_length: false,
            ..BodyServerOptions::default()
        },
    );
    let urls = vec![format!("{}stream.bin", base)];
    let dir = tempdir().unwrap();

    let results = scheduler(dir.path()).run_all(&urls, 1).await.unwrap();

    assert_eq!(results[0].state, TransferState::Completed, "{:?}", results[0].error);
    assert_eq!(results[0].total_size, None);
    assert_eq!(results[0].bytes_transferred, 10_000);
    assert_eq!(std::fs::read(dir.path().join("stream.bin")).unwrap(), body);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_error_fails_only_that_transfer() {
    let good = body_server::start(payload());
    let bad = body_server::start_with_options(
        payload(),
        BodyServerOptions {
            status: "404 Not Found",
            ..BodyServerOptions::default()
        },
    );
    let urls = vec![
        format!("{}ok.bin", good),
        format!("{}missing.bin", bad),
        body_server::closed_port_url(),
    ];
    let dir = tempdir().unwrap();

    let results = scheduler(dir.path()).run_all(&urls, 4).await.unwrap();

    assert_eq!(results[0].state, TransferState::Completed);
    assert_eq!(results[0].bytes_transferred, 10_000);
    assert_eq!(results[1].state, TransferState::Failed);
    assert!(matches!(results[1].error, Some(TransferError::Network(_))));
    assert!(!dir.path().join("missing.bin").exists());
    assert_eq!(results[2].state, TransferState::Failed);
    assert!(matches!(results[2].error, Some(TransferError::Network(_))));
}
