//! Integration tests for sharing an article as a PDF
//!
//! Runs the export the way the article screen does: a render job with a
//! header image fetcher, settings from a JSON document, and a temporary file
//! handed to the share sheet.

use doc_model::ArticleDocument;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use store::{
    remove_temporary_export, write_temporary_export, AppSettings, ArticleExporter, FetchError,
    ImageFetcher, RenderJob, RenderState,
};

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Smallest byte sequence with a baseline JPEG frame header
fn tiny_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(3);
    for id in 1..=3u8 {
        data.extend_from_slice(&[id, 0x11, 0x00]);
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// Serves one JPEG and counts requests
struct CdnFetcher {
    image: Vec<u8>,
    requests: AtomicUsize,
}

impl ImageFetcher for CdnFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if url.starts_with("https://cdn.example/") {
            Ok(self.image.clone())
        } else {
            Err(FetchError::new(format!("no route to {}", url)))
        }
    }
}

fn article(image_url: &str) -> ArticleDocument {
    ArticleDocument::new(
        "Rest is a skill.\n## Wind down\nDim the lights an hour before bed. See [the guide](https://example.org/sleep).",
    )
    .with_title("Sleep: a guide")
    .with_category("Wellbeing")
    .with_duration(6)
    .with_date("3 May 2024")
    .with_header_image_url(image_url)
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[tokio::test]
async fn test_share_article_with_header_image() {
    init_logging();
    let fetcher = Arc::new(CdnFetcher {
        image: tiny_jpeg(800, 400),
        requests: AtomicUsize::new(0),
    });

    let job = RenderJob::new(ArticleExporter::new(fetcher.clone()));
    let state = job.run(article("https://cdn.example/sleep.jpg")).await;

    let RenderState::Succeeded(export) = state else {
        panic!("export failed: {:?}", state);
    };
    assert_eq!(fetcher.requests.load(Ordering::SeqCst), 1);
    assert_eq!(export.file_name, "article-Sleep_ a guide.pdf");
    assert!(contains(&export.bytes, "/Filter /DCTDecode"));
    assert!(contains(&export.bytes, "/URI (https://example.org/sleep)"));

    let path = write_temporary_export(&export.bytes, &export.file_name)
        .await
        .unwrap();
    assert_eq!(tokio::fs::read(&path).await.unwrap(), export.bytes);
    remove_temporary_export(&path).await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_failed_image_fetch_still_exports() {
    init_logging();
    let fetcher = Arc::new(CdnFetcher {
        image: tiny_jpeg(800, 400),
        requests: AtomicUsize::new(0),
    });

    let job = RenderJob::new(ArticleExporter::new(fetcher));
    let state = job.run(article("https://elsewhere.example/sleep.jpg")).await;

    let RenderState::Succeeded(export) = state else {
        panic!("export failed: {:?}", state);
    };
    assert!(!contains(&export.bytes, "/Subtype /Image"));
    assert_eq!(export.page_count, 1);
}

#[tokio::test]
async fn test_exporter_follows_settings() {
    init_logging();
    let settings: AppSettings = serde_json::from_str(
        r#"{"export":{"pdf":{"includeLinks":false,"compress":false,"creator":"Coach Studio"}}}"#,
    )
    .unwrap();

    let exporter =
        ArticleExporter::new(Arc::new(store::NoImageFetcher)).with_settings(&settings.export);
    let state = RenderJob::new(exporter)
        .run(article("https://cdn.example/sleep.jpg"))
        .await;

    let RenderState::Succeeded(export) = state else {
        panic!("export failed: {:?}", state);
    };
    assert!(contains(&export.bytes, "/Creator (Coach Studio)"));
    assert!(!contains(&export.bytes, "/Subtype /Link"));
    assert!(contains(&export.bytes, "(Sleep: a guide) Tj"));
}
