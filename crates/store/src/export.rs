//! Article PDF export
//!
//! Fetches and decodes the header image, paginates the article and writes
//! the pages as a PDF. A missing or undecodable header image only drops
//! the image; any other failure discards the whole document.

use crate::error::{ExportError, FetchError};
use crate::pdf::{export_pdf_bytes, DocumentInfo, ImageData, PdfExportOptions};
use crate::settings::ExportSettings;
use crate::Result;
use doc_model::ArticleDocument;
use layout_engine::{HeaderImage, PageConfig, Paginator};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Characters that may not appear in an exported file name
const INVALID_FILE_NAME_CHARS: [char; 10] = [':', '/', '\\', '?', '%', '*', '|', '"', '<', '>'];

/// Loads header images. Called from the render job's blocking thread.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

impl<F> ImageFetcher for F
where
    F: Fn(&str) -> std::result::Result<Vec<u8>, FetchError> + Send + Sync,
{
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self(url)
    }
}

/// Fetcher for hosts without network access
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageFetcher;

impl ImageFetcher for NoImageFetcher {
    fn fetch(&self, _url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        Err(FetchError::new("image fetching is not available"))
    }
}

/// A finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleExport {
    pub bytes: Vec<u8>,
    /// Suggested file name for sharing
    pub file_name: String,
    pub page_count: usize,
}

/// Turns articles into PDF documents
#[derive(Clone)]
pub struct ArticleExporter {
    page_config: PageConfig,
    options: PdfExportOptions,
    fetcher: Arc<dyn ImageFetcher>,
}

impl ArticleExporter {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            page_config: PageConfig::default(),
            options: PdfExportOptions::default(),
            fetcher,
        }
    }

    pub fn with_page_config(mut self, page_config: PageConfig) -> Self {
        self.page_config = page_config;
        self
    }

    pub fn with_options(mut self, options: PdfExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Page setup and PDF options from application settings
    pub fn with_settings(self, settings: &ExportSettings) -> Self {
        self.with_page_config(settings.page.clone())
            .with_options(settings.pdf.clone())
    }

    pub fn page_config(&self) -> &PageConfig {
        &self.page_config
    }

    pub fn options(&self) -> &PdfExportOptions {
        &self.options
    }

    /// Fetch and decode the header image. Failures are logged and yield
    /// `None`.
    pub fn load_header_image(&self, article: &ArticleDocument) -> Option<ImageData> {
        let url = article.header_image_url()?;

        let bytes = match self.fetcher.fetch(url) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%url, %error, "header image fetch failed, exporting without it");
                return None;
            }
        };

        match ImageData::decode(bytes) {
            Ok(image) => Some(image),
            Err(error) => {
                tracing::warn!(%url, %error, "header image could not be decoded, exporting without it");
                None
            }
        }
    }

    /// Lay out and write `article`
    pub fn generate(&self, article: &ArticleDocument) -> std::result::Result<ArticleExport, ExportError> {
        let image = self.load_header_image(article);
        let header = image
            .as_ref()
            .and_then(|image| match HeaderImage::new(image.width, image.height) {
                Ok(header) => Some(header),
                Err(error) => {
                    tracing::warn!(%error, "header image has no usable size");
                    None
                }
            });
        // only embed what the layout placed
        let image = image.filter(|_| header.is_some());

        let paginated = Paginator::new(self.page_config.clone()).paginate(article, header)?;

        let info = DocumentInfo::new(
            self.options.effective_title(article.title()),
            self.options.creator.clone(),
        );
        let bytes = export_pdf_bytes(&paginated.pages, image.as_ref(), info, &self.options)?;

        tracing::info!(
            pages = paginated.page_count(),
            bytes = bytes.len(),
            image = image.is_some(),
            "article PDF generated"
        );

        Ok(ArticleExport {
            bytes,
            file_name: export_file_name(article.title(), self.options.max_file_name_len),
            page_count: paginated.page_count(),
        })
    }
}

/// Export `article` with the default page setup and options
pub fn generate_pdf(
    article: &ArticleDocument,
    fetcher: Arc<dyn ImageFetcher>,
) -> std::result::Result<ArticleExport, ExportError> {
    ArticleExporter::new(fetcher).generate(article)
}

/// Replace characters that are invalid in file names with `_` and keep at
/// most `max_len` characters
pub fn sanitize_file_name(file_name: &str, max_len: usize) -> String {
    file_name
        .chars()
        .map(|ch| {
            if INVALID_FILE_NAME_CHARS.contains(&ch) {
                '_'
            } else {
                ch
            }
        })
        .take(max_len)
        .collect()
}

/// `article-<title>.pdf`, sanitized
pub fn export_file_name(title: Option<&str>, max_len: usize) -> String {
    let title = title.unwrap_or("article");
    sanitize_file_name(&format!("article-{}.pdf", title), max_len)
}

/// Write `bytes` into the OS temp directory under `file_name`, for handing
/// to a share sheet
pub async fn write_temporary_export(bytes: &[u8], file_name: &str) -> Result<PathBuf> {
    let path = temporary_path(&std::env::temp_dir(), file_name);
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(path = %path.display(), "temporary export written");
    Ok(path)
}

/// Write a temporary export synchronously into `dir`
pub fn write_temporary_export_sync(dir: impl AsRef<Path>, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
    let path = temporary_path(dir.as_ref(), file_name);
    std::fs::write(&path, bytes)?;
    tracing::debug!(path = %path.display(), "temporary export written");
    Ok(path)
}

/// Delete a temporary export once sharing finished. A file that is already
/// gone is not an error.
pub async fn remove_temporary_export(path: impl AsRef<Path>) -> Result<()> {
    match tokio::fs::remove_file(path.as_ref()).await {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

/// Synchronous variant of [`remove_temporary_export`]
pub fn remove_temporary_export_sync(path: impl AsRef<Path>) -> Result<()> {
    match std::fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

fn temporary_path(dir: &Path, file_name: &str) -> PathBuf {
    // no path separators survive, so the file stays inside `dir`
    dir.join(sanitize_file_name(file_name, usize::MAX))
}
