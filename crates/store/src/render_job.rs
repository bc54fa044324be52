//! Background PDF rendering
//!
//! A [`RenderJob`] renders one article off the async runtime and publishes
//! its progress on a watch channel:
//!
//! ```text
//! Idle -> Rendering -> Succeeded | Failed
//! ```
//!
//! Both outcomes are terminal. A new export uses a new job.

use crate::export::{ArticleExport, ArticleExporter};
use crate::ExportError;
use doc_model::ArticleDocument;
use std::sync::Arc;
use tokio::sync::watch;

/// Progress of a render job
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering,
    Succeeded(Arc<ArticleExport>),
    /// Human-readable reason; no partial output is kept
    Failed(String),
}

impl RenderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderState::Succeeded(_) | RenderState::Failed(_))
    }

    pub fn is_rendering(&self) -> bool {
        matches!(self, RenderState::Rendering)
    }
}

/// One article export running on the blocking thread pool
pub struct RenderJob {
    exporter: ArticleExporter,
    state: watch::Sender<RenderState>,
}

impl RenderJob {
    pub fn new(exporter: ArticleExporter) -> Self {
        let (state, _) = watch::channel(RenderState::Idle);
        Self { exporter, state }
    }

    pub fn state(&self) -> RenderState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.state.subscribe()
    }

    /// Render `article` and return the terminal state.
    ///
    /// The header image fetch, layout and PDF writing all block, so they
    /// run under `spawn_blocking`.
    pub async fn run(self, article: ArticleDocument) -> RenderState {
        self.state.send_replace(RenderState::Rendering);
        tracing::debug!(title = ?article.title(), "rendering article PDF");

        let exporter = self.exporter.clone();
        let result = tokio::task::spawn_blocking(move || exporter.generate(&article))
            .await
            .unwrap_or_else(|error| Err(ExportError::Interrupted(error.to_string())));

        let state = match result {
            Ok(export) => {
                tracing::info!(file_name = %export.file_name, "article PDF ready");
                RenderState::Succeeded(Arc::new(export))
            }
            Err(error) => {
                tracing::error!(%error, "article PDF export failed");
                RenderState::Failed(format!("Failed to generate PDF: {}", error))
            }
        };

        self.state.send_replace(state.clone());
        state
    }
}
