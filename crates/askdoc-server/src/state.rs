//! Shared request-handler state

use std::path::PathBuf;
use std::sync::Arc;

use askdoc_rag::RagService;

/// State shared by all request handlers
///
/// The service instance is constructed once at startup and passed in; the
/// handlers themselves hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RagService>,
    pub upload_dir: PathBuf,
}
