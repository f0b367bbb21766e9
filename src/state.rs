use std::path::Path;

use crate::config::AppConfig;
use crate::data::loader::read_upload;
use crate::data::model::SortOrder;
use crate::data::select::max_top_n;
use crate::pipeline::{run, PipelineOutput, PipelineRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Only the raw upload and the control values are kept between frames; every
/// change reruns the whole pipeline from the bytes.
pub struct AppState {
    pub config: AppConfig,

    /// Name of the loaded file, for the top bar.
    pub source_name: Option<String>,

    /// Raw bytes of the accepted upload (None until a file is loaded).
    upload: Option<Vec<u8>>,

    /// Current control values.
    pub request: PipelineRequest,

    /// Result of the last successful run.
    pub output: Option<PipelineOutput>,

    /// Error shown in the UI when the last upload was rejected.
    pub status_message: Option<String>,

    /// Non-fatal notices from the last run (row warnings, bad pattern).
    pub notices: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let request = PipelineRequest {
            top_n: config.default_top_n,
            ..PipelineRequest::default()
        };
        Self {
            config,
            source_name: None,
            upload: None,
            request,
            output: None,
            status_message: None,
            notices: Vec::new(),
        }
    }

    /// Read a file from disk and run the pipeline on it.
    pub fn open_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match read_upload(path, &self.config.limits) {
            Ok(bytes) => self.set_upload(name, bytes),
            Err(e) => {
                log::error!("Rejected {name}: {e}");
                self.reject(e.user_message());
            }
        }
    }

    /// Ingest a newly uploaded payload.
    pub fn set_upload(&mut self, name: String, bytes: Vec<u8>) {
        self.source_name = Some(name);
        self.upload = Some(bytes);
        self.rerun();
        if let Some(out) = &self.output {
            log::info!(
                "Loaded {} records with {} distinct states",
                out.total_records,
                out.distinct_states
            );
        }
    }

    /// Recompute everything from the held upload.
    pub fn rerun(&mut self) {
        let Some(bytes) = &self.upload else {
            return;
        };
        match run(bytes, &self.request, &self.config) {
            Ok(output) => {
                self.notices = output.notices();
                self.status_message = None;
                self.output = Some(output);
            }
            Err(e) => {
                log::error!("Upload rejected: {e}");
                self.reject(e.user_message());
            }
        }
    }

    fn reject(&mut self, message: String) {
        self.upload = None;
        self.output = None;
        self.notices.clear();
        self.status_message = Some(message);
    }

    pub fn set_pattern(&mut self, pattern: String) {
        self.request.pattern = pattern;
        self.rerun();
    }

    pub fn set_order(&mut self, order: SortOrder) {
        if self.request.order != order {
            self.request.order = order;
            self.rerun();
        }
    }

    pub fn set_top_n(&mut self, n: usize) {
        if self.request.top_n != n {
            self.request.top_n = n;
            self.rerun();
        }
    }

    /// Upper bound of the top-N slider: `min(max_top_n, matched states)`.
    pub fn slider_max(&self) -> usize {
        self.output
            .as_ref()
            .map(|out| self.slider_max_for(out))
            .unwrap_or(0)
    }

    fn slider_max_for(&self, output: &PipelineOutput) -> usize {
        max_top_n(output.matched_states, self.config.limits.max_top_n)
    }
}
