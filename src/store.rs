//! The diagram collection manager.
//!
//! This is the single holder of client-side collection state: the loaded
//! diagrams, the currently selected one, and the busy flags. Every remote
//! operation goes through here so outcomes land in exactly one place, and
//! every failure is converted into a notification at this boundary.
//!
//! Loads and generations are correlated with monotonic sequence tokens.
//! Only the most recently issued request of each kind may apply its result;
//! anything older is discarded on arrival, so a slow early response can
//! never overwrite a newer one.
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, trace, warn};

use crate::{
    demo, Diagram, DiagramBackend, DiagramCreateRequest, DiagramPage, DiagramPatch, DiaglabError,
    ExportOptions, GenerateRequest, GeneratedPreview, NotificationCenter, NotificationKind,
    RemoteSource, Result, User, ValidationReport,
};

/// Manages the signed-in user's diagrams and mediates all remote calls.
pub struct DiagramStore {
    backend: Arc<dyn DiagramBackend>,
    notifier: NotificationCenter,

    /// The loaded page of the collection, newest first as the service
    /// returns it
    diagrams: Vec<Diagram>,

    /// The diagram in detail view, if any
    current: Option<Diagram>,

    is_loading: bool,
    is_generating: bool,

    /// Sequence of the latest issued list request
    load_seq: u64,

    /// Sequence of the latest issued generation request
    generate_seq: u64,

    /// Whether a page (or the demo set) has been installed at least once.
    /// Reconciliation warnings only make sense against a loaded page.
    loaded: bool,

    /// Set when the server confirmed a change the loaded page does not
    /// reflect; cleared by the next successful load
    stale: bool,
}

impl DiagramStore {
    pub fn new(backend: Arc<dyn DiagramBackend>, notifier: NotificationCenter) -> Self {
        DiagramStore {
            backend,
            notifier,
            diagrams: Vec::new(),
            current: None,
            is_loading: false,
            is_generating: false,
            load_seq: 0,
            generate_seq: 0,
            loaded: false,
            stale: false,
        }
    }

    /// The loaded collection snapshot.
    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn current(&self) -> Option<&Diagram> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// True when the loaded page is known to lag behind the server.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Issues a list request sequence token and raises the loading flag.
    ///
    /// Split from [`finish_load`](Self::finish_load) so completion order
    /// can be driven explicitly; [`load`](Self::load) ties the two
    /// together for normal use.
    pub fn begin_load(&mut self) -> u64 {
        self.is_loading = true;
        self.load_seq += 1;
        trace!("Issued load sequence {}", self.load_seq);
        self.load_seq
    }

    /// Applies the outcome of the list request identified by `token`.
    ///
    /// Outcomes for anything but the latest issued token are discarded
    /// without touching any state, and report `Ok(None)`. A fresh success
    /// replaces the whole collection; a fresh failure leaves it untouched
    /// and emits an error notification.
    pub fn finish_load(
        &mut self,
        token: u64,
        outcome: Result<DiagramPage>,
    ) -> Result<Option<DiagramPage>> {
        if token != self.load_seq {
            debug!(
                "Discarding superseded load result (token {}, latest {})",
                token, self.load_seq
            );
            return Ok(None);
        }

        self.is_loading = false;
        match outcome {
            Ok(page) => {
                info!(
                    "Loaded {} diagrams (page {} of {} total)",
                    page.items.len(),
                    page.page,
                    page.total
                );
                self.diagrams = page.items.clone();
                self.loaded = true;
                self.stale = false;
                Ok(Some(page))
            }
            Err(e) => {
                self.notify_failure("Load failed", &e);
                Err(e)
            }
        }
    }

    /// Fetches one page of the collection and installs it.
    pub async fn load(&mut self, page: u32, limit: u32) -> Result<Option<DiagramPage>> {
        debug!("Loading diagrams page {} (limit {})", page, limit);
        let token = self.begin_load();
        let outcome = self.backend.list(page, limit).await;
        self.finish_load(token, outcome)
    }

    /// Fetches a single diagram and makes it the current selection.
    pub async fn fetch(&mut self, id: &str) -> Result<Diagram> {
        debug!("Fetching diagram {}", id);
        match self.backend.get(id).await {
            Ok(diagram) => {
                self.current = Some(diagram.clone());
                Ok(diagram)
            }
            Err(e) => {
                self.notify_failure("Load failed", &e);
                Err(e)
            }
        }
    }

    /// Issues a generation sequence token and raises the generating flag.
    pub fn begin_generation(&mut self) -> u64 {
        self.is_generating = true;
        self.generate_seq += 1;
        trace!("Issued generation sequence {}", self.generate_seq);
        self.generate_seq
    }

    /// Applies the outcome of the generation identified by `token`;
    /// superseded outcomes are discarded exactly like stale loads.
    pub fn finish_generation(
        &mut self,
        token: u64,
        outcome: Result<GeneratedPreview>,
    ) -> Result<Option<GeneratedPreview>> {
        if token != self.generate_seq {
            debug!(
                "Discarding superseded generation result (token {}, latest {})",
                token, self.generate_seq
            );
            return Ok(None);
        }

        self.is_generating = false;
        match outcome {
            Ok(preview) => {
                info!("Generation finished: {}", preview.image_url);
                Ok(Some(preview))
            }
            Err(e) => {
                self.notify_failure("Generation failed", &e);
                Err(e)
            }
        }
    }

    /// Renders source into a preview image. Does not change the collection.
    pub async fn generate(&mut self, request: GenerateRequest) -> Result<Option<GeneratedPreview>> {
        if request.code.trim().is_empty() {
            self.notifier
                .warning("Nothing to render", "the diagram source is empty");
            return Err(DiaglabError::Validation {
                message: "diagram source is empty".to_string(),
            });
        }

        let token = self.begin_generation();
        let outcome = self.backend.generate(&request).await;
        self.finish_generation(token, outcome)
    }

    /// Saves a new diagram. On success the record is prepended, so the
    /// newest entry is first just as a reload would order it.
    pub async fn create(&mut self, request: DiagramCreateRequest) -> Result<Diagram> {
        if request.title.trim().is_empty() {
            self.notifier
                .warning("Missing title", "enter a title before saving");
            return Err(DiaglabError::Validation {
                message: "a diagram needs a title".to_string(),
            });
        }

        info!("Creating diagram '{}'", request.title);
        self.is_loading = true;
        let outcome = self.backend.create(&request).await;
        self.is_loading = false;

        match outcome {
            Ok(diagram) => {
                self.diagrams.insert(0, diagram.clone());
                self.notifier.success(
                    "Diagram saved",
                    format!("\"{}\" is now in your collection", diagram.title),
                );
                Ok(diagram)
            }
            Err(e) => {
                self.notify_failure("Save failed", &e);
                Err(e)
            }
        }
    }

    /// Applies a partial update. On confirmation the record is replaced in
    /// place, keeping its position; the current selection is refreshed only
    /// when it is the updated diagram.
    ///
    /// Once a page is loaded, a confirmed update for an id that page does
    /// not contain leaves the collection untouched: the record is not
    /// inserted, the store is marked stale, and a warning asks for a
    /// reload. Before any load the mismatch is expected and stays quiet.
    pub async fn update(&mut self, id: &str, patch: DiagramPatch) -> Result<Diagram> {
        info!("Updating diagram {}", id);
        match self.backend.update(id, &patch).await {
            Ok(updated) => {
                match self.diagrams.iter().position(|d| d.id == id) {
                    Some(index) => {
                        self.diagrams[index] = updated.clone();
                        trace!("Replaced diagram {} at index {}", id, index);
                    }
                    None if self.loaded => {
                        warn!(
                            "Server confirmed update for {} which is not in the loaded page",
                            id
                        );
                        self.stale = true;
                        // Asks the user to act, so it outlives the default window
                        self.notifier.notify_with_duration(
                            NotificationKind::Warning,
                            "Collection out of date",
                            "the change was saved, but the loaded list does not contain that \
                             diagram; reload the list to see it",
                            Duration::from_secs(10),
                        );
                    }
                    None => {
                        trace!("Update for {} confirmed before any page was loaded", id);
                    }
                }

                if self.current.as_ref().is_some_and(|c| c.id == id) {
                    self.current = Some(updated.clone());
                }

                self.notifier
                    .success("Diagram updated", "your changes were saved");
                Ok(updated)
            }
            Err(e) => {
                self.notify_failure("Update failed", &e);
                Err(e)
            }
        }
    }

    /// Deletes a diagram. The local record is only dropped after the
    /// server confirms; a failed delete leaves the collection as it was.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        info!("Deleting diagram {}", id);
        match self.backend.delete(id).await {
            Ok(()) => {
                self.diagrams.retain(|d| d.id != id);
                if self.current.as_ref().is_some_and(|c| c.id == id) {
                    self.current = None;
                }
                self.notifier
                    .success("Diagram deleted", "the diagram was removed from your collection");
                Ok(())
            }
            Err(e) => {
                self.notify_failure("Delete failed", &e);
                Err(e)
            }
        }
    }

    /// Downloads a rendered image. One-shot; collection state is untouched.
    pub async fn export(&self, id: &str, options: &ExportOptions) -> Result<Vec<u8>> {
        debug!("Exporting diagram {} as {}", id, options.format);
        match self.backend.export(id, options).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                self.notify_failure("Export failed", &e);
                Err(e)
            }
        }
    }

    /// Asks the service to check source without rendering it.
    pub async fn validate(&self, request: GenerateRequest) -> Result<ValidationReport> {
        debug!("Validating {} source", request.diagram_type);
        match self.backend.validate(&request).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.notify_failure("Validation failed", &e);
                Err(e)
            }
        }
    }

    /// Fetches diagram source from a public repository URL.
    pub async fn fetch_source(&self, url: &str) -> Result<RemoteSource> {
        debug!("Importing source from {}", url);
        match self.backend.fetch_source(url).await {
            Ok(source) => Ok(source),
            Err(e) => {
                self.notify_failure("Import failed", &e);
                Err(e)
            }
        }
    }

    /// Fills the collection with the canned demo diagrams, bypassing the
    /// network entirely.
    ///
    /// Guarded by the demo sentinel: only the built-in demo identity gets
    /// synthesized data, every other user keeps whatever was loaded.
    /// Returns whether the fallback was applied.
    pub fn load_demo_fallback(&mut self, user: Option<&User>) -> bool {
        let Some(user) = user else {
            debug!("Demo fallback skipped: no user");
            return false;
        };
        if user.user_id != demo::DEMO_USER_ID {
            debug!("Demo fallback skipped for {}", user.user_id);
            return false;
        }

        self.diagrams = demo::demo_diagrams(Utc::now());
        self.loaded = true;
        self.stale = false;
        self.is_loading = false;
        info!("Loaded {} demo diagrams", self.diagrams.len());
        true
    }

    fn notify_failure(&self, title: &str, error: &DiaglabError) {
        match error {
            DiaglabError::Transport(e) => {
                log::error!("{}: {}", title, e);
                self.notifier
                    .error(title, "could not reach the diagram service");
            }
            DiaglabError::Api { message } => {
                log::error!("{}: {}", title, message);
                self.notifier.error(title, message.clone());
            }
            other => {
                log::error!("{}: {}", title, other);
                self.notifier.error(title, other.to_string());
            }
        }
    }
}
