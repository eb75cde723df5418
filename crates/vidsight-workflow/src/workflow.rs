//! The analysis state machine.
//!
//! One run moves `Idle → Acquiring → Uploading → WaitingRemote → Generating →
//! [ExtractingThumbnails] → Done`, with any stage failure ending the run in
//! `Failed`. Terminal states reset on the next `run()`. A run in progress
//! refuses a second `run()` rather than cancelling; nothing here cancels
//! in-flight work.
//!
//! All suspension points are awaited sequentially. The playable media file is
//! the one shared resource with an explicit lifecycle: created after a video
//! blob is acquired, released on failure or when the next run supersedes it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use vidsight_gemini::GeminiClient;
use vidsight_media::{
    acquire, attach_thumbnails, FfmpegFrameCapture, FrameCapture, MediaBlob, PlayableMedia,
    SourceInput,
};
use vidsight_models::{AnalysisResult, AnalysisVariant, WorkflowPhase, WorkflowState};

use crate::config::WorkflowConfig;
use crate::error::{WorkflowError, WorkflowResult, RETRY_SUFFIX};

/// Orchestrates one analysis run at a time and publishes its state.
pub struct AnalysisWorkflow {
    config: WorkflowConfig,
    gemini: GeminiClient,
    http: reqwest::Client,
    capture: Arc<dyn FrameCapture>,
    state: Arc<watch::Sender<WorkflowState>>,
    run_seq: Arc<AtomicU64>,
    // Locked for the duration of a run; doubles as the overlap guard.
    playable: Mutex<Option<PlayableMedia>>,
}

impl AnalysisWorkflow {
    /// Create a workflow from configuration.
    pub fn new(config: WorkflowConfig) -> Self {
        let gemini = GeminiClient::new(config.api_key.clone())
            .with_base_url(config.api_base.clone())
            .with_model(config.model.clone());
        let capture = Arc::new(FfmpegFrameCapture::new(config.thumbnail_width));
        let (state, _) = watch::channel(WorkflowState::idle());

        Self {
            config,
            gemini,
            http: reqwest::Client::new(),
            capture,
            state: Arc::new(state),
            run_seq: Arc::new(AtomicU64::new(0)),
            playable: Mutex::new(None),
        }
    }

    /// Swap the frame capture implementation. Used by tests.
    pub fn with_capture(mut self, capture: Arc<dyn FrameCapture>) -> Self {
        self.capture = capture;
        self
    }

    /// Subscribe to state snapshots. The receiver sees every phase
    /// transition and progress update.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Path of the currently playable media file, if a run produced one.
    /// Unavailable while a run is in flight.
    pub async fn playable_path(&self) -> Option<PathBuf> {
        self.playable
            .lock()
            .await
            .as_ref()
            .map(|p| p.path().to_path_buf())
    }

    /// Execute one end-to-end analysis run.
    ///
    /// Refuses to start while another run is active. Validation failures are
    /// reported before any network activity and leave the machine in `Idle`.
    pub async fn run(
        &self,
        input: SourceInput,
        variant: AnalysisVariant,
    ) -> WorkflowResult<AnalysisResult> {
        let mut playable = self
            .playable
            .try_lock()
            .map_err(|_| WorkflowError::AlreadyRunning)?;

        if let Err(message) = validate(&input) {
            warn!(message = %message, "Input validation rejected the run");
            self.state.send_modify(|s| {
                *s = WorkflowState::idle();
                s.error = Some(message.clone());
            });
            return Err(WorkflowError::Validation(message));
        }

        // Fresh run: drop the previous playable file and all prior state.
        *playable = None;
        self.state.send_modify(|s| {
            *s = WorkflowState::idle();
            s.phase = WorkflowPhase::Acquiring;
            s.progress_message = "Preparing media...".to_string();
        });

        let seq = self.run_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.spawn_elapsed_ticker(seq);

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("analysis_run", run_id = %run_id, variant = variant.as_str());
        let outcome = self.execute(&input, variant, &mut playable).instrument(span).await;

        match outcome {
            Ok(result) => {
                info!(run_id = %run_id, chapters = result.chapters.len(), "Analysis complete");
                self.state.send_modify(|s| {
                    s.phase = WorkflowPhase::Done;
                    s.progress_message = "Analysis complete".to_string();
                    s.elapsed_secs = 0;
                    s.result = Some(result.clone());
                });
                Ok(result)
            }
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "Analysis failed");
                *playable = None;
                let message = format!("{} {}", err.user_message(), RETRY_SUFFIX);
                self.state.send_modify(|s| {
                    s.phase = WorkflowPhase::Failed;
                    s.elapsed_secs = 0;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        input: &SourceInput,
        variant: AnalysisVariant,
        playable: &mut Option<PlayableMedia>,
    ) -> WorkflowResult<AnalysisResult> {
        let blob = acquire(&self.http, input, self.config.proxy_base.as_deref())
            .await
            .map_err(WorkflowError::Acquisition)?;

        if blob.is_video() {
            *playable = Some(PlayableMedia::write(&blob).map_err(WorkflowError::Acquisition)?);
        }

        let MediaBlob {
            bytes,
            name,
            mime_type,
        } = blob;

        self.set_phase(WorkflowPhase::Uploading, "Uploading media...");
        let file = self
            .gemini
            .upload_file(bytes, &mime_type, &name)
            .await
            .map_err(WorkflowError::Upload)?;

        self.set_phase(WorkflowPhase::WaitingRemote, "Waiting for remote processing...");
        let file = self
            .gemini
            .wait_until_active(&file.name, self.config.poll_interval, self.config.poll_deadline)
            .await
            .map_err(WorkflowError::Processing)?;

        self.set_phase(WorkflowPhase::Generating, "Analyzing media...");
        let mut result = self
            .gemini
            .generate_analysis(variant, &file)
            .await
            .map_err(WorkflowError::from_generation)?;

        if variant.wants_thumbnails() && !result.chapters.is_empty() {
            if let Some(media) = playable.as_ref().filter(|m| m.is_video()) {
                let total = result.chapters.len();
                self.set_phase(
                    WorkflowPhase::ExtractingThumbnails,
                    format!("Capturing thumbnails (0/{})", total),
                );

                let state = self.state.clone();
                let chapters = std::mem::take(&mut result.chapters);
                result.chapters = attach_thumbnails(
                    self.capture.as_ref(),
                    media.path(),
                    chapters,
                    move |done, total| {
                        state.send_modify(|s| {
                            s.progress_message = format!("Capturing thumbnails ({}/{})", done, total);
                        });
                    },
                )
                .await
                .map_err(WorkflowError::Thumbnail)?;
            }
        }

        Ok(result)
    }

    fn set_phase(&self, phase: WorkflowPhase, message: impl Into<String>) {
        let message = message.into();
        info!(phase = phase.as_str(), "{}", message);
        self.state.send_modify(|s| {
            s.phase = phase;
            s.progress_message = message;
        });
    }

    /// Bump the cosmetic elapsed counter once per second until the run it
    /// belongs to reaches a terminal state or is superseded.
    fn spawn_elapsed_ticker(&self, seq: u64) {
        let state = self.state.clone();
        let run_seq = self.run_seq.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if run_seq.load(Ordering::SeqCst) != seq {
                    break;
                }
                let mut finished = false;
                state.send_modify(|s| {
                    if s.phase.is_in_progress() {
                        s.elapsed_secs += 1;
                    } else {
                        finished = true;
                    }
                });
                if finished {
                    break;
                }
            }
        });
    }
}

fn validate(input: &SourceInput) -> Result<(), String> {
    match input {
        SourceInput::Url { location } if location.trim().is_empty() => {
            Err("Enter a media URL to analyze.".to_string())
        }
        SourceInput::File { path } if path.as_os_str().is_empty() => {
            Err("Select a media file to analyze.".to_string())
        }
        _ => Ok(()),
    }
}
