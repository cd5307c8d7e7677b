// UI module for the Behavior Lens application

use crate::analysis::{AnalysisJob, AnalysisOutcome};
use crate::camera::CameraManager;
use crate::error::BehaviorLensError;
use crate::models::{percent_label, ScoreTriple, VideoSource};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// View state owned by the app. The render code reads this record and
/// mutates it only through the transition methods below.
#[derive(Debug, Default)]
pub struct UIState {
    /// Whether the live camera is on
    pub is_recording: bool,
    /// Whether an analysis request is in flight
    pub is_loading: bool,
    /// Latest scores; replaced wholesale on each successful analysis
    pub scores: Option<ScoreTriple>,
    /// Inline status message for the user (failures, hints)
    pub status: Option<String>,
    /// The single active video source, if any
    pub source: Option<VideoSource>,
    last_seq: u64,
    pending_seq: Option<u64>,
}

impl UIState {
    /// Sequence number the next analysis request will carry
    pub fn upcoming_seq(&self) -> u64 {
        self.last_seq + 1
    }

    /// Records that the camera stream is up and bound as the active source
    pub fn camera_started(&mut self) {
        self.is_recording = true;
        self.source = Some(VideoSource::Camera);
        self.status = None;
    }

    /// Records that the camera was released. Idempotent; only clears the
    /// active source if the camera was it.
    pub fn camera_stopped(&mut self) {
        self.is_recording = false;
        if self.source == Some(VideoSource::Camera) {
            self.source = None;
        }
    }

    /// Binds an uploaded file as the active source (camera must already be
    /// stopped by the caller; exactly one source is active at a time)
    pub fn file_selected(&mut self, source: VideoSource) {
        self.source = Some(source);
        self.status = None;
    }

    /// Marks a request as in flight under the given sequence number
    pub fn mark_in_flight(&mut self, seq: u64) {
        self.last_seq = seq;
        self.pending_seq = Some(seq);
        self.is_loading = true;
        self.status = None;
    }

    /// Applies a finished analysis outcome. Outcomes whose sequence number
    /// does not match the latest outstanding request are dropped, so a
    /// late-resolving older request can never overwrite newer results.
    pub fn apply_outcome(&mut self, outcome: AnalysisOutcome) {
        if self.pending_seq != Some(outcome.seq) {
            debug!("Dropping stale analysis outcome (seq {})", outcome.seq);
            return;
        }
        self.pending_seq = None;
        self.is_loading = false;

        match outcome.result {
            Ok(scores) => {
                self.scores = Some(scores);
                self.status = None;
            }
            Err(e) => {
                self.status = Some(format!("Analysis failed: {e}"));
            }
        }
    }

    /// Sets the inline status line
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}

/// Main application UI
pub struct BehaviorApp {
    state: UIState,
    camera: Option<CameraManager>,
    camera_index: u32,
    job_sender: mpsc::Sender<AnalysisJob>,
    outcome_receiver: mpsc::Receiver<AnalysisOutcome>,
    preview_texture: Option<egui::TextureHandle>,
}

impl BehaviorApp {
    /// Creates a new BehaviorApp
    pub fn new(
        camera_index: u32,
        job_sender: mpsc::Sender<AnalysisJob>,
        outcome_receiver: mpsc::Receiver<AnalysisOutcome>,
    ) -> Self {
        Self {
            state: UIState::default(),
            camera: None,
            camera_index,
            job_sender,
            outcome_receiver,
            preview_texture: None,
        }
    }

    /// Drains finished outcomes from the worker
    fn poll_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.state.apply_outcome(outcome);
        }
    }

    fn start_camera(&mut self) {
        let camera = CameraManager::new(self.camera_index)
            .and_then(|mut camera| camera.start_stream().map(|_| camera));
        match camera {
            Ok(camera) => {
                info!("Camera started");
                self.camera = Some(camera);
                self.state.camera_started();
            }
            Err(BehaviorLensError::PermissionDenied(detail)) => {
                error!("Camera permission denied: {}", detail);
                self.state
                    .set_status("Camera access denied. Grant camera permission and try again.");
            }
            Err(e) => {
                error!("Failed to start camera: {}", e);
                self.state.set_status(format!("Could not start camera: {e}"));
            }
        }
    }

    /// Releases the camera. Safe to call on any exit path, any number of
    /// times; after this no media tracks are active.
    fn stop_camera(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.stop();
            info!("Camera stopped");
        }
        self.preview_texture = None;
        self.state.camera_stopped();
    }

    fn toggle_camera(&mut self) {
        if self.state.is_recording {
            self.stop_camera();
        } else {
            self.start_camera();
        }
    }

    /// Opens a native file dialog and binds the chosen video file as the
    /// active source, replacing the camera if it was on
    fn select_video_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Video", &["mp4", "mov", "avi", "mkv", "webm"])
            .pick_file();
        if let Some(path) = picked {
            self.stop_camera();
            self.state.file_selected(VideoSource::File(path));
        }
    }

    /// Captures the current input and queues one analysis request. Refused
    /// while a request is already in flight (the trigger is also disabled).
    fn request_analysis(&mut self) {
        if self.state.is_loading {
            return;
        }
        let Some(source) = self.state.source.clone() else {
            self.state
                .set_status("Start the camera or choose a video file first.");
            return;
        };

        let seq = self.state.upcoming_seq();
        let job = match source {
            VideoSource::Camera => {
                let Some(camera) = self.camera.as_mut() else {
                    self.state.set_status("Camera is not running.");
                    return;
                };
                match camera.current_frame() {
                    Ok(frame) => AnalysisJob::Image { seq, frame },
                    Err(e) => {
                        warn!("Could not capture a frame: {}", e);
                        self.state
                            .set_status("Could not capture a frame. Try again.");
                        return;
                    }
                }
            }
            VideoSource::File(path) => AnalysisJob::Video { seq, path },
        };

        match self.job_sender.try_send(job) {
            Ok(()) => self.state.mark_in_flight(seq),
            Err(e) => {
                error!("Failed to queue analysis job: {}", e);
                self.state.set_status("Analysis worker is unavailable.");
            }
        }
    }

    /// Updates the preview texture from the latest camera frame
    fn update_preview(&mut self, ctx: &egui::Context) {
        if !self.state.is_recording {
            return;
        }
        if let Some(camera) = self.camera.as_mut() {
            if let Ok(frame) = camera.current_frame() {
                let color_image = egui::ColorImage::from_rgb(
                    [frame.width as usize, frame.height as usize],
                    &frame.data,
                );
                self.preview_texture =
                    Some(ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Renders the results panel: three score bars, or a hint when no
    /// analysis has run yet
    fn render_results(&self, ui: &mut egui::Ui) {
        ui.heading("Analysis Results");
        ui.add_space(8.0);

        match &self.state.scores {
            Some(scores) => {
                score_bar(ui, "Laziness", scores.laziness);
                score_bar(ui, "Attentiveness", scores.attentiveness);
                score_bar(ui, "Concentration", scores.concentration);
            }
            None => {
                ui.label("No analysis results yet. Use your webcam or upload a video to begin.");
            }
        }
    }

    /// Renders the preview area and the control buttons
    fn render_input_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Video Input");
        ui.add_space(8.0);

        match (&self.preview_texture, &self.state.source) {
            (Some(texture), _) => {
                let texture_size = texture.size_vec2();
                let aspect_ratio = texture_size.x / texture_size.y;
                let display_width = ui.available_width().min(640.0);
                let display_height = display_width / aspect_ratio;
                ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(egui::vec2(display_width, display_height)),
                );
            }
            (None, Some(source)) => {
                ui.label(format!("Selected: {}", source.label()));
            }
            (None, None) => {
                ui.label("No video source. Start the camera or upload a file.");
            }
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let toggle_label = if self.state.is_recording {
                "Stop Camera"
            } else {
                "Start Camera"
            };
            if ui.button(toggle_label).clicked() {
                self.toggle_camera();
            }
            if ui.button("Upload Video").clicked() {
                self.select_video_file();
            }

            let can_analyze = !self.state.is_loading && self.state.source.is_some();
            if ui
                .add_enabled(can_analyze, egui::Button::new("Analyze Behavior"))
                .clicked()
            {
                self.request_analysis();
            }
            if self.state.is_loading {
                ui.spinner();
                ui.label("Analyzing...");
            }
        });

        if let Some(status) = &self.state.status {
            ui.add_space(4.0);
            ui.colored_label(egui::Color32::LIGHT_RED, status);
        }
    }
}

/// Renders one score bar: label, proportional fill, and percent text
fn score_bar(ui: &mut egui::Ui, label: &str, value: f32) {
    ui.label(label);
    ui.add(egui::ProgressBar::new(value).text(percent_label(value)));
    ui.add_space(6.0);
}

impl eframe::App for BehaviorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.poll_outcomes();
        self.update_preview(ctx);

        egui::SidePanel::right("results")
            .min_width(280.0)
            .show(ctx, |ui| {
                self.render_results(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_input_panel(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.stop_camera();
    }
}
