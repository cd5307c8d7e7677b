// Analysis worker: runs capture encoding, the remote call, and score
// mapping off the UI thread

use crate::capture::encode_frame;
use crate::client::AnalysisClient;
use crate::error::Result;
use crate::models::{Frame, ScoreTriple};
use crate::scores::map_scores;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// One user-triggered analysis request, tagged with its sequence number
#[derive(Debug)]
pub enum AnalysisJob {
    /// Analyze a single frame captured from the live camera
    Image { seq: u64, frame: Frame },
    /// Analyze an uploaded video file
    Video { seq: u64, path: PathBuf },
}

impl AnalysisJob {
    pub fn seq(&self) -> u64 {
        match self {
            AnalysisJob::Image { seq, .. } | AnalysisJob::Video { seq, .. } => *seq,
        }
    }
}

/// Result of one analysis job, carrying the job's sequence number so the
/// controller can drop outcomes that no longer match the latest request
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub seq: u64,
    pub result: Result<ScoreTriple>,
}

/// Background worker owning the HTTP client. Receives jobs over a channel
/// and reports outcomes over another; within one job, encoding strictly
/// precedes the network call, which strictly precedes mapping.
pub struct AnalysisWorker {
    client: AnalysisClient,
    jpeg_quality: u8,
    jobs: mpsc::Receiver<AnalysisJob>,
    outcomes: mpsc::Sender<AnalysisOutcome>,
}

impl AnalysisWorker {
    /// Creates a new AnalysisWorker
    pub fn new(
        client: AnalysisClient,
        jpeg_quality: u8,
        jobs: mpsc::Receiver<AnalysisJob>,
        outcomes: mpsc::Sender<AnalysisOutcome>,
    ) -> Self {
        Self {
            client,
            jpeg_quality,
            jobs,
            outcomes,
        }
    }

    /// Runs the worker loop until the job channel closes
    pub fn run(mut self) {
        info!("Analysis worker started");
        while let Some(job) = self.jobs.blocking_recv() {
            let seq = job.seq();
            let result = self.process(job);
            if let Err(ref e) = result {
                error!("Analysis job {} failed: {}", seq, e);
            }
            if self
                .outcomes
                .blocking_send(AnalysisOutcome { seq, result })
                .is_err()
            {
                warn!("Outcome channel closed, stopping analysis worker");
                break;
            }
        }
        info!("Analysis worker stopped");
    }

    fn process(&self, job: AnalysisJob) -> Result<ScoreTriple> {
        let raw = match job {
            AnalysisJob::Image { frame, .. } => {
                let encoded = encode_frame(&frame, self.jpeg_quality)?;
                self.client.analyze_image(&encoded)?
            }
            AnalysisJob::Video { path, .. } => {
                let bytes = std::fs::read(&path)?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| "upload.mp4".to_string());
                self.client.analyze_video(&file_name, &bytes)?
            }
        };
        Ok(map_scores(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BehaviorLensError;

    #[test]
    fn job_seq_is_exposed_for_both_shapes() {
        let image = AnalysisJob::Image {
            seq: 3,
            frame: Frame::new(Vec::new(), 0, 0),
        };
        let video = AnalysisJob::Video {
            seq: 7,
            path: PathBuf::from("clip.mp4"),
        };
        assert_eq!(image.seq(), 3);
        assert_eq!(video.seq(), 7);
    }

    #[test]
    fn zero_dimension_capture_aborts_before_any_network_call() {
        // Unroutable base URL: if the worker ever issued the request the
        // error would be RemoteAnalysis, not NoFrameAvailable.
        let (_job_tx, job_rx) = mpsc::channel(1);
        let (outcome_tx, _outcome_rx) = mpsc::channel(1);
        let worker = AnalysisWorker::new(
            AnalysisClient::new("http://192.0.2.1:1"),
            80,
            job_rx,
            outcome_tx,
        );

        let result = worker.process(AnalysisJob::Image {
            seq: 1,
            frame: Frame::new(Vec::new(), 0, 480),
        });
        assert!(matches!(
            result,
            Err(BehaviorLensError::NoFrameAvailable(_))
        ));
    }

    #[test]
    fn missing_video_file_fails_before_any_network_call() {
        let (_job_tx, job_rx) = mpsc::channel(1);
        let (outcome_tx, _outcome_rx) = mpsc::channel(1);
        let worker = AnalysisWorker::new(
            AnalysisClient::new("http://192.0.2.1:1"),
            80,
            job_rx,
            outcome_tx,
        );

        let result = worker.process(AnalysisJob::Video {
            seq: 1,
            path: PathBuf::from("/nonexistent/clip.mp4"),
        });
        assert!(matches!(result, Err(BehaviorLensError::Io(_))));
    }
}
