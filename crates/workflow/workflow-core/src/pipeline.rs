//! Pipeline driver
//!
//! Runs one training request end to end and finalizes the tracking run
//! with a terminal status.

use algorithm_spi::MetricsReport;
use data_core::HttpSource;
use data_spi::RemoteSource;
use tracing::{error, info, warn};
use tracking_core::FileStore;
use tracking_spi::{RunContext, RunStatus, TrackingBackend};
use workflow_api::WorkflowConfig;
use workflow_spi::{Result, TrainOutcome, TrainRequest};

use crate::trainer::Trainer;

/// End-to-end driver around a [`Trainer`].
pub struct Pipeline<S: RemoteSource = HttpSource, B: TrackingBackend = FileStore> {
    trainer: Trainer<S, B>,
}

impl Pipeline<HttpSource, FileStore> {
    pub fn from_config(config: WorkflowConfig) -> Self {
        Self::new(Trainer::from_config(config))
    }
}

impl<S: RemoteSource, B: TrackingBackend> Pipeline<S, B> {
    pub fn new(trainer: Trainer<S, B>) -> Self {
        Self { trainer }
    }

    pub fn trainer(&self) -> &Trainer<S, B> {
        &self.trainer
    }

    pub fn trainer_mut(&mut self) -> &mut Trainer<S, B> {
        &mut self.trainer
    }

    /// Train, record and finalize; returns the in-sample metrics.
    pub fn run(&mut self, request: &TrainRequest) -> Result<MetricsReport> {
        Ok(self.run_with(request, None)?.metrics)
    }

    /// Like [`Pipeline::run`], continuing `active` when it is still running.
    pub fn run_with(&mut self, request: &TrainRequest, active: Option<RunContext>) -> Result<TrainOutcome> {
        info!(
            dataset = %request.dataset,
            model = %request.model,
            optimize = request.optimize,
            "pipeline started"
        );

        let run = self.trainer.start(request, active)?;
        match self.trainer.fit_and_record(&run, request) {
            Ok(mut outcome) => {
                outcome.run = self
                    .trainer
                    .recorder_mut()
                    .finish_run(outcome.run, RunStatus::Finished)?;
                info!(run_id = %outcome.run.run_id, metrics = %outcome.metrics, "pipeline completed");
                Ok(outcome)
            }
            Err(err) => {
                error!(run_id = %run.run.run_id, error = %err, "pipeline failed");
                if let Err(finalize) = self
                    .trainer
                    .recorder_mut()
                    .finish_run(run.run, RunStatus::Failed)
                {
                    warn!(error = %finalize, "could not mark run as failed");
                }
                Err(err)
            }
        }
    }
}
