use chrono::{DateTime, Utc};

use super::{JobId, JobStage, SessionKey};

/// Where and why a job stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub stage: JobStage,
    pub cause: String,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub session: SessionKey,
    pub target_language: String,
    pub source_language_hint: Option<String>,
    pub stage: JobStage,
    pub failure: Option<JobFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal job transition {from} -> {to}")]
pub struct JobTransitionError {
    pub from: JobStage,
    pub to: JobStage,
}

impl Job {
    pub fn new(
        id: JobId,
        session: SessionKey,
        target_language: String,
        source_language_hint: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            session,
            target_language,
            source_language_hint,
            stage: JobStage::Received,
            failure: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the job one step forward. Skipping, repeating or leaving a
    /// terminal stage is rejected.
    pub fn advance(&mut self, next: JobStage) -> Result<(), JobTransitionError> {
        if self.stage.successor() != Some(next) {
            return Err(JobTransitionError {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records a failure at the current stage and makes the job terminal.
    pub fn fail(&mut self, cause: impl Into<String>) -> Result<(), JobTransitionError> {
        if self.stage.is_terminal() {
            return Err(JobTransitionError {
                from: self.stage,
                to: JobStage::Failed,
            });
        }
        self.failure = Some(JobFailure {
            stage: self.stage,
            cause: cause.into(),
        });
        self.stage = JobStage::Failed;
        self.updated_at = Utc::now();
        Ok(())
    }
}
