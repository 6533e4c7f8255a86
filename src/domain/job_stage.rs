use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    Received,
    Normalizing,
    Transcribing,
    Translating,
    Delivered,
    Failed,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Received => "RECEIVED",
            JobStage::Normalizing => "NORMALIZING",
            JobStage::Transcribing => "TRANSCRIBING",
            JobStage::Translating => "TRANSLATING",
            JobStage::Delivered => "DELIVERED",
            JobStage::Failed => "FAILED",
        }
    }

    /// The only stage a job may move to on success.
    pub fn successor(&self) -> Option<JobStage> {
        match self {
            JobStage::Received => Some(JobStage::Normalizing),
            JobStage::Normalizing => Some(JobStage::Transcribing),
            JobStage::Transcribing => Some(JobStage::Translating),
            JobStage::Translating => Some(JobStage::Delivered),
            JobStage::Delivered | JobStage::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Delivered | JobStage::Failed)
    }
}

impl FromStr for JobStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(JobStage::Received),
            "NORMALIZING" => Ok(JobStage::Normalizing),
            "TRANSCRIBING" => Ok(JobStage::Transcribing),
            "TRANSLATING" => Ok(JobStage::Translating),
            "DELIVERED" => Ok(JobStage::Delivered),
            "FAILED" => Ok(JobStage::Failed),
            _ => Err(format!("Invalid job stage: {}", s)),
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
