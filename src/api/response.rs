//! Wire response of a question

use serde::Serialize;

use crate::executor::{Answer, ResultEnvelope};
use crate::table::{FileType, LoadedDataset};

/// Shape of the dataset a question was answered against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: usize,
    pub file_type: FileType,
}

impl DatasetInfo {
    pub fn of(dataset: &LoadedDataset) -> Self {
        Self {
            rows: dataset.table.row_count(),
            columns: dataset.table.column_count(),
            file_type: dataset.meta.file_type,
        }
    }
}

/// `{question, answer, explanation, analysis_type, dataset_info}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: Option<Answer>,
    pub explanation: String,
    /// The plan's `op`
    pub analysis_type: String,
    pub dataset_info: DatasetInfo,
}

impl AskResponse {
    pub fn new(question: &str, envelope: ResultEnvelope, dataset: &LoadedDataset) -> Self {
        let op = envelope.plan_used.op();
        Self {
            question: question.to_string(),
            answer: envelope.answer,
            explanation: envelope.explanation,
            analysis_type: if op.is_empty() { "unknown".to_string() } else { op },
            dataset_info: DatasetInfo::of(dataset),
        }
    }
}
