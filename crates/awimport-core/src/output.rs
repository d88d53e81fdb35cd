//! Output variables handed back to the host pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::importer::ImportReport;

/// Result codes and error text, one pair per processor step.
///
/// The catalog-rebuild pair is always present for the pipeline's benefit;
/// this tool never rebuilds catalogs, so it stays at `0`/`""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorOutput {
    pub makecatalogs_resultcode: i32,
    pub makecatalogs_stderr: String,
    pub airwatch_resultcode: i32,
    pub airwatch_stderr: String,
}

impl ProcessorOutput {
    pub fn success() -> Self {
        Self {
            makecatalogs_resultcode: 0,
            makecatalogs_stderr: String::new(),
            airwatch_resultcode: 0,
            airwatch_stderr: String::new(),
        }
    }

    pub fn failure(error: &ImportError) -> Self {
        Self {
            airwatch_resultcode: 1,
            airwatch_stderr: error_chain(error),
            ..Self::success()
        }
    }

    /// Warnings never change the result code.
    pub fn from_result(result: &Result<ImportReport, ImportError>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => Self::failure(e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.airwatch_resultcode == 0
    }
}

fn error_chain(error: &ImportError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
