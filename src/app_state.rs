use crate::cli::CommandLineArgs;
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::normalize::DegenerateRange;

use std::sync::Arc;

/// Shared application state passed to each chart request handler.
pub struct AppState {
    /// Base tables, computed once before the server starts.
    pub dataset: Dataset,

    /// Handling of zero-width ranges when normalising.
    pub degenerate_range: DegenerateRange,
}

impl AppState {
    /// Load the source files named by the arguments and return an [AppState].
    pub fn new(args: &CommandLineArgs) -> Result<Self, PipelineError> {
        let dataset = Dataset::load(&args.sources(), &args.pipeline_options())?;
        Ok(Self::from_dataset(dataset, args.degenerate_range))
    }

    /// Create an [AppState] over base tables that are already built.
    pub fn from_dataset(dataset: Dataset, degenerate_range: DegenerateRange) -> Self {
        Self {
            dataset,
            degenerate_range,
        }
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
