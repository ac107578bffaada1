use crate::chart::ChartDocument;
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::normalize::DegenerateRange;

/// Trait for chart views.
///
/// This forms the contract between the API layer and the pipeline. A view derives a fresh,
/// request-owned slice from the shared base tables and never modifies them.
pub trait View {
    /// Render the view.
    ///
    /// Returns a [ChartDocument](crate::chart::ChartDocument) ready to be serialised.
    ///
    /// # Arguments
    ///
    /// * `dataset`: Shared base tables
    /// * `policy`: Handling of zero-width ranges for views that normalise their series
    fn render(dataset: &Dataset, policy: DegenerateRange) -> Result<ChartDocument, PipelineError>;
}
