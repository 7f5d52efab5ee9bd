pub mod analysis_service;
pub mod curve_service;
pub mod file_service;
pub mod llm_service;
pub mod visualization_service;
pub mod well_service;

pub use analysis_service::{AnalysisReport, AnalysisService, Anomaly, CurveInsight, CurveStats};
pub use curve_service::CurveService;
pub use file_service::{FileService, ProcessOutcome};
pub use llm_service::{CompletionClient, GroqClient, Interpretation, LlmService};
pub use visualization_service::{pivot_to_series, CurveSeries, VisualizationService};
pub use well_service::WellService;
