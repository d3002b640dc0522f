pub mod sequence;
pub mod shell;
pub mod state;

pub use sequence::RequestSeq;
pub use state::{AnalysisCompletion, AnalysisRequest, AppState, Tab};
