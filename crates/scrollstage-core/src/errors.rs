use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to load 3D model: {0}")]
    AssetLoadFailure(String),
    #[error("Scroll range {0} is not positive")]
    DegenerateScrollRange(f64),
    #[error("Selector matched no elements: {0}")]
    MissingTrackTarget(String),
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("Script error: {0}")]
    Script(String),
}
