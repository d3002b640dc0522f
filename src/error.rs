/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Delivery address is missing")]
    MissingAddress,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl AppError {
    /// Text shown to the shopper when an action fails.
    ///
    /// Credential problems ask for the key again, checkout validation blocks
    /// with a specific reason, everything else is a generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(_) => {
                "Your API key is missing or was rejected. Please enter it again.".to_string()
            }
            AppError::EmptyCart => "Your cart is empty!".to_string(),
            AppError::MissingAddress => "Please add a delivery address!".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Transport(_)
            | AppError::ExternalApi(_)
            | AppError::MalformedResponse(_)
            | AppError::Serialization(_) => {
                "Something went wrong while getting recommendations. Please try again.".to_string()
            }
            AppError::Storage(_) => "Could not save your data locally.".to_string(),
        }
    }

    /// Whether the shopper should be sent back to credential entry.
    pub fn needs_credential(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
