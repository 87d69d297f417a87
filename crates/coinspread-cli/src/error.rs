use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] coinspread_core::ValidationError),

    #[error("no trading pairs found for {pair}")]
    NoData { pair: String },

    #[error(transparent)]
    Upstream(#[from] coinspread_core::UpstreamError),

    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::NoData { .. } => 3,
            Self::Upstream(_) => 4,
            Self::Serialization(_) => 5,
            Self::Command(_) | Self::Io(_) => 10,
        }
    }
}

impl From<coinspread_core::CoreError> for CliError {
    fn from(error: coinspread_core::CoreError) -> Self {
        use coinspread_core::CoreError;

        match error {
            CoreError::Upstream(error) => Self::Upstream(error),
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::NoData => Self::NoData {
                pair: String::from("the requested pair"),
            },
            CoreError::UnknownExchange { .. } => Self::Command(error.to_string()),
        }
    }
}
