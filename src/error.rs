/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Malformed catalog source: {0}")]
    MalformedSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Wraps a CSV parse failure with the context it happened in
    pub(crate) fn malformed(context: &str, err: csv::Error) -> Self {
        AppError::MalformedSource(format!("{}: {}", context, err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::MalformedSource("missing column `genre`".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed catalog source: missing column `genre`"
        );

        let err = AppError::InvalidInput("max_features must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: max_features must be positive");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
