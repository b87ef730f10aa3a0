use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Email error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("Email address error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_scraping_error() {
        let err = AppError::Scraping("walmart answered HTTP 503".to_string());
        assert_eq!(err.to_string(), "Scraping error: walmart answered HTTP 503");
    }

    #[test]
    fn test_notification_error() {
        let err = AppError::Notification("missing SMTP credentials".to_string());
        assert_eq!(err.to_string(), "Notification error: missing SMTP credentials");
    }
}
