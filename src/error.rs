use crate::domain::RequestError;
use crate::solve::SolveError;

/// Exit code for configuration, usage, and I/O failures.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for requests that fail validation.
pub const EXIT_REQUEST: u8 = 3;
/// Exit code for solver failures (unreachable target, no convergence).
pub const EXIT_SOLVE: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ERROR] {}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        Self::new(EXIT_REQUEST, err.to_string())
    }
}

impl From<SolveError> for AppError {
    fn from(err: SolveError) -> Self {
        let code = match err {
            SolveError::InvalidConfig(_) => EXIT_CONFIG,
            _ => EXIT_SOLVE,
        };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_errors_map_to_solve_exit_code() {
        let err: AppError = SolveError::Unreachable {
            target: 0.6,
            ratio_at_low: 1.0,
            ratio_at_high: 1.0,
            sigma_low: 0.01,
            sigma_high: 1e6,
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_SOLVE);
        assert!(err.to_string().starts_with("[ERROR] "));

        let err: AppError = SolveError::InvalidConfig("bad".to_string()).into();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn request_errors_map_to_request_exit_code() {
        let err: AppError = RequestError::InvertedSupport { min: 5, max: 1 }.into();
        assert_eq!(err.exit_code(), EXIT_REQUEST);
    }
}
