use std::error::Error;
use std::fmt;

/// Rejected scene or camera configuration, raised at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    OutOfRange {
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },
    Camera(String),
    WorkerPool(String),
}

impl ConfigError {
    pub fn out_of_range(parameter: &'static str, value: f64, expected: &'static str) -> Self {
        ConfigError::OutOfRange {
            parameter,
            value,
            expected,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::OutOfRange {
                parameter,
                value,
                expected,
            } => write!(f, "{} is {}, expected {}", parameter, value, expected),
            ConfigError::Camera(message) => write!(f, "invalid camera: {}", message),
            ConfigError::WorkerPool(message) => {
                write!(f, "cannot start the render workers: {}", message)
            }
        }
    }
}

impl Error for ConfigError {}
