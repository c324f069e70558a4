use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    /// A hostname or path pattern failed to compile at router assembly.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    InvalidHeader(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern '{}': {}", pattern, source)
            }
            GatewayError::InvalidHeader(name) => write!(f, "invalid header name: {}", name),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}
