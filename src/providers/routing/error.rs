use thiserror::Error;

/// Failures talking to the routing oracle.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Transport failure, timeout, or non-success status. The caller may
    /// retry.
    #[error("routing oracle unavailable: {0}")]
    Unavailable(String),
    /// The oracle responded but violated its schema. Not worth retrying.
    #[error("routing oracle returned a malformed response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unavailable() {
        let err = RoutingError::Unavailable("connection refused".into());
        assert_eq!(
            err.to_string(),
            "routing oracle unavailable: connection refused"
        );
    }

    #[test]
    fn error_display_malformed() {
        let err = RoutingError::Malformed("no routes in oracle response".into());
        assert_eq!(
            err.to_string(),
            "routing oracle returned a malformed response: no routes in oracle response"
        );
    }
}
