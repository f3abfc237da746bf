use thiserror::Error;

/// The only failure kinds that cross the protocol boundary. Everything the
/// downstream provider can fail with is folded into `Provider` before an
/// invocation returns to the transport.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("weather provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_displays_unknown_tool() {
        let e = DispatchError::UnknownTool("nope".into());
        assert_eq!(e.to_string(), "unknown tool: nope");
    }

    #[test]
    fn it_displays_provider_message() {
        let e = DispatchError::Provider("boom".into());
        assert_eq!(e.to_string(), "weather provider error: boom");
    }
}
