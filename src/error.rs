use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, HandlerError>;

/// Errors a handler can return to stop the dispatch chain.
///
/// Every variant stops the current emission. [`HandlerError::Halt`] is the
/// only one the emitter treats as an intentional stop rather than a failure.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("intentional halt of event execution")]
    Halt,

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn halt() -> Self {
        HandlerError::Halt
    }

    pub fn msg(message: impl Into<String>) -> Self {
        HandlerError::Message(message.into())
    }

    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        HandlerError::Other(err.into())
    }

    pub fn is_halt(&self) -> bool {
        matches!(self, HandlerError::Halt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_halt_is_halt() {
        assert!(HandlerError::halt().is_halt());
        assert!(!HandlerError::msg("boom").is_halt());
        assert!(!HandlerError::other(std::fmt::Error).is_halt());
    }

    #[test]
    fn messages_render() {
        assert_eq!(
            HandlerError::Halt.to_string(),
            "intentional halt of event execution"
        );
        assert_eq!(HandlerError::msg("boom").to_string(), "boom");
        assert_eq!(
            HandlerError::other(std::fmt::Error).to_string(),
            std::fmt::Error.to_string()
        );
    }
}
