/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Upper bound on the diagnostic bytes kept from a failed media engine run.
pub const DIAGNOSTIC_TAIL_BYTES: usize = 2_000;
/// Upper bound on the diagnostic lines kept from a failed media engine run.
pub const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Missing or unusable provider credentials and settings. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request data rejected before any rendering work begins.
    #[error("validation error: {0}")]
    Validation(String),

    /// Frame generation failed (font loading, rasterization).
    #[error("render error: {0}")]
    Render(String),

    /// A network provider failed or answered with a non-2xx status.
    #[error("external service error{}: {detail}", status_suffix(.status))]
    ExternalService {
        /// HTTP status, when the provider answered at all.
        status: Option<u16>,
        /// Provider-supplied detail or transport error text.
        detail: String,
    },

    /// The media engine exited unsuccessfully.
    #[error("composition error: {message}: {stderr_tail}")]
    Composition {
        /// What the engine was asked to do.
        message: String,
        /// Bounded tail of the engine diagnostics.
        stderr_tail: String,
    },

    /// An external call exceeded its request-level time budget.
    #[error("timeout error: {stage} exceeded {secs}s")]
    Timeout {
        /// Pipeline stage that timed out.
        stage: &'static str,
        /// Budget in whole seconds.
        secs: u64,
    },

    /// Cancellation was requested before the named stage started.
    #[error("cancelled before {0}")]
    Cancelled(&'static str),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::ExternalService`] value.
    pub fn external(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::ExternalService {
            status,
            detail: detail.into(),
        }
    }

    /// Build a [`ReelError::Composition`] value, bounding the diagnostic tail.
    pub fn composition(message: impl Into<String>, stderr: &str) -> Self {
        Self::Composition {
            message: message.into(),
            stderr_tail: bounded_tail(stderr, DIAGNOSTIC_TAIL_BYTES, DIAGNOSTIC_TAIL_LINES),
        }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
            Self::Render(_) => "render",
            Self::ExternalService { .. } => "external_service",
            Self::Composition { .. } => "composition",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled(_) => "cancelled",
            Self::Other(_) => "internal",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Keep at most the last `max_lines` lines and `max_bytes` bytes of `text`.
///
/// The byte cut always lands on a UTF-8 character boundary.
pub fn bounded_tail(text: &str, max_bytes: usize, max_lines: usize) -> String {
    let text = text.trim();
    let mut start = text.len();
    for (seen, (idx, _)) in text.rmatch_indices('\n').enumerate() {
        if seen + 1 >= max_lines {
            start = idx + 1;
            break;
        }
    }
    if start == text.len() {
        start = 0;
    }
    let mut tail = &text[start..];
    if tail.len() > max_bytes {
        let mut cut = tail.len() - max_bytes;
        while !tail.is_char_boundary(cut) {
            cut += 1;
        }
        tail = &tail[cut..];
    }
    tail.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
