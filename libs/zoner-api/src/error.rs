use std::fmt;

/// Error kind for field access errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Field is not writable through reflection.
    ReadOnly,
    /// Value does not fit the declared field type.
    TypeMismatch,
    /// Descriptor does not belong to the instance it was applied to.
    UnknownField,
    /// Instance is already borrowed elsewhere.
    Busy,
    /// Zero-argument construction failed.
    Construction,
}

/// Field access error: returned by all generated accessors and mutators.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AccessError {
    pub fn read_only(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::ReadOnly, message: msg.into() }
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::TypeMismatch, message: msg.into() }
    }

    pub fn unknown_field(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::UnknownField, message: msg.into() }
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Busy, message: msg.into() }
    }

    pub fn construction(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Construction, message: msg.into() }
    }

    /// Shorthand for a mismatch between the expected Rust type and the
    /// kind of the value that was offered.
    pub fn expected(expected: &str, got: &crate::value::Value) -> Self {
        Self::type_mismatch(format!("expected {expected}, got {}", got.kind_name()))
    }

    /// Add context to the error, preserving the original ErrorKind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AccessError {}
