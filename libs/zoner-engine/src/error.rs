use zoner_api::{AccessError, FieldDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("type '{source_type}' declares no target type")]
    NoTargetType { source_type: &'static str },

    #[error("can't create instance of '{target_type}' declared on '{source_type}': {cause}")]
    Construction {
        target_type: &'static str,
        source_type: &'static str,
        #[source]
        cause: AccessError,
    },

    #[error("crawling failed for field '{field}' in '{owner}': {cause}")]
    FieldAccess {
        field: &'static str,
        owner: &'static str,
        #[source]
        cause: AccessError,
    },

    #[error("no such field '{field}' in '{target_type}' (mapped from '{owner}.{source_field}')")]
    MissingTargetField {
        field: String,
        target_type: &'static str,
        owner: &'static str,
        source_field: &'static str,
    },

    #[error("cycle detected: {type_name}@{addr:#x} re-entered at depth {depth}")]
    CycleDetected {
        type_name: &'static str,
        addr: usize,
        depth: usize,
    },

    #[error("target of '{source_type}' is '{actual}', not '{expected}'")]
    TargetType {
        source_type: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl MapError {
    /// Field-access failure on `field`, attributed to its declaring type.
    pub fn field_access(field: &FieldDescriptor, cause: AccessError) -> Self {
        MapError::FieldAccess {
            field: field.name(),
            owner: field.owner_name(),
            cause,
        }
    }

    /// Add context to the error.
    ///
    /// Only `Config` carries free text; other variants are returned as-is.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            MapError::Config(msg) => MapError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
