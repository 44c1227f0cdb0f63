use thiserror::Error;

/// Result type alias using BlockDocError
pub type Result<T> = std::result::Result<T, BlockDocError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and reporting at the CLI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural
    IllegalRootOperation,
    NotFound,
    StaleReference,
    CycleDetected,

    // Integrity
    ChecksumDrift,
    IntegrityViolation,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::IllegalRootOperation => "ERR_ILLEGAL_ROOT_OPERATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::StaleReference => "ERR_STALE_REFERENCE",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::ChecksumDrift => "ERR_CHECKSUM_DRIFT",
            ExErrorKind::IntegrityViolation => "ERR_INTEGRITY_VIOLATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus free-form
/// context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for list, tree and document operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockDocError {
    // ===== Structural Errors =====
    /// The root has no sibling position and cannot be removed or copied
    #[error("Illegal root operation: cannot {op} the root of a tree")]
    IllegalRootOperation { op: String },

    /// Block id is not (or no longer) present in the document index
    #[error("Block not found: {block_id}")]
    BlockNotFound { block_id: String },

    /// Tree handle refers to a freed slot
    #[error("Stale tree node handle: index {index}, generation {generation}")]
    StaleNode { index: u32, generation: u32 },

    /// Sibling list handle refers to a freed slot
    #[error("Stale list handle: index {index}, generation {generation}")]
    StaleListHandle { index: u32, generation: u32 },

    /// Moving a node next to one of its own descendants
    #[error("Cycle detected: cannot {op} a node next to one of its own descendants")]
    CycleDetected { op: String },

    // ===== Integrity Errors =====
    /// Incrementally maintained subtree checksum disagrees with a full recomputation
    #[error("Checksum drift at block {block_id}: stored {stored:?}, recomputed {recomputed:?}")]
    ChecksumDrift {
        block_id: String,
        stored: String,
        recomputed: String,
    },

    /// Tree links, sibling lists or the id index disagree with each other
    #[error("Integrity violation: {reason}")]
    IntegrityViolation { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<BlockDocError> for ExError {
    fn from(err: BlockDocError) -> Self {
        match err {
            BlockDocError::IllegalRootOperation { op } => {
                ExError::new(ExErrorKind::IllegalRootOperation)
                    .with_message(format!("Cannot {} the root", op))
                    .with_op(op)
            }

            BlockDocError::BlockNotFound { block_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(block_id)
                .with_message("Block not found"),

            BlockDocError::StaleNode { index, generation } => {
                ExError::new(ExErrorKind::StaleReference).with_message(format!(
                    "Tree node handle {}:{} is stale",
                    index, generation
                ))
            }

            BlockDocError::StaleListHandle { index, generation } => {
                ExError::new(ExErrorKind::StaleReference).with_message(format!(
                    "List handle {}:{} is stale",
                    index, generation
                ))
            }

            BlockDocError::CycleDetected { op } => ExError::new(ExErrorKind::CycleDetected)
                .with_message("Location lies inside the moved subtree")
                .with_op(op),

            BlockDocError::ChecksumDrift {
                block_id,
                stored,
                recomputed,
            } => ExError::new(ExErrorKind::ChecksumDrift)
                .with_entity_id(block_id)
                .with_message(format!("stored {:?}, recomputed {:?}", stored, recomputed)),

            BlockDocError::IntegrityViolation { reason } => {
                ExError::new(ExErrorKind::IntegrityViolation).with_message(reason)
            }

            BlockDocError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            BlockDocError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to BlockDocError
impl From<serde_json::Error> for BlockDocError {
    fn from(err: serde_json::Error) -> Self {
        BlockDocError::Serialization {
            message: err.to_string(),
        }
    }
}
