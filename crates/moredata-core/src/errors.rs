use thiserror::Error;

/// Result type alias using MoreDataError
pub type Result<T> = std::result::Result<T, MoreDataError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Stable classification of every error the query layer can raise. Each kind
/// maps to a stable error code for programmatic handling and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Construction
    InvalidInput,

    // Query
    UnknownField,
    TypeMismatch,
    UnsortableField,
    QueryFailed,

    // Protocol
    AlreadyActive,
    Disposed,

    // Store writes
    NotFound,
    AlreadyExists,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::UnsortableField => "ERR_UNSORTABLE_FIELD",
            ExErrorKind::QueryFailed => "ERR_QUERY_FAILED",
            ExErrorKind::AlreadyActive => "ERR_ALREADY_ACTIVE",
            ExErrorKind::Disposed => "ERR_DISPOSED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional context
/// (operation, entity type, record id, field) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            field: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity type context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add record ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
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

    /// Get the entity type context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the record ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
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
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for MoreData operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoreDataError {
    // ===== Construction Errors =====
    /// A predicate could not be built from the supplied parts
    #[error("Malformed predicate: {reason}")]
    Construction { reason: String },

    // ===== Query Errors =====
    /// The query references a field the entity does not declare
    #[error("Unknown field '{field}' on entity {entity}")]
    UnknownField { entity: String, field: String },

    /// The operator cannot be applied to the field's declared type
    #[error("Operator {operator} cannot be applied to {field_type} field '{field}' on entity {entity}")]
    TypeMismatch {
        entity: String,
        field: String,
        operator: String,
        field_type: String,
    },

    /// The sort order references a field whose values have no total order
    #[error("Cannot sort entity {entity} by field '{field}'")]
    UnsortableField { entity: String, field: String },

    /// The store failed to execute the query
    #[error("Store failure: {message}")]
    StoreFailure { message: String },

    // ===== Protocol Errors =====
    /// `start()` was called on a result set that is already active
    #[error("Live result set is already active")]
    AlreadyActive,

    /// The result set was disposed and cannot be restarted
    #[error("Live result set has been disposed")]
    Disposed,

    // ===== Store Write Errors =====
    /// A record with the same id is already stored
    #[error("Entity already exists: {entity_id}")]
    DuplicateEntity { entity_id: String },

    /// No stored record has the given id
    #[error("Entity not found: {entity_id}")]
    EntityNotFound { entity_id: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MoreDataError {
    /// True for errors raised while the store executes a query
    ///
    /// Query errors are fatal to the live result set that observed them.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            MoreDataError::UnknownField { .. }
                | MoreDataError::TypeMismatch { .. }
                | MoreDataError::UnsortableField { .. }
                | MoreDataError::StoreFailure { .. }
        )
    }
}

/// Conversion from MoreDataError to ExError
impl From<MoreDataError> for ExError {
    fn from(err: MoreDataError) -> Self {
        match err {
            MoreDataError::Construction { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            MoreDataError::UnknownField { entity, field } => {
                ExError::new(ExErrorKind::UnknownField)
                    .with_entity(entity)
                    .with_field(field)
                    .with_message("Unknown field")
            }

            MoreDataError::TypeMismatch {
                entity,
                field,
                operator,
                field_type,
            } => ExError::new(ExErrorKind::TypeMismatch)
                .with_entity(entity)
                .with_field(field)
                .with_message(format!(
                    "Operator {} not supported on {} field",
                    operator, field_type
                )),

            MoreDataError::UnsortableField { entity, field } => {
                ExError::new(ExErrorKind::UnsortableField)
                    .with_entity(entity)
                    .with_field(field)
                    .with_message("Field cannot be used as a sort key")
            }

            MoreDataError::StoreFailure { message } => {
                ExError::new(ExErrorKind::QueryFailed).with_message(message)
            }

            MoreDataError::AlreadyActive => ExError::new(ExErrorKind::AlreadyActive)
                .with_op("start")
                .with_message("Live result set is already active"),

            MoreDataError::Disposed => ExError::new(ExErrorKind::Disposed)
                .with_message("Live result set has been disposed"),

            MoreDataError::DuplicateEntity { entity_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(entity_id)
                    .with_message("Entity already exists")
            }

            MoreDataError::EntityNotFound { entity_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(entity_id)
                .with_message("Entity not found"),

            MoreDataError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            MoreDataError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to MoreDataError
impl From<serde_json::Error> for MoreDataError {
    fn from(err: serde_json::Error) -> Self {
        MoreDataError::Serialization {
            message: err.to_string(),
        }
    }
}
