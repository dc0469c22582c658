//! Workflow error taxonomy
//!
//! Every failure surfaced by the workflow carries a machine-distinguishable
//! [`ErrorKind`] plus a human-readable message. Validation and precondition
//! failures are raised before any mutation; persistence failures abort the
//! in-flight transition.

use thiserror::Error;

use crate::models::ContractId;

/// Machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Persistence,
}

impl ErrorKind {
    /// Process exit code used by the CLI for this kind of failure.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Forbidden => 3,
            ErrorKind::NotFound => 4,
            ErrorKind::Validation => 5,
            ErrorKind::Conflict => 6,
            ErrorKind::Persistence => 7,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Forbidden => write!(f, "forbidden"),
            ErrorKind::NotFound => write!(f, "not-found"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::Persistence => write!(f, "persistence"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// Actor's role is not allowed to perform the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Contract or vendor does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Missing or malformed payload field
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The action's stage precondition is not met
    #[error("Conflict on contract {contract_id}: {message}")]
    Conflict {
        contract_id: ContractId,
        message: String,
    },

    /// Underlying store failure
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Forbidden(_) => ErrorKind::Forbidden,
            WorkflowError::NotFound { .. } => ErrorKind::NotFound,
            WorkflowError::Validation { .. } => ErrorKind::Validation,
            WorkflowError::Conflict { .. } => ErrorKind::Conflict,
            WorkflowError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    pub fn missing(field: &str) -> Self {
        WorkflowError::Validation {
            field: field.to_string(),
            message: "field is required".to_string(),
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(contract_id: ContractId, message: impl Into<String>) -> Self {
        WorkflowError::Conflict {
            contract_id,
            message: message.into(),
        }
    }

    pub fn contract_not_found(id: ContractId) -> Self {
        WorkflowError::NotFound {
            entity: "Contract",
            id: id.get(),
        }
    }

    pub fn vendor_not_found(id: crate::models::VendorId) -> Self {
        WorkflowError::NotFound {
            entity: "Vendor",
            id: id.get(),
        }
    }

    /// Wrap a storage failure, keeping the whole context chain in the message.
    pub fn persistence(err: anyhow::Error) -> Self {
        WorkflowError::Persistence(format!("{err:#}"))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
