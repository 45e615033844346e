//! Error types.
//!
//! Only contract violations are errors: registry misuse and malformed or
//! unresolvable object links. Data-shape anomalies met during a traversal
//! degrade to missing values instead.
//!
//! Every error carries a stable numeric code, see [`TranscodeError::code`].

use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// RegistryError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("[1709649278876] Type with name \"{0}\" already registered")]
    DuplicateType(String),

    #[error("[1710478992800] Type \"{0}\" is not registered")]
    UnknownType(&'static str),

    #[error("[1710479570120] There is no type registered under name \"{0}\"")]
    UnknownTypeName(String),
}

impl RegistryError {
    pub const fn code(&self) -> u64 {
        match self {
            Self::DuplicateType(_) => 1709649278876,
            Self::UnknownType(_) => 1710478992800,
            Self::UnknownTypeName(_) => 1710479570120,
        }
    }
}

// -----------------------------------------------------------------------------
// LinkError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LinkError {
    #[error("[1743360099255] Wrong format of object link \"{0}\"")]
    MalformedLink(String),

    #[error("[1743360231473] Unknown type in object link: {0}")]
    UnknownTypeInLink(String),

    #[error("[1743360388303] There is no id property defined for type: {0}")]
    NoIdProperty(String),

    #[error("[1743360679287] Id value not specified")]
    MissingId,

    #[error("[1744044581375] Type definition not found or unnamed")]
    UnnamedType,
}

impl LinkError {
    pub const fn code(&self) -> u64 {
        match self {
            Self::MalformedLink(_) => 1743360099255,
            Self::UnknownTypeInLink(_) => 1743360231473,
            Self::NoIdProperty(_) => 1743360388303,
            Self::MissingId => 1743360679287,
            Self::UnnamedType => 1744044581375,
        }
    }
}

// -----------------------------------------------------------------------------
// TranscodeError

/// Any error raised by the transcoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TranscodeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Link(#[from] LinkError),
}

impl TranscodeError {
    /// Stable numeric code, suitable for machine matching.
    ///
    /// ```
    /// use vc_transcode::error::{LinkError, TranscodeError};
    ///
    /// let err = TranscodeError::from(LinkError::MissingId);
    /// assert_eq!(err.code(), 1743360679287);
    /// assert!(err.to_string().starts_with("[1743360679287]"));
    /// ```
    pub const fn code(&self) -> u64 {
        match self {
            Self::Registry(e) => e.code(),
            Self::Link(e) => e.code(),
        }
    }
}
