//! Errors raised by the pilot itself.
//!
//! These are harness usage mistakes: they surface to the caller immediately and are never
//! turned into a test outcome by the pilot. Errors produced *by a test body* are a different
//! thing, see [`CaughtError`](crate::outcome::CaughtError).

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::id::RunId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("run id '{0}' is already defined and locked")]
    DuplicateId(RunId),

    #[error("unknown run id: '{0}'")]
    UnknownId(RunId),

    #[error("no test ran")]
    NoTestRan,

    #[error("judgments of run '{0}' are borrowed elsewhere")]
    RecordBusy(RunId),

    #[error("test id is already defined and locked, not updatable with '{0}'")]
    IdentityLocked(RunId),

    #[error("unknown helper: {0}")]
    UnknownHelper(String),

    #[error("invalid arguments for helper {helper}: {reason}")]
    InvalidHelperArgs { helper: String, reason: String },

    #[error("resource's name: {0} is already defined")]
    DuplicateResource(String),

    #[error("resource: {0} does not exist")]
    UnknownResource(String),

    #[error("cannot auto-instantiate {class} ({reason}), supply a live instance instead")]
    Construction { class: String, reason: String },

    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("helper file not found: {}", .0.display())]
    HelperSourceNotFound(PathBuf),

    #[error("helper file {} is malformed: {source}", path.display())]
    HelperSource {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures of the reflective invoker to map a reference onto something callable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("class {0} is not registered")]
    UnknownClass(String),

    #[error("instance of type {0} does not belong to a registered class")]
    UnregisteredType(&'static str),

    #[error("method {class}::{method}() does not exist")]
    UnknownMethod { class: String, method: String },

    #[error("instance of type {found} cannot be bound to class {class}")]
    ReceiverMismatch { class: String, found: &'static str },
}
