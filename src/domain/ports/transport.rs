//! Remote Transport Port
//!
//! Abstracts the two external primitives the synchronizer drives: a
//! recursive, archive-preserving directory copy (`rsync -avz --delete`
//! semantics) and a remote shell command.

use std::fmt;
use std::sync::Arc;

use crate::domain::value_objects::Endpoint;
use crate::error::TransportError;

/// One side of a copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Directory on the machine executing the copy
    Local(String),
    /// Directory on another machine
    Remote { endpoint: Endpoint, path: String },
}

impl Location {
    pub fn path(&self) -> &str {
        match self {
            Location::Local(path) => path,
            Location::Remote { path, .. } => path,
        }
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            Location::Local(_) => None,
            Location::Remote { endpoint, .. } => Some(endpoint),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Local(path) => write!(f, "{}", path),
            Location::Remote { endpoint, path } => write!(f, "{}", endpoint.remote_spec(path)),
        }
    }
}

/// Include/exclude rule; the first rule matching an entry decides it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Include(String),
    Exclude(String),
}

impl Filter {
    /// Exclude rules for each pattern, in order
    pub fn excluding<S: AsRef<str>>(patterns: &[S]) -> Vec<Filter> {
        patterns
            .iter()
            .map(|p| Filter::Exclude(p.as_ref().to_string()))
            .collect()
    }
}

/// Mirror the contents of `source` into `destination`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub source: Location,
    pub destination: Location,
    /// Remove destination entries that are absent from the source
    pub delete_extraneous: bool,
    pub filters: Vec<Filter>,
}

impl CopyRequest {
    pub fn new(source: Location, destination: Location) -> Self {
        Self {
            source,
            destination,
            delete_extraneous: false,
            filters: Vec::new(),
        }
    }

    pub fn with_delete(mut self) -> Self {
        self.delete_extraneous = true;
        self
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// The endpoint ssh must reach; at most one side is remote
    pub fn remote_endpoint(&self) -> Option<&Endpoint> {
        self.source.endpoint().or_else(|| self.destination.endpoint())
    }
}

/// External copy and shell primitives
pub trait RemoteTransport: Send + Sync {
    /// Name of this transport (for logging)
    fn name(&self) -> &'static str;

    /// Run the copy to completion
    fn copy(&self, request: &CopyRequest) -> Result<(), TransportError>;

    /// Run `command` on `endpoint` and return its standard output
    fn exec(&self, endpoint: &Endpoint, command: &str) -> Result<String, TransportError>;
}

impl<T: RemoteTransport + ?Sized> RemoteTransport for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn copy(&self, request: &CopyRequest) -> Result<(), TransportError> {
        (**self).copy(request)
    }

    fn exec(&self, endpoint: &Endpoint, command: &str) -> Result<String, TransportError> {
        (**self).exec(endpoint, command)
    }
}

impl<T: RemoteTransport + ?Sized> RemoteTransport for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn copy(&self, request: &CopyRequest) -> Result<(), TransportError> {
        (**self).copy(request)
    }

    fn exec(&self, endpoint: &Endpoint, command: &str) -> Result<String, TransportError> {
        (**self).exec(endpoint, command)
    }
}
