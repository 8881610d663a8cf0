//! Address of the compute runtime's head node

use std::fmt;

/// Host and client-server port of the runtime head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadAddress {
    pub host: String,
    pub port: u16,
}

impl HeadAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, suitable for socket resolution
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for HeadAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ray://{}:{}", self.host, self.port)
    }
}
