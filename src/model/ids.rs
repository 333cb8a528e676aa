use std::fmt;

/// Identifies a server by its endpoint, e.g. `"db-1.internal:27017"`.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ServerId(String);

impl ServerId {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        ServerId(endpoint.into())
    }

    pub fn endpoint(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a single connection. `local_value` is only unique per server, so the owning server is
/// part of the identity.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ConnectionId {
    server_id: ServerId,
    local_value: u64,
}

impl ConnectionId {
    pub fn new(server_id: ServerId, local_value: u64) -> Self {
        ConnectionId { server_id, local_value }
    }

    pub fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    pub fn local_value(&self) -> u64 {
        self.local_value
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.server_id, self.local_value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
