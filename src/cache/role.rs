//! Cache Role Module
//!
//! Defines the topology position a process occupies in the grid.

use std::fmt;
use std::str::FromStr;

// == Cache Role ==
/// Topology position of a cache process.
///
/// - `Client` consumes data only and never joins the cluster
/// - `Peer` is a full cluster member without a client listener
/// - `Server` is a cluster member that also accepts client connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheRole {
    #[default]
    Client,
    Peer,
    Server,
}

impl CacheRole {
    pub fn is_client(&self) -> bool {
        matches!(self, CacheRole::Client)
    }

    pub fn is_server(&self) -> bool {
        matches!(self, CacheRole::Server)
    }

    /// Peers and servers are both cluster members.
    pub fn is_server_side(&self) -> bool {
        matches!(self, CacheRole::Peer | CacheRole::Server)
    }

    /// Canonical upper-case name, as used in member names and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            CacheRole::Client => "CLIENT",
            CacheRole::Peer => "PEER",
            CacheRole::Server => "SERVER",
        }
    }
}

impl fmt::Display for CacheRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLIENT" => Ok(CacheRole::Client),
            "PEER" => Ok(CacheRole::Peer),
            "SERVER" => Ok(CacheRole::Server),
            _ => Err("unknown cache role, expected one of CLIENT, PEER, SERVER".to_string()),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_predicates() {
        assert!(CacheRole::Client.is_client());
        assert!(!CacheRole::Client.is_server_side());

        assert!(CacheRole::Peer.is_server_side());
        assert!(!CacheRole::Peer.is_server());

        assert!(CacheRole::Server.is_server_side());
        assert!(CacheRole::Server.is_server());
        assert!(!CacheRole::Server.is_client());
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("client".parse::<CacheRole>(), Ok(CacheRole::Client));
        assert_eq!("Peer".parse::<CacheRole>(), Ok(CacheRole::Peer));
        assert_eq!(" SERVER ".parse::<CacheRole>(), Ok(CacheRole::Server));
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!("locator".parse::<CacheRole>().is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(CacheRole::Server.to_string(), "SERVER");
        assert_eq!(CacheRole::default(), CacheRole::Client);
    }
}
