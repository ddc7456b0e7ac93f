//! Configuration types for the solver and its HTTP front end.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Wall-clock budget for one solver run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Jobs reached after this much time are recorded as failures without
    /// being searched.
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SolverConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub solver: SolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            solver: SolverConfig::default(),
        }
    }
}
