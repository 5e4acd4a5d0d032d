//! Listener settings for `vigil serve`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::ensure;
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Port the health service listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 3009;

const DEFAULT_SHUTDOWN_SECS: u64 = 30;
const UNPRIVILEGED_PORTS: RangeInclusive<u16> = 1024..=u16::MAX;
const SHUTDOWN_SECS: RangeInclusive<u64> = 1..=300;

/// Where the health service listens and how long it drains on shutdown.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Interface to bind; `0.0.0.0` exposes the health details to the network.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    #[serde(default = "loopback")]
    pub host: IpAddr,

    /// Listening port (1024-65535).
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds in-flight health checks get to finish after a shutdown signal.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = DEFAULT_SHUTDOWN_SECS)]
    pub shutdown_timeout: u64,
}

fn loopback() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: loopback(),
            port: DEFAULT_PORT,
            shutdown_timeout: DEFAULT_SHUTDOWN_SECS,
        }
    }
}

impl ServerConfig {
    /// Rejects privileged ports and shutdown windows outside 1-300 seconds.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            UNPRIVILEGED_PORTS.contains(&self.port),
            "port {} needs root privileges, pick one in 1024-65535",
            self.port
        );
        ensure!(
            SHUTDOWN_SECS.contains(&self.shutdown_timeout),
            "shutdown timeout must be 1-300 seconds, got {}",
            self.shutdown_timeout
        );
        Ok(())
    }

    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns `true` for `0.0.0.0` and `::`.
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %self.server_addr(),
            shutdown_timeout_secs = self.shutdown_timeout,
            "Listener configuration"
        );
    }
}
