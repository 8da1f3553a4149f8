//! Configuration file for environment variables.
//! Copy from `configuration.rs.example` and modify according to your environment.
//!
//! **IMPORTANT:** This file contains sensitive information and should not be
//! committed to version control. It is included in `.gitignore`.

pub const CONFIG: &str = r"
WIFI_NETWORK=Your_WiFi_SSID
WIFI_PASSWORD=Your_WiFi_Password
KNX_GATEWAY_IP=192.168.1.10
";

#[cfg(feature = "std")]
pub use daemon::{ConfigError, DaemonConfig, DaemonMode};

#[cfg(feature = "std")]
mod daemon {
    use std::fmt;
    use std::net::Ipv4Addr;

    /// Default KNXnet/IP UDP port (`KNXNETIP_DEFAULT_PORT` in the firmware build).
    const DEFAULT_PORT: u16 = 3671;
    const DEFAULT_HEARTBEAT_INTERVAL_SECS: u32 = 60;
    const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u32 = 10;
    const DEFAULT_RECONNECT_BACKOFF_MIN_SECS: u32 = 3;
    const DEFAULT_RECONNECT_BACKOFF_MAX_SECS: u32 = 60;

    /// Whether the daemon talks to the bus via tunneling (unicast, one
    /// connection) or routing (multicast, no connection).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DaemonMode {
        /// KNXnet/IP tunneling: one UDP connection to a single gateway.
        Tunneling,
        /// KNXnet/IP routing: join the `224.0.23.12` multicast group.
        Routing,
    }

    impl DaemonMode {
        fn parse(s: &str) -> Option<Self> {
            match s.to_ascii_lowercase().as_str() {
                "tunneling" | "tunnel" => Some(Self::Tunneling),
                "routing" | "route" => Some(Self::Routing),
                _ => None,
            }
        }
    }

    /// Typed configuration for the `knxd` daemon binary, loaded from
    /// environment variables. Mirrors the firmware's flat `KEY=VALUE`
    /// parsing idiom (`utility.rs`) but reads real process environment
    /// instead of a baked-in string constant.
    #[derive(Debug, Clone)]
    pub struct DaemonConfig {
        /// KNX gateway IPv4 address (tunneling) or local interface to bind
        /// and join the multicast group on (routing).
        pub gateway_host: Ipv4Addr,
        /// KNXnet/IP UDP port.
        pub gateway_port: u16,
        /// Tunneling vs. routing.
        pub mode: DaemonMode,
        /// Heartbeat (CONNECTIONSTATE_REQUEST) interval, in seconds.
        pub heartbeat_interval_secs: u32,
        /// Heartbeat response timeout before the connection is considered stale.
        pub heartbeat_timeout_secs: u32,
        /// Minimum reconnect backoff, in seconds.
        pub reconnect_backoff_min_secs: u32,
        /// Maximum reconnect backoff, in seconds.
        pub reconnect_backoff_max_secs: u32,
        /// `log` level filter, e.g. `"info"`, `"debug"`.
        pub log_level: String,
    }

    impl DaemonConfig {
        /// Load configuration from the process environment.
        ///
        /// Required: `KNX_GATEWAY_HOST`. Everything else falls back to a
        /// documented default.
        ///
        /// # Errors
        ///
        /// Returns [`ConfigError`] if `KNX_GATEWAY_HOST` is missing, or if any
        /// set variable fails to parse.
        pub fn from_env() -> Result<Self, ConfigError> {
            let gateway_host = required_var("KNX_GATEWAY_HOST")?
                .parse::<Ipv4Addr>()
                .map_err(|_| ConfigError::invalid("KNX_GATEWAY_HOST"))?;

            let gateway_port = parse_optional_var("KNX_GATEWAY_PORT", DEFAULT_PORT)?;
            let mode = match std::env::var("KNX_MODE") {
                Ok(v) => DaemonMode::parse(&v).ok_or_else(|| ConfigError::invalid("KNX_MODE"))?,
                Err(_) => DaemonMode::Tunneling,
            };
            let heartbeat_interval_secs =
                parse_optional_var("KNX_HEARTBEAT_INTERVAL_SECS", DEFAULT_HEARTBEAT_INTERVAL_SECS)?;
            let heartbeat_timeout_secs =
                parse_optional_var("KNX_HEARTBEAT_TIMEOUT_SECS", DEFAULT_HEARTBEAT_TIMEOUT_SECS)?;
            let reconnect_backoff_min_secs =
                parse_optional_var("KNX_RECONNECT_BACKOFF_MIN_SECS", DEFAULT_RECONNECT_BACKOFF_MIN_SECS)?;
            let reconnect_backoff_max_secs =
                parse_optional_var("KNX_RECONNECT_BACKOFF_MAX_SECS", DEFAULT_RECONNECT_BACKOFF_MAX_SECS)?;
            let log_level = std::env::var("KNX_LOG").unwrap_or_else(|_| "info".to_string());

            Ok(Self {
                gateway_host,
                gateway_port,
                mode,
                heartbeat_interval_secs,
                heartbeat_timeout_secs,
                reconnect_backoff_min_secs,
                reconnect_backoff_max_secs,
                log_level,
            })
        }

        /// `gateway_host` as the raw octets the library's `[u8; 4]`-based API expects.
        pub fn gateway_octets(&self) -> [u8; 4] {
            self.gateway_host.octets()
        }
    }

    fn required_var(name: &'static str) -> Result<String, ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
    }

    fn parse_optional_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
        match std::env::var(name) {
            Ok(v) => v.parse().map_err(|_| ConfigError::invalid(name)),
            Err(_) => Ok(default),
        }
    }

    /// Configuration loading errors. Kept separate from [`crate::error::KnxError`]
    /// since it is a host/process concern (missing or malformed environment
    /// variables), not a protocol error.
    #[derive(Debug)]
    pub enum ConfigError {
        /// A required environment variable was not set.
        MissingVar(&'static str),
        /// An environment variable was set but failed to parse.
        InvalidValue(&'static str),
    }

    impl ConfigError {
        fn invalid(name: &'static str) -> Self {
            Self::InvalidValue(name)
        }
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::MissingVar(name) => write!(f, "missing required environment variable {name}"),
                Self::InvalidValue(name) => write!(f, "invalid value for environment variable {name}"),
            }
        }
    }

    impl std::error::Error for ConfigError {}
}
