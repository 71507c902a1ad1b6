use std::env;
use std::net::SocketAddr;

use jiff::tz::TimeZone;

pub const DEFAULT_BUCKET: &str = "sonora";
pub const DEFAULT_TIME_ZONE: &str = "America/Santiago";

/// Which object store backs the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    S3,
    /// Process-local map; contents are lost on exit.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub store: StoreKind,
    pub bucket: String,
    pub time_zone_name: String,
    pub time_zone: TimeZone,
    /// Serve HTTP directly on this address instead of the Lambda runtime.
    pub listen_addr: Option<SocketAddr>,
}

impl ServiceConfig {
    /// Read `SONORA_*` variables from the process environment.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let store = match lookup("SONORA_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("s3") => StoreKind::S3,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(eyre::eyre!(
                    "SONORA_STORE must be \"s3\" or \"memory\", got {other:?}"
                ));
            }
        };

        let bucket = lookup("SONORA_BUCKET")
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let requested_zone = lookup("SONORA_TIME_ZONE")
            .filter(|z| !z.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let (time_zone_name, time_zone) = match TimeZone::get(&requested_zone) {
            Ok(tz) => (requested_zone, tz),
            Err(e) => {
                tracing::warn!(
                    time_zone = %requested_zone,
                    error = %e,
                    "unknown time zone, falling back to UTC"
                );
                ("UTC".to_string(), TimeZone::UTC)
            }
        };

        let listen_addr = match lookup("SONORA_LISTEN_ADDR").filter(|a| !a.trim().is_empty()) {
            Some(addr) => Some(
                addr.trim()
                    .parse()
                    .map_err(|e| eyre::eyre!("invalid SONORA_LISTEN_ADDR {addr:?}: {e}"))?,
            ),
            None => None,
        };

        Ok(Self {
            store,
            bucket,
            time_zone_name,
            time_zone,
            listen_addr,
        })
    }
}
