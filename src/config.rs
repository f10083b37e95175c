use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scan: ScanConfig,
    pub discovery: DiscoveryConfig,
    pub auth: AuthConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Upper bound on concurrent authentication attempts. The effective
    /// pool is min(max_workers, total combinations).
    pub max_workers: usize,
    /// Upper bound on concurrent liveness/port probes.
    pub probe_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub skip_ping: bool,
    pub ping_timeout: u64, // milliseconds
    pub skip_port_check: bool,
    pub port: u16,
    pub port_timeout: u64, // milliseconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub backend: AuthBackend,
    pub connection_timeout: u64, // seconds
    /// Extra arguments appended to the ssh command line (exec backend).
    pub ssh_options: Vec<String>,
    /// Stop dispatching new attempts after the first success and hand off
    /// to an interactive session.
    pub exit_on_first_success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Replace passwords with a fixed mask in the rendered report.
    pub redact_passwords: bool,
    /// Emit the report as JSON instead of the text summary.
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthBackend {
    /// Spawn `sshpass`/`ssh` per attempt, like the classic shell loop.
    Exec,
    /// In-process libssh2 handshake (no external tooling required).
    Library,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig {
                max_workers: 100,
                probe_workers: 100,
            },
            discovery: DiscoveryConfig {
                skip_ping: false,
                ping_timeout: 1000,
                skip_port_check: false,
                port: 22,
                port_timeout: 1000,
            },
            auth: AuthConfig {
                backend: AuthBackend::Exec,
                connection_timeout: 10,
                ssh_options: Vec::new(),
                exit_on_first_success: false,
            },
            report: ReportConfig {
                redact_passwords: false,
                json: false,
            },
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| crate::ScanError::Unknown(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)?;
        Ok(())
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery.ping_timeout)
    }

    pub fn port_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery.port_timeout)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.auth.connection_timeout)
    }
}
