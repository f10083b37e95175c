use crate::config::Config;
use crate::{Result, ScanError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use surge_ping::{Client, Config as PingConfig, PingIdentifier, PingSequence};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

/// Below this many candidates probes run sequentially; above it they run
/// concurrently up to the configured worker cap. Purely a performance
/// tuning, the result set is identical either way.
const SEQUENTIAL_PROBE_LIMIT: usize = 5;

/// Ports tried by the TCP fallback when ICMP is unavailable.
const TCP_FALLBACK_PORTS: [u16; 4] = [22, 80, 443, 445];

#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_alive(&self, host: &str, limit: Duration) -> bool;
}

#[async_trait]
pub trait PortProbe: Send + Sync {
    async fn is_open(&self, host: &str, port: u16, limit: Duration) -> bool;
}

/// ICMP echo probe with a TCP-connect fallback for hosts where raw
/// sockets are unavailable or the address cannot be pinged.
pub struct IcmpLivenessProbe {
    ping_client: Option<Client>,
}

impl IcmpLivenessProbe {
    pub fn new() -> Self {
        let ping_client = match Client::new(&PingConfig::default()) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Failed to create ping client: {}. Falling back to TCP liveness checks.", e);
                None
            }
        };

        Self { ping_client }
    }

    async fn resolve_ip(host: &str) -> Option<IpAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Some(ip);
        }
        lookup_host(format!("{}:22", host))
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| addr.ip())
    }

    async fn icmp_ping(&self, ip: IpAddr, limit: Duration) -> bool {
        let Some(client) = &self.ping_client else {
            return false;
        };

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(limit);

        matches!(
            timeout(limit, pinger.ping(PingSequence(0), &[])).await,
            Ok(Ok(_))
        )
    }

    async fn tcp_ping(&self, host: &str, limit: Duration) -> bool {
        for port in TCP_FALLBACK_PORTS {
            if let Ok(Ok(_)) = timeout(limit, TcpStream::connect((host, port))).await {
                debug!("Host {} is alive (TCP:{})", host, port);
                return true;
            }
        }

        debug!("Host {} appears to be down", host);
        false
    }
}

impl Default for IcmpLivenessProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LivenessProbe for IcmpLivenessProbe {
    async fn is_alive(&self, host: &str, limit: Duration) -> bool {
        if let Some(ip) = Self::resolve_ip(host).await {
            if self.icmp_ping(ip, limit).await {
                debug!("Host {} is alive (ICMP)", host);
                return true;
            }
        }

        self.tcp_ping(host, limit).await
    }
}

/// Plain TCP connect check. Every connection error (timeout, refusal,
/// resolution failure) is treated as "port closed" and never propagated.
pub struct TcpPortProbe;

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn is_open(&self, host: &str, port: u16, limit: Duration) -> bool {
        match timeout(limit, TcpStream::connect((host, port))).await {
            Ok(Ok(_)) => {
                debug!("Port {} is open on {}", port, host);
                true
            }
            _ => {
                debug!("Port {} is closed on {}", port, host);
                false
            }
        }
    }
}

/// Narrows a candidate host set to those that respond to a liveness probe
/// and have the target service port open. Both stages are individually
/// skippable by configuration; liveness filtering always runs first.
pub struct ReachabilityFilter {
    config: Config,
    liveness: Arc<dyn LivenessProbe>,
    port: Arc<dyn PortProbe>,
}

impl ReachabilityFilter {
    pub fn new(config: Config) -> Self {
        Self::with_probes(config, Arc::new(IcmpLivenessProbe::new()), Arc::new(TcpPortProbe))
    }

    pub fn with_probes(
        config: Config,
        liveness: Arc<dyn LivenessProbe>,
        port: Arc<dyn PortProbe>,
    ) -> Self {
        Self {
            config,
            liveness,
            port,
        }
    }

    pub async fn filter(&self, hosts: &[String]) -> Result<Vec<String>> {
        let mut survivors: Vec<String> = hosts.to_vec();

        if self.config.discovery.skip_ping {
            debug!("Skipping ping check for all hosts");
        } else {
            info!("Checking liveness of {} hosts (timeout {:?})", survivors.len(), self.config.ping_timeout());
            survivors = self.filter_alive(survivors).await;
            info!("Found {} reachable hosts", survivors.len());
        }

        if self.config.discovery.skip_port_check {
            debug!("Skipping port check for all hosts");
        } else {
            info!("Checking SSH port {} on {} hosts", self.config.discovery.port, survivors.len());
            survivors = self.filter_port_open(survivors).await;
        }

        if survivors.is_empty() {
            return Err(ScanError::NoReachableHosts);
        }

        debug!("Filtered hosts: {:?}", survivors);
        Ok(survivors)
    }

    async fn filter_alive(&self, hosts: Vec<String>) -> Vec<String> {
        let limit = self.config.ping_timeout();
        let probe = Arc::clone(&self.liveness);

        if hosts.len() > SEQUENTIAL_PROBE_LIMIT {
            let cap = self.config.scan.probe_workers.clamp(1, hosts.len());
            debug!("Pinging {} hosts in parallel ({} workers)", hosts.len(), cap);
            let checks = stream::iter(hosts.iter().cloned())
                .map(|host| {
                    let probe = Arc::clone(&probe);
                    async move {
                        let alive = probe.is_alive(&host, limit).await;
                        (host, alive)
                    }
                })
                .buffer_unordered(cap)
                .collect::<Vec<_>>()
                .await;

            let alive: HashSet<String> = checks
                .into_iter()
                .filter(|(_, alive)| *alive)
                .map(|(host, _)| host)
                .collect();
            hosts.into_iter().filter(|h| alive.contains(h)).collect()
        } else {
            let mut out = Vec::new();
            for host in hosts {
                if probe.is_alive(&host, limit).await {
                    out.push(host);
                }
            }
            out
        }
    }

    async fn filter_port_open(&self, hosts: Vec<String>) -> Vec<String> {
        let limit = self.config.port_timeout();
        let port = self.config.discovery.port;
        let probe = Arc::clone(&self.port);

        if hosts.len() > SEQUENTIAL_PROBE_LIMIT {
            let cap = self.config.scan.probe_workers.clamp(1, hosts.len());
            let checks = stream::iter(hosts.iter().cloned())
                .map(|host| {
                    let probe = Arc::clone(&probe);
                    async move {
                        let open = probe.is_open(&host, port, limit).await;
                        (host, open)
                    }
                })
                .buffer_unordered(cap)
                .collect::<Vec<_>>()
                .await;

            let open: HashSet<String> = checks
                .into_iter()
                .filter(|(_, open)| *open)
                .map(|(host, _)| host)
                .collect();
            hosts.into_iter().filter(|h| open.contains(h)).collect()
        } else {
            let mut out = Vec::new();
            for host in hosts {
                if probe.is_open(&host, port, limit).await {
                    out.push(host);
                }
            }
            out
        }
    }
}
