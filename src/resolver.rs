use crate::{Result, ScanError};
use log::{debug, info};
use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Expands host specifications into concrete host strings.
///
/// Each specification is either a CIDR subnet (expanded to every usable
/// address), a plain address, or an arbitrary hostname which is passed
/// through unchanged. No network access happens here; name resolution is
/// left to the probing and authentication stages.
pub struct HostResolver;

impl HostResolver {
    /// Resolve an ordered sequence of specifications into hosts, collapsing
    /// duplicates while preserving first-occurrence order.
    pub fn resolve(specs: &[String]) -> Result<Vec<String>> {
        let mut hosts = Vec::new();
        let mut seen = HashSet::new();

        for spec in specs {
            for host in Self::expand(spec) {
                if seen.insert(host.clone()) {
                    hosts.push(host);
                }
            }
        }

        if hosts.is_empty() {
            return Err(ScanError::Config(
                "No usable hosts after resolution".to_string(),
            ));
        }

        info!("Resolved {} hosts from {} specifications", hosts.len(), specs.len());
        debug!("Resolved hosts: {:?}", hosts);
        Ok(hosts)
    }

    /// Expand one specification. Anything that is not a valid CIDR comes
    /// back as a single literal host; hostnames are tolerated.
    fn expand(spec: &str) -> Vec<String> {
        let spec = spec.trim();

        if spec.contains('/') {
            if let Some(ips) = Self::expand_cidr(spec) {
                return ips;
            }
        }

        vec![spec.to_string()]
    }

    /// Expand a CIDR into its usable host addresses. Host bits in the base
    /// address are masked off.
    fn expand_cidr(cidr: &str) -> Option<Vec<String>> {
        let (base, prefix) = cidr.split_once('/')?;
        let prefix: u8 = prefix.parse().ok()?;

        if let Ok(base) = base.parse::<Ipv4Addr>() {
            return Self::expand_v4(base, prefix);
        }
        if let Ok(base) = base.parse::<Ipv6Addr>() {
            return Self::expand_v6(base, prefix);
        }
        None
    }

    /// Network and broadcast addresses are excluded, except for /31 (both
    /// addresses usable) and /32 (the single address itself).
    fn expand_v4(base: Ipv4Addr, prefix: u8) -> Option<Vec<String>> {
        if prefix > 32 {
            return None;
        }

        let base = u32::from(base);
        if prefix >= 31 {
            let network = if prefix == 31 { base & !1 } else { base };
            let count = if prefix == 31 { 2 } else { 1 };
            return Some(
                (network..network + count)
                    .map(|ip| Ipv4Addr::from(ip).to_string())
                    .collect(),
            );
        }

        let mask = !((1u32 << (32 - prefix)) - 1);
        let network = base & mask;
        let broadcast = network | !mask;

        Some(
            ((network + 1)..broadcast)
                .map(|ip| Ipv4Addr::from(ip).to_string())
                .collect(),
        )
    }

    /// IPv6 has no broadcast address: only the subnet-router anycast
    /// address (all host bits zero) is excluded, and /127 and /128 yield
    /// every address in the block.
    fn expand_v6(base: Ipv6Addr, prefix: u8) -> Option<Vec<String>> {
        if prefix > 128 {
            return None;
        }

        let base = u128::from(base);
        if prefix >= 127 {
            let network = if prefix == 127 { base & !1 } else { base };
            let count = if prefix == 127 { 2 } else { 1 };
            return Some(
                (network..network + count)
                    .map(|ip| Ipv6Addr::from(ip).to_string())
                    .collect(),
            );
        }

        let mask = !((1u128 << (128 - prefix)) - 1);
        let network = base & mask;
        let last = network | !mask;

        Some(
            ((network + 1)..=last)
                .map(|ip| Ipv6Addr::from(ip).to_string())
                .collect(),
        )
    }
}
