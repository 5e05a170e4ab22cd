use std::net::{IpAddr, SocketAddr};

use url::Host;

use crate::domain::TargetUrl;
use crate::error::CheckError;

/// Turns raw `/check` input into a [`TargetUrl`] that is safe to probe.
///
/// Knows the address the service is listening on so that a request can never
/// make the service probe itself.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    bind_ip: IpAddr,
    bind_host: String,
    port: u16,
}

impl RequestValidator {
    /// `bound` is the address the listener actually bound to, `host` the
    /// host name it was configured with.
    pub fn new(bound: SocketAddr, host: &str) -> Self {
        Self {
            bind_ip: bound.ip(),
            bind_host: normalize_domain(host),
            port: bound.port(),
        }
    }

    pub fn validate(&self, raw: &str) -> Result<TargetUrl, CheckError> {
        if self.mentions_self(raw) {
            return Err(CheckError::ForbiddenTarget);
        }

        let target = TargetUrl::new(raw)?;
        if self.targets_self(&target) {
            return Err(CheckError::ForbiddenTarget);
        }
        Ok(target)
    }

    fn self_authorities(&self) -> Vec<String> {
        let mut hosts = vec![
            "localhost".to_string(),
            "127.0.0.1".to_string(),
            "[::1]".to_string(),
            self.bind_host.clone(),
        ];
        hosts.push(match self.bind_ip {
            IpAddr::V4(ip) => ip.to_string(),
            IpAddr::V6(ip) => format!("[{ip}]"),
        });
        hosts
            .into_iter()
            .map(|host| format!("{host}:{}", self.port))
            .collect()
    }

    /// A self authority only counts when its port is not the prefix of a
    /// longer one: `localhost:80` must not match `localhost:8081`.
    fn mentions_self(&self, raw: &str) -> bool {
        let raw = raw.to_ascii_lowercase();
        self.self_authorities().iter().any(|authority| {
            raw.match_indices(authority.as_str()).any(|(start, _)| {
                !raw[start + authority.len()..]
                    .starts_with(|c: char| c.is_ascii_digit())
            })
        })
    }

    fn targets_self(&self, target: &TargetUrl) -> bool {
        if target.effective_port() != Some(self.port) {
            return false;
        }
        match target.url().host() {
            Some(Host::Domain(domain)) => {
                let domain = normalize_domain(domain);
                domain == "localhost" || domain.ends_with(".localhost") || domain == self.bind_host
            }
            Some(Host::Ipv4(ip)) => self.is_local_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => self.is_local_ip(IpAddr::V6(ip)),
            None => false,
        }
    }

    fn is_local_ip(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        ip == self.bind_ip || ip.is_loopback() || ip.is_unspecified()
    }
}

fn normalize_domain(host: &str) -> String {
    host.trim_end_matches('.').to_ascii_lowercase()
}
