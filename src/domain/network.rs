//! Host-only network addressing for an environment.
//!
//! Every environment gets its own `192.168.<c>.0/24` VirtualBox network so
//! several directors can run side by side. `<c>` is derived from the
//! environment name with SHA-256, which gives the same subnet on every run
//! and every platform.

use sha2::{Digest, Sha256};
use std::net::Ipv4Addr;

/// Lowest third octet handed out.
pub const CLASS_C_MIN: u8 = 100;
/// Number of distinct third octets (100..=249).
pub const CLASS_C_SPAN: u8 = 150;

const DIRECTOR_HOST: u8 = 6;
const GATEWAY_HOST: u8 = 1;

pub fn class_c(env_name: &str) -> u8 {
    let digest = Sha256::digest(env_name.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let bucket = u64::from_be_bytes(prefix) % u64::from(CLASS_C_SPAN);
    // bucket < CLASS_C_SPAN, so the sum stays below 250
    CLASS_C_MIN + bucket as u8
}

/// Addresses of the director network for one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectorNetwork {
    pub class_c: u8,
}

impl DirectorNetwork {
    pub fn for_env(env_name: &str) -> Self {
        Self {
            class_c: class_c(env_name),
        }
    }

    pub fn director_ip(&self) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, self.class_c, DIRECTOR_HOST)
    }

    pub fn gateway_ip(&self) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, self.class_c, GATEWAY_HOST)
    }

    pub fn cidr(&self) -> String {
        format!("192.168.{}.0/24", self.class_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_c_is_pinned() {
        // Changing these moves existing environments to another subnet.
        assert_eq!(class_c("dev"), 131);
        assert_eq!(class_c("bosh-lite"), 172);
        assert_eq!(class_c("ci-1"), 225);
    }

    #[test]
    fn class_c_stays_in_range() {
        for name in ["a", "dev", "ci-1", "ci-2", "release_candidate", "zzzzzzzzzzzz"] {
            let c = class_c(name);
            assert!((CLASS_C_MIN..CLASS_C_MIN + CLASS_C_SPAN).contains(&c), "{name} -> {c}");
        }
    }

    #[test]
    fn addresses_share_the_subnet() {
        let net = DirectorNetwork { class_c: 123 };
        assert_eq!(net.director_ip(), Ipv4Addr::new(192, 168, 123, 6));
        assert_eq!(net.gateway_ip(), Ipv4Addr::new(192, 168, 123, 1));
        assert_eq!(net.cidr(), "192.168.123.0/24");
    }
}
