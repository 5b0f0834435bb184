//! Per-site address ranges
//!
//! Site `n` owns `10.{2n}.0.0/16` for its VPC and `10.{2n+1}.0.0/22` for
//! client VPN connections. VPCs are peered with the network site, so the
//! ranges must never overlap across a deployment.

use crate::error::{FbmError, FbmResult};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

pub const VPC_PREFIX_LEN: u8 = 16;
pub const VPN_PREFIX_LEN: u8 = 22;

/// Host offset of the VPC's DNS resolver
const DNS_RESOLVER_HOST: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAddressing {
    /// 0 for the network site, 1.. for nodes in section order
    pub network_number: u32,
    pub vpc_cidr: Ipv4Net,
    pub vpn_cidr: Ipv4Net,
    pub dns_resolver: Ipv4Addr,
}

impl SiteAddressing {
    pub fn for_site(network_number: u32) -> FbmResult<Self> {
        let vpc_octet = network_number
            .checked_mul(2)
            .and_then(|octet| u8::try_from(octet).ok());
        let vpn_octet = vpc_octet.and_then(|octet| octet.checked_add(1));

        let (Some(vpc_octet), Some(vpn_octet)) = (vpc_octet, vpn_octet) else {
            return Err(FbmError::configuration(
                "addressing",
                format!("site number {} is outside the 10.0.0.0/8 plan", network_number),
            ));
        };

        Ok(Self {
            network_number,
            vpc_cidr: subnet(vpc_octet, VPC_PREFIX_LEN)?,
            vpn_cidr: subnet(vpn_octet, VPN_PREFIX_LEN)?,
            dns_resolver: Ipv4Addr::new(10, vpc_octet, 0, DNS_RESOLVER_HOST),
        })
    }

    /// Whether any range of `self` intersects any range of `other`
    pub fn overlaps(&self, other: &SiteAddressing) -> bool {
        let ours = [self.vpc_cidr, self.vpn_cidr];
        let theirs = [other.vpc_cidr, other.vpn_cidr];
        ours.iter().any(|a| {
            theirs
                .iter()
                .any(|b| a.contains(&b.network()) || b.contains(&a.network()))
        })
    }
}

fn subnet(second_octet: u8, prefix_len: u8) -> FbmResult<Ipv4Net> {
    Ipv4Net::new(Ipv4Addr::new(10, second_octet, 0, 0), prefix_len)
        .map_err(|e| FbmError::configuration("addressing", e.to_string()))
}
