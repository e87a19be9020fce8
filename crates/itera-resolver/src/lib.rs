//! Iterative DNS resolution: starting from a root server, follow
//! referrals downward until an authoritative answer (or a terminal
//! failure) is reached. No caching, no recursion offloading; every
//! lookup walks the delegation tree itself.

mod hints;
mod iterative;
mod transport;

pub use hints::{random_root, RootServer, ROOT_HINTS};
pub use iterative::{Hop, HopReporter, IterativeResolver, Resolution};
pub use transport::{Transport, UdpTransport};

use std::net::IpAddr;
use std::time::Duration;

use itera_proto::{Name, ResponseCode};
use thiserror::Error;

/// Errors a resolution can end in. Each carries the server that was
/// being talked to when things went wrong.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("query to {server} timed out")]
    Timeout { server: IpAddr },

    #[error("network error talking to {server}")]
    Network {
        server: IpAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed response from {server}")]
    MalformedResponse {
        server: IpAddr,
        #[source]
        source: itera_proto::Error,
    },

    #[error("response from {server} does not match the query")]
    ResponseMismatch { server: IpAddr },

    #[error("{server} answered {rcode} for {name}")]
    ErrorResponse {
        server: IpAddr,
        rcode: ResponseCode,
        name: Name,
    },

    #[error("gave up after {hops} queries, last server {server}")]
    TooManyReferrals { hops: u32, server: IpAddr },

    #[error("referral from {server} was unusable: no name server address could be found")]
    NoNextServer { server: IpAddr },

    #[error("dead end at {server}: no answer, alias, or referral for {name}")]
    DeadEnd { server: IpAddr, name: Name },

    #[error("alias chain for {name} exceeds {limit} link(s)")]
    AliasChainTooLong { name: Name, limit: u32 },
}

pub type Result<T> = std::result::Result<T, ResolverError>;

/// Knobs for a resolution run.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// How long to wait for each individual response.
    pub query_timeout: Duration,
    /// Total query budget for one resolution, shared with any glueless
    /// name server lookups it spawns.
    pub max_referrals: u32,
    /// How many CNAME links to chase before giving up. Aliases answered
    /// together with their address in one response do not count.
    pub max_alias_chain: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            query_timeout: Duration::from_secs(5),
            max_referrals: 30,
            max_alias_chain: 1,
        }
    }
}
