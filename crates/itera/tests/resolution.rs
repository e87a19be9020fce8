//! End-to-end resolution scenarios against a scripted transport that
//! plays the part of every server in a small synthetic delegation tree.

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use itera_proto::{Message, Name, ResourceRecord, ResponseCode};
use itera_resolver::{
    IterativeResolver, ResolverConfig, ResolverError, Transport, UdpTransport,
};

/// What a scripted server does when asked a given name.
#[derive(Debug, Clone)]
enum Reply {
    Answer(Vec<Ipv4Addr>),
    Referral {
        zone: &'static str,
        ns: &'static str,
        glue: Option<Ipv4Addr>,
    },
    Alias {
        target: &'static str,
    },
    Rcode(ResponseCode),
    Empty,
    Silence,
    Garbage,
    WrongId,
}

struct ScriptedTransport {
    script: HashMap<(String, IpAddr), Reply>,
    queries: AtomicUsize,
}

impl ScriptedTransport {
    fn new(entries: Vec<(&str, IpAddr, Reply)>) -> Self {
        let script = entries
            .into_iter()
            .map(|(qname, server, reply)| ((qname.to_string(), server), reply))
            .collect();
        ScriptedTransport {
            script,
            queries: AtomicUsize::new(0),
        }
    }

    fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, payload: &[u8], server: SocketAddr) -> io::Result<Vec<u8>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let query = Message::parse(payload).expect("resolver sent an unparseable query");
        let qname = query
            .question()
            .expect("query without a question")
            .name
            .lowercased()
            .to_string();

        let reply = self
            .script
            .get(&(qname.clone(), server.ip()))
            .unwrap_or_else(|| panic!("unscripted query for {qname} at {}", server.ip()))
            .clone();

        let mut response = Message::response_to(&query);
        match reply {
            Reply::Answer(addresses) => {
                let owner = query.question().unwrap().name.clone();
                for address in addresses {
                    response
                        .answers
                        .push(ResourceRecord::a(owner.clone(), 300, address));
                }
            }
            Reply::Referral { zone, ns, glue } => {
                response.authorities.push(ResourceRecord::ns(
                    name(zone),
                    172800,
                    name(ns),
                ));
                if let Some(address) = glue {
                    response
                        .additionals
                        .push(ResourceRecord::a(name(ns), 172800, address));
                }
            }
            Reply::Alias { target } => {
                let owner = query.question().unwrap().name.clone();
                response
                    .answers
                    .push(ResourceRecord::cname(owner, 300, name(target)));
            }
            Reply::Rcode(rcode) => response.header.rcode = rcode,
            Reply::Empty => {}
            Reply::Silence => std::future::pending::<()>().await,
            Reply::Garbage => return Ok(vec![0xFF, 0x00, 0xAB]),
            Reply::WrongId => response.header.id = response.header.id.wrapping_add(1),
        }
        Ok(response.to_wire())
    }
}

fn name(s: &str) -> Name {
    s.parse().unwrap()
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

const ROOT: &str = "198.41.0.4";

#[tokio::test]
async fn resolves_through_glued_referrals() {
    let transport = ScriptedTransport::new(vec![
        (
            "cs.fiu.edu.",
            ip(ROOT),
            Reply::Referral {
                zone: "edu",
                ns: "a.edu-servers.net",
                glue: Some(Ipv4Addr::new(192, 5, 6, 30)),
            },
        ),
        (
            "cs.fiu.edu.",
            ip("192.5.6.30"),
            Reply::Referral {
                zone: "fiu.edu",
                ns: "ns1.fiu.edu",
                glue: Some(Ipv4Addr::new(131, 94, 80, 40)),
            },
        ),
        (
            "cs.fiu.edu.",
            ip("131.94.80.40"),
            Reply::Answer(vec![Ipv4Addr::new(131, 94, 130, 43)]),
        ),
    ]);

    let resolver = IterativeResolver::new(transport);
    let resolution = resolver.resolve(&name("cs.fiu.edu"), ip(ROOT)).await.unwrap();

    assert_eq!(resolution.addresses, vec![Ipv4Addr::new(131, 94, 130, 43)]);
    assert_eq!(resolution.trace.len(), 3);
    assert_eq!(resolution.trace[0].server, ip(ROOT));
    assert_eq!(resolution.trace[2].server, ip("131.94.80.40"));
}

#[tokio::test]
async fn all_answer_addresses_are_returned_in_order() {
    let transport = ScriptedTransport::new(vec![(
        "multi.test.",
        ip(ROOT),
        Reply::Answer(vec![
            Ipv4Addr::new(10, 0, 0, 3),
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        ]),
    )]);

    let resolution = IterativeResolver::new(transport)
        .resolve(&name("multi.test"), ip(ROOT))
        .await
        .unwrap();
    assert_eq!(
        resolution.addresses,
        vec![
            Ipv4Addr::new(10, 0, 0, 3),
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        ]
    );
}

#[tokio::test]
async fn glueless_referral_resolves_the_name_server_first() {
    let transport = ScriptedTransport::new(vec![
        (
            "cs.fiu.edu.",
            ip(ROOT),
            Reply::Referral {
                zone: "fiu.edu",
                ns: "ns.offsite.net",
                glue: None,
            },
        ),
        (
            "ns.offsite.net.",
            ip(ROOT),
            Reply::Answer(vec![Ipv4Addr::new(10, 0, 0, 53)]),
        ),
        (
            "cs.fiu.edu.",
            ip("10.0.0.53"),
            Reply::Answer(vec![Ipv4Addr::new(131, 94, 130, 43)]),
        ),
    ]);

    let resolver = IterativeResolver::new(transport);
    let resolution = resolver.resolve(&name("cs.fiu.edu"), ip(ROOT)).await.unwrap();

    assert_eq!(resolution.addresses, vec![Ipv4Addr::new(131, 94, 130, 43)]);
    // The side lookup for the name server shows up in the trace too.
    assert_eq!(resolution.trace.len(), 3);
    assert_eq!(resolver.transport().queries(), 3);
}

#[tokio::test]
async fn glueless_side_lookup_draws_from_the_shared_budget() {
    let transport = ScriptedTransport::new(vec![
        (
            "cs.fiu.edu.",
            ip(ROOT),
            Reply::Referral {
                zone: "fiu.edu",
                ns: "ns.offsite.net",
                glue: None,
            },
        ),
        (
            "ns.offsite.net.",
            ip(ROOT),
            Reply::Answer(vec![Ipv4Addr::new(10, 0, 0, 53)]),
        ),
        (
            "cs.fiu.edu.",
            ip("10.0.0.53"),
            Reply::Answer(vec![Ipv4Addr::new(131, 94, 130, 43)]),
        ),
    ]);

    let config = ResolverConfig {
        max_referrals: 2,
        ..ResolverConfig::default()
    };
    let resolver = IterativeResolver::with_config(transport, config);
    let err = resolver
        .resolve(&name("cs.fiu.edu"), ip(ROOT))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResolverError::TooManyReferrals { hops: 2, .. }
    ));
    assert_eq!(resolver.transport().queries(), 2);
}

#[tokio::test]
async fn referral_loop_stops_at_the_query_budget() {
    let a = Ipv4Addr::new(10, 7, 7, 1);
    let b = Ipv4Addr::new(10, 7, 7, 2);
    let transport = ScriptedTransport::new(vec![
        (
            "loop.test.",
            ip(ROOT),
            Reply::Referral {
                zone: "test",
                ns: "ns-a.test",
                glue: Some(a),
            },
        ),
        (
            "loop.test.",
            IpAddr::V4(a),
            Reply::Referral {
                zone: "test",
                ns: "ns-b.test",
                glue: Some(b),
            },
        ),
        (
            "loop.test.",
            IpAddr::V4(b),
            Reply::Referral {
                zone: "test",
                ns: "ns-a.test",
                glue: Some(a),
            },
        ),
    ]);

    let resolver = IterativeResolver::new(transport);
    let err = resolver.resolve(&name("loop.test"), ip(ROOT)).await.unwrap_err();

    assert!(matches!(
        err,
        ResolverError::TooManyReferrals { hops: 30, .. }
    ));
    assert_eq!(resolver.transport().queries(), 30);
}

#[tokio::test]
async fn bare_alias_is_chased_from_the_start_server() {
    let transport = ScriptedTransport::new(vec![
        (
            "www.site.test.",
            ip(ROOT),
            Reply::Alias {
                target: "web.site.test",
            },
        ),
        (
            "web.site.test.",
            ip(ROOT),
            Reply::Answer(vec![Ipv4Addr::new(10, 3, 3, 3)]),
        ),
    ]);

    let resolution = IterativeResolver::new(transport)
        .resolve(&name("www.site.test"), ip(ROOT))
        .await
        .unwrap();
    assert_eq!(resolution.addresses, vec![Ipv4Addr::new(10, 3, 3, 3)]);
    assert_eq!(resolution.trace.len(), 2);
}

#[tokio::test]
async fn second_alias_link_is_refused() {
    let transport = ScriptedTransport::new(vec![
        (
            "www.site.test.",
            ip(ROOT),
            Reply::Alias {
                target: "web.site.test",
            },
        ),
        (
            "web.site.test.",
            ip(ROOT),
            Reply::Alias {
                target: "w3.site.test",
            },
        ),
    ]);

    let err = IterativeResolver::new(transport)
        .resolve(&name("www.site.test"), ip(ROOT))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::AliasChainTooLong { limit: 1, .. }));
}

#[tokio::test]
async fn error_rcode_ends_the_resolution() {
    let transport = ScriptedTransport::new(vec![(
        "missing.test.",
        ip(ROOT),
        Reply::Rcode(ResponseCode::NxDomain),
    )]);

    let err = IterativeResolver::new(transport)
        .resolve(&name("missing.test"), ip(ROOT))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolverError::ErrorResponse {
            rcode: ResponseCode::NxDomain,
            ..
        }
    ));
}

#[tokio::test]
async fn empty_response_is_a_dead_end() {
    let transport = ScriptedTransport::new(vec![("host.test.", ip(ROOT), Reply::Empty)]);

    let err = IterativeResolver::new(transport)
        .resolve(&name("host.test"), ip(ROOT))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::DeadEnd { .. }));
}

#[tokio::test]
async fn mismatched_transaction_id_is_rejected() {
    let transport = ScriptedTransport::new(vec![("host.test.", ip(ROOT), Reply::WrongId)]);

    let err = IterativeResolver::new(transport)
        .resolve(&name("host.test"), ip(ROOT))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::ResponseMismatch { .. }));
}

#[tokio::test]
async fn unparseable_response_is_a_decode_error() {
    let transport = ScriptedTransport::new(vec![("host.test.", ip(ROOT), Reply::Garbage)]);

    let err = IterativeResolver::new(transport)
        .resolve(&name("host.test"), ip(ROOT))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::MalformedResponse { .. }));
}

#[tokio::test(start_paused = true)]
async fn silent_server_times_out() {
    let transport = ScriptedTransport::new(vec![("host.test.", ip(ROOT), Reply::Silence)]);

    let config = ResolverConfig {
        query_timeout: std::time::Duration::from_secs(1),
        ..ResolverConfig::default()
    };
    let err = IterativeResolver::with_config(transport, config)
        .resolve(&name("host.test"), ip(ROOT))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::Timeout { .. }));
}

/// Live lookup matching the classic classroom exercise: resolve
/// cs.fiu.edu starting from m.root-servers.net.
#[tokio::test]
#[ignore = "requires network access"]
async fn live_cs_fiu_edu_from_m_root() {
    let resolver = IterativeResolver::new(UdpTransport::new());
    let resolution = resolver
        .resolve(&name("cs.fiu.edu"), ip("202.12.27.33"))
        .await
        .unwrap();
    assert!(!resolution.addresses.is_empty());
    assert!(resolution.trace.len() >= 2);
}
