use std::net::Ipv4Addr;

use rand::Rng;

/// A root name server known out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootServer {
    pub name: &'static str,
    pub address: Ipv4Addr,
}

/// The thirteen IANA root servers. Resolution has to start somewhere,
/// and these addresses are stable enough to compile in.
pub static ROOT_HINTS: &[RootServer] = &[
    RootServer {
        name: "a.root-servers.net",
        address: Ipv4Addr::new(198, 41, 0, 4),
    },
    RootServer {
        name: "b.root-servers.net",
        address: Ipv4Addr::new(199, 9, 14, 201),
    },
    RootServer {
        name: "c.root-servers.net",
        address: Ipv4Addr::new(192, 33, 4, 12),
    },
    RootServer {
        name: "d.root-servers.net",
        address: Ipv4Addr::new(199, 7, 91, 13),
    },
    RootServer {
        name: "e.root-servers.net",
        address: Ipv4Addr::new(192, 203, 230, 10),
    },
    RootServer {
        name: "f.root-servers.net",
        address: Ipv4Addr::new(192, 5, 5, 241),
    },
    RootServer {
        name: "g.root-servers.net",
        address: Ipv4Addr::new(192, 112, 36, 4),
    },
    RootServer {
        name: "h.root-servers.net",
        address: Ipv4Addr::new(198, 97, 190, 53),
    },
    RootServer {
        name: "i.root-servers.net",
        address: Ipv4Addr::new(192, 36, 148, 17),
    },
    RootServer {
        name: "j.root-servers.net",
        address: Ipv4Addr::new(192, 58, 128, 30),
    },
    RootServer {
        name: "k.root-servers.net",
        address: Ipv4Addr::new(193, 0, 14, 129),
    },
    RootServer {
        name: "l.root-servers.net",
        address: Ipv4Addr::new(199, 7, 83, 42),
    },
    RootServer {
        name: "m.root-servers.net",
        address: Ipv4Addr::new(202, 12, 27, 33),
    },
];

/// Picks a root server address at random, spreading load across the
/// hints when no explicit starting server is given.
pub fn random_root() -> Ipv4Addr {
    let idx = rand::thread_rng().gen_range(0..ROOT_HINTS.len());
    ROOT_HINTS[idx].address
}
