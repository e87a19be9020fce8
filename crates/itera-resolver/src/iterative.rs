use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::time::timeout;
use tracing::{debug, warn};

use itera_proto::{Message, Name, Question, DNS_PORT};

use crate::{ResolverConfig, ResolverError, Result, Transport};

/// One query/response exchange recorded during a resolution.
#[derive(Debug, Clone)]
pub struct Hop {
    /// The server that was asked.
    pub server: IpAddr,
    /// Its decoded response.
    pub message: Message,
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The name that was resolved.
    pub name: Name,
    /// Every A address the authoritative answer carried, in response
    /// order.
    pub addresses: Vec<Ipv4Addr>,
    /// Every hop taken on the way, including glueless side lookups.
    pub trace: Vec<Hop>,
}

/// Callback invoked after each hop, before the next query goes out.
pub type HopReporter = Arc<dyn Fn(&Hop) + Send + Sync>;

/// What a single response tells us to do next.
#[derive(Debug)]
enum HopOutcome {
    /// Authoritative A answer for the current name.
    Answered(Vec<Ipv4Addr>),
    /// The name is an alias; chase the target from the start server.
    Alias(Name),
    /// Delegation with glue; ask the delegated server next.
    Referred(IpAddr),
    /// Delegation without glue; resolve this server name first.
    NeedsGlue(Name),
    /// Nothing usable in the response.
    DeadEnd,
}

/// Shared query budget for one resolution run. Glueless side lookups
/// draw from the same budget, so a delegation loop cannot hide inside
/// nested lookups.
#[derive(Debug)]
struct HopBudget {
    spent: u32,
    limit: u32,
}

impl HopBudget {
    fn new(limit: u32) -> Self {
        HopBudget { spent: 0, limit }
    }

    fn spend(&mut self, server: IpAddr) -> Result<()> {
        if self.spent >= self.limit {
            return Err(ResolverError::TooManyReferrals {
                hops: self.spent,
                server,
            });
        }
        self.spent += 1;
        Ok(())
    }
}

/// Walks the delegation tree from a starting server down to an
/// authoritative A answer.
pub struct IterativeResolver<T> {
    transport: T,
    config: ResolverConfig,
    reporter: Option<HopReporter>,
}

impl<T: Transport> IterativeResolver<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ResolverConfig::default())
    }

    pub fn with_config(transport: T, config: ResolverConfig) -> Self {
        IterativeResolver {
            transport,
            config,
            reporter: None,
        }
    }

    /// Registers a callback observing each hop as it completes.
    pub fn with_reporter(mut self, reporter: HopReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves `name` to its A addresses, starting from `start`
    /// (typically a root server) and following referrals from there.
    pub async fn resolve(&self, name: &Name, start: IpAddr) -> Result<Resolution> {
        let mut budget = HopBudget::new(self.config.max_referrals);
        let mut trace = Vec::new();
        let addresses = self
            .resolve_inner(name.clone(), start, &mut budget, &mut trace)
            .await?;
        debug!(%name, queries = budget.spent, addresses = addresses.len(), "resolution complete");
        Ok(Resolution {
            name: name.clone(),
            addresses,
            trace,
        })
    }

    /// The resolution loop proper. Boxed because glueless referrals
    /// recurse to resolve the name server's own address.
    fn resolve_inner<'a>(
        &'a self,
        qname: Name,
        start: IpAddr,
        budget: &'a mut HopBudget,
        trace: &'a mut Vec<Hop>,
    ) -> BoxFuture<'a, Result<Vec<Ipv4Addr>>> {
        async move {
            let mut qname = qname;
            let mut server = start;
            let mut alias_links = 0;

            loop {
                budget.spend(server)?;
                let response = self.exchange_query(&qname, server).await?;
                let outcome = self.classify(&qname, &response, server)?;

                let hop = Hop {
                    server,
                    message: response,
                };
                if let Some(reporter) = &self.reporter {
                    reporter(&hop);
                }
                trace.push(hop);

                match outcome {
                    HopOutcome::Answered(addresses) => return Ok(addresses),
                    HopOutcome::Alias(target) => {
                        if alias_links >= self.config.max_alias_chain {
                            return Err(ResolverError::AliasChainTooLong {
                                name: qname,
                                limit: self.config.max_alias_chain,
                            });
                        }
                        alias_links += 1;
                        debug!(%qname, %target, "chasing alias from the start server");
                        qname = target;
                        server = start;
                    }
                    HopOutcome::Referred(next) => {
                        debug!(%qname, from = %server, to = %next, "following referral");
                        server = next;
                    }
                    HopOutcome::NeedsGlue(ns_name) => {
                        debug!(%qname, %ns_name, "glueless referral, resolving name server");
                        let addresses = self
                            .resolve_inner(ns_name, start, &mut *budget, &mut *trace)
                            .await?;
                        let next = addresses
                            .first()
                            .copied()
                            .ok_or(ResolverError::NoNextServer { server })?;
                        server = IpAddr::V4(next);
                    }
                    HopOutcome::DeadEnd => {
                        warn!(%qname, %server, "response carried nothing usable");
                        return Err(ResolverError::DeadEnd {
                            server,
                            name: qname,
                        });
                    }
                }
            }
        }
        .boxed()
    }

    /// Sends one A query and returns the validated response.
    async fn exchange_query(&self, qname: &Name, server: IpAddr) -> Result<Message> {
        let query = Message::query(Question::a(qname.clone()));
        let payload = query.to_wire();
        let addr = SocketAddr::new(server, DNS_PORT);
        debug!(%qname, %server, id = query.id(), "sending query");

        let raw = timeout(
            self.config.query_timeout,
            self.transport.exchange(&payload, addr),
        )
        .await
        .map_err(|_| ResolverError::Timeout { server })?
        .map_err(|source| ResolverError::Network { server, source })?;

        let response =
            Message::parse(&raw).map_err(|source| ResolverError::MalformedResponse {
                server,
                source,
            })?;
        validate_response(&query, &response, server)?;
        Ok(response)
    }

    /// Decides the next step from a validated response.
    fn classify(&self, qname: &Name, response: &Message, server: IpAddr) -> Result<HopOutcome> {
        if !response.header.rcode.is_no_error() {
            return Err(ResolverError::ErrorResponse {
                server,
                rcode: response.header.rcode,
                name: qname.clone(),
            });
        }

        let addresses: Vec<_> = response.answer_addresses(qname).collect();
        if !addresses.is_empty() {
            return Ok(HopOutcome::Answered(addresses));
        }

        if let Some(target) = response.cname_target(qname) {
            // Servers often answer the alias and its address together.
            // Consuming that costs no extra hop and no alias link.
            let inline: Vec<_> = response.answer_addresses(target).collect();
            if !inline.is_empty() {
                return Ok(HopOutcome::Answered(inline));
            }
            return Ok(HopOutcome::Alias(target.clone()));
        }

        if response.is_referral() {
            for ns in response.referral_targets() {
                if let Some(glue) = response.glue_addresses(ns).next() {
                    return Ok(HopOutcome::Referred(IpAddr::V4(glue)));
                }
            }
            if let Some(ns) = response.referral_targets().next() {
                return Ok(HopOutcome::NeedsGlue(ns.clone()));
            }
        }

        Ok(HopOutcome::DeadEnd)
    }
}

/// Checks that a response actually answers the query we sent:
/// transaction id, the response bit, and an echoed matching question.
fn validate_response(query: &Message, response: &Message, server: IpAddr) -> Result<()> {
    if response.id() != query.id() || !response.header.is_response() {
        return Err(ResolverError::ResponseMismatch { server });
    }
    match (query.question(), response.question()) {
        (Some(sent), Some(echoed)) if sent.matches(echoed) => Ok(()),
        _ => Err(ResolverError::ResponseMismatch { server }),
    }
}
