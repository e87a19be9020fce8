use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::header::{Header, HeaderFlags, HEADER_SIZE};
use crate::name::Name;
use crate::question::{Question, QuestionParser};
use crate::record::{RecordParser, ResourceRecord};
use crate::rtype::RecordType;

/// A complete DNS message: header plus the four sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Builds an iterative query carrying a single question and a
    /// random transaction id.
    pub fn query(question: Question) -> Self {
        Message {
            header: Header::query(rand::random()),
            questions: vec![question],
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// A response skeleton echoing `query`'s id and question.
    pub fn response_to(query: &Message) -> Self {
        let header = Header {
            id: query.header.id,
            flags: HeaderFlags::RESPONSE,
            ..Header::default()
        };
        Message {
            header,
            questions: query.questions.clone(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// Parses a full message from wire bytes. Section counts in the
    /// header drive how many entries are read; data running out before
    /// the counts are satisfied is an error.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Header::parse(data)?;

        let mut questions = Vec::with_capacity(header.question_count as usize);
        let mut parser = QuestionParser::new(data, HEADER_SIZE, header.question_count);
        while let Some(question) = parser.next()? {
            questions.push(question);
        }

        let mut offset = parser.offset();
        let mut sections = [
            (header.answer_count, Vec::new()),
            (header.authority_count, Vec::new()),
            (header.additional_count, Vec::new()),
        ];
        for (count, records) in sections.iter_mut() {
            let mut parser = RecordParser::new(data, offset, *count);
            while let Some(record) = parser.next()? {
                records.push(record);
            }
            offset = parser.offset();
        }
        let [(_, answers), (_, authorities), (_, additionals)] = sections;

        Ok(Message {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Encodes the message without compression, recomputing the header
    /// counts from the sections.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut header = self.header;
        header.question_count = self.questions.len() as u16;
        header.answer_count = self.answers.len() as u16;
        header.authority_count = self.authorities.len() as u16;
        header.additional_count = self.additionals.len() as u16;

        let mut buf = Vec::with_capacity(HEADER_SIZE + 64);
        header.write_to(&mut buf);
        for question in &self.questions {
            question.write_to(&mut buf);
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.write_to(&mut buf);
        }
        buf
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// The first (and in practice only) question.
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// A-record addresses in the answer section owned by `name`, in
    /// response order.
    pub fn answer_addresses(&self, name: &Name) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let name = name.clone();
        self.answers
            .iter()
            .filter(move |r| r.name == name)
            .filter_map(|r| r.rdata.as_a())
    }

    /// The target of a CNAME answer owned by `name`, if any.
    pub fn cname_target(&self, name: &Name) -> Option<&Name> {
        self.answers
            .iter()
            .filter(|r| r.name == *name && r.rtype.is(RecordType::CNAME))
            .find_map(|r| r.rdata.as_cname())
    }

    /// True when this response delegates: no answers, but NS records in
    /// the authority section.
    pub fn is_referral(&self) -> bool {
        self.answers.is_empty()
            && self
                .authorities
                .iter()
                .any(|r| r.rtype.is(RecordType::NS))
    }

    /// Name server names offered by the authority section.
    pub fn referral_targets(&self) -> impl Iterator<Item = &Name> {
        self.authorities.iter().filter_map(|r| r.rdata.as_ns())
    }

    /// Glue addresses from the additional section for a server name.
    pub fn glue_addresses(&self, server: &Name) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let server = server.clone();
        self.additionals
            .iter()
            .filter(move |r| r.name == server)
            .filter_map(|r| r.rdata.as_a())
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            self.header.opcode, self.header.rcode, self.header.id
        )?;

        let mut flags = String::new();
        for (bit, label) in [
            (HeaderFlags::RESPONSE, "qr"),
            (HeaderFlags::AUTHORITATIVE, "aa"),
            (HeaderFlags::TRUNCATED, "tc"),
            (HeaderFlags::RECURSION_DESIRED, "rd"),
            (HeaderFlags::RECURSION_AVAILABLE, "ra"),
        ] {
            if self.header.flags.contains(bit) {
                if !flags.is_empty() {
                    flags.push(' ');
                }
                flags.push_str(label);
            }
        }
        writeln!(
            f,
            "\n;; flags: {}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            flags,
            self.questions.len(),
            self.answers.len(),
            self.authorities.len(),
            self.additionals.len()
        )?;

        if !self.questions.is_empty() {
            writeln!(f, "\n;; QUESTION SECTION:")?;
            for question in &self.questions {
                writeln!(f, ";{question}")?;
            }
        }
        for (records, title) in [
            (&self.answers, "ANSWER"),
            (&self.authorities, "AUTHORITY"),
            (&self.additionals, "ADDITIONAL"),
        ] {
            if !records.is_empty() {
                writeln!(f, "\n;; {title} SECTION:")?;
                for record in records.iter() {
                    writeln!(f, "{record}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn query_round_trips() {
        let query = Message::query(Question::a(name("cs.fiu.edu")));
        let wire = query.to_wire();
        let parsed = Message::parse(&wire).unwrap();
        assert_eq!(parsed, query);
        assert!(!parsed.header.recursion_desired());
        assert_eq!(parsed.question().unwrap().name, name("cs.fiu.edu"));
    }

    #[test]
    fn referral_round_trips() {
        let query = Message::query(Question::a(name("cs.fiu.edu")));
        let mut response = Message::response_to(&query);
        response
            .authorities
            .push(ResourceRecord::ns(name("edu"), 172800, name("a.edu-servers.net")));
        response.additionals.push(ResourceRecord::a(
            name("a.edu-servers.net"),
            172800,
            Ipv4Addr::new(192, 5, 6, 30),
        ));

        let parsed = Message::parse(&response.to_wire()).unwrap();
        assert_eq!(parsed.id(), query.id());
        assert!(parsed.is_referral());
        assert_eq!(
            parsed.referral_targets().next().unwrap(),
            &name("a.edu-servers.net")
        );
        assert_eq!(
            parsed
                .glue_addresses(&name("A.EDU-SERVERS.NET"))
                .collect::<Vec<_>>(),
            vec![Ipv4Addr::new(192, 5, 6, 30)]
        );
    }

    #[test]
    fn answer_helpers_respect_owner_names() {
        let query = Message::query(Question::a(name("www.example.com")));
        let mut response = Message::response_to(&query);
        response.answers.push(ResourceRecord::cname(
            name("www.example.com"),
            300,
            name("web.example.com"),
        ));
        response.answers.push(ResourceRecord::a(
            name("web.example.com"),
            300,
            Ipv4Addr::new(203, 0, 113, 10),
        ));

        assert_eq!(
            response.cname_target(&name("www.example.com")),
            Some(&name("web.example.com"))
        );
        assert_eq!(
            response
                .answer_addresses(&name("www.example.com"))
                .count(),
            0
        );
        assert_eq!(
            response
                .answer_addresses(&name("web.example.com"))
                .collect::<Vec<_>>(),
            vec![Ipv4Addr::new(203, 0, 113, 10)]
        );
        assert!(!response.is_referral());
    }

    #[test]
    fn counts_beyond_data_are_rejected() {
        let query = Message::query(Question::a(name("example.com")));
        let mut wire = query.to_wire();
        // Claim an answer that is not present.
        wire[7] = 1;
        assert!(Message::parse(&wire).is_err());
    }

    #[test]
    fn compressed_and_uncompressed_forms_decode_equal() {
        // Hand-built response using compression pointers for every
        // repeated name.
        let mut wire = Vec::new();
        wire.extend_from_slice(&[
            0x00, 0x2A, 0x84, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        ]);
        wire.extend_from_slice(b"\x03www\x07example\x03com\x00");
        wire.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        // Answer owner is a pointer to the question name at offset 12.
        wire.extend_from_slice(&[0xC0, 0x0C]);
        wire.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        wire.extend_from_slice(&300u32.to_be_bytes());
        wire.extend_from_slice(&[0x00, 0x04, 203, 0, 113, 80]);

        let compressed = Message::parse(&wire).unwrap();
        let uncompressed = Message::parse(&compressed.to_wire()).unwrap();
        assert_eq!(compressed, uncompressed);
        assert_eq!(
            compressed
                .answer_addresses(&name("www.example.com"))
                .collect::<Vec<_>>(),
            vec![Ipv4Addr::new(203, 0, 113, 80)]
        );
    }

    #[test]
    fn display_uses_dig_sections() {
        let query = Message::query(Question::a(name("cs.fiu.edu")));
        let mut response = Message::response_to(&query);
        response.answers.push(ResourceRecord::a(
            name("cs.fiu.edu"),
            3600,
            Ipv4Addr::new(131, 94, 130, 43),
        ));
        let text = response.to_string();
        assert!(text.contains(";; QUESTION SECTION:"));
        assert!(text.contains(";; ANSWER SECTION:"));
        assert!(text.contains("cs.fiu.edu.\t3600\tIN\tA\t131.94.130.43"));
    }
}
