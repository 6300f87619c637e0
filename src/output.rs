//! Presentation of a parsed response.

use std::fmt::Write;

use crate::dns::{DnsMessage, ResourceRecord};

/// One record as the report shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedRecord {
    pub name: String,
    pub type_text: String,
    pub class_text: String,
    pub ttl: u32,
    pub rendered_data: String,
}

impl From<&ResourceRecord> for PresentedRecord {
    fn from(record: &ResourceRecord) -> Self {
        PresentedRecord {
            name: record.name.clone(),
            type_text: record.rtype.to_string(),
            class_text: record.rclass.to_string(),
            ttl: record.ttl,
            rendered_data: record.data.to_string(),
        }
    }
}

/// The answer, authority and additional sections, in order.
pub fn present_sections(message: &DnsMessage) -> [Vec<PresentedRecord>; 3] {
    [&message.answers, &message.authorities, &message.additionals]
        .map(|section| section.iter().map(PresentedRecord::from).collect())
}

/// Renders the full report.
///
/// `recursion_requested` is what the query asked for: the report only claims
/// a recursive answer when it was both requested and available.
pub fn render_report(message: &DnsMessage, recursion_requested: bool) -> String {
    let header = &message.header;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Authoritative: {}, Recursive: {}, Truncated: {}",
        yes_no(header.authoritative()),
        yes_no(recursion_requested && header.recursion_available()),
        yes_no(header.truncated())
    );

    let _ = writeln!(out, "Question Section({})", message.questions.len());
    for question in &message.questions {
        let _ = writeln!(out, " {}., {}, {}", question.name, question.qtype, question.qclass);
    }

    let [answers, authorities, additionals] = present_sections(message);
    for (title, records) in [
        ("Answer", answers),
        ("Authority", authorities),
        ("Additional", additionals),
    ] {
        let _ = writeln!(out, "{} Section({})", title, records.len());
        for record in records {
            let _ = writeln!(
                out,
                " {}., {}, {}, {}, {}",
                record.name, record.type_text, record.class_text, record.ttl, record.rendered_data
            );
        }
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{DnsHeader, DnsQuestion, RData, RecordClass, RecordType};
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn record(name: &str, rtype: RecordType, ttl: u32, data: RData) -> ResourceRecord {
        ResourceRecord {
            name: name.to_string(),
            rtype,
            rclass: RecordClass::IN,
            ttl,
            data,
        }
    }

    fn sample() -> DnsMessage {
        DnsMessage {
            header: DnsHeader {
                id: 1,
                flags: 0x8180,
                question_count: 1,
                answer_count: 2,
                authority_count: 0,
                additional_count: 1,
            },
            questions: vec![DnsQuestion {
                name: "www.fit.vut.cz".to_string(),
                qtype: RecordType::A,
                qclass: RecordClass::IN,
            }],
            answers: vec![
                record(
                    "www.fit.vut.cz",
                    RecordType::CNAME,
                    300,
                    RData::Name("tereza.fit.vutbr.cz".to_string()),
                ),
                record(
                    "tereza.fit.vutbr.cz",
                    RecordType::A,
                    14400,
                    RData::A(Ipv4Addr::new(147, 229, 9, 26)),
                ),
            ],
            authorities: vec![],
            additionals: vec![record(
                "tereza.fit.vutbr.cz",
                RecordType::AAAA,
                14400,
                RData::AAAA("2001:67c:1220:809::93e5:91a".parse::<Ipv6Addr>().unwrap()),
            )],
        }
    }

    #[test]
    fn test_presented_tuples() {
        let [answers, authorities, additionals] = present_sections(&sample());
        assert_eq!(
            answers[1],
            PresentedRecord {
                name: "tereza.fit.vutbr.cz".to_string(),
                type_text: "A".to_string(),
                class_text: "IN".to_string(),
                ttl: 14400,
                rendered_data: "147.229.9.26".to_string(),
            }
        );
        assert_eq!(answers[0].rendered_data, "tereza.fit.vutbr.cz");
        assert!(authorities.is_empty());
        assert_eq!(additionals[0].rendered_data, "2001:67c:1220:809::93e5:91a");
    }

    #[test]
    fn test_render_report() {
        let expected = "\
Authoritative: No, Recursive: Yes, Truncated: No
Question Section(1)
 www.fit.vut.cz., A, IN
Answer Section(2)
 www.fit.vut.cz., CNAME, IN, 300, tereza.fit.vutbr.cz
 tereza.fit.vutbr.cz., A, IN, 14400, 147.229.9.26
Authority Section(0)
Additional Section(1)
 tereza.fit.vutbr.cz., AAAA, IN, 14400, 2001:67c:1220:809::93e5:91a
";
        assert_eq!(render_report(&sample(), true), expected);
    }

    #[test]
    fn test_recursive_needs_request_and_availability() {
        let report = render_report(&sample(), false);
        assert!(report.starts_with("Authoritative: No, Recursive: No, Truncated: No\n"));

        let mut message = sample();
        message.header.flags = 0x8500;
        let report = render_report(&message, true);
        assert!(report.starts_with("Authoritative: Yes, Recursive: No, Truncated: No\n"));
    }

    #[test]
    fn test_unknown_type_is_opaque() {
        let unknown = record("x", RecordType::Unknown(16), 5, RData::Opaque(vec![3, b'a', b'b', b'c']));
        let presented = PresentedRecord::from(&unknown);
        assert_eq!(presented.type_text, "UNKNOWN");
        assert_eq!(presented.rendered_data, "\\# 4 03616263");
    }
}
