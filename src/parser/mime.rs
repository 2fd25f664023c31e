//! RFC 822 / MIME parsing with `mailparse`.

use chrono::{DateTime, Utc};
use mailparse::{DispositionType, MailAddr, MailHeaderMap, ParsedMail, parse_mail};
use std::collections::BTreeMap;

use super::RecordParser;
use crate::error::ParseError;
use crate::{AttachmentMeta, ParsedRecord};

/// Default parser for `.eml` files. Requires a header block with a `From` header.
#[derive(Clone, Copy, Debug, Default)]
pub struct MailParser;

impl RecordParser for MailParser {
    fn parse(&self, raw: &[u8]) -> Result<ParsedRecord, ParseError> {
        parse_email(raw)
    }
}

/// Strip NUL bytes and surrounding whitespace.
fn sanitize_text(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// Drop angle brackets and whitespace around a Message-ID.
fn normalize_message_id(raw: Option<String>) -> Option<String> {
    raw.and_then(|id| {
        let cleaned = id.trim().trim_matches(&['<', '>'][..]).trim();
        if cleaned.is_empty() {
            None
        } else {
            Some(sanitize_text(cleaned))
        }
    })
}

/// Lowercased addresses from an address header (To, Cc, Bcc). Groups are flattened.
fn parse_addresses(header_value: &str) -> Vec<String> {
    let Ok(list) = mailparse::addrparse(header_value) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for addr in list.iter() {
        match addr {
            MailAddr::Single(info) => out.push(info.addr.to_lowercase()),
            MailAddr::Group(group) => {
                out.extend(group.addrs.iter().map(|info| info.addr.to_lowercase()))
            }
        }
    }
    out
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let ts = mailparse::dateparse(raw).ok()?;
    DateTime::from_timestamp(ts, 0)
}

/// Walk the MIME tree: first text/plain and text/html bodies, attachments as metadata only.
fn collect_parts(
    part: &ParsedMail<'_>,
    text: &mut Option<String>,
    html: &mut Option<String>,
    attachments: &mut Vec<AttachmentMeta>,
) {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            collect_parts(sub, text, html, attachments);
        }
        return;
    }
    let disposition = part.get_content_disposition();
    let mimetype = part.ctype.mimetype.to_lowercase();
    if matches!(disposition.disposition, DispositionType::Attachment) {
        let filename = disposition
            .params
            .get("filename")
            .or_else(|| part.ctype.params.get("name"))
            .cloned();
        let size = part.get_body_raw().map(|b| b.len()).unwrap_or(0);
        attachments.push(AttachmentMeta {
            filename,
            content_type: mimetype,
            size,
        });
        return;
    }
    let slot = match mimetype.as_str() {
        "text/plain" => text,
        "text/html" => html,
        _ => return,
    };
    if slot.is_none()
        && let Ok(body) = part.get_body()
    {
        *slot = Some(sanitize_text(&body));
    }
}

/// Parse one message. Input must be non-empty and carry a `From` header.
pub fn parse_email(raw: &[u8]) -> Result<ParsedRecord, ParseError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty);
    }
    let parsed = parse_mail(raw)?;
    if parsed.headers.is_empty() {
        return Err(ParseError::Malformed("no header block".to_string()));
    }

    let from_raw = parsed
        .headers
        .get_first_value("From")
        .ok_or(ParseError::MissingHeader("From"))?;
    let from = match mailparse::addrparse(&from_raw) {
        Ok(list) => list
            .extract_single_info()
            .map(|info| info.addr.to_lowercase())
            .unwrap_or_else(|| sanitize_text(&from_raw)),
        Err(_) => sanitize_text(&from_raw),
    };
    if from.is_empty() {
        return Err(ParseError::MissingHeader("From"));
    }

    let header_list = |name: &str| {
        parsed
            .headers
            .get_first_value(name)
            .map(|v| parse_addresses(&v))
            .unwrap_or_default()
    };

    let mut headers = BTreeMap::new();
    for header in &parsed.headers {
        // First occurrence wins (Received chains etc. keep their top entry).
        headers
            .entry(header.get_key())
            .or_insert_with(|| sanitize_text(&header.get_value()));
    }

    let mut body_text = None;
    let mut body_html = None;
    let mut attachments = Vec::new();
    collect_parts(&parsed, &mut body_text, &mut body_html, &mut attachments);

    Ok(ParsedRecord {
        message_id: normalize_message_id(parsed.headers.get_first_value("Message-ID")),
        from,
        to: header_list("To"),
        cc: header_list("Cc"),
        bcc: header_list("Bcc"),
        subject: parsed
            .headers
            .get_first_value("Subject")
            .map(|s| sanitize_text(&s))
            .unwrap_or_default(),
        date: parsed
            .headers
            .get_first_value("Date")
            .and_then(|d| parse_date(&d)),
        body_text,
        body_html,
        attachments,
        content_hash: blake3::hash(raw).to_hex().to_string(),
        headers,
    })
}
