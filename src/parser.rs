//! Decoding of stored alert messages

use crate::error::{ParseError, Result};
use crate::extract::parse_transaction;
use crate::types::TransactionRecord;
use mailparse::MailHeaderMap;
use tracing::debug;

/// Parse raw message bytes, returning `None` when it is not a transaction alert
pub fn parse_email(raw: &[u8]) -> Result<Option<TransactionRecord>> {
    let text = decode_email(raw)?;
    parse_transaction(&text)
}

/// Decode a raw RFC 5322 message into searchable text
///
/// The decoded subject comes first, followed by every `text/plain` part and
/// then every `text/html` part. HTML is kept as-is so label separators such
/// as `&nbsp;` survive. Messages without text parts are read as UTF-8.
pub fn decode_email(raw: &[u8]) -> Result<String> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| ParseError::Decode(e.to_string()))?;

    let mut plain = Vec::new();
    let mut html = Vec::new();
    collect_text_parts(&parsed, &mut plain, &mut html)?;

    if plain.is_empty() && html.is_empty() {
        debug!("Message has no text parts, reading raw bytes");
        return String::from_utf8(raw.to_vec()).map_err(|e| ParseError::Decode(e.to_string()));
    }

    let subject = parsed.headers.get_first_value("Subject");
    debug!(
        "Decoded message: {} plain part(s), {} html part(s), subject {:?}",
        plain.len(),
        html.len(),
        subject
    );

    Ok(subject
        .into_iter()
        .chain(plain)
        .chain(html)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn collect_text_parts(
    parsed: &mailparse::ParsedMail,
    plain: &mut Vec<String>,
    html: &mut Vec<String>,
) -> Result<()> {
    if parsed.subparts.is_empty() {
        let content_type = parsed.ctype.mimetype.to_lowercase();
        if content_type.starts_with("text/html") {
            html.push(body_text(parsed)?);
        } else if content_type.starts_with("text/") {
            plain.push(body_text(parsed)?);
        }
        return Ok(());
    }

    for part in &parsed.subparts {
        collect_text_parts(part, plain, html)?;
    }
    Ok(())
}

fn body_text(part: &mailparse::ParsedMail) -> Result<String> {
    part.get_body()
        .map_err(|e| ParseError::Decode(e.to_string()))
}
