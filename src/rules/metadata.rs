//! Chat metadata prefixes.
//!
//! Lines copied out of chat apps carry a timestamp and sender in front of the
//! message. The prefix is stripped before matching and kept so that a failed
//! line is reported exactly as pasted.
//!
//! Recognized shapes:
//!
//! ```text
//! [16/10/26, 9:15:02 PM] Ravi: 123=5=box     (WhatsApp, iOS)
//! 16/10/2026, 21:15 - Ravi: 123=5=box        (WhatsApp, Android)
//! Ravi, [16.10.26 21:15]: 123=5=box          (Telegram desktop)
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Metadata recognized in front of a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMetadata {
    /// Exact prefix text, including the trailing separator.
    pub prefix: String,
    pub sender: String,
    /// `None` when the date or time did not form a valid calendar value.
    pub sent_at: Option<NaiveDateTime>,
}

/// A pasted line split into optional metadata and the message to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub original: String,
    pub message: String,
    pub metadata: Option<ChatMetadata>,
}

impl RawLine {
    /// Strip a leading chat prefix, if any. `line` is expected trimmed.
    pub fn split(line: &str) -> RawLine {
        let whatsapp = regex!(
            r"(?i)^\[(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?)(?:\s*([ap]\.?m\.?))?\]\s*([^:\[\]]{1,40}?):\s*"
        );
        let android = regex!(
            r"(?i)^(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?)(?:\s*([ap]\.?m\.?))?\s+-\s+([^:]{1,40}?):\s*"
        );
        let telegram = regex!(
            r"(?i)^([^\[\]:,]{1,40}?),\s*\[(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?)(?:\s*([ap]\.?m\.?))?\]:?\s*"
        );

        let found = if let Some(caps) = whatsapp.captures(line).or_else(|| android.captures(line)) {
            let sent_at = timestamp(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
            Some((caps.get(0).map_or(0, |m| m.end()), caps[4].trim().to_string(), sent_at))
        } else if let Some(caps) = telegram.captures(line) {
            let sent_at = timestamp(&caps[2], &caps[3], caps.get(4).map(|m| m.as_str()));
            Some((caps.get(0).map_or(0, |m| m.end()), caps[1].trim().to_string(), sent_at))
        } else {
            None
        };

        match found {
            Some((end, sender, sent_at)) => RawLine {
                original: line.to_string(),
                message: line[end..].trim().to_string(),
                metadata: Some(ChatMetadata { prefix: line[..end].to_string(), sender, sent_at }),
            },
            None => RawLine { original: line.to_string(), message: line.to_string(), metadata: None },
        }
    }

    /// True when the line is a chat header with nothing after it.
    pub fn is_header_only(&self) -> bool {
        self.metadata.is_some() && self.message.is_empty()
    }
}

/// Parse a chat date and time (day first, as the chat apps print them).
fn timestamp(date: &str, time: &str, meridiem: Option<&str>) -> Option<NaiveDateTime> {
    let date = date.replace(['.', '-'], "/");
    let year_len = date.rsplit('/').next().map_or(0, str::len);
    let date_fmt = if year_len == 2 { "%d/%m/%y" } else { "%d/%m/%Y" };
    let date = NaiveDate::parse_from_str(&date, date_fmt).ok()?;

    let time = match meridiem {
        Some(m) => {
            let m = m.replace('.', "").to_ascii_uppercase();
            let fmt = if time.matches(':').count() == 2 { "%I:%M:%S %p" } else { "%I:%M %p" };
            NaiveTime::parse_from_str(&format!("{time} {m}"), fmt).ok()?
        }
        None => {
            let fmt = if time.matches(':').count() == 2 { "%H:%M:%S" } else { "%H:%M" };
            NaiveTime::parse_from_str(time, fmt).ok()?
        }
    };
    Some(NaiveDateTime::new(date, time))
}
