//! Ticket id formatting.

use chrono::{Datelike, NaiveDate};

/// Prefix of every ticket id.
pub const TICKET_PREFIX: &str = "SKY";

/// Format a ticket id: `SKY-YYYYMMDD-NNNN`.
///
/// `date` is the creation date in the support offset. The sequence is
/// zero-padded to four digits; larger values keep all digits.
pub fn format_ticket_id(date: NaiveDate, sequence: i64) -> String {
    format!(
        "{}-{:04}{:02}{:02}-{:04}",
        TICKET_PREFIX,
        date.year(),
        date.month(),
        date.day(),
        sequence
    )
}
