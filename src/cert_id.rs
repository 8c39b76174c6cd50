use crate::data::records::ParticipantRecord;

/// Source of wall-clock milliseconds for ID generation.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// System time via `chrono`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// `CERT-{type}{seq:04}-{initials}-{ts4}` for the record at 0-based `index`.
///
/// Not unique across runs: only the last four base-36 digits of the timestamp are kept.
pub fn generate_id(record: &ParticipantRecord, index: usize, now_millis: i64) -> String {
    let type_code = first_upper(&record.certificate_type, 'P');
    let initials = format!(
        "{}{}",
        first_upper(&record.first_name, 'X'),
        first_upper(&record.last_name, 'X')
    );
    let ts = to_base36(now_millis.unsigned_abs());
    let ts4 = &ts[ts.len().saturating_sub(4)..];
    format!("CERT-{type_code}{:04}-{initials}-{ts4}", index + 1)
}

fn first_upper(s: &str, default: char) -> String {
    s.trim()
        .chars()
        .next()
        .unwrap_or(default)
        .to_uppercase()
        .collect()
}

/// Upper-case base-36 digits, no prefix.
pub fn to_base36(mut v: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if v == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while v > 0 {
        out.push(DIGITS[(v % 36) as usize]);
        v /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "../tests/unit/cert_id.rs"]
mod tests;
