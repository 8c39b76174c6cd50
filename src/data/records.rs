use std::collections::BTreeMap;
use std::path::Path;

use smallvec::SmallVec;

use crate::data::table::{Row, Table};
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{LaurelError, LaurelResult};

/// Priority used when a sponsor row has no parseable priority.
pub const DEFAULT_SPONSOR_PRIORITY: i64 = 999;
/// Maximum sponsors retained per event.
pub const MAX_SPONSORS_PER_EVENT: usize = 3;

/// One participant row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantRecord {
    /// Given name.
    pub first_name: String,
    /// Middle name, `None` when blank.
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
    /// Category key as written in the source (matched case-insensitively).
    pub certificate_type: String,
    /// Sport or discipline.
    pub sport: String,
    /// Event name; also the sponsor grouping key.
    pub event_name: String,
    /// Organizing body.
    pub organization: String,
    /// Sanctioning association.
    pub association: String,
    /// Start date as written in the source.
    pub start_date: String,
    /// End date as written in the source.
    pub end_date: String,
    /// Participation role, `None` when blank.
    pub role: Option<String>,
    /// 1-based line number in the participant source.
    pub source_line: usize,
}

impl ParticipantRecord {
    /// First, middle and last name joined by single spaces.
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.middle_name.as_deref().unwrap_or(""),
            self.last_name.as_str(),
        ]
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Lower-cased category key.
    pub fn category_key(&self) -> String {
        self.certificate_type.trim().to_lowercase()
    }
}

/// One sponsor row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SponsorRecord {
    /// Display name.
    pub sponsor_name: String,
    /// Event this sponsor is attached to.
    pub event_name: String,
    /// Logo file path as written in the source.
    pub logo_path: String,
    /// Sort key, ascending; [`DEFAULT_SPONSOR_PRIORITY`] when absent.
    pub priority: i64,
}

/// Sponsors grouped by event, each group sorted by priority and capped to three.
#[derive(Clone, Debug, Default)]
pub struct SponsorGroups {
    by_event: BTreeMap<String, SmallVec<[SponsorRecord; MAX_SPONSORS_PER_EVENT]>>,
}

impl SponsorGroups {
    /// Group, stable-sort by priority and truncate.
    pub fn from_records(records: impl IntoIterator<Item = SponsorRecord>) -> Self {
        let mut staging: BTreeMap<String, Vec<SponsorRecord>> = BTreeMap::new();
        for r in records {
            staging.entry(r.event_name.clone()).or_default().push(r);
        }

        let by_event = staging
            .into_iter()
            .map(|(event, mut list)| {
                list.sort_by_key(|s| s.priority);
                list.truncate(MAX_SPONSORS_PER_EVENT);
                (event, list.into_iter().collect())
            })
            .collect();
        Self { by_event }
    }

    /// Retained sponsors for `event_name` (empty when none).
    pub fn for_event(&self, event_name: &str) -> &[SponsorRecord] {
        self.by_event
            .get(event_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate `(event, sponsors)` in event-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SponsorRecord])> {
        self.by_event.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of events with at least one sponsor.
    pub fn event_count(&self) -> usize {
        self.by_event.len()
    }

    /// Total retained sponsors across all events.
    pub fn sponsor_count(&self) -> usize {
        self.by_event.values().map(|v| v.len()).sum()
    }
}

/// Parsed participant source.
#[derive(Clone, Debug, Default)]
pub struct ParticipantSet {
    /// Records in source order.
    pub records: Vec<ParticipantRecord>,
    /// Skipped-row diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parsed sponsor source.
#[derive(Clone, Debug, Default)]
pub struct SponsorSet {
    /// Grouped sponsors.
    pub groups: SponsorGroups,
    /// Skipped-row and soft-missing diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Read the participant source. A missing file or a file without records is fatal.
pub fn read_participants(path: &Path, delimiter: char) -> LaurelResult<ParticipantSet> {
    let table = Table::read(path, delimiter)?;
    let set = participants_from_table(table);
    if set.records.is_empty() {
        return Err(LaurelError::EmptyInput(path.to_path_buf()));
    }
    Ok(set)
}

/// Read the sponsor source. A missing file yields an empty grouping plus a diagnostic.
pub fn read_sponsors(path: &Path, delimiter: char) -> LaurelResult<SponsorSet> {
    match Table::read(path, delimiter) {
        Ok(table) => Ok(sponsors_from_table(table)),
        Err(LaurelError::MissingInput(p)) => Ok(SponsorSet {
            groups: SponsorGroups::default(),
            diagnostics: vec![Diagnostic::warn(
                DiagnosticKind::SoftMissingInput,
                None,
                format!("sponsor source not found: {}", p.display()),
            )],
        }),
        Err(e) => Err(e),
    }
}

/// Map a parsed table onto participant records by header name.
pub fn participants_from_table(table: Table) -> ParticipantSet {
    let cols = ParticipantColumns::locate(&table);
    let records = table.rows.iter().map(|row| cols.record(row)).collect();
    ParticipantSet {
        records,
        diagnostics: table.diagnostics,
    }
}

/// Map a parsed table onto grouped sponsor records by header name.
pub fn sponsors_from_table(table: Table) -> SponsorSet {
    let name = table.column("sponsorName");
    let event = table.column("eventName");
    let logo = table.column("logoPath");
    let priority = table.column("priority");

    let records = table.rows.iter().map(|row| SponsorRecord {
        sponsor_name: field(row, name),
        event_name: field(row, event),
        logo_path: field(row, logo),
        priority: parse_priority(&field(row, priority)),
    });
    SponsorSet {
        groups: SponsorGroups::from_records(records),
        diagnostics: table.diagnostics,
    }
}

/// Leading-integer parse; anything without leading digits maps to the default priority.
pub fn parse_priority(raw: &str) -> i64 {
    let s = raw.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|v| sign * v)
        .unwrap_or(DEFAULT_SPONSOR_PRIORITY)
}

struct ParticipantColumns {
    first_name: Option<usize>,
    middle_name: Option<usize>,
    last_name: Option<usize>,
    certificate_type: Option<usize>,
    sport: Option<usize>,
    event_name: Option<usize>,
    organization: Option<usize>,
    association: Option<usize>,
    start_date: Option<usize>,
    end_date: Option<usize>,
    role: Option<usize>,
}

impl ParticipantColumns {
    fn locate(table: &Table) -> Self {
        Self {
            first_name: table.column("firstName"),
            middle_name: table.column("middleName"),
            last_name: table.column("lastName"),
            certificate_type: table.column("certificateType"),
            sport: table.column("sport"),
            event_name: table.column("eventName"),
            organization: table.column("organization"),
            association: table.column("association"),
            start_date: table.column("startDate"),
            end_date: table.column("endDate"),
            role: table.column("role"),
        }
    }

    fn record(&self, row: &Row) -> ParticipantRecord {
        ParticipantRecord {
            first_name: field(row, self.first_name),
            middle_name: optional_field(row, self.middle_name),
            last_name: field(row, self.last_name),
            certificate_type: field(row, self.certificate_type),
            sport: field(row, self.sport),
            event_name: field(row, self.event_name),
            organization: field(row, self.organization),
            association: field(row, self.association),
            start_date: field(row, self.start_date),
            end_date: field(row, self.end_date),
            role: optional_field(row, self.role),
            source_line: row.line,
        }
    }
}

fn field(row: &Row, col: Option<usize>) -> String {
    col.and_then(|i| row.fields.get(i))
        .cloned()
        .unwrap_or_default()
}

fn optional_field(row: &Row, col: Option<usize>) -> Option<String> {
    let v = field(row, col);
    (!v.trim().is_empty()).then_some(v)
}

#[cfg(test)]
#[path = "../../tests/unit/data/records.rs"]
mod tests;
