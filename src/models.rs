use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vaccine {
    Covid,
    #[serde(alias = "flu")]
    Influenza,
}

impl Vaccine {
    pub const ALL: [Vaccine; 2] = [Vaccine::Covid, Vaccine::Influenza];

    pub fn as_str(self) -> &'static str {
        match self {
            Vaccine::Covid => "covid",
            Vaccine::Influenza => "influenza",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Vaccine::Covid => "COVID Vaccination",
            Vaccine::Influenza => "Influenza Vaccination",
        }
    }
}

impl fmt::Display for Vaccine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Population {
    Staff,
    #[serde(alias = "residents")]
    Resident,
}

impl Population {
    pub const ALL: [Population; 2] = [Population::Staff, Population::Resident];

    pub fn as_str(self) -> &'static str {
        match self {
            Population::Staff => "staff",
            Population::Resident => "resident",
        }
    }
}

/// Store-assigned row identifier. Backends hand out either text (uuid) or
/// integer keys, so both wire shapes are accepted and held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => RecordId(text),
            RawId::Number(number) => RecordId(number.to_string()),
        })
    }
}

/// One persisted vaccination count snapshot, as stored in the
/// `vaccination_submissions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: RecordId,
    pub vaccine: Vaccine,
    pub staff_count: u32,
    pub resident_count: u32,
    #[serde(default)]
    pub note: Option<String>,
    pub date_submitted: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload. `date_submitted` falls back to the local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubmission {
    pub vaccine: Vaccine,
    pub staff_count: u32,
    pub resident_count: u32,
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_submitted: Option<NaiveDate>,
}

impl NewSubmission {
    pub fn new(vaccine: Vaccine, staff_count: u32, resident_count: u32) -> Self {
        Self {
            vaccine,
            staff_count,
            resident_count,
            note: None,
            date_submitted: None,
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        let trimmed = note.trim();
        self.note = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date_submitted = Some(date);
        self
    }

    /// Fills in today's local date when no override was given.
    pub fn resolved(mut self) -> Self {
        if self.date_submitted.is_none() {
            self.date_submitted = Some(Local::now().date_naive());
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOrigin {
    /// Created in the dashboard, never confirmed by the store.
    Local,
    Persisted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub record: SubmissionRecord,
    pub origin: RowOrigin,
}

impl LogEntry {
    pub fn persisted(record: SubmissionRecord) -> Self {
        Self {
            record,
            origin: RowOrigin::Persisted,
        }
    }

    pub fn local(record: SubmissionRecord) -> Self {
        Self {
            record,
            origin: RowOrigin::Local,
        }
    }

    pub fn is_local(&self) -> bool {
        self.origin == RowOrigin::Local
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub panels: Vec<PanelView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub vaccine: Vaccine,
    pub title: String,
    pub staff: TileView,
    pub resident: TileView,
    pub note: String,
    pub log: Vec<LogRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    pub percent: f64,
    pub label: String,
    pub counter: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRowView {
    pub id: RecordId,
    pub date_submitted: NaiveDate,
    pub staff_count: u32,
    pub resident_count: u32,
    pub note: Option<String>,
    pub origin: RowOrigin,
}

impl From<&LogEntry> for LogRowView {
    fn from(entry: &LogEntry) -> Self {
        Self {
            id: entry.record.id.clone(),
            date_submitted: entry.record.date_submitted,
            staff_count: entry.record.staff_count,
            resident_count: entry.record.resident_count,
            note: entry.record.note.clone(),
            origin: entry.origin,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterAction {
    Inc,
    Dec,
    Set,
}

#[derive(Debug, Deserialize)]
pub struct CounterRequest {
    pub vaccine: Vaccine,
    pub population: Population,
    pub action: CounterAction,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub note: Option<String>,
}

/// Fields of one vaccine panel's HTML form. Every panel button posts the
/// whole form so typed-in counter drafts are committed before the action.
#[derive(Debug, Default, Deserialize)]
pub struct PanelForm {
    #[serde(default)]
    pub staff: Option<String>,
    #[serde(default)]
    pub resident: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Ok,
    Warning,
    Error,
}

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Ok,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}
