use crate::models::{Population, SubmissionRecord};

pub const DEFAULT_STAFF_TOTAL: u32 = 292;
pub const DEFAULT_RESIDENT_TOTAL: u32 = 192;

/// Percentage denominators, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationTotals {
    pub staff: u32,
    pub resident: u32,
}

impl Default for PopulationTotals {
    fn default() -> Self {
        Self {
            staff: DEFAULT_STAFF_TOTAL,
            resident: DEFAULT_RESIDENT_TOTAL,
        }
    }
}

impl PopulationTotals {
    pub fn total(&self, population: Population) -> u32 {
        match population {
            Population::Staff => self.staff,
            Population::Resident => self.resident,
        }
    }

    pub fn percent(&self, population: Population, count: u32) -> f64 {
        percent(count, self.total(population))
    }
}

/// Latest confirmed counts for one vaccine. Tile percentages and counter
/// baselines are both derived from this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileBasis {
    pub staff: u32,
    pub resident: u32,
}

impl TileBasis {
    pub fn from_record(record: Option<&SubmissionRecord>) -> Self {
        record
            .map(|row| Self {
                staff: row.staff_count,
                resident: row.resident_count,
            })
            .unwrap_or_default()
    }

    pub fn count(&self, population: Population) -> u32 {
        match population {
            Population::Staff => self.staff,
            Population::Resident => self.resident,
        }
    }
}

pub fn percent(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(count) / f64::from(total) * 100.0).clamp(0.0, 100.0)
}

pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("{:.1}%", (value * 10.0).round() / 10.0)
}
