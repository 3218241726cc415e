//! Client-side dashboard state.
//!
//! The controller owns everything the page shows: tile basis counts, stepper
//! counters, note drafts and the per-vaccine log. Edits stay local until a
//! submit; submit and delete reconcile the local view with what the store
//! confirmed.

use crate::counter::{DisplayCounter, Step};
use crate::errors::StoreError;
use crate::models::{
    DashboardView, LogEntry, LogRowView, NewSubmission, PanelView, Population, RecordId,
    SubmissionRecord, TileView, Vaccine,
};
use crate::stats::{PopulationTotals, TileBasis, format_percent};
use crate::store::SubmissionStore;
use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// Unconfirmed row dropped without touching the store.
    RemovedLocal,
    Removed,
    /// The store reported zero rows deleted. Nothing changed locally.
    NotFoundOnServer,
    NotInLog,
}

#[derive(Debug, Default)]
struct VaccinePanel {
    tile: TileBasis,
    staff: DisplayCounter,
    resident: DisplayCounter,
    note: String,
    log: Vec<LogEntry>,
}

impl VaccinePanel {
    fn counter(&self, population: Population) -> &DisplayCounter {
        match population {
            Population::Staff => &self.staff,
            Population::Resident => &self.resident,
        }
    }

    fn counter_mut(&mut self, population: Population) -> &mut DisplayCounter {
        match population {
            Population::Staff => &mut self.staff,
            Population::Resident => &mut self.resident,
        }
    }

    fn reset_counters(&mut self) {
        self.staff.reset(self.tile.staff);
        self.resident.reset(self.tile.resident);
    }

    /// Tiles follow the newest confirmed row; staged drafts never count.
    fn retile_from_head(&mut self) {
        let head = self.log.iter().find(|entry| !entry.is_local());
        self.tile = TileBasis::from_record(head.map(|entry| &entry.record));
        self.staff.rebase(self.tile.staff);
        self.resident.rebase(self.tile.resident);
    }
}

pub struct DashboardController<S> {
    store: S,
    totals: PopulationTotals,
    covid: VaccinePanel,
    influenza: VaccinePanel,
    local_seq: u64,
}

impl<S: SubmissionStore> DashboardController<S> {
    pub fn new(store: S, totals: PopulationTotals) -> Self {
        Self {
            store,
            totals,
            covid: VaccinePanel::default(),
            influenza: VaccinePanel::default(),
            local_seq: 0,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn panel(&self, vaccine: Vaccine) -> &VaccinePanel {
        match vaccine {
            Vaccine::Covid => &self.covid,
            Vaccine::Influenza => &self.influenza,
        }
    }

    fn panel_mut(&mut self, vaccine: Vaccine) -> &mut VaccinePanel {
        match vaccine {
            Vaccine::Covid => &mut self.covid,
            Vaccine::Influenza => &mut self.influenza,
        }
    }

    /// Loads logs and latest rows for both vaccines. All four reads run
    /// concurrently and nothing is applied unless every one succeeds; on
    /// failure the fault is logged and the zeroed state is kept.
    pub async fn initialize(&mut self) -> bool {
        let loaded = tokio::try_join!(
            self.store.list_by_vaccine(Vaccine::Covid),
            self.store.list_by_vaccine(Vaccine::Influenza),
            self.store.latest_by_vaccine(Vaccine::Covid),
            self.store.latest_by_vaccine(Vaccine::Influenza),
        );

        match loaded {
            Ok((covid_log, influenza_log, covid_latest, influenza_latest)) => {
                self.load_panel(Vaccine::Covid, covid_log, covid_latest);
                self.load_panel(Vaccine::Influenza, influenza_log, influenza_latest);
                info!(
                    covid_rows = self.covid.log.len(),
                    influenza_rows = self.influenza.log.len(),
                    "dashboard loaded"
                );
                true
            }
            Err(err) => {
                error!("load failed: {err}");
                false
            }
        }
    }

    fn load_panel(
        &mut self,
        vaccine: Vaccine,
        log: Vec<SubmissionRecord>,
        latest: Option<SubmissionRecord>,
    ) {
        let panel = self.panel_mut(vaccine);
        panel.log = log.into_iter().map(LogEntry::persisted).collect();
        panel.tile = TileBasis::from_record(latest.as_ref());
        panel.reset_counters();
    }

    pub fn tile_percent(&self, vaccine: Vaccine, population: Population) -> f64 {
        let count = self.panel(vaccine).tile.count(population);
        self.totals.percent(population, count)
    }

    pub fn counter(&self, vaccine: Vaccine, population: Population) -> DisplayCounter {
        *self.panel(vaccine).counter(population)
    }

    pub fn note(&self, vaccine: Vaccine) -> &str {
        &self.panel(vaccine).note
    }

    pub fn log(&self, vaccine: Vaccine) -> &[LogEntry] {
        &self.panel(vaccine).log
    }

    pub fn adjust_counter(&mut self, vaccine: Vaccine, population: Population, step: Step) {
        self.panel_mut(vaccine).counter_mut(population).step(step);
    }

    pub fn set_counter_absolute(&mut self, vaccine: Vaccine, population: Population, value: f64) {
        self.panel_mut(vaccine)
            .counter_mut(population)
            .set_from_input(value);
    }

    pub fn set_note(&mut self, vaccine: Vaccine, note: impl Into<String>) {
        self.panel_mut(vaccine).note = note.into();
    }

    /// Adds the current counts as an unconfirmed row at the top of the log.
    pub fn stage(&mut self, vaccine: Vaccine) -> RecordId {
        self.local_seq += 1;
        let id = RecordId::new(format!("local-{}", self.local_seq));
        let panel = self.panel_mut(vaccine);
        let draft = NewSubmission::new(vaccine, panel.staff.value(), panel.resident.value())
            .with_note(&panel.note);
        panel.log.insert(
            0,
            LogEntry::local(SubmissionRecord {
                id: id.clone(),
                vaccine,
                staff_count: draft.staff_count,
                resident_count: draft.resident_count,
                note: draft.note,
                date_submitted: Local::now().date_naive(),
                created_at: None,
            }),
        );
        id
    }

    /// Persists the effective counts and note. On success the returned row
    /// becomes the log head and the tile basis, so the counters read exactly
    /// the submitted values with no pending edits.
    pub async fn submit(&mut self, vaccine: Vaccine) -> Result<SubmissionRecord, StoreError> {
        let panel = self.panel(vaccine);
        let submission = NewSubmission::new(vaccine, panel.staff.value(), panel.resident.value())
            .with_note(&panel.note);

        let record = match self.store.insert(submission).await {
            Ok(record) => record,
            Err(err) => {
                error!(%vaccine, "submit failed: {err}");
                return Err(err);
            }
        };

        let panel = self.panel_mut(vaccine);
        panel.log.insert(0, LogEntry::persisted(record.clone()));
        panel.tile = TileBasis::from_record(Some(&record));
        panel.reset_counters();
        panel.note.clear();
        info!(%vaccine, id = %record.id, "submission saved");
        Ok(record)
    }

    pub async fn delete_row(
        &mut self,
        vaccine: Vaccine,
        id: &RecordId,
    ) -> Result<DeleteOutcome, StoreError> {
        let is_local = match self.panel(vaccine).log.iter().find(|entry| &entry.record.id == id) {
            Some(entry) => entry.is_local(),
            None => {
                warn!(%vaccine, %id, "delete requested for row not in log");
                return Ok(DeleteOutcome::NotInLog);
            }
        };

        if is_local {
            self.remove_row(vaccine, id);
            return Ok(DeleteOutcome::RemovedLocal);
        }

        match self.store.delete_by_id(id).await {
            Ok(true) => {
                self.remove_row(vaccine, id);
                info!(%vaccine, %id, "submission deleted");
                Ok(DeleteOutcome::Removed)
            }
            Ok(false) => {
                warn!(%vaccine, %id, "no row deleted, id not found on server");
                Ok(DeleteOutcome::NotFoundOnServer)
            }
            Err(err) => {
                error!(%vaccine, %id, "delete failed: {err}");
                Err(err)
            }
        }
    }

    fn remove_row(&mut self, vaccine: Vaccine, id: &RecordId) {
        let panel = self.panel_mut(vaccine);
        panel.log.retain(|entry| &entry.record.id != id);
        panel.retile_from_head();
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            panels: Vaccine::ALL
                .iter()
                .map(|&vaccine| self.panel_view(vaccine))
                .collect(),
        }
    }

    fn panel_view(&self, vaccine: Vaccine) -> PanelView {
        let panel = self.panel(vaccine);
        let tile = |population: Population| {
            let percent = self.tile_percent(vaccine, population);
            TileView {
                percent,
                label: format_percent(percent),
                counter: panel.counter(population).value(),
            }
        };
        PanelView {
            vaccine,
            title: vaccine.title().to_string(),
            staff: tile(Population::Staff),
            resident: tile(Population::Resident),
            note: panel.note.clone(),
            log: panel.log.iter().map(LogRowView::from).collect(),
        }
    }
}
