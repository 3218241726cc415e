use crate::controller::DeleteOutcome;
use crate::counter::{Step, parse_counter_input};
use crate::errors::AppError;
use crate::models::{
    CounterAction, CounterRequest, DashboardView, Notice, PanelForm, Population, RecordId,
    SubmissionRecord, SubmitRequest, Vaccine,
};
use crate::state::{AppState, Dashboard};
use crate::ui::render_dashboard;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::Serialize;

pub const SAVE_FAILED: &str = "Could not save. Please try again.";
pub const NOT_FOUND_ON_SERVER: &str = "No row deleted (row id not found on server).";

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub outcome: DeleteOutcome,
    pub notice: Notice,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.dashboard.lock().await.view();
    let notice = state.take_notice().await;
    Html(render_dashboard(&view, notice.as_ref()))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.lock().await.view())
}

pub async fn panel_update(
    State(state): State<AppState>,
    Path(vaccine): Path<Vaccine>,
    Form(form): Form<PanelForm>,
) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    commit_panel_form(&mut dashboard, vaccine, form);
    Redirect::to("/")
}

pub async fn counter_inc(
    State(state): State<AppState>,
    Path((vaccine, population)): Path<(Vaccine, Population)>,
    Form(form): Form<PanelForm>,
) -> Redirect {
    step_counter(&state, vaccine, population, Step::Up, form).await
}

pub async fn counter_dec(
    State(state): State<AppState>,
    Path((vaccine, population)): Path<(Vaccine, Population)>,
    Form(form): Form<PanelForm>,
) -> Redirect {
    step_counter(&state, vaccine, population, Step::Down, form).await
}

async fn step_counter(
    state: &AppState,
    vaccine: Vaccine,
    population: Population,
    step: Step,
    form: PanelForm,
) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    commit_panel_form(&mut dashboard, vaccine, form);
    dashboard.adjust_counter(vaccine, population, step);
    Redirect::to("/")
}

pub async fn submit(
    State(state): State<AppState>,
    Path(vaccine): Path<Vaccine>,
    Form(form): Form<PanelForm>,
) -> Redirect {
    let notice = {
        let mut dashboard = state.dashboard.lock().await;
        commit_panel_form(&mut dashboard, vaccine, form);
        match dashboard.submit(vaccine).await {
            Ok(record) => Notice::ok(format!(
                "Saved {} submission ({} staff, {} residents).",
                vaccine.title(),
                record.staff_count,
                record.resident_count
            )),
            Err(_) => Notice::error(SAVE_FAILED),
        }
    };
    state.set_notice(notice).await;
    Redirect::to("/")
}

pub async fn stage(
    State(state): State<AppState>,
    Path(vaccine): Path<Vaccine>,
    Form(form): Form<PanelForm>,
) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    commit_panel_form(&mut dashboard, vaccine, form);
    dashboard.stage(vaccine);
    Redirect::to("/")
}

pub async fn delete(
    State(state): State<AppState>,
    Path((vaccine, id)): Path<(Vaccine, String)>,
) -> Redirect {
    let result = state
        .dashboard
        .lock()
        .await
        .delete_row(vaccine, &RecordId::new(id))
        .await;
    let notice = match result {
        Ok(outcome) => delete_notice(outcome),
        Err(err) => Notice::error(format!("Could not delete this row. {err}")),
    };
    state.set_notice(notice).await;
    Redirect::to("/")
}

pub async fn api_counter(
    State(state): State<AppState>,
    Json(payload): Json<CounterRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    match payload.action {
        CounterAction::Inc => {
            dashboard.adjust_counter(payload.vaccine, payload.population, Step::Up)
        }
        CounterAction::Dec => {
            dashboard.adjust_counter(payload.vaccine, payload.population, Step::Down)
        }
        CounterAction::Set => {
            let value = payload
                .value
                .ok_or_else(|| AppError::bad_request("set requires a value"))?;
            dashboard.set_counter_absolute(payload.vaccine, payload.population, value);
        }
    }
    Ok(Json(dashboard.view()))
}

pub async fn api_submit(
    State(state): State<AppState>,
    Path(vaccine): Path<Vaccine>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmissionRecord>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    if let Some(note) = payload.note {
        dashboard.set_note(vaccine, note);
    }
    let record = dashboard.submit(vaccine).await?;
    Ok(Json(record))
}

pub async fn api_stage(
    State(state): State<AppState>,
    Path(vaccine): Path<Vaccine>,
) -> Json<DashboardView> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.stage(vaccine);
    Json(dashboard.view())
}

pub async fn api_delete(
    State(state): State<AppState>,
    Path((vaccine, id)): Path<(Vaccine, String)>,
) -> Result<Json<DeleteResponse>, AppError> {
    let outcome = state
        .dashboard
        .lock()
        .await
        .delete_row(vaccine, &RecordId::new(id))
        .await?;
    if outcome == DeleteOutcome::NotInLog {
        return Err(AppError::not_found("row is not in the log"));
    }
    Ok(Json(DeleteResponse {
        outcome,
        notice: delete_notice(outcome),
    }))
}

/// Applies the counter drafts and note typed into a panel form.
fn commit_panel_form(dashboard: &mut Dashboard, vaccine: Vaccine, form: PanelForm) {
    if let Some(text) = form.staff {
        dashboard.set_counter_absolute(vaccine, Population::Staff, parse_counter_input(&text));
    }
    if let Some(text) = form.resident {
        dashboard.set_counter_absolute(vaccine, Population::Resident, parse_counter_input(&text));
    }
    if let Some(note) = form.note {
        dashboard.set_note(vaccine, note);
    }
}

fn delete_notice(outcome: DeleteOutcome) -> Notice {
    match outcome {
        DeleteOutcome::Removed => Notice::ok("Submission deleted."),
        DeleteOutcome::RemovedLocal => Notice::ok("Unsaved row removed."),
        DeleteOutcome::NotFoundOnServer => Notice::warning(NOT_FOUND_ON_SERVER),
        DeleteOutcome::NotInLog => Notice::warning("That row is no longer in the log."),
    }
}
