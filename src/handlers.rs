use crate::catalog::{self, Room};
use crate::errors::AppError;
use crate::models::{
    ChecklistSnapshot, EntryUpdate, IndexQuery, ResetReason, ResetRequest, ResetStatus, SetCheckedRequest,
    SetNoteRequest,
};
use crate::persistence::Backend;
use crate::progress::{build_progress, CategoryProgress};
use crate::reset::is_reset_due;
use crate::state::AppState;
use crate::store::{ChecklistStore, StoreError};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Json,
};
use chrono::Local;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let active = query
        .tab
        .as_deref()
        .and_then(catalog::category)
        .unwrap_or_else(catalog::default_category);
    let store = state.store.lock().await;
    Html(render_index(&store, active, Local::now()))
}

pub async fn get_checklist(State(state): State<AppState>) -> Json<ChecklistSnapshot> {
    let store = state.store.lock().await;
    Json(state.snapshot(&store, Local::now()))
}

pub async fn get_progress(State(state): State<AppState>) -> Json<Vec<CategoryProgress>> {
    let store = state.store.lock().await;
    Json(build_progress(&store))
}

pub async fn set_checked(
    State(state): State<AppState>,
    Path((category, room)): Path<(String, Room)>,
    Json(payload): Json<SetCheckedRequest>,
) -> Result<Json<ChecklistSnapshot>, AppError> {
    let snapshot = apply_change(&state, |store| {
        Ok(vec![store.set_checked(&category, room, payload.checked)?])
    })
    .await?;
    Ok(Json(snapshot))
}

pub async fn set_all(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(payload): Json<SetCheckedRequest>,
) -> Result<Json<ChecklistSnapshot>, AppError> {
    let snapshot = apply_change(&state, |store| store.set_all_in_category(&category, payload.checked)).await?;
    Ok(Json(snapshot))
}

/// Unlike the other mutations this waits for the backend before answering,
/// so the note dialog only closes once the note is stored. A failed write is
/// logged and the in-memory note is kept.
pub async fn set_note(
    State(state): State<AppState>,
    Path((category, room)): Path<(String, Room)>,
    Json(payload): Json<SetNoteRequest>,
) -> Result<Json<ChecklistSnapshot>, AppError> {
    let (pending, snapshot) = {
        let mut store = state.store.lock().await;
        let update = store.set_note(&category, room, payload.note)?;
        let pending = state.persistence.submit_and_wait(store.to_record(), vec![update]);
        (pending, state.snapshot(&store, Local::now()))
    };

    if let Err(err) = pending.wait().await {
        warn!(%category, room, "note kept in memory only: {err}");
    }
    Ok(Json(snapshot))
}

pub async fn get_reset_status(State(state): State<AppState>) -> Json<ResetStatus> {
    let store = state.store.lock().await;
    Json(state.reset_status(&store, Local::now()))
}

pub async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ChecklistSnapshot>, AppError> {
    if state.backend() != Backend::Local {
        return Err(AppError::bad_request("reset is only available for the local checklist"));
    }

    let now = Local::now();
    let mut store = state.store.lock().await;
    if payload.reason == ResetReason::Auto && !is_reset_due(store.last_reset(), now) {
        return Err(AppError::conflict("no reset is due"));
    }

    store.reset(now);
    info!(reason = ?payload.reason, "checklist reset");
    state.persistence.submit(store.to_record(), Vec::new());

    Ok(Json(state.snapshot(&store, now)))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path((category, room)): Path<(String, Room)>,
) -> Result<Redirect, AppError> {
    apply_change(&state, |store| {
        let checked = !store.get(&category, room)?.checked;
        Ok(vec![store.set_checked(&category, room, checked)?])
    })
    .await?;
    Ok(redirect_to_tab(&category))
}

pub async fn select_all_form(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Redirect, AppError> {
    apply_change(&state, |store| store.set_all_in_category(&category, true)).await?;
    Ok(redirect_to_tab(&category))
}

pub async fn deselect_all_form(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Redirect, AppError> {
    apply_change(&state, |store| store.set_all_in_category(&category, false)).await?;
    Ok(redirect_to_tab(&category))
}

/// Applies `change` under the store lock and queues the write without
/// waiting for it.
async fn apply_change<F>(state: &AppState, change: F) -> Result<ChecklistSnapshot, AppError>
where
    F: FnOnce(&mut ChecklistStore) -> Result<Vec<EntryUpdate>, StoreError>,
{
    let mut store = state.store.lock().await;
    let updates = change(&mut store)?;
    state.persistence.submit(store.to_record(), updates);
    Ok(state.snapshot(&store, Local::now()))
}

fn redirect_to_tab(category: &str) -> Redirect {
    match catalog::category(category) {
        Some(category) => Redirect::to(&format!("/?tab={}", category.id)),
        None => Redirect::to("/"),
    }
}
