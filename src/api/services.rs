use axum::{
    Form, Json,
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{info, warn};

use super::{
    models::{
        CheckTypeRequest, CheckTypeResponse, EntryView, HealthResponse, SaveResponse,
        SettingsResponse,
    },
    state::AppState,
    utils::{SettingsEncoding, parse_settings_content_type},
};
use crate::api::error::ApiError;
use crate::content_type;
use crate::dispatch::WellKnownResponse;
use crate::settings::{SparseForm, apply_form};

/// Well-known endpoint (GET /.well-known/{*suffix})
///
/// The router has already percent-decoded the suffix. The response is either
/// the first matching entry's contents or a plain-text 404; a store failure
/// is the only error.
pub async fn well_known(
    State(state): State<AppState>,
    Path(suffix): Path<String>,
) -> Result<WellKnownResponse, ApiError> {
    let response = state.dispatcher.serve(&suffix)?;
    state.metrics.record(response.outcome);

    info!(
        suffix = %suffix,
        status = response.status().as_u16(),
        "Served well-known request"
    );
    Ok(response)
}

/// Current settings (GET /admin/settings)
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let list = state.store.load()?;

    Ok(Json(SettingsResponse {
        entries: EntryView::from_list(&list),
        form: list.to_form(),
        default_content_type: state.dispatcher.default_content_type(),
    }))
}

/// Settings save (POST /admin/settings)
///
/// ## Flow:
/// 1. Decode the sparse form (JSON object or urlencoded form)
/// 2. Validate each field against the stored list; rejected fields keep
///    their stored value
/// 3. Compact and persist the whole list (last write wins)
/// 4. Return the saved entries together with every rejected field
///
/// Field errors never fail the request.
pub async fn save_settings(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let encoding = {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
        parse_settings_content_type(content_type)?
    };
    let limit = state.config.server.max_body_bytes;

    let form: SparseForm = match encoding {
        SettingsEncoding::Json => {
            let Json(form) = Json::<SparseForm>::from_request(request, &state)
                .await
                .map_err(|e| ApiError::from_rejection(e.status(), e.body_text(), limit))?;
            form
        }
        SettingsEncoding::Form => {
            let Form(form) = Form::<SparseForm>::from_request(request, &state)
                .await
                .map_err(|e| ApiError::from_rejection(e.status(), e.body_text(), limit))?;
            form
        }
    };

    let previous = state.store.load()?;
    let outcome = apply_form(&previous, &form);
    let revision = state.store.save(&outcome.list)?;
    state.metrics.settings_saved(outcome.errors.len());

    for error in &outcome.errors {
        warn!(field = %error.field, code = %error.code, "Rejected settings field");
    }
    info!(
        revision = %revision.id,
        entries = revision.entries,
        rejected = outcome.errors.len(),
        "Settings saved"
    );

    let response = SaveResponse {
        revision,
        entries: EntryView::from_list(&outcome.list),
        errors: outcome.errors,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Content-Type check for the admin form (POST /admin/content-type)
pub async fn check_content_type(Json(request): Json<CheckTypeRequest>) -> impl IntoResponse {
    let response = CheckTypeResponse::from(content_type::validate(&request.value));
    (StatusCode::OK, Json(response))
}

/// Health check endpoint (GET /health)
///
/// Returns 503 Service Unavailable if the settings store cannot be read.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    use std::collections::HashMap;

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());

    let store_status = match state.store.load() {
        Ok(_) => "healthy",
        Err(err) => {
            warn!(error = %err, "Settings store unhealthy");
            "unhealthy"
        }
    };
    components.insert("store".to_string(), store_status.to_string());

    let all_healthy = components.values().all(|status| status == "healthy");
    let overall_status = if all_healthy { "healthy" } else { "unhealthy" };
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    (status_code, Json(response))
}
