// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
};

#[utoipa::path(
    get,
    path = "/api/transfers/{transfer_id}/dispatch-note",
    params(("transfer_id" = Uuid, Path, description = "ID do traslado")),
    responses(
        (status = 200, description = "Guia de remissão em PDF (application/pdf)"),
        (status = 404, description = "Traslado não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn transfer_dispatch_note(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(transfer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let pdf_bytes = app_state
        .document_service
        .transfer_dispatch_note(tenant.0, transfer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"guia-remision.pdf\"",
            ),
        ],
        pdf_bytes,
    ))
}
