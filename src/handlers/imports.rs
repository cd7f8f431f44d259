// src/handlers/imports.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermCatalogWrite, RequirePermission},
        tenancy::TenantContext,
    },
    services::import_service::ImportReport,
};

#[utoipa::path(
    post,
    path = "/api/catalog/products/import",
    responses(
        (status = 200, description = "Relatório da importação (linhas ok e com erro)", body = ImportReport),
        (status = 400, description = "Arquivo ausente")
    ),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn import_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    // Pega o primeiro campo de arquivo do formulário.
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        AppError::InvalidReference("arquivo").to_api_error(&locale, &app_state.i18n_store)
    })? {
        let data = field.bytes().await.map_err(|_| {
            AppError::InvalidReference("arquivo").to_api_error(&locale, &app_state.i18n_store)
        })?;
        if !data.is_empty() {
            file_bytes = Some(data.to_vec());
            break;
        }
    }

    let file_bytes = file_bytes.ok_or_else(|| {
        AppError::InvalidReference("arquivo").to_api_error(&locale, &app_state.i18n_store)
    })?;

    let report = app_state
        .import_service
        .import_products_csv(tenant.0, &file_bytes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}
