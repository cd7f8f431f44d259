// src/handlers/taxpayer.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    external::ruc::TaxpayerInfo,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

#[utoipa::path(
    get,
    path = "/api/taxpayers/{ruc}",
    params(("ruc" = String, Path, description = "RUC de 13 dígitos")),
    responses(
        (status = 200, description = "Dados do contribuinte", body = TaxpayerInfo),
        (status = 404, description = "RUC não cadastrado"),
        (status = 502, description = "Registro tributário indisponível")
    ),
    security(("bearer_auth" = [])),
    tag = "taxpayers"
)]
pub async fn lookup_taxpayer(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(ruc): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let info = app_state
        .tax_registry
        .lookup(&ruc)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(info)))
}
