// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
};

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

// O contexto da empresa que o usuário quer acessar nesta requisição.
// Só chega aos handlers depois do tenant_guard validar a associação.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

/// Middleware: auth + X-Tenant-ID + verificação de associação.
/// Roda DEPOIS do auth_guard (os dois são empilhados nas rotas de empresa).
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    let tenant_id = parse_tenant_header(request.headers())?;

    // A checagem de tenancy de verdade: o usuário pertence à empresa?
    app_state
        .tenant_service
        .require_member(user.0.id, tenant_id)
        .await?;

    request.extensions_mut().insert(TenantContext(tenant_id));
    Ok(next.run(request).await)
}

fn parse_tenant_header(headers: &axum::http::HeaderMap) -> Result<Uuid, AppError> {
    let value = headers
        .get(TENANT_ID_HEADER)
        .ok_or_else(|| AppError::InvalidReference("cabeçalho X-Tenant-ID"))?;

    let value_str = value
        .to_str()
        .map_err(|_| AppError::InvalidReference("cabeçalho X-Tenant-ID"))?;

    Uuid::parse_str(value_str).map_err(|_| AppError::InvalidReference("cabeçalho X-Tenant-ID"))
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    // ApiError já implementa IntoResponse
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .copied()
            .ok_or(ApiError {
                status: StatusCode::BAD_REQUEST,
                error: "Contexto da empresa não encontrado.".to_string(),
                details: None,
            })
    }
}
