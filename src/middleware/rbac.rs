// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use std::marker::PhantomData;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
};

/// 1. O trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O extrator (guardião): `RequirePermission<PermInventoryWrite>` num
/// handler rejeita a requisição se o membro não tiver o slug.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Usuário (injetado pelo auth_guard)
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(ApiError {
                status: StatusCode::UNAUTHORIZED,
                error: "Usuário não autenticado.".into(),
                details: None,
            })?;

        // B. Empresa (injetada pelo tenant_guard)
        let tenant = parts.extensions.get::<TenantContext>().ok_or(ApiError {
            status: StatusCode::BAD_REQUEST,
            error: "Contexto da empresa não encontrado.".into(),
            details: None,
        })?;

        // C. Verifica no banco
        let required_perm = T::slug();
        let has_permission = app_state
            .rbac_repo
            .user_has_permission(user.0.id, tenant.0, required_perm)
            .await
            .map_err(|_| ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Falha ao verificar permissões.".into(),
                details: None,
            })?;

        if !has_permission {
            return Err(ApiError {
                status: StatusCode::FORBIDDEN,
                error: format!(
                    "Você precisa da permissão '{}' para realizar esta ação.",
                    required_perm
                ),
                details: None,
            });
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermInventoryRead;
impl PermissionDef for PermInventoryRead {
    fn slug() -> &'static str {
        "inventory:read"
    }
}

pub struct PermInventoryWrite;
impl PermissionDef for PermInventoryWrite {
    fn slug() -> &'static str {
        "inventory:write"
    }
}

pub struct PermTransfersCreate;
impl PermissionDef for PermTransfersCreate {
    fn slug() -> &'static str {
        "transfers:create"
    }
}

pub struct PermTransfersConfirm;
impl PermissionDef for PermTransfersConfirm {
    fn slug() -> &'static str {
        "transfers:confirm"
    }
}

pub struct PermCatalogRead;
impl PermissionDef for PermCatalogRead {
    fn slug() -> &'static str {
        "catalog:read"
    }
}

pub struct PermCatalogWrite;
impl PermissionDef for PermCatalogWrite {
    fn slug() -> &'static str {
        "catalog:write"
    }
}

pub struct PermReportsRead;
impl PermissionDef for PermReportsRead {
    fn slug() -> &'static str {
        "reports:read"
    }
}

pub struct PermTenancyAdmin;
impl PermissionDef for PermTenancyAdmin {
    fn slug() -> &'static str {
        "tenancy:admin"
    }
}
