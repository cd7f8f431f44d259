// src/services/rbac_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RbacRepository,
    models::rbac::{Permission, Role},
};

#[derive(Clone)]
pub struct RbacService {
    rbac_repo: RbacRepository,
    pool: PgPool,
}

impl RbacService {
    pub fn new(rbac_repo: RbacRepository, pool: PgPool) -> Self {
        Self { rbac_repo, pool }
    }

    /// Cria um cargo e atribui as permissões pedidas, tudo ou nada.
    pub async fn create_role_with_permissions(
        &self,
        tenant_id: Uuid,
        name: &str,
        description: Option<&str>,
        permission_slugs: &[String],
    ) -> Result<Role, AppError> {
        let mut tx = self.pool.begin().await?;

        let role = self
            .rbac_repo
            .create_role(&mut *tx, tenant_id, name, description)
            .await?;

        if !permission_slugs.is_empty() {
            let permissions = self
                .rbac_repo
                .find_permissions_by_slugs(&mut *tx, permission_slugs)
                .await?;

            // Slug desconhecido é erro do chamador, não ignorado em silêncio.
            if permissions.len() != permission_slugs.len() {
                return Err(AppError::InvalidReference("permissão"));
            }

            let ids: Vec<Uuid> = permissions.iter().map(|p| p.id).collect();
            self.rbac_repo
                .assign_permissions(&mut *tx, role.id, &ids)
                .await?;
        }

        tx.commit().await?;
        Ok(role)
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.rbac_repo.list_all_permissions().await
    }
}
