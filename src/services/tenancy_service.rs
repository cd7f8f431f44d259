// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RbacRepository, TenantRepository},
    models::tenancy::{Branch, Tenant, TenantMember},
};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    rbac_repo: RbacRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, rbac_repo: RbacRepository, pool: PgPool) -> Self {
        Self {
            tenant_repo,
            rbac_repo,
            pool,
        }
    }

    /// Cria uma nova empresa e, atomicamente, registra o usuário criador como
    /// primeiro membro com o cargo "Dono" (que recebe todas as permissões).
    pub async fn create_tenant_with_owner(
        &self,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        ruc: Option<&str>,
        owner_id: Uuid,
    ) -> Result<Tenant, AppError> {
        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria a empresa
        let new_tenant = self
            .tenant_repo
            .create_tenant(&mut *tx, name, address, phone, email, ruc)
            .await?;

        // 3. Cria o cargo "Dono" desta empresa
        let owner_role = self
            .rbac_repo
            .create_role(
                &mut *tx,
                new_tenant.id,
                "Dono",
                Some("Acesso total administrativo (gerado automaticamente)"),
            )
            .await?;

        // 4. Busca todas as permissões do sistema e atribui ao cargo
        let all_permissions = self.rbac_repo.list_all_permissions().await?;
        let all_perm_ids: Vec<Uuid> = all_permissions.iter().map(|p| p.id).collect();

        if !all_perm_ids.is_empty() {
            self.rbac_repo
                .assign_permissions(&mut *tx, owner_role.id, &all_perm_ids)
                .await?;
        }

        // 5. Vincula o usuário à empresa com o cargo criado
        self.tenant_repo
            .add_member_to_tenant(&mut *tx, new_tenant.id, owner_id, owner_role.id, None)
            .await?;

        // 6. Commit
        tx.commit().await?;

        tracing::info!("Empresa criada: {} ({})", new_tenant.name, new_tenant.id);
        Ok(new_tenant)
    }

    pub async fn update_tenant(
        &self,
        tenant_id: Uuid,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        ruc: Option<&str>,
    ) -> Result<Tenant, AppError> {
        let mut tx = self.pool.begin().await?;
        let tenant = self
            .tenant_repo
            .update_tenant(&mut *tx, tenant_id, name, address, phone, email, ruc)
            .await?;
        tx.commit().await?;
        Ok(tenant)
    }

    pub async fn delete_tenant(&self, tenant_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_repo.delete_tenant(&mut *tx, tenant_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Lista as empresas do usuário (para o seletor de empresa do frontend).
    pub async fn list_user_tenants(&self, user_id: Uuid) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.get_tenants_for_user(user_id).await
    }

    /// Membro ativo do usuário nesta empresa; erro se não pertencer.
    pub async fn require_member(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<TenantMember, AppError> {
        self.tenant_repo
            .get_member(user_id, tenant_id)
            .await?
            .ok_or(AppError::NotATenantMember)
    }

    // ---
    // Sucursais
    // ---

    pub async fn create_branch(
        &self,
        tenant_id: Uuid,
        name: &str,
        abbreviation: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Branch, AppError> {
        let mut tx = self.pool.begin().await?;
        let branch = self
            .tenant_repo
            .create_branch(&mut *tx, tenant_id, name, abbreviation, address, phone)
            .await?;
        tx.commit().await?;
        Ok(branch)
    }

    pub async fn update_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
        name: &str,
        abbreviation: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Branch, AppError> {
        let mut tx = self.pool.begin().await?;
        let branch = self
            .tenant_repo
            .update_branch(
                &mut *tx,
                tenant_id,
                branch_id,
                name,
                abbreviation,
                address,
                phone,
            )
            .await?;
        tx.commit().await?;
        Ok(branch)
    }

    pub async fn delete_branch(&self, tenant_id: Uuid, branch_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_repo
            .delete_branch(&mut *tx, tenant_id, branch_id)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_branches(&self, tenant_id: Uuid) -> Result<Vec<Branch>, AppError> {
        self.tenant_repo.list_branches(tenant_id).await
    }

    pub async fn get_branch(&self, tenant_id: Uuid, branch_id: Uuid) -> Result<Branch, AppError> {
        self.tenant_repo
            .find_branch(tenant_id, branch_id)
            .await?
            .ok_or(AppError::NotFound("sucursal"))
    }
}
