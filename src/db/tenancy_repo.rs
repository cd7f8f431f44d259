// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::tenancy::{Branch, Tenant, TenantMember};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verifica se um usuário tem acesso a uma empresa.
    /// Esta é a checagem de autorização mais importante do tenancy.
    pub async fn check_user_tenancy(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, AppError> {
        // SELECT EXISTS para a consulta mais barata possível.
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM tenant_members
                WHERE user_id = $1 AND tenant_id = $2 AND is_active = true
            )
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Membro (cargo + sucursal casa) de um usuário numa empresa.
    pub async fn get_member(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<TenantMember>, AppError> {
        let member = sqlx::query_as::<_, TenantMember>(
            r#"
            SELECT tenant_id, user_id, role_id, branch_id, is_active, created_at
            FROM tenant_members
            WHERE user_id = $1 AND tenant_id = $2 AND is_active = true
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        ruc: Option<&str>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, address, phone, email, ruc)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, phone, email, ruc, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(email)
        .bind(ruc)
        .fetch_one(executor)
        .await?;

        Ok(tenant)
    }

    pub async fn update_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        ruc: Option<&str>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = $2, address = $3, phone = $4, email = $5, ruc = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, address, phone, email, ruc, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(email)
        .bind(ruc)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("empresa"))
    }

    pub async fn delete_tenant<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("empresa"));
        }
        Ok(())
    }

    pub async fn find_tenant(&self, tenant_id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, address, phone, email, ruc, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Empresas às quais o usuário pertence (para o seletor do frontend).
    pub async fn get_tenants_for_user(&self, user_id: Uuid) -> Result<Vec<Tenant>, AppError> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT t.id, t.name, t.address, t.phone, t.email, t.ruc,
                   t.created_at, t.updated_at
            FROM tenants t
            JOIN tenant_members tm ON tm.tenant_id = t.id
            WHERE tm.user_id = $1 AND tm.is_active = true
            ORDER BY t.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }

    /// Vincula um usuário a uma empresa com o cargo dado.
    pub async fn add_member_to_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Result<TenantMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, TenantMember>(
            r#"
            INSERT INTO tenant_members (tenant_id, user_id, role_id, branch_id)
            VALUES ($1, $2, $3, $4)
            RETURNING tenant_id, user_id, role_id, branch_id, is_active, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(role_id)
        .bind(branch_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "o usuário já é membro desta empresa".into(),
                    );
                }
            }
            e.into()
        })?;

        Ok(member)
    }

    // ---
    // Sucursais
    // ---

    pub async fn create_branch<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        abbreviation: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (tenant_id, name, abbreviation, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, name, abbreviation, address, phone,
                      created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(abbreviation)
        .bind(address)
        .bind(phone)
        .fetch_one(executor)
        .await?;

        Ok(branch)
    }

    pub async fn update_branch<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
        name: &str,
        abbreviation: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Branch>(
            r#"
            UPDATE branches
            SET name = $3, abbreviation = $4, address = $5, phone = $6,
                updated_at = now()
            WHERE id = $2 AND tenant_id = $1
            RETURNING id, tenant_id, name, abbreviation, address, phone,
                      created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(name)
        .bind(abbreviation)
        .bind(address)
        .bind(phone)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("sucursal"))
    }

    pub async fn delete_branch<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1 AND tenant_id = $2")
            .bind(branch_id)
            .bind(tenant_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("sucursal"));
        }
        Ok(())
    }

    pub async fn find_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, tenant_id, name, abbreviation, address, phone,
                   created_at, updated_at
            FROM branches
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(branch_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }

    pub async fn list_branches(&self, tenant_id: Uuid) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, tenant_id, name, abbreviation, address, phone,
                   created_at, updated_at
            FROM branches
            WHERE tenant_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    /// Garante que a sucursal pertence à empresa antes de mexer em estoque.
    pub async fn branch_belongs_to_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM branches WHERE id = $1 AND tenant_id = $2)",
        )
        .bind(branch_id)
        .bind(tenant_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }
}
