// src/services/inventory_service.rs

use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, InventoryRepository, TenantRepository},
    models::inventory::{MovementKind, StockLevel, StockMovement, apply_movement},
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    catalog_repo: CatalogRepository,
    tenant_repo: TenantRepository,
}

impl InventoryService {
    pub fn new(
        inventory_repo: InventoryRepository,
        catalog_repo: CatalogRepository,
        tenant_repo: TenantRepository,
    ) -> Self {
        Self {
            inventory_repo,
            catalog_repo,
            tenant_repo,
        }
    }

    /// Lê o saldo com lock, aplica o delta e grava — sempre dentro da
    /// transação do chamador. O saldo inexistente nasce aqui, zerado.
    ///
    /// Compartilhado com o TransferService: a saída da origem e a entrada do
    /// destino passam pelo mesmo caminho que qualquer movimento avulso.
    pub(crate) async fn apply_to_level(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
        kind: MovementKind,
        quantity: i32,
    ) -> Result<StockLevel, AppError> {
        let current = self
            .inventory_repo
            .get_stock_level_for_update(&mut *conn, branch_id, product_id)
            .await?;

        match current {
            Some(level) => {
                let new_quantity = apply_movement(level.quantity, kind, quantity)?;
                self.inventory_repo
                    .set_stock_level_quantity(&mut *conn, level.id, new_quantity)
                    .await
            }
            None => {
                // Criação preguiçosa: o par nasce com 0 e o movimento é
                // validado contra esse zero (uma saída aqui falha).
                let new_quantity = apply_movement(0, kind, quantity)?;
                self.inventory_repo
                    .insert_stock_level(&mut *conn, tenant_id, branch_id, product_id, new_quantity)
                    .await
            }
        }
    }

    /// Valida que sucursal e produto pertencem à empresa antes de qualquer
    /// mutação de estoque.
    pub(crate) async fn check_references(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
    ) -> Result<(), AppError> {
        if !self
            .tenant_repo
            .branch_belongs_to_tenant(&mut *conn, tenant_id, branch_id)
            .await?
        {
            return Err(AppError::InvalidReference("sucursal"));
        }
        if !self
            .catalog_repo
            .product_belongs_to_tenant(&mut *conn, tenant_id, product_id)
            .await?
        {
            return Err(AppError::InvalidReference("produto"));
        }
        Ok(())
    }

    // ---
    // REGISTRAR MOVIMENTO (entrada/saída avulsa)
    // ---
    // Criação explícita, exatamente uma vez por chamada: o livro-razão é
    // append-only e não existe caminho de "re-salvar" um movimento.
    #[allow(clippy::too_many_arguments)]
    pub async fn register_movement<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        actor_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
        kind: MovementKind,
        quantity: i32,
        comment: Option<&str>,
        reference_document: Option<&str>,
    ) -> Result<(StockMovement, StockLevel), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.check_references(&mut *tx, tenant_id, branch_id, product_id)
            .await?;

        // 1. Mutação do saldo (falha aqui aborta tudo: nenhum movimento órfão)
        let level = self
            .apply_to_level(&mut *tx, tenant_id, branch_id, product_id, kind, quantity)
            .await?;

        // 2. A linha do livro-razão, na mesma transação
        let movement = self
            .inventory_repo
            .insert_movement(
                &mut *tx,
                tenant_id,
                branch_id,
                product_id,
                kind,
                quantity,
                comment,
                reference_document,
                Some(actor_id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Movimento {:?} de {} registrado na sucursal {} (produto {})",
            kind,
            quantity,
            branch_id,
            product_id
        );
        Ok((movement, level))
    }

    /// Define o estoque mínimo de um par (sucursal, produto).
    pub async fn set_min_quantity<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
        min_quantity: i32,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if min_quantity < 0 {
            return Err(AppError::InvalidQuantity(min_quantity));
        }

        let mut tx = executor.begin().await?;
        self.check_references(&mut *tx, tenant_id, branch_id, product_id)
            .await?;
        let level = self
            .inventory_repo
            .set_min_quantity(&mut *tx, tenant_id, branch_id, product_id, min_quantity)
            .await?;
        tx.commit().await?;
        Ok(level)
    }

    // ---
    // Consultas
    // ---

    pub async fn get_stock_level(
        &self,
        branch_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<StockLevel>, AppError> {
        self.inventory_repo
            .get_stock_level(branch_id, product_id)
            .await
    }

    pub async fn list_levels_by_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<StockLevel>, AppError> {
        self.inventory_repo
            .list_levels_by_branch(tenant_id, branch_id)
            .await
    }

    pub async fn list_low_stock(&self, tenant_id: Uuid) -> Result<Vec<StockLevel>, AppError> {
        self.inventory_repo.list_low_stock(tenant_id).await
    }

    pub async fn list_recent_movements(
        &self,
        tenant_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.inventory_repo
            .list_recent_movements(tenant_id, limit)
            .await
    }

    pub async fn list_movements_by_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.inventory_repo
            .list_movements_by_branch(tenant_id, branch_id)
            .await
    }

    pub async fn list_movements_by_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.inventory_repo
            .list_movements_by_product(tenant_id, product_id)
            .await
    }
}
