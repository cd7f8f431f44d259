// src/db/inventory_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::inventory::{MovementKind, StockLevel, StockMovement, Transfer};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Saldos
    // ---

    pub async fn get_stock_level(
        &self,
        branch_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<StockLevel>, AppError> {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            FROM stock_levels
            WHERE branch_id = $1 AND product_id = $2
            "#,
        )
        .bind(branch_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level)
    }

    /// Saldo com lock de linha. Chamado dentro da transação que vai gravar o
    /// movimento, para que duas requisições não leiam o mesmo saldo.
    pub async fn get_stock_level_for_update<'e, E>(
        &self,
        executor: E,
        branch_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<StockLevel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            FROM stock_levels
            WHERE branch_id = $1 AND product_id = $2
            FOR UPDATE
            "#,
        )
        .bind(branch_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;

        Ok(level)
    }

    /// Criação preguiçosa do saldo: o par (sucursal, produto) nasce aqui,
    /// no primeiro movimento que o toca.
    pub async fn insert_stock_level<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            INSERT INTO stock_levels (tenant_id, branch_id, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;

        Ok(level)
    }

    pub async fn set_stock_level_quantity<'e, E>(
        &self,
        executor: E,
        level_id: Uuid,
        quantity: i32,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            UPDATE stock_levels
            SET quantity = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            "#,
        )
        .bind(level_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;

        Ok(level)
    }

    /// Define o estoque mínimo do par, criando o saldo zerado se preciso.
    pub async fn set_min_quantity<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
        min_quantity: i32,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            INSERT INTO stock_levels (tenant_id, branch_id, product_id, quantity, min_quantity)
            VALUES ($1, $2, $3, 0, $4)
            ON CONFLICT (branch_id, product_id)
            DO UPDATE SET min_quantity = $4, updated_at = now()
            RETURNING id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .bind(min_quantity)
        .fetch_one(executor)
        .await?;

        Ok(level)
    }

    pub async fn list_levels_by_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<StockLevel>, AppError> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            FROM stock_levels
            WHERE tenant_id = $1 AND branch_id = $2
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    /// Pares abaixo do estoque mínimo, na empresa toda.
    pub async fn list_low_stock(&self, tenant_id: Uuid) -> Result<Vec<StockLevel>, AppError> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, quantity, min_quantity, updated_at
            FROM stock_levels
            WHERE tenant_id = $1 AND quantity < min_quantity
            ORDER BY quantity ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    // ---
    // Movimentos (livro-razão, append-only)
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        branch_id: Uuid,
        product_id: Uuid,
        kind: MovementKind,
        quantity: i32,
        comment: Option<&str>,
        reference_document: Option<&str>,
        user_id: Option<Uuid>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (tenant_id, branch_id, product_id, kind, quantity, comment,
                 reference_document, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, branch_id, product_id, kind, quantity,
                      comment, reference_document, user_id, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .bind(product_id)
        .bind(kind)
        .bind(quantity)
        .bind(comment)
        .bind(reference_document)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(movement)
    }

    pub async fn list_recent_movements(
        &self,
        tenant_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, kind, quantity,
                   comment, reference_document, user_id, created_at
            FROM stock_movements
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    pub async fn list_movements_by_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, kind, quantity,
                   comment, reference_document, user_id, created_at
            FROM stock_movements
            WHERE tenant_id = $1 AND branch_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    pub async fn list_movements_by_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, tenant_id, branch_id, product_id, kind, quantity,
                   comment, reference_document, user_id, created_at
            FROM stock_movements
            WHERE tenant_id = $1 AND product_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    // ---
    // Traslados
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_transfer<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        origin_branch_id: Uuid,
        destination_branch_id: Uuid,
        delivered_quantity: i32,
        outbound_movement_id: Uuid,
        document_path: Option<&str>,
        created_by: Option<Uuid>,
    ) -> Result<Transfer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            INSERT INTO transfers
                (tenant_id, product_id, origin_branch_id, destination_branch_id,
                 delivered_quantity, outbound_movement_id, document_path, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                      delivered_quantity, received_quantity, status,
                      outbound_movement_id, inbound_movement_id, document_path,
                      created_by, confirmed_by, created_at, confirmed_at
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .bind(origin_branch_id)
        .bind(destination_branch_id)
        .bind(delivered_quantity)
        .bind(outbound_movement_id)
        .bind(document_path)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        Ok(transfer)
    }

    pub async fn find_transfer(
        &self,
        tenant_id: Uuid,
        transfer_id: Uuid,
    ) -> Result<Option<Transfer>, AppError> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                   delivered_quantity, received_quantity, status,
                   outbound_movement_id, inbound_movement_id, document_path,
                   created_by, confirmed_by, created_at, confirmed_at
            FROM transfers
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(transfer_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transfer)
    }

    /// Traslado com lock de linha, para a confirmação ser exatamente-uma-vez
    /// mesmo com dois encarregados clicando juntos.
    pub async fn find_transfer_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        transfer_id: Uuid,
    ) -> Result<Option<Transfer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                   delivered_quantity, received_quantity, status,
                   outbound_movement_id, inbound_movement_id, document_path,
                   created_by, confirmed_by, created_at, confirmed_at
            FROM transfers
            WHERE id = $1 AND tenant_id = $2
            FOR UPDATE
            "#,
        )
        .bind(transfer_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(transfer)
    }

    /// Transição pending -> confirmed. O WHERE por status garante no banco o
    /// que o service já validou em memória.
    pub async fn mark_transfer_confirmed<'e, E>(
        &self,
        executor: E,
        transfer_id: Uuid,
        received_quantity: i32,
        inbound_movement_id: Uuid,
        confirmed_by: Option<Uuid>,
    ) -> Result<Transfer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Transfer>(
            r#"
            UPDATE transfers
            SET status = 'confirmed', received_quantity = $2,
                inbound_movement_id = $3, confirmed_by = $4, confirmed_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                      delivered_quantity, received_quantity, status,
                      outbound_movement_id, inbound_movement_id, document_path,
                      created_by, confirmed_by, created_at, confirmed_at
            "#,
        )
        .bind(transfer_id)
        .bind(received_quantity)
        .bind(inbound_movement_id)
        .bind(confirmed_by)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::TransferAlreadyConfirmed)
    }

    pub async fn list_transfers(
        &self,
        tenant_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Transfer>, AppError> {
        let transfers = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                   delivered_quantity, received_quantity, status,
                   outbound_movement_id, inbound_movement_id, document_path,
                   created_by, confirmed_by, created_at, confirmed_at
            FROM transfers
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transfers)
    }

    /// Traslados pendentes: da empresa toda (supervisor) ou só os destinados
    /// à sucursal do membro.
    pub async fn list_pending_transfers(
        &self,
        tenant_id: Uuid,
        destination_branch_id: Option<Uuid>,
    ) -> Result<Vec<Transfer>, AppError> {
        let transfers = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                   delivered_quantity, received_quantity, status,
                   outbound_movement_id, inbound_movement_id, document_path,
                   created_by, confirmed_by, created_at, confirmed_at
            FROM transfers
            WHERE tenant_id = $1
              AND status = 'pending'
              AND ($2::uuid IS NULL OR destination_branch_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(destination_branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transfers)
    }

    /// Traslados de uma sucursal (origem ou destino), para o extrato por
    /// sucursal.
    pub async fn list_transfers_by_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<Transfer>, AppError> {
        let transfers = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                   delivered_quantity, received_quantity, status,
                   outbound_movement_id, inbound_movement_id, document_path,
                   created_by, confirmed_by, created_at, confirmed_at
            FROM transfers
            WHERE tenant_id = $1
              AND (origin_branch_id = $2 OR destination_branch_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transfers)
    }

    pub async fn list_transfers_by_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<Transfer>, AppError> {
        let transfers = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, tenant_id, product_id, origin_branch_id, destination_branch_id,
                   delivered_quantity, received_quantity, status,
                   outbound_movement_id, inbound_movement_id, document_path,
                   created_by, confirmed_by, created_at, confirmed_at
            FROM transfers
            WHERE tenant_id = $1 AND product_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transfers)
    }

    /// Dados prontos para a guia de remissão em PDF.
    pub async fn transfer_print_data(
        &self,
        tenant_id: Uuid,
        transfer_id: Uuid,
    ) -> Result<Option<TransferPrintData>, AppError> {
        let data = sqlx::query_as::<_, TransferPrintData>(
            r#"
            SELECT t.id, t.delivered_quantity, t.received_quantity,
                   t.status::text AS status, t.created_at,
                   p.code AS product_code, p.name AS product_name,
                   ob.name AS origin_name, ob.abbreviation AS origin_abbreviation,
                   db.name AS destination_name, db.abbreviation AS destination_abbreviation,
                   tn.name AS tenant_name, tn.ruc AS tenant_ruc
            FROM transfers t
            JOIN products p ON p.id = t.product_id
            JOIN branches ob ON ob.id = t.origin_branch_id
            JOIN branches db ON db.id = t.destination_branch_id
            JOIN tenants tn ON tn.id = t.tenant_id
            WHERE t.id = $1 AND t.tenant_id = $2
            "#,
        )
        .bind(transfer_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(data)
    }
}

/// Linha desnormalizada para impressão da guia de remissão.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransferPrintData {
    pub id: Uuid,
    pub delivered_quantity: i32,
    pub received_quantity: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub product_code: String,
    pub product_name: String,
    pub origin_name: String,
    pub origin_abbreviation: String,
    pub destination_name: String,
    pub destination_abbreviation: String,
    pub tenant_name: String,
    pub tenant_ruc: Option<String>,
}
