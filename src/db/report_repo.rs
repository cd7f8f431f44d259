// src/db/report_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::reports::{
    KindMovementSummary, LowStockEntry, MovementDetail, MovementExportRow, UserMovementSummary,
};

// Repositório só de leitura: agregações para os relatórios. Usa a pool
// direto, nunca participa de transações.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn movements_by_user(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<UserMovementSummary>, AppError> {
        let rows = sqlx::query_as::<_, UserMovementSummary>(
            r#"
            SELECT u.email AS user_email,
                   COALESCE(SUM(m.quantity), 0)::bigint AS total_quantity,
                   COUNT(m.id)::bigint AS total_movements
            FROM stock_movements m
            LEFT JOIN users u ON u.id = m.user_id
            WHERE m.tenant_id = $1 AND m.created_at >= $2 AND m.created_at <= $3
            GROUP BY u.email
            ORDER BY total_quantity DESC
            "#,
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn movements_by_kind(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<KindMovementSummary>, AppError> {
        let rows = sqlx::query_as::<_, KindMovementSummary>(
            r#"
            SELECT m.kind,
                   COALESCE(SUM(m.quantity), 0)::bigint AS total_quantity,
                   COUNT(m.id)::bigint AS total_movements
            FROM stock_movements m
            WHERE m.tenant_id = $1 AND m.created_at >= $2 AND m.created_at <= $3
            GROUP BY m.kind
            ORDER BY m.kind
            "#,
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn movement_details(
        &self,
        tenant_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<MovementDetail>, AppError> {
        let rows = sqlx::query_as::<_, MovementDetail>(
            r#"
            SELECT m.id, m.created_at, m.kind, m.quantity,
                   p.code AS product_code, p.name AS product_name,
                   b.name AS branch_name, u.email AS user_email
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            JOIN branches b ON b.id = m.branch_id
            LEFT JOIN users u ON u.id = m.user_id
            WHERE m.tenant_id = $1 AND m.created_at >= $2 AND m.created_at <= $3
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ---
    // Resumo por produto
    // ---
    // Os movimentos ligados a traslados são separados dos "normais" pelo
    // NOT EXISTS contra as referências outbound/inbound dos transfers.

    /// Soma de movimentos de um tipo NÃO ligados a traslado.
    pub async fn plain_movement_total(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
        kind: &str,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(m.quantity), 0)::bigint
            FROM stock_movements m
            WHERE m.tenant_id = $1 AND m.product_id = $2 AND m.kind = $3::movement_kind
              AND NOT EXISTS (
                  SELECT 1 FROM transfers t
                  WHERE t.outbound_movement_id = m.id OR t.inbound_movement_id = m.id
              )
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Soma dos movimentos de saída criados por traslados do produto.
    pub async fn transfer_outbound_total(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(m.quantity), 0)::bigint
            FROM stock_movements m
            JOIN transfers t ON t.outbound_movement_id = m.id
            WHERE t.tenant_id = $1 AND t.product_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Soma dos movimentos de entrada criados por traslados confirmados.
    pub async fn transfer_inbound_total(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(m.quantity), 0)::bigint
            FROM stock_movements m
            JOIN transfers t ON t.inbound_movement_id = m.id
            WHERE t.tenant_id = $1 AND t.product_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Quantidades declaradas dos traslados: (enviado total, recebido
    /// confirmado, enviado ainda pendente).
    pub async fn transfer_declared_totals(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<(i64, i64, i64), AppError> {
        let row = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT COALESCE(SUM(delivered_quantity), 0)::bigint,
                   COALESCE(SUM(received_quantity) FILTER (WHERE status = 'confirmed'), 0)::bigint,
                   COALESCE(SUM(delivered_quantity) FILTER (WHERE status = 'pending'), 0)::bigint
            FROM transfers
            WHERE tenant_id = $1 AND product_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn low_stock_entries(&self, tenant_id: Uuid) -> Result<Vec<LowStockEntry>, AppError> {
        let rows = sqlx::query_as::<_, LowStockEntry>(
            r#"
            SELECT b.name AS branch_name, p.code AS product_code,
                   p.name AS product_name, sl.quantity, sl.min_quantity
            FROM stock_levels sl
            JOIN branches b ON b.id = sl.branch_id
            JOIN products p ON p.id = sl.product_id
            WHERE sl.tenant_id = $1 AND sl.quantity < sl.min_quantity
            ORDER BY b.name, p.code
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn export_rows(&self, tenant_id: Uuid) -> Result<Vec<MovementExportRow>, AppError> {
        let rows = sqlx::query_as::<_, MovementExportRow>(
            r#"
            SELECT m.created_at, b.name AS branch_name, p.code AS product_code,
                   p.name AS product_name, m.kind, m.quantity,
                   u.email AS user_email, m.comment
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            JOIN branches b ON b.id = m.branch_id
            LEFT JOIN users u ON u.id = m.user_id
            WHERE m.tenant_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
