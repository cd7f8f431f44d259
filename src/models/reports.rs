// src/models/reports.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::inventory::MovementKind;

// DTOs de relatório: linhas desnormalizadas que saem direto das queries de
// agregação. Nenhum deles volta para o banco.

/// Total movimentado por usuário num período.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserMovementSummary {
    pub user_email: Option<String>,
    pub total_quantity: i64,
    pub total_movements: i64,
}

/// Total movimentado por tipo (entrada/saída) num período.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KindMovementSummary {
    pub kind: MovementKind,
    pub total_quantity: i64,
    pub total_movements: i64,
}

/// Linha detalhada de movimento, com nomes resolvidos para exibição.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementDetail {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub quantity: i32,
    pub product_code: String,
    pub product_name: String,
    pub branch_name: String,
    pub user_email: Option<String>,
}

/// Relatório do dia: resumo por usuário, por tipo e o detalhe completo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyMovementReport {
    pub date: NaiveDate,
    pub by_user: Vec<UserMovementSummary>,
    pub by_kind: Vec<KindMovementSummary>,
    pub details: Vec<MovementDetail>,
}

/// Resumo de movimentação de um produto na empresa inteira.
///
/// physical_total = entradas normais + entradas por traslado
///                - saídas normais  - saídas por traslado.
/// transfer_gap   = declarado enviado - declarado recebido (a "sobra" de
/// traslados confirmados com quantidade diferente + pendentes).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductMovementSummary {
    pub product_id: Uuid,
    pub inbound_total: i64,
    pub outbound_total: i64,
    pub transfer_in_total: i64,
    pub transfer_out_total: i64,
    pub declared_sent_total: i64,
    pub declared_received_total: i64,
    pub pending_sent_total: i64,
    pub physical_total: i64,
    pub transfer_gap: i64,
}

/// Par (sucursal, produto) abaixo do estoque mínimo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub branch_name: String,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i32,
    pub min_quantity: i32,
}

/// Linha do extrato de movimentos para exportação em CSV.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementExportRow {
    pub created_at: DateTime<Utc>,
    pub branch_name: String,
    pub product_code: String,
    pub product_name: String,
    pub kind: MovementKind,
    pub quantity: i32,
    pub user_email: Option<String>,
    pub comment: Option<String>,
}
