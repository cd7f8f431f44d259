// src/services/report_service.rs

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::reports::{DailyMovementReport, LowStockEntry, ProductMovementSummary},
};

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository) -> Self {
        Self { report_repo }
    }

    /// Relatório do dia: resumo por usuário, por tipo e o detalhe completo.
    pub async fn daily_movement_report(
        &self,
        tenant_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyMovementReport, AppError> {
        let start_of_day = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let end_of_day = start_of_day + Duration::days(1) - Duration::microseconds(1);

        let by_user = self
            .report_repo
            .movements_by_user(tenant_id, start_of_day, end_of_day)
            .await?;
        let by_kind = self
            .report_repo
            .movements_by_kind(tenant_id, start_of_day, end_of_day)
            .await?;
        let details = self
            .report_repo
            .movement_details(tenant_id, start_of_day, end_of_day)
            .await?;

        Ok(DailyMovementReport {
            date,
            by_user,
            by_kind,
            details,
        })
    }

    /// Resumo de movimentação de um produto: movimentos normais separados dos
    /// movimentos de traslado, mais as quantidades declaradas dos traslados.
    pub async fn product_movement_summary(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<ProductMovementSummary, AppError> {
        let inbound_total = self
            .report_repo
            .plain_movement_total(tenant_id, product_id, "inbound")
            .await?;
        let outbound_total = self
            .report_repo
            .plain_movement_total(tenant_id, product_id, "outbound")
            .await?;
        let transfer_in_total = self
            .report_repo
            .transfer_inbound_total(tenant_id, product_id)
            .await?;
        let transfer_out_total = self
            .report_repo
            .transfer_outbound_total(tenant_id, product_id)
            .await?;
        let (declared_sent_total, declared_received_total, pending_sent_total) = self
            .report_repo
            .transfer_declared_totals(tenant_id, product_id)
            .await?;

        // Total físico = entradas normais + entradas por traslado
        //              - saídas normais  - saídas por traslado
        let physical_total =
            inbound_total + transfer_in_total - outbound_total - transfer_out_total;

        // A diferença entre o declarado enviado e o declarado recebido:
        // pendentes + mermas de confirmação com quantidade menor.
        let transfer_gap = declared_sent_total - declared_received_total;

        Ok(ProductMovementSummary {
            product_id,
            inbound_total,
            outbound_total,
            transfer_in_total,
            transfer_out_total,
            declared_sent_total,
            declared_received_total,
            pending_sent_total,
            physical_total,
            transfer_gap,
        })
    }

    pub async fn low_stock_report(&self, tenant_id: Uuid) -> Result<Vec<LowStockEntry>, AppError> {
        self.report_repo.low_stock_entries(tenant_id).await
    }

    /// Extrato completo de movimentos em CSV (uma linha por movimento).
    pub async fn export_movements_csv(&self, tenant_id: Uuid) -> Result<String, AppError> {
        let rows = self.report_repo.export_rows(tenant_id).await?;

        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in &rows {
            wtr.serialize(row)
                .map_err(|e| anyhow::anyhow!("Falha ao serializar CSV: {}", e))?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Falha ao finalizar CSV: {}", e))?;
        let csv_data =
            String::from_utf8(bytes).map_err(|e| anyhow::anyhow!("CSV não é UTF-8: {}", e))?;

        Ok(csv_data)
    }
}
