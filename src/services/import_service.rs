// src/services/import_service.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::ProductKind,
    services::catalog_service::CatalogService,
};

// Importação de produtos em massa a partir de CSV. Cada linha é processada
// isolada: a linha 37 com preço inválido não derruba as outras 200. O
// relatório devolve o que entrou e o que falhou, linha a linha.

/// Uma linha do arquivo. Tudo chega como texto e é validado aqui, para a
/// mensagem de erro apontar o campo certo.
#[derive(Debug, Deserialize)]
struct ProductCsvRow {
    code: String,
    name: String,
    price: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    aux_code: Option<String>,
    #[serde(default)]
    ean_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub line: u64,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

#[derive(Clone)]
pub struct ImportService {
    catalog_service: CatalogService,
}

impl ImportService {
    pub fn new(catalog_service: CatalogService) -> Self {
        Self { catalog_service }
    }

    pub async fn import_products_csv(
        &self,
        tenant_id: Uuid,
        data: &[u8],
    ) -> Result<ImportReport, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);

        // Materializa as linhas antes do processamento assíncrono.
        let records: Vec<Result<ProductCsvRow, csv::Error>> =
            reader.deserialize::<ProductCsvRow>().collect();

        let mut imported = 0usize;
        let mut errors: Vec<ImportRowError> = Vec::new();

        for (idx, record) in records.into_iter().enumerate() {
            // +2: linha 1 é o cabeçalho e o enumerate começa em zero.
            let line = (idx as u64) + 2;

            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    errors.push(ImportRowError {
                        line,
                        message: format!("Linha malformada: {}", e),
                    });
                    continue;
                }
            };

            match self.import_row(tenant_id, &row).await {
                Ok(()) => imported += 1,
                Err(e) => errors.push(ImportRowError {
                    line,
                    message: e.to_string(),
                }),
            }
        }

        let report = ImportReport {
            imported,
            failed: errors.len(),
            errors,
        };

        tracing::info!(
            "Importação de produtos: {} ok, {} com erro",
            report.imported,
            report.failed
        );
        Ok(report)
    }

    async fn import_row(&self, tenant_id: Uuid, row: &ProductCsvRow) -> Result<(), AppError> {
        if row.code.is_empty() {
            return Err(AppError::InvalidReference("código do produto"));
        }
        if row.name.is_empty() {
            return Err(AppError::InvalidReference("nome do produto"));
        }

        let price = Decimal::from_str(&row.price)
            .map_err(|_| AppError::InvalidReference("preço"))?;
        if price < Decimal::ZERO {
            return Err(AppError::InvalidReference("preço"));
        }

        let kind = match row.kind.as_deref() {
            None | Some("") | Some("unit") => ProductKind::Unit,
            Some("set") => ProductKind::Set,
            Some(_) => return Err(AppError::InvalidReference("tipo do produto")),
        };

        // Cada linha entra na sua própria transação, dentro do serviço de
        // catálogo — o isolamento por linha vem de graça daqui.
        self.catalog_service
            .create_product(
                tenant_id,
                None,
                &row.code,
                row.aux_code.as_deref().filter(|s| !s.is_empty()),
                row.ean_code.as_deref().filter(|s| !s.is_empty()),
                &row.name,
                row.description.as_deref().filter(|s| !s.is_empty()),
                price,
                kind,
            )
            .await?;

        Ok(())
    }
}
