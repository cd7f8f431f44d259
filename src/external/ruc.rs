// src/external/ruc.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

// Consulta de RUC no registro tributário (SRI). Usado para pré-preencher os
// dados da empresa no cadastro. O trait existe para os handlers não
// dependerem do cliente HTTP concreto.

/// Dados públicos do contribuinte.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxpayerInfo {
    pub ruc: String,
    pub legal_name: String,
    pub status: String,
    pub address: Option<String>,
}

/// RUC equatoriano: 13 dígitos.
pub fn is_valid_ruc(ruc: &str) -> bool {
    ruc.len() == 13 && ruc.chars().all(|c| c.is_ascii_digit())
}

#[async_trait]
pub trait TaxRegistry: Send + Sync {
    async fn lookup(&self, ruc: &str) -> Result<TaxpayerInfo, AppError>;
}

// Resposta do serviço público, no formato que ele devolve.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SriTaxpayerResponse {
    numero_ruc: String,
    razon_social: String,
    estado_contribuyente_ruc: String,
    direccion: Option<String>,
}

#[derive(Clone)]
pub struct SriClient {
    client: Client,
    base_url: String,
}

impl SriClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl TaxRegistry for SriClient {
    async fn lookup(&self, ruc: &str) -> Result<TaxpayerInfo, AppError> {
        if !is_valid_ruc(ruc) {
            return Err(AppError::InvalidReference("RUC"));
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), ruc);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Consulta de RUC falhou: {}", e);
                AppError::TaxRegistryUnavailable
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("contribuyente"));
        }
        if !response.status().is_success() {
            tracing::warn!("Registro tributário devolveu {}", response.status());
            return Err(AppError::TaxRegistryUnavailable);
        }

        let body: SriTaxpayerResponse = response
            .json()
            .await
            .map_err(|_| AppError::TaxRegistryUnavailable)?;

        Ok(TaxpayerInfo {
            ruc: body.numero_ruc,
            legal_name: body.razon_social,
            status: body.estado_contribuyente_ruc,
            address: body.direccion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruc_must_have_thirteen_digits() {
        assert!(is_valid_ruc("1790012345001"));
        assert!(!is_valid_ruc("179001234500"));
        assert!(!is_valid_ruc("17900123450011"));
        assert!(!is_valid_ruc("17900123450O1"));
    }
}
