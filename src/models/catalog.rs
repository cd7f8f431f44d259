// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationError;

// ---
// Hierarquia: Categoria -> Subcategoria -> Classe -> Produto
// ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductClass {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// "unit" vende-se por peça avulsa; "set" é o jogo/par (armação + lentes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Unit,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub class_id: Option<Uuid>,
    pub code: String,
    pub aux_code: Option<String>,
    pub ean_code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: rust_decimal::Decimal,
    pub kind: ProductKind,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Normalização e validação de códigos
// ---
// Todo texto de catálogo entra maiúsculo no banco; os códigos de
// categoria/subcategoria/classe têm exatamente 3 caracteres alfanuméricos.

/// Maiúsculas + trim. Aplicado a códigos e nomes antes de persistir.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Código de hierarquia: exatamente 3 caracteres ASCII alfanuméricos.
pub fn is_valid_catalog_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validador (crate `validator`) para os payloads de catálogo.
pub fn validate_catalog_code(code: &str) -> Result<(), ValidationError> {
    if is_valid_catalog_code(code.trim()) {
        return Ok(());
    }
    let mut err = ValidationError::new("catalog_code");
    err.message = Some("O código deve ter exatamente 3 caracteres alfanuméricos.".into());
    Err(err)
}

/// Código EAN-13: 13 dígitos, quando informado.
pub fn validate_ean_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 13 && code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut err = ValidationError::new("ean_code");
    err.message = Some("O código EAN deve ter 13 dígitos.".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_text("  arm"), "ARM");
        assert_eq!(normalize_text("lente gris "), "LENTE GRIS");
    }

    #[test]
    fn catalog_code_must_be_three_alphanumeric() {
        assert!(is_valid_catalog_code("ARM"));
        assert!(is_valid_catalog_code("a1b"));
        assert!(!is_valid_catalog_code("AR"));
        assert!(!is_valid_catalog_code("ARMA"));
        assert!(!is_valid_catalog_code("A-1"));
        assert!(!is_valid_catalog_code(""));
    }

    #[test]
    fn ean_code_requires_thirteen_digits() {
        assert!(validate_ean_code("7861042300123").is_ok());
        assert!(validate_ean_code("786104230012").is_err());
        assert!(validate_ean_code("786104230012X").is_err());
    }
}
