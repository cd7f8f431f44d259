//! Testes das regras de catálogo: normalização em maiúsculas e validação de
//! códigos (hierarquia de 3 caracteres, EAN-13, RUC).

use proptest::prelude::*;

use optistock_backend::external::ruc::is_valid_ruc;
use optistock_backend::models::catalog::{
    is_valid_catalog_code, normalize_text, validate_catalog_code, validate_ean_code,
};

// ============================================================================
// Testes unitários
// ============================================================================

#[test]
fn normalizacao_sobe_para_maiusculas_e_tira_espacos() {
    assert_eq!(normalize_text("  lente cr-39 "), "LENTE CR-39");
    assert_eq!(normalize_text("ARM"), "ARM");
    assert_eq!(normalize_text("ñandú"), "ÑANDÚ");
}

#[test]
fn codigo_de_hierarquia_exige_3_alfanumericos() {
    assert!(is_valid_catalog_code("ARM"));
    assert!(is_valid_catalog_code("L01"));
    assert!(is_valid_catalog_code("abc")); // valida antes de normalizar

    assert!(!is_valid_catalog_code(""));
    assert!(!is_valid_catalog_code("AR"));
    assert!(!is_valid_catalog_code("ARMZ"));
    assert!(!is_valid_catalog_code("A-1"));
    assert!(!is_valid_catalog_code("A 1"));
}

#[test]
fn validador_de_codigo_aceita_com_espacos_nas_pontas() {
    // O validador roda sobre o valor cru do payload; espaços externos são
    // tolerados porque a normalização os remove antes de persistir.
    assert!(validate_catalog_code(" ARM ").is_ok());
    assert!(validate_catalog_code("ARMA").is_err());
}

#[test]
fn ean_exige_13_digitos() {
    assert!(validate_ean_code("7861042300123").is_ok());
    assert!(validate_ean_code("0000000000000").is_ok());
    assert!(validate_ean_code("786104230012").is_err());
    assert!(validate_ean_code("78610423001234").is_err());
    assert!(validate_ean_code("786104230012A").is_err());
}

#[test]
fn ruc_exige_13_digitos() {
    assert!(is_valid_ruc("1790012345001"));
    assert!(!is_valid_ruc(""));
    assert!(!is_valid_ruc("1790012345 01"));
    assert!(!is_valid_ruc("179001234500"));
}

// ============================================================================
// Testes de propriedade
// ============================================================================

proptest! {
    /// Normalizar é idempotente.
    #[test]
    fn normalizar_duas_vezes_nao_muda(s in ".{0,40}") {
        let once = normalize_text(&s);
        prop_assert_eq!(normalize_text(&once), once);
    }

    /// O resultado nunca tem espaços nas pontas nem minúsculas ASCII.
    #[test]
    fn normalizado_sem_bordas_nem_minusculas(s in ".{0,40}") {
        let n = normalize_text(&s);
        prop_assert_eq!(n.trim(), n.as_str());
        prop_assert!(!n.chars().any(|c| c.is_ascii_lowercase()));
    }

    /// Qualquer código de 3 alfanuméricos ASCII é aceito.
    #[test]
    fn codigos_de_3_alfanumericos_sao_aceitos(code in "[A-Za-z0-9]{3}") {
        prop_assert!(is_valid_catalog_code(&code));
    }

    /// Comprimento diferente de 3 nunca passa.
    #[test]
    fn comprimento_errado_nunca_passa(code in "[A-Za-z0-9]{4,10}") {
        prop_assert!(!is_valid_catalog_code(&code));
    }
}
