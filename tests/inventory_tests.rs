//! Testes da mutação de saldo (livro-razão).
//!
//! Cobrem as propriedades centrais do estoque:
//! - saldo nunca fica negativo após uma operação aceita;
//! - saldo final = soma das entradas - soma das saídas aplicadas;
//! - quantidade não positiva é rejeitada antes de qualquer efeito.

use proptest::prelude::*;

use optistock_backend::common::error::AppError;
use optistock_backend::models::inventory::{MovementKind, apply_movement};

// ============================================================================
// Testes unitários
// ============================================================================

#[test]
fn entrada_soma_ao_saldo() {
    // Cenário: saldo 20, entrada de 10 -> saldo 30
    assert_eq!(apply_movement(20, MovementKind::Inbound, 10).unwrap(), 30);
}

#[test]
fn saida_subtrai_do_saldo() {
    assert_eq!(apply_movement(30, MovementKind::Outbound, 12).unwrap(), 18);
}

#[test]
fn saida_ate_zerar_e_permitida() {
    assert_eq!(apply_movement(15, MovementKind::Outbound, 15).unwrap(), 0);
}

#[test]
fn saida_maior_que_saldo_e_rejeitada_sem_efeito() {
    // Cenário: saldo 20, saída de 25 -> rejeitada, saldo segue 20
    let before = 20;
    let err = apply_movement(before, MovementKind::Outbound, 25).unwrap_err();

    match err {
        AppError::InsufficientStock {
            available,
            requested,
        } => {
            assert_eq!(available, 20);
            assert_eq!(requested, 25);
        }
        other => panic!("erro inesperado: {other}"),
    }
}

#[test]
fn saldo_inexistente_conta_como_zero() {
    // Criação preguiçosa: o primeiro movimento valida contra 0
    assert!(matches!(
        apply_movement(0, MovementKind::Outbound, 1),
        Err(AppError::InsufficientStock { available: 0, .. })
    ));
    assert_eq!(apply_movement(0, MovementKind::Inbound, 7).unwrap(), 7);
}

#[test]
fn quantidade_zero_ou_negativa_e_rejeitada() {
    assert!(matches!(
        apply_movement(10, MovementKind::Inbound, 0),
        Err(AppError::InvalidQuantity(0))
    ));
    assert!(matches!(
        apply_movement(10, MovementKind::Outbound, -5),
        Err(AppError::InvalidQuantity(-5))
    ));
}

#[test]
fn delta_com_sinal_por_tipo() {
    assert_eq!(MovementKind::Inbound.signed_delta(4), 4);
    assert_eq!(MovementKind::Outbound.signed_delta(4), -4);
}

// ============================================================================
// Testes de propriedade
// ============================================================================

fn quantity_strategy() -> impl Strategy<Value = i32> {
    1i32..=10_000
}

fn kind_strategy() -> impl Strategy<Value = MovementKind> {
    prop_oneof![Just(MovementKind::Inbound), Just(MovementKind::Outbound)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Invariante: saldo aceito nunca é negativo.
    #[test]
    fn saldo_aceito_nunca_negativo(
        start in 0i32..=10_000,
        kind in kind_strategy(),
        quantity in quantity_strategy()
    ) {
        if let Ok(next) = apply_movement(start, kind, quantity) {
            prop_assert!(next >= 0);
        }
    }

    /// Consistência razão/saldo: aplicar uma sequência de movimentos deixa o
    /// saldo igual a (entradas aplicadas - saídas aplicadas). Movimentos
    /// rejeitados não alteram nada.
    #[test]
    fn saldo_final_igual_a_soma_do_razao(
        movements in prop::collection::vec((kind_strategy(), quantity_strategy()), 1..30)
    ) {
        let mut balance = 0i32;
        let mut inbound_sum = 0i64;
        let mut outbound_sum = 0i64;

        for (kind, quantity) in movements {
            match apply_movement(balance, kind, quantity) {
                Ok(next) => {
                    balance = next;
                    match kind {
                        MovementKind::Inbound => inbound_sum += i64::from(quantity),
                        MovementKind::Outbound => outbound_sum += i64::from(quantity),
                    }
                }
                Err(_) => {
                    // rejeição não tem efeito algum
                }
            }
        }

        prop_assert_eq!(i64::from(balance), inbound_sum - outbound_sum);
        prop_assert!(balance >= 0);
    }

    /// Entradas sempre acumulam exatamente.
    #[test]
    fn entradas_acumulam(amounts in prop::collection::vec(1i32..=1000, 1..20)) {
        let mut balance = 0i32;
        for q in &amounts {
            balance = apply_movement(balance, MovementKind::Inbound, *q).unwrap();
        }
        let expected: i32 = amounts.iter().sum();
        prop_assert_eq!(balance, expected);
    }

    /// Saída maior que o saldo falha SEMPRE, e com o saldo reportado certo.
    #[test]
    fn saida_excedente_sempre_falha(
        start in 0i32..=1000,
        extra in 1i32..=1000
    ) {
        let requested = start + extra;
        let result = apply_movement(start, MovementKind::Outbound, requested);
        let matched = matches!(
            result,
            Err(AppError::InsufficientStock { available, .. }) if available == start
        );
        prop_assert!(matched);
    }
}
