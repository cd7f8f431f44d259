//! Testes da máquina de estados do traslado (pending -> confirmed).
//!
//! A mecânica transacional de verdade vive no TransferService (Postgres);
//! aqui um armazém em memória compõe as MESMAS funções puras do domínio —
//! validate_transfer_route, apply_movement, ensure_pending e TransferPolicy —
//! na MESMA ordem que o service, para exercitar os cenários do protocolo sem
//! banco.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use optistock_backend::common::error::AppError;
use optistock_backend::models::inventory::{
    MovementKind, Transfer, TransferPolicy, TransferStatus, apply_movement,
    validate_transfer_route,
};

// ============================================================================
// Armazém em memória
// ============================================================================

struct Warehouse {
    balances: HashMap<(Uuid, Uuid), i32>, // (sucursal, produto) -> saldo
    transfers: HashMap<Uuid, Transfer>,
    policy: TransferPolicy,
}

impl Warehouse {
    fn new(policy: TransferPolicy) -> Self {
        Self {
            balances: HashMap::new(),
            transfers: HashMap::new(),
            policy,
        }
    }

    fn balance(&self, branch: Uuid, product: Uuid) -> i32 {
        *self.balances.get(&(branch, product)).unwrap_or(&0)
    }

    fn set_balance(&mut self, branch: Uuid, product: Uuid, quantity: i32) {
        self.balances.insert((branch, product), quantity);
    }

    /// Mutação de saldo: só escreve se a função pura aceitar (atomicidade).
    fn apply(
        &mut self,
        branch: Uuid,
        product: Uuid,
        kind: MovementKind,
        quantity: i32,
    ) -> Result<(), AppError> {
        let current = self.balance(branch, product);
        let next = apply_movement(current, kind, quantity)?;
        self.balances.insert((branch, product), next);
        Ok(())
    }

    /// Fase 1: saída na origem + traslado pendente. Falha não deixa rastro.
    fn create_transfer(
        &mut self,
        product: Uuid,
        origin: Uuid,
        destination: Uuid,
        delivered: i32,
    ) -> Result<Uuid, AppError> {
        validate_transfer_route(origin, destination)?;
        if delivered <= 0 {
            return Err(AppError::InvalidQuantity(delivered));
        }

        self.apply(origin, product, MovementKind::Outbound, delivered)?;

        let id = Uuid::new_v4();
        self.transfers.insert(
            id,
            Transfer {
                id,
                tenant_id: Uuid::new_v4(),
                product_id: product,
                origin_branch_id: origin,
                destination_branch_id: destination,
                delivered_quantity: delivered,
                received_quantity: None,
                status: TransferStatus::Pending,
                outbound_movement_id: Uuid::new_v4(),
                inbound_movement_id: None,
                document_path: None,
                created_by: None,
                confirmed_by: None,
                created_at: Utc::now(),
                confirmed_at: None,
            },
        );
        Ok(id)
    }

    /// Fase 2: entrada no destino + transição para confirmado.
    fn confirm_transfer(&mut self, transfer_id: Uuid, received: i32) -> Result<(), AppError> {
        let transfer = self
            .transfers
            .get(&transfer_id)
            .cloned()
            .ok_or(AppError::NotFound("traslado"))?;

        transfer.ensure_pending()?;
        self.policy
            .validate_received(transfer.delivered_quantity, received)?;

        self.apply(
            transfer.destination_branch_id,
            transfer.product_id,
            MovementKind::Inbound,
            received,
        )?;

        let stored = self.transfers.get_mut(&transfer_id).unwrap();
        stored.status = TransferStatus::Confirmed;
        stored.received_quantity = Some(received);
        stored.confirmed_at = Some(Utc::now());
        Ok(())
    }
}

// ============================================================================
// Cenários do protocolo
// ============================================================================

#[test]
fn criar_traslado_baixa_origem_e_fica_pendente() {
    // Cenário: saldo(Quito, Y) = 15; traslado de 15 para Cuenca
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 15);

    let id = wh.create_transfer(product, quito, cuenca, 15).unwrap();

    assert_eq!(wh.balance(quito, product), 0);
    assert_eq!(wh.balance(cuenca, product), 0); // destino intocado até confirmar
    assert_eq!(wh.transfers[&id].status, TransferStatus::Pending);
    assert_eq!(wh.transfers[&id].delivered_quantity, 15);
    assert!(wh.transfers[&id].received_quantity.is_none());
}

#[test]
fn confirmar_credita_destino_e_e_terminal() {
    // Cenário: confirma com 12 recebidas; segunda confirmação falha
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 15);

    let id = wh.create_transfer(product, quito, cuenca, 15).unwrap();
    wh.confirm_transfer(id, 12).unwrap();

    assert_eq!(wh.balance(cuenca, product), 12);
    assert_eq!(wh.transfers[&id].status, TransferStatus::Confirmed);
    assert_eq!(wh.transfers[&id].received_quantity, Some(12));

    // Exatamente uma vez: a segunda chamada falha e não mexe em saldo
    let err = wh.confirm_transfer(id, 12).unwrap_err();
    assert!(matches!(err, AppError::TransferAlreadyConfirmed));
    assert_eq!(wh.balance(cuenca, product), 12);
}

#[test]
fn origem_igual_destino_e_rejeitada_antes_de_qualquer_efeito() {
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito) = (Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 50);

    let err = wh.create_transfer(product, quito, quito, 10).unwrap_err();

    assert!(matches!(err, AppError::SameBranchTransfer));
    assert_eq!(wh.balance(quito, product), 50);
    assert!(wh.transfers.is_empty());
}

#[test]
fn estoque_insuficiente_nao_cria_traslado() {
    // Atomicidade: a falha da mutação de saldo impede a linha do traslado
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 5);

    let err = wh.create_transfer(product, quito, cuenca, 8).unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 5,
            requested: 8
        }
    ));
    assert_eq!(wh.balance(quito, product), 5);
    assert!(wh.transfers.is_empty());
}

#[test]
fn quantidade_entregue_invalida_e_rejeitada() {
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 10);

    assert!(matches!(
        wh.create_transfer(product, quito, cuenca, 0),
        Err(AppError::InvalidQuantity(0))
    ));
    assert_eq!(wh.balance(quito, product), 10);
}

#[test]
fn recebido_maior_que_enviado_depende_da_politica() {
    // Política padrão (sem teto): receber 20 de 15 enviadas é aceito
    let mut open = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    open.set_balance(quito, product, 15);
    let id = open.create_transfer(product, quito, cuenca, 15).unwrap();
    open.confirm_transfer(id, 20).unwrap();
    assert_eq!(open.balance(cuenca, product), 20);

    // Com o teto ligado, a mesma confirmação é rejeitada sem efeito
    let mut capped = Warehouse::new(TransferPolicy {
        cap_received_to_delivered: true,
    });
    capped.set_balance(quito, product, 15);
    let id = capped.create_transfer(product, quito, cuenca, 15).unwrap();

    let err = capped.confirm_transfer(id, 20).unwrap_err();
    assert!(matches!(
        err,
        AppError::ReceivedExceedsDelivered {
            delivered: 15,
            received: 20
        }
    ));
    assert_eq!(capped.balance(cuenca, product), 0);
    assert_eq!(capped.transfers[&id].status, TransferStatus::Pending);

    // No limite exato passa
    capped.confirm_transfer(id, 15).unwrap();
    assert_eq!(capped.balance(cuenca, product), 15);
}

#[test]
fn recebido_zero_e_rejeitado_em_qualquer_politica() {
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 15);
    let id = wh.create_transfer(product, quito, cuenca, 15).unwrap();

    assert!(matches!(
        wh.confirm_transfer(id, 0),
        Err(AppError::InvalidQuantity(0))
    ));
    assert_eq!(wh.transfers[&id].status, TransferStatus::Pending);
}

#[test]
fn ciclo_completo_fecha_as_contas() {
    // Origem perde o entregue na criação; destino ganha o recebido na
    // confirmação. A diferença (merma) fica explicável nos relatórios.
    let mut wh = Warehouse::new(TransferPolicy::default());
    let (product, quito, cuenca) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    wh.set_balance(quito, product, 100);

    let id = wh.create_transfer(product, quito, cuenca, 40).unwrap();
    wh.confirm_transfer(id, 37).unwrap();

    assert_eq!(wh.balance(quito, product), 60);
    assert_eq!(wh.balance(cuenca, product), 37);

    let t = &wh.transfers[&id];
    assert_eq!(
        t.delivered_quantity - t.received_quantity.unwrap(),
        3 // a merma declarada
    );
}

#[test]
fn ensure_pending_direto_no_modelo() {
    let transfer = Transfer {
        id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        origin_branch_id: Uuid::new_v4(),
        destination_branch_id: Uuid::new_v4(),
        delivered_quantity: 10,
        received_quantity: Some(10),
        status: TransferStatus::Confirmed,
        outbound_movement_id: Uuid::new_v4(),
        inbound_movement_id: Some(Uuid::new_v4()),
        document_path: None,
        created_by: None,
        confirmed_by: None,
        created_at: Utc::now(),
        confirmed_at: Some(Utc::now()),
    };

    assert!(matches!(
        transfer.ensure_pending(),
        Err(AppError::TransferAlreadyConfirmed)
    ));
}
