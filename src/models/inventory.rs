// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// 1. StockLevel (O "Saldo")
// ---
// Um saldo por (sucursal, produto). Nasce com quantidade 0 no primeiro
// movimento que toca o par e daí em diante é atualizado in-place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub branch_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub min_quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl StockLevel {
    /// Saldo abaixo do mínimo configurado para o par (sucursal, produto).
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_quantity
    }
}

// ---
// 2. StockMovement (O "Livro-razão")
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Inbound,
    Outbound,
}

impl MovementKind {
    /// Delta com sinal que este movimento aplica ao saldo.
    pub fn signed_delta(self, quantity: i32) -> i32 {
        match self {
            MovementKind::Inbound => quantity,
            MovementKind::Outbound => -quantity,
        }
    }
}

// Registro imutável: nunca sofre UPDATE depois de persistido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub branch_id: Uuid,
    pub product_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i32,
    pub comment: Option<String>,
    pub reference_document: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. A mutação de saldo
// ---

/// Calcula o novo saldo de (sucursal, produto) após um movimento.
///
/// Regras:
/// - quantidade deve ser > 0;
/// - saída nunca deixa o saldo negativo.
///
/// Os services chamam esta função entre o SELECT ... FOR UPDATE do saldo e o
/// UPDATE/INSERT, dentro da mesma transação que grava o movimento.
pub fn apply_movement(current: i32, kind: MovementKind, quantity: i32) -> Result<i32, AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity(quantity));
    }

    let next = current + kind.signed_delta(quantity);
    if next < 0 {
        return Err(AppError::InsufficientStock {
            available: current,
            requested: quantity,
        });
    }

    Ok(next)
}

// ---
// 4. Transfer (O "Traslado")
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transfer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Confirmed,
}

// Máquina de estados de duas fases: pending -> confirmed, e só.
// A saída na origem acontece na criação; a entrada no destino, na
// confirmação. Os dois movimentos ficam referenciados aqui.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub origin_branch_id: Uuid,
    pub destination_branch_id: Uuid,
    pub delivered_quantity: i32,
    pub received_quantity: Option<i32>,
    pub status: TransferStatus,
    pub outbound_movement_id: Uuid,
    pub inbound_movement_id: Option<Uuid>,
    pub document_path: Option<String>,
    pub created_by: Option<Uuid>,
    pub confirmed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Transfer {
    /// Confirmação só vale uma vez: qualquer estado fora de `pending` rejeita.
    pub fn ensure_pending(&self) -> Result<(), AppError> {
        match self.status {
            TransferStatus::Pending => Ok(()),
            TransferStatus::Confirmed => Err(AppError::TransferAlreadyConfirmed),
        }
    }
}

/// Origem e destino precisam ser sucursais diferentes.
pub fn validate_transfer_route(origin: Uuid, destination: Uuid) -> Result<(), AppError> {
    if origin == destination {
        return Err(AppError::SameBranchTransfer);
    }
    Ok(())
}

// ---
// 5. TransferPolicy
// ---
// O limite "recebido <= enviado" existia nas primeiras versões do produto e
// foi retirado depois, de comum acordo com o cliente. Fica atrás de uma
// política explícita em vez de hardcode, controlada por TRANSFER_RECEIVED_CAP.
#[derive(Debug, Clone, Copy)]
pub struct TransferPolicy {
    pub cap_received_to_delivered: bool,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            cap_received_to_delivered: false,
        }
    }
}

impl TransferPolicy {
    /// Valida a quantidade recebida na confirmação.
    pub fn validate_received(&self, delivered: i32, received: i32) -> Result<(), AppError> {
        if received <= 0 {
            return Err(AppError::InvalidQuantity(received));
        }
        if self.cap_received_to_delivered && received > delivered {
            return Err(AppError::ReceivedExceedsDelivered {
                delivered,
                received,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_adds_to_balance() {
        assert_eq!(apply_movement(20, MovementKind::Inbound, 10).unwrap(), 30);
    }

    #[test]
    fn outbound_subtracts_from_balance() {
        assert_eq!(apply_movement(20, MovementKind::Outbound, 15).unwrap(), 5);
    }

    #[test]
    fn outbound_cannot_go_negative() {
        let err = apply_movement(20, MovementKind::Outbound, 25).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 20,
                requested: 25
            }
        ));
    }

    #[test]
    fn zero_and_negative_quantities_rejected() {
        assert!(matches!(
            apply_movement(10, MovementKind::Inbound, 0),
            Err(AppError::InvalidQuantity(0))
        ));
        assert!(matches!(
            apply_movement(10, MovementKind::Outbound, -3),
            Err(AppError::InvalidQuantity(-3))
        ));
    }

    #[test]
    fn route_rejects_same_branch() {
        let branch = Uuid::new_v4();
        assert!(matches!(
            validate_transfer_route(branch, branch),
            Err(AppError::SameBranchTransfer)
        ));
        assert!(validate_transfer_route(branch, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn received_cap_only_applies_when_enabled() {
        let open = TransferPolicy {
            cap_received_to_delivered: false,
        };
        let capped = TransferPolicy {
            cap_received_to_delivered: true,
        };

        assert!(open.validate_received(10, 12).is_ok());
        assert!(matches!(
            capped.validate_received(10, 12),
            Err(AppError::ReceivedExceedsDelivered {
                delivered: 10,
                received: 12
            })
        ));
        assert!(capped.validate_received(10, 10).is_ok());
        assert!(matches!(
            open.validate_received(10, 0),
            Err(AppError::InvalidQuantity(0))
        ));
    }
}
