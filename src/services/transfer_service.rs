// src/services/transfer_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, TenantRepository},
    models::inventory::{
        MovementKind, Transfer, TransferPolicy, validate_transfer_route,
    },
    models::tenancy::TenantMember,
    services::inventory_service::InventoryService,
};

// Máquina de estados do traslado em duas fases:
//   criar    => saída na origem, fica `pending`
//   confirmar => entrada no destino, vira `confirmed` (terminal)
// Não existe cancelamento. As duas fases reusam a mesma mutação de saldo dos
// movimentos avulsos, via InventoryService.
#[derive(Clone)]
pub struct TransferService {
    inventory_repo: InventoryRepository,
    tenant_repo: TenantRepository,
    inventory_service: InventoryService,
    policy: TransferPolicy,
}

impl TransferService {
    pub fn new(
        inventory_repo: InventoryRepository,
        tenant_repo: TenantRepository,
        inventory_service: InventoryService,
        policy: TransferPolicy,
    ) -> Self {
        Self {
            inventory_repo,
            tenant_repo,
            inventory_service,
            policy,
        }
    }

    // ---
    // FASE 1: criar o traslado
    // ---
    // Numa transação só: saída na origem + movimento + linha do traslado.
    // Estoque insuficiente desfaz tudo — nenhum traslado órfão.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_transfer<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        actor_id: Uuid,
        product_id: Uuid,
        origin_branch_id: Uuid,
        destination_branch_id: Uuid,
        delivered_quantity: i32,
        document_path: Option<&str>,
    ) -> Result<Transfer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_transfer_route(origin_branch_id, destination_branch_id)?;
        if delivered_quantity <= 0 {
            return Err(AppError::InvalidQuantity(delivered_quantity));
        }

        let mut tx = executor.begin().await?;

        self.inventory_service
            .check_references(&mut *tx, tenant_id, origin_branch_id, product_id)
            .await?;
        if !self
            .tenant_repo
            .branch_belongs_to_tenant(&mut *tx, tenant_id, destination_branch_id)
            .await?
        {
            return Err(AppError::InvalidReference("sucursal"));
        }

        // 1. Saída na origem (valida o estoque disponível)
        self.inventory_service
            .apply_to_level(
                &mut *tx,
                tenant_id,
                origin_branch_id,
                product_id,
                MovementKind::Outbound,
                delivered_quantity,
            )
            .await?;

        // 2. Movimento de saída no livro-razão
        let outbound = self
            .inventory_repo
            .insert_movement(
                &mut *tx,
                tenant_id,
                origin_branch_id,
                product_id,
                MovementKind::Outbound,
                delivered_quantity,
                Some("Saída por traslado"),
                document_path,
                Some(actor_id),
            )
            .await?;

        // 3. O traslado nasce pendente, apontando para a saída
        let transfer = self
            .inventory_repo
            .insert_transfer(
                &mut *tx,
                tenant_id,
                product_id,
                origin_branch_id,
                destination_branch_id,
                delivered_quantity,
                outbound.id,
                document_path,
                Some(actor_id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Traslado {} iniciado: {} un. de {} para {}",
            transfer.id,
            delivered_quantity,
            origin_branch_id,
            destination_branch_id
        );
        Ok(transfer)
    }

    // ---
    // FASE 2: confirmar a recepção
    // ---
    // Exatamente uma vez: o lock de linha + o UPDATE condicionado a
    // status = 'pending' garantem que a segunda confirmação falha sem
    // mexer em saldo nenhum.
    pub async fn confirm_transfer<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        actor_id: Uuid,
        transfer_id: Uuid,
        received_quantity: i32,
    ) -> Result<Transfer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let transfer = self
            .inventory_repo
            .find_transfer_for_update(&mut *tx, tenant_id, transfer_id)
            .await?
            .ok_or(AppError::NotFound("traslado"))?;

        transfer.ensure_pending()?;
        self.policy
            .validate_received(transfer.delivered_quantity, received_quantity)?;

        // 1. Entrada no destino
        self.inventory_service
            .apply_to_level(
                &mut *tx,
                tenant_id,
                transfer.destination_branch_id,
                transfer.product_id,
                MovementKind::Inbound,
                received_quantity,
            )
            .await?;

        // 2. Movimento de entrada no livro-razão
        let inbound = self
            .inventory_repo
            .insert_movement(
                &mut *tx,
                tenant_id,
                transfer.destination_branch_id,
                transfer.product_id,
                MovementKind::Inbound,
                received_quantity,
                Some("Entrada por traslado"),
                transfer.document_path.as_deref(),
                Some(actor_id),
            )
            .await?;

        // 3. Transição pending -> confirmed
        let confirmed = self
            .inventory_repo
            .mark_transfer_confirmed(
                &mut *tx,
                transfer_id,
                received_quantity,
                inbound.id,
                Some(actor_id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Traslado {} confirmado: recebidas {} de {} enviadas",
            confirmed.id,
            received_quantity,
            confirmed.delivered_quantity
        );
        Ok(confirmed)
    }

    /// Regra de recepção: quem confirma é a sucursal de destino; membro sem
    /// sucursal casa (supervisor) confirma qualquer um. Chamada pelo handler
    /// ANTES de confirm_transfer — o serviço em si não autoriza nada.
    pub fn can_confirm(member: &TenantMember, transfer: &Transfer) -> bool {
        match member.branch_id {
            Some(home_branch) => home_branch == transfer.destination_branch_id,
            None => true,
        }
    }

    // ---
    // Consultas
    // ---

    pub async fn get_transfer(&self, tenant_id: Uuid, transfer_id: Uuid) -> Result<Transfer, AppError> {
        self.inventory_repo
            .find_transfer(tenant_id, transfer_id)
            .await?
            .ok_or(AppError::NotFound("traslado"))
    }

    pub async fn list_transfers(
        &self,
        tenant_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Transfer>, AppError> {
        self.inventory_repo.list_transfers(tenant_id, limit).await
    }

    /// Pendentes do ponto de vista do membro: supervisor vê todos; membro
    /// com sucursal casa vê só os destinados a ela.
    pub async fn list_pending_for_member(
        &self,
        tenant_id: Uuid,
        member: &TenantMember,
    ) -> Result<Vec<Transfer>, AppError> {
        self.inventory_repo
            .list_pending_transfers(tenant_id, member.branch_id)
            .await
    }

    pub async fn list_transfers_by_branch(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<Transfer>, AppError> {
        self.inventory_repo
            .list_transfers_by_branch(tenant_id, branch_id)
            .await
    }

    pub async fn list_transfers_by_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<Transfer>, AppError> {
        self.inventory_repo
            .list_transfers_by_product(tenant_id, product_id)
            .await
    }
}
