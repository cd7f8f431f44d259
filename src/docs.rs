// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_my_companies,

        // --- Tenancy ---
        handlers::tenancy::create_tenant,
        handlers::tenancy::list_my_tenants,
        handlers::tenancy::update_tenant,
        handlers::tenancy::delete_tenant,
        handlers::tenancy::create_branch,
        handlers::tenancy::list_branches,
        handlers::tenancy::update_branch,
        handlers::tenancy::delete_branch,

        // --- RBAC ---
        handlers::rbac::create_role,
        handlers::rbac::list_permissions,

        // --- Catálogo ---
        handlers::catalog::create_category,
        handlers::catalog::list_categories,
        handlers::catalog::delete_category,
        handlers::catalog::create_subcategory,
        handlers::catalog::list_subcategories,
        handlers::catalog::create_class,
        handlers::catalog::list_classes,
        handlers::catalog::create_product,
        handlers::catalog::list_products,
        handlers::catalog::search_products,
        handlers::catalog::get_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::imports::import_products,

        // --- Estoque ---
        handlers::inventory::register_movement,
        handlers::inventory::list_recent_movements,
        handlers::inventory::list_movements_by_branch,
        handlers::inventory::list_movements_by_product,
        handlers::inventory::list_levels_by_branch,
        handlers::inventory::set_min_quantity,
        handlers::inventory::list_low_stock,

        // --- Traslados ---
        handlers::transfers::create_transfer,
        handlers::transfers::confirm_transfer,
        handlers::transfers::list_transfers,
        handlers::transfers::list_pending_transfers,
        handlers::transfers::get_transfer,
        handlers::transfers::list_transfers_by_branch,
        handlers::documents::transfer_dispatch_note,

        // --- Relatórios ---
        handlers::reports::daily_movement_report,
        handlers::reports::product_movement_summary,
        handlers::reports::low_stock_report,
        handlers::reports::export_movements,

        // --- Registro tributário ---
        handlers::taxpayer::lookup_taxpayer,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::AuthResponse,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::tenancy::Tenant,
            models::tenancy::Branch,
            models::tenancy::TenantMember,
            models::rbac::Role,
            models::rbac::Permission,
            models::catalog::Category,
            models::catalog::Subcategory,
            models::catalog::ProductClass,
            models::catalog::Product,
            models::catalog::ProductKind,
            models::catalog::ProductStatus,
            models::inventory::StockLevel,
            models::inventory::StockMovement,
            models::inventory::MovementKind,
            models::inventory::Transfer,
            models::inventory::TransferStatus,
            models::reports::DailyMovementReport,
            models::reports::UserMovementSummary,
            models::reports::KindMovementSummary,
            models::reports::MovementDetail,
            models::reports::ProductMovementSummary,
            models::reports::LowStockEntry,
            models::reports::MovementExportRow,
            handlers::tenancy::CreateTenantPayload,
            handlers::tenancy::CreateBranchPayload,
            handlers::rbac::CreateRolePayload,
            handlers::catalog::CreateCategoryPayload,
            handlers::catalog::CreateSubcategoryPayload,
            handlers::catalog::CreateClassPayload,
            handlers::catalog::CreateProductPayload,
            handlers::catalog::UpdateProductPayload,
            handlers::inventory::RegisterMovementPayload,
            handlers::inventory::SetMinQuantityPayload,
            handlers::transfers::CreateTransferPayload,
            handlers::transfers::ConfirmTransferPayload,
            crate::services::import_service::ImportReport,
            crate::services::import_service::ImportRowError,
            crate::external::ruc::TaxpayerInfo,
        )
    ),
    tags(
        (name = "auth", description = "Registro e login"),
        (name = "users", description = "Usuário autenticado"),
        (name = "tenancy", description = "Empresas e sucursais"),
        (name = "rbac", description = "Cargos e permissões"),
        (name = "catalog", description = "Catálogo de produtos"),
        (name = "inventory", description = "Saldos e movimentos de estoque"),
        (name = "transfers", description = "Traslados entre sucursais"),
        (name = "reports", description = "Relatórios"),
        (name = "taxpayers", description = "Consulta de RUC"),
    )
)]
pub struct ApiDoc;
