// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;
use crate::middleware::tenancy::tenant_guard;

/// Monta o router completo. Fica na lib para os testes e o binário usarem o
/// mesmo grafo de rotas.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas do usuário (só exigem o token)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/companies", get(handlers::auth::get_my_companies))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Criar/listar empresas: só token (ainda não existe X-Tenant-ID)
    let tenancy_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_tenant).get(handlers::tenancy::list_my_tenants),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Administração da empresa atual (token + X-Tenant-ID)
    let tenant_admin_routes = Router::new()
        .route(
            "/current",
            put(handlers::tenancy::update_tenant).delete(handlers::tenancy::delete_tenant),
        )
        .route(
            "/branches",
            post(handlers::tenancy::create_branch).get(handlers::tenancy::list_branches),
        )
        .route(
            "/branches/{branch_id}",
            put(handlers::tenancy::update_branch).delete(handlers::tenancy::delete_branch),
        )
        .route("/roles", post(handlers::rbac::create_role));

    let catalog_routes = Router::new()
        .route(
            "/categories",
            post(handlers::catalog::create_category).get(handlers::catalog::list_categories),
        )
        .route(
            "/categories/{category_id}",
            axum::routing::delete(handlers::catalog::delete_category),
        )
        .route(
            "/categories/{category_id}/subcategories",
            get(handlers::catalog::list_subcategories),
        )
        .route(
            "/subcategories",
            post(handlers::catalog::create_subcategory),
        )
        .route(
            "/subcategories/{subcategory_id}/classes",
            get(handlers::catalog::list_classes),
        )
        .route("/classes", post(handlers::catalog::create_class))
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route("/products/search", get(handlers::catalog::search_products))
        .route("/products/import", post(handlers::imports::import_products))
        .route(
            "/products/{product_id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        );

    let inventory_routes = Router::new()
        .route(
            "/movements",
            post(handlers::inventory::register_movement)
                .get(handlers::inventory::list_recent_movements),
        )
        .route(
            "/branches/{branch_id}/movements",
            get(handlers::inventory::list_movements_by_branch),
        )
        .route(
            "/products/{product_id}/movements",
            get(handlers::inventory::list_movements_by_product),
        )
        .route(
            "/branches/{branch_id}/levels",
            get(handlers::inventory::list_levels_by_branch),
        )
        .route(
            "/levels/minimum",
            put(handlers::inventory::set_min_quantity),
        )
        .route("/levels/low", get(handlers::inventory::list_low_stock));

    let transfer_routes = Router::new()
        .route(
            "/",
            post(handlers::transfers::create_transfer).get(handlers::transfers::list_transfers),
        )
        .route("/pending", get(handlers::transfers::list_pending_transfers))
        .route(
            "/branches/{branch_id}",
            get(handlers::transfers::list_transfers_by_branch),
        )
        .route("/{transfer_id}", get(handlers::transfers::get_transfer))
        .route(
            "/{transfer_id}/confirm",
            post(handlers::transfers::confirm_transfer),
        )
        .route(
            "/{transfer_id}/dispatch-note",
            get(handlers::documents::transfer_dispatch_note),
        );

    let report_routes = Router::new()
        .route(
            "/movements/daily",
            get(handlers::reports::daily_movement_report),
        )
        .route(
            "/movements/export",
            get(handlers::reports::export_movements),
        )
        .route(
            "/products/{product_id}/summary",
            get(handlers::reports::product_movement_summary),
        )
        .route("/stock/low", get(handlers::reports::low_stock_report));

    // Consulta de RUC: só token
    let taxpayer_routes = Router::new()
        .route("/{ruc}", get(handlers::taxpayer::lookup_taxpayer))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Tudo que é escopado por empresa passa por auth + tenant.
    // A ordem importa: o último layer roda primeiro.
    let tenant_scoped = Router::new()
        .nest("/tenants", tenant_admin_routes)
        .nest("/catalog", catalog_routes)
        .nest("/inventory", inventory_routes)
        .nest("/transfers", transfer_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/permissions", get(handlers::rbac::list_permissions))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/tenants", tenancy_routes)
        .nest("/api/taxpayers", taxpayer_routes)
        .nest("/api", tenant_scoped)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
