// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermCatalogWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::catalog::{
        Category, Product, ProductClass, ProductKind, ProductStatus, Subcategory,
        validate_catalog_code, validate_ean_code,
    },
};

// ---
// Payloads
// ---

fn validate_not_negative_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("O preço não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(custom(function = validate_catalog_code))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcategoryPayload {
    pub category_id: Uuid,
    #[validate(custom(function = validate_catalog_code))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassPayload {
    pub subcategory_id: Uuid,
    #[validate(custom(function = validate_catalog_code))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub class_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50, message = "O código deve ter de 1 a 50 caracteres."))]
    pub code: String,
    #[validate(length(max = 50, message = "O código auxiliar pode ter no máximo 50 caracteres."))]
    pub aux_code: Option<String>,
    #[validate(custom(function = validate_ean_code))]
    pub ean_code: Option<String>,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = validate_not_negative_price))]
    pub price: Decimal,
    pub kind: ProductKind,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub class_id: Option<Uuid>,
    #[validate(length(max = 50, message = "O código auxiliar pode ter no máximo 50 caracteres."))]
    pub aux_code: Option<String>,
    #[validate(custom(function = validate_ean_code))]
    pub ean_code: Option<String>,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = validate_not_negative_price))]
    pub price: Decimal,
    pub kind: ProductKind,
    pub status: ProductStatus,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

// ---
// Categorias
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/categories",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Código duplicado na empresa")
    ),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .create_category(tenant.0, &payload.code, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    responses((status = 200, description = "Categorias da empresa", body = [Category])),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .catalog_service
        .list_categories(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/categories/{category_id}",
    params(("category_id" = Uuid, Path, description = "ID da categoria")),
    responses((status = 204, description = "Categoria removida")),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_category(tenant.0, category_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Subcategorias
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/subcategories",
    request_body = CreateSubcategoryPayload,
    responses((status = 201, description = "Subcategoria criada", body = Subcategory)),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn create_subcategory(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Json(payload): Json<CreateSubcategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let subcategory = app_state
        .catalog_service
        .create_subcategory(tenant.0, payload.category_id, &payload.code, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(subcategory)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories/{category_id}/subcategories",
    params(("category_id" = Uuid, Path, description = "ID da categoria")),
    responses((status = 200, description = "Subcategorias da categoria", body = [Subcategory])),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn list_subcategories(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let subcategories = app_state
        .catalog_service
        .list_subcategories(tenant.0, category_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(subcategories)))
}

// ---
// Classes
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/classes",
    request_body = CreateClassPayload,
    responses((status = 201, description = "Classe criada", body = ProductClass)),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn create_class(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Json(payload): Json<CreateClassPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let class = app_state
        .catalog_service
        .create_class(tenant.0, payload.subcategory_id, &payload.code, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/subcategories/{subcategory_id}/classes",
    params(("subcategory_id" = Uuid, Path, description = "ID da subcategoria")),
    responses((status = 200, description = "Classes da subcategoria", body = [ProductClass])),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn list_classes(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(subcategory_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let classes = app_state
        .catalog_service
        .list_classes(tenant.0, subcategory_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(classes)))
}

// ---
// Produtos
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 409, description = "Código duplicado na empresa")
    ),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .catalog_service
        .create_product(
            tenant.0,
            payload.class_id,
            &payload.code,
            payload.aux_code.as_deref(),
            payload.ean_code.as_deref(),
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.kind,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products",
    responses((status = 200, description = "Produtos da empresa", body = [Product])),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .catalog_service
        .list_products(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products/search",
    params(("q" = String, Query, description = "Código exato ou parte do nome")),
    responses((status = 200, description = "Produtos encontrados", body = [Product])),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .catalog_service
        .search_products(tenant.0, &params.q)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products/{product_id}",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "O produto", body = Product)),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .catalog_service
        .get_product(tenant.0, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/products/{product_id}",
    request_body = UpdateProductPayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "Produto atualizado", body = Product)),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .catalog_service
        .update_product(
            tenant.0,
            product_id,
            payload.class_id,
            payload.aux_code.as_deref(),
            payload.ean_code.as_deref(),
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.kind,
            payload.status,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/products/{product_id}",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses((status = 204, description = "Produto removido")),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCatalogWrite>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_product(tenant.0, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
