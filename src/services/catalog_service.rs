// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{
        Category, Product, ProductClass, ProductKind, ProductStatus, Subcategory, normalize_text,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, pool: PgPool) -> Self {
        Self { catalog_repo, pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category(
        &self,
        tenant_id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<Category, AppError> {
        let mut tx = self.pool.begin().await?;
        let category = self
            .catalog_repo
            .create_category(
                &mut *tx,
                tenant_id,
                &normalize_text(code),
                &normalize_text(name),
            )
            .await?;
        tx.commit().await?;
        Ok(category)
    }

    pub async fn list_categories(&self, tenant_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.catalog_repo.list_categories(tenant_id).await
    }

    pub async fn delete_category(&self, tenant_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.catalog_repo
            .delete_category(&mut *tx, tenant_id, category_id)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // ---
    // Subcategorias
    // ---

    pub async fn create_subcategory(
        &self,
        tenant_id: Uuid,
        category_id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<Subcategory, AppError> {
        // Valida a mãe antes de inserir: a categoria precisa existir E ser
        // da mesma empresa.
        self.catalog_repo
            .find_category(tenant_id, category_id)
            .await?
            .ok_or(AppError::InvalidReference("categoria"))?;

        let mut tx = self.pool.begin().await?;
        let subcategory = self
            .catalog_repo
            .create_subcategory(
                &mut *tx,
                category_id,
                &normalize_text(code),
                &normalize_text(name),
            )
            .await?;
        tx.commit().await?;
        Ok(subcategory)
    }

    pub async fn list_subcategories(
        &self,
        tenant_id: Uuid,
        category_id: Uuid,
    ) -> Result<Vec<Subcategory>, AppError> {
        self.catalog_repo
            .list_subcategories(tenant_id, category_id)
            .await
    }

    // ---
    // Classes
    // ---

    pub async fn create_class(
        &self,
        tenant_id: Uuid,
        subcategory_id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<ProductClass, AppError> {
        self.catalog_repo
            .find_subcategory(tenant_id, subcategory_id)
            .await?
            .ok_or(AppError::InvalidReference("subcategoria"))?;

        let mut tx = self.pool.begin().await?;
        let class = self
            .catalog_repo
            .create_class(
                &mut *tx,
                subcategory_id,
                &normalize_text(code),
                &normalize_text(name),
            )
            .await?;
        tx.commit().await?;
        Ok(class)
    }

    pub async fn list_classes(
        &self,
        tenant_id: Uuid,
        subcategory_id: Uuid,
    ) -> Result<Vec<ProductClass>, AppError> {
        self.catalog_repo.list_classes(tenant_id, subcategory_id).await
    }

    // ---
    // Produtos
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product(
        &self,
        tenant_id: Uuid,
        class_id: Option<Uuid>,
        code: &str,
        aux_code: Option<&str>,
        ean_code: Option<&str>,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        kind: ProductKind,
    ) -> Result<Product, AppError> {
        if let Some(class_id) = class_id {
            self.catalog_repo
                .find_class(tenant_id, class_id)
                .await?
                .ok_or(AppError::InvalidReference("classe"))?;
        }

        let aux_code = aux_code.map(normalize_text);
        let description = description.map(normalize_text);

        let mut tx = self.pool.begin().await?;
        let product = self
            .catalog_repo
            .create_product(
                &mut *tx,
                tenant_id,
                class_id,
                &normalize_text(code),
                aux_code.as_deref(),
                ean_code,
                &normalize_text(name),
                description.as_deref(),
                price,
                kind,
            )
            .await?;
        tx.commit().await?;
        Ok(product)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
        class_id: Option<Uuid>,
        aux_code: Option<&str>,
        ean_code: Option<&str>,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        kind: ProductKind,
        status: ProductStatus,
    ) -> Result<Product, AppError> {
        if let Some(class_id) = class_id {
            self.catalog_repo
                .find_class(tenant_id, class_id)
                .await?
                .ok_or(AppError::InvalidReference("classe"))?;
        }

        let aux_code = aux_code.map(normalize_text);
        let description = description.map(normalize_text);

        let mut tx = self.pool.begin().await?;
        let product = self
            .catalog_repo
            .update_product(
                &mut *tx,
                tenant_id,
                product_id,
                class_id,
                aux_code.as_deref(),
                ean_code,
                &normalize_text(name),
                description.as_deref(),
                price,
                kind,
                status,
            )
            .await?;
        tx.commit().await?;
        Ok(product)
    }

    pub async fn delete_product(&self, tenant_id: Uuid, product_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.catalog_repo
            .delete_product(&mut *tx, tenant_id, product_id)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn get_product(&self, tenant_id: Uuid, product_id: Uuid) -> Result<Product, AppError> {
        self.catalog_repo
            .find_product(tenant_id, product_id)
            .await?
            .ok_or(AppError::NotFound("produto"))
    }

    pub async fn list_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_products(tenant_id).await
    }

    pub async fn search_products(
        &self,
        tenant_id: Uuid,
        term: &str,
    ) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.search_products(tenant_id, term).await
    }
}
