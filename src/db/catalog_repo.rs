// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::catalog::{
    Category, Product, ProductClass, ProductKind, ProductStatus, Subcategory,
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

// Mapeia violação de unicidade para o erro de código duplicado que o
// cliente entende.
fn map_duplicate(code: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::DuplicateCode(code.to_string());
            }
        }
        e.into()
    }
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (tenant_id, code, name)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, code, name, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(map_duplicate(code))
    }

    pub async fn list_categories(&self, tenant_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, tenant_id, code, name, created_at, updated_at
            FROM categories
            WHERE tenant_id = $1
            ORDER BY code ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_category(
        &self,
        tenant_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, tenant_id, code, name, created_at, updated_at
            FROM categories
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(category_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND tenant_id = $2")
            .bind(category_id)
            .bind(tenant_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("categoria"));
        }
        Ok(())
    }

    // ---
    // Subcategorias
    // ---

    pub async fn create_subcategory<'e, E>(
        &self,
        executor: E,
        category_id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<Subcategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Subcategory>(
            r#"
            INSERT INTO subcategories (category_id, code, name)
            VALUES ($1, $2, $3)
            RETURNING id, category_id, code, name, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(map_duplicate(code))
    }

    pub async fn list_subcategories(
        &self,
        tenant_id: Uuid,
        category_id: Uuid,
    ) -> Result<Vec<Subcategory>, AppError> {
        let subcategories = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT s.id, s.category_id, s.code, s.name, s.created_at, s.updated_at
            FROM subcategories s
            JOIN categories c ON c.id = s.category_id
            WHERE s.category_id = $1 AND c.tenant_id = $2
            ORDER BY s.code ASC
            "#,
        )
        .bind(category_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(subcategories)
    }

    /// Subcategoria, verificando que a cadeia sobe até a empresa certa.
    pub async fn find_subcategory(
        &self,
        tenant_id: Uuid,
        subcategory_id: Uuid,
    ) -> Result<Option<Subcategory>, AppError> {
        let subcategory = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT s.id, s.category_id, s.code, s.name, s.created_at, s.updated_at
            FROM subcategories s
            JOIN categories c ON c.id = s.category_id
            WHERE s.id = $1 AND c.tenant_id = $2
            "#,
        )
        .bind(subcategory_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subcategory)
    }

    // ---
    // Classes
    // ---

    pub async fn create_class<'e, E>(
        &self,
        executor: E,
        subcategory_id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<ProductClass, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductClass>(
            r#"
            INSERT INTO product_classes (subcategory_id, code, name)
            VALUES ($1, $2, $3)
            RETURNING id, subcategory_id, code, name, created_at, updated_at
            "#,
        )
        .bind(subcategory_id)
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(map_duplicate(code))
    }

    pub async fn list_classes(
        &self,
        tenant_id: Uuid,
        subcategory_id: Uuid,
    ) -> Result<Vec<ProductClass>, AppError> {
        let classes = sqlx::query_as::<_, ProductClass>(
            r#"
            SELECT pc.id, pc.subcategory_id, pc.code, pc.name, pc.created_at, pc.updated_at
            FROM product_classes pc
            JOIN subcategories s ON s.id = pc.subcategory_id
            JOIN categories c ON c.id = s.category_id
            WHERE pc.subcategory_id = $1 AND c.tenant_id = $2
            ORDER BY pc.code ASC
            "#,
        )
        .bind(subcategory_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    /// Classe, verificando que a cadeia sobe até a empresa certa.
    pub async fn find_class(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
    ) -> Result<Option<ProductClass>, AppError> {
        let class = sqlx::query_as::<_, ProductClass>(
            r#"
            SELECT pc.id, pc.subcategory_id, pc.code, pc.name, pc.created_at, pc.updated_at
            FROM product_classes pc
            JOIN subcategories s ON s.id = pc.subcategory_id
            JOIN categories c ON c.id = s.category_id
            WHERE pc.id = $1 AND c.tenant_id = $2
            "#,
        )
        .bind(class_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    // ---
    // Produtos
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        class_id: Option<Uuid>,
        code: &str,
        aux_code: Option<&str>,
        ean_code: Option<&str>,
        name: &str,
        description: Option<&str>,
        price: rust_decimal::Decimal,
        kind: ProductKind,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (tenant_id, class_id, code, aux_code, ean_code, name, description, price, kind)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, tenant_id, class_id, code, aux_code, ean_code, name,
                      description, price, kind, status, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(class_id)
        .bind(code)
        .bind(aux_code)
        .bind(ean_code)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(kind)
        .fetch_one(executor)
        .await
        .map_err(map_duplicate(code))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        class_id: Option<Uuid>,
        aux_code: Option<&str>,
        ean_code: Option<&str>,
        name: &str,
        description: Option<&str>,
        price: rust_decimal::Decimal,
        kind: ProductKind,
        status: ProductStatus,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET class_id = $3, aux_code = $4, ean_code = $5, name = $6,
                description = $7, price = $8, kind = $9, status = $10,
                updated_at = now()
            WHERE id = $2 AND tenant_id = $1
            RETURNING id, tenant_id, class_id, code, aux_code, ean_code, name,
                      description, price, kind, status, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .bind(class_id)
        .bind(aux_code)
        .bind(ean_code)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(kind)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("produto"))
    }

    pub async fn delete_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND tenant_id = $2")
            .bind(product_id)
            .bind(tenant_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("produto"));
        }
        Ok(())
    }

    pub async fn find_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, class_id, code, aux_code, ean_code, name,
                   description, price, kind, status, created_at, updated_at
            FROM products
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(product_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn product_belongs_to_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM products WHERE id = $1 AND tenant_id = $2)",
        )
        .bind(product_id)
        .bind(tenant_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn list_products(&self, tenant_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, class_id, code, aux_code, ean_code, name,
                   description, price, kind, status, created_at, updated_at
            FROM products
            WHERE tenant_id = $1
            ORDER BY code ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Busca por código (exato, inclusive auxiliar/EAN) ou nome (parcial).
    pub async fn search_products(
        &self,
        tenant_id: Uuid,
        term: &str,
    ) -> Result<Vec<Product>, AppError> {
        let like = format!("%{}%", term.to_uppercase());
        let exact = term.to_uppercase();

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, class_id, code, aux_code, ean_code, name,
                   description, price, kind, status, created_at, updated_at
            FROM products
            WHERE tenant_id = $1
              AND (code = $2 OR aux_code = $2 OR ean_code = $2 OR name LIKE $3)
            ORDER BY code ASC
            LIMIT 50
            "#,
        )
        .bind(tenant_id)
        .bind(exact)
        .bind(like)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}
