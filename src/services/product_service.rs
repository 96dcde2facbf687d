use crate::entities::{order_item_entity as order_items, product_entity as products};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProductRequest, PaginatedResponse, PaginationParams, ProductQuery, ProductResponse,
    UpdateProductRequest,
};
use crate::services::TenantService;
use crate::utils::{optional_text, require_text};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

pub const MAX_PRODUCT_IMAGES: usize = 10;
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Pricing, stock and image rules shared by create and update.
pub fn validate_product_fields(
    price: i64,
    compare_at_price: Option<i64>,
    stock: i32,
    images: &[String],
) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::ValidationError("Price cannot be negative".to_string()));
    }
    if let Some(compare_at) = compare_at_price
        && compare_at < price
    {
        return Err(AppError::ValidationError(
            "Compare-at price must be greater than or equal to the price".to_string(),
        ));
    }
    if stock < 0 {
        return Err(AppError::ValidationError("Stock cannot be negative".to_string()));
    }
    if images.len() > MAX_PRODUCT_IMAGES {
        return Err(AppError::ValidationError(format!(
            "A product can have at most {MAX_PRODUCT_IMAGES} images"
        )));
    }
    if images
        .iter()
        .any(|url| !(url.starts_with("https://") || url.starts_with("http://")) || url.len() > 512)
    {
        return Err(AppError::ValidationError("Invalid image URL".to_string()));
    }
    Ok(())
}

/// Compare-at price after an update: an explicit clear, a new value, or the current one.
pub fn next_compare_at_price(
    current: Option<i64>,
    requested: Option<i64>,
    clear: bool,
) -> AppResult<Option<i64>> {
    match (clear, requested) {
        (true, Some(_)) => Err(AppError::ValidationError(
            "Send either compare_at_price or clear_compare_at_price, not both".to_string(),
        )),
        (true, None) => Ok(None),
        (false, Some(value)) => Ok(Some(value)),
        (false, None) => Ok(current),
    }
}

/// Case-insensitive name match.
pub(crate) fn filter_name(select: Select<products::Entity>, search: Option<&str>) -> Select<products::Entity> {
    match search.map(str::trim) {
        Some(term) if !term.is_empty() => {
            let pattern = format!("%{}%", term.to_lowercase());
            select.filter(Expr::expr(Func::lower(Expr::col(products::Column::Name))).like(pattern))
        }
        _ => select,
    }
}

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
    tenant_service: TenantService,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection, tenant_service: TenantService) -> Self {
        Self {
            pool,
            tenant_service,
        }
    }

    pub async fn list(
        &self,
        tenant_id: i64,
        query: &ProductQuery,
    ) -> AppResult<PaginatedResponse<ProductResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = products::Entity::find().filter(products::Column::TenantId.eq(tenant_id));
        if let Some(active) = query.active {
            select = select.filter(products::Column::IsActive.eq(active));
        }
        select = filter_name(select, query.search.as_deref());

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    pub async fn get(&self, tenant_id: i64, product_id: i64) -> AppResult<ProductResponse> {
        Ok(self.find_owned(tenant_id, product_id).await?.into())
    }

    pub async fn create(
        &self,
        tenant_id: i64,
        request: CreateProductRequest,
    ) -> AppResult<ProductResponse> {
        self.tenant_service.require_writable(tenant_id).await?;

        let name = require_text("Product name", &request.name, 1, 200)?;
        let description = optional_text("Description", request.description.as_deref(), 10_000)?;
        validate_product_fields(
            request.price,
            request.compare_at_price,
            request.stock,
            &request.images,
        )?;

        let now = Utc::now();
        let product = products::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(name),
            description: Set(description),
            price: Set(request.price),
            compare_at_price: Set(request.compare_at_price),
            stock: Set(request.stock),
            images: Set(serde_json::json!(request.images)),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Tenant {} created product {}", tenant_id, product.id);
        Ok(product.into())
    }

    pub async fn update(
        &self,
        tenant_id: i64,
        product_id: i64,
        request: UpdateProductRequest,
    ) -> AppResult<ProductResponse> {
        self.tenant_service.require_writable(tenant_id).await?;
        let product = self.find_owned(tenant_id, product_id).await?;

        let price = request.price.unwrap_or(product.price);
        let compare_at_price = next_compare_at_price(
            product.compare_at_price,
            request.compare_at_price,
            request.clear_compare_at_price,
        )?;
        let stock = request.stock.unwrap_or(product.stock);
        let images = request.images.clone().unwrap_or_else(|| product.image_urls());
        validate_product_fields(price, compare_at_price, stock, &images)?;

        let mut model = product.into_active_model();
        if let Some(name) = &request.name {
            model.name = Set(require_text("Product name", name, 1, 200)?);
        }
        if request.description.is_some() {
            model.description =
                Set(optional_text("Description", request.description.as_deref(), 10_000)?);
        }
        model.price = Set(price);
        model.compare_at_price = Set(compare_at_price);
        model.stock = Set(stock);
        model.images = Set(serde_json::json!(images));
        if let Some(active) = request.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// Hard delete, or deactivation when order history references the product.
    /// Returns `true` when the row was removed.
    pub async fn delete(&self, tenant_id: i64, product_id: i64) -> AppResult<bool> {
        self.tenant_service.require_writable(tenant_id).await?;
        let product = self.find_owned(tenant_id, product_id).await?;

        let referenced = order_items::Entity::find()
            .filter(order_items::Column::ProductId.eq(product.id))
            .count(&self.pool)
            .await?
            > 0;

        if referenced {
            let mut model = product.into_active_model();
            model.is_active = Set(false);
            model.updated_at = Set(Some(Utc::now()));
            model.update(&self.pool).await?;
            log::info!("Product {} has orders, deactivated instead of deleted", product_id);
            return Ok(false);
        }

        products::Entity::delete_by_id(product.id)
            .exec(&self.pool)
            .await?;
        log::info!("Tenant {} deleted product {}", tenant_id, product_id);
        Ok(true)
    }

    async fn find_owned(&self, tenant_id: i64, product_id: i64) -> AppResult<products::Model> {
        products::Entity::find_by_id(product_id)
            .filter(products::Column::TenantId.eq(tenant_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_is_rejected() {
        let err = validate_product_fields(-1, None, 3, &[]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg.contains("Price")));
    }

    #[test]
    fn test_compare_at_price_must_not_undercut_price() {
        assert!(validate_product_fields(4500, Some(4000), 1, &[]).is_err());
        assert!(validate_product_fields(4500, Some(4500), 1, &[]).is_ok());
        assert!(validate_product_fields(4500, Some(5200), 1, &[]).is_ok());
    }

    #[test]
    fn test_compare_at_price_can_be_cleared() {
        assert_eq!(next_compare_at_price(Some(5200), None, true).unwrap(), None);
        assert_eq!(next_compare_at_price(Some(5200), None, false).unwrap(), Some(5200));
        assert_eq!(next_compare_at_price(None, Some(6000), false).unwrap(), Some(6000));
        assert!(next_compare_at_price(Some(5200), Some(6000), true).is_err());

        // raising the price past the old compare-at works once it is cleared
        let cleared = next_compare_at_price(Some(5200), None, true).unwrap();
        assert!(validate_product_fields(6000, cleared, 1, &[]).is_ok());
    }

    #[test]
    fn test_stock_and_images() {
        assert!(validate_product_fields(100, None, -2, &[]).is_err());
        assert!(validate_product_fields(100, None, 0, &["ftp://x/y.png".to_string()]).is_err());

        let many: Vec<String> = (0..=MAX_PRODUCT_IMAGES)
            .map(|i| format!("https://cdn.example.dz/{i}.jpg"))
            .collect();
        assert!(validate_product_fields(100, None, 0, &many).is_err());
        assert!(validate_product_fields(100, None, 0, &many[..3]).is_ok());
    }
}
