use crate::entities::{
    OrderStatus, order_entity as orders, order_item_entity as order_items,
    product_entity as products, tenant_entity as tenants, wilaya_entity as wilayas,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CheckoutItem, CheckoutRequest, OrderQuery, OrderResponse, OrderSummaryResponse,
    OrderTrackingResponse, PaginatedResponse, PaginationParams,
};
use crate::services::TenantService;
use crate::utils::{
    generate_order_number, normalize_dz_phone, optional_text, require_text, validate_dz_phone,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

pub const MAX_LINE_QUANTITY: i32 = 100;
pub const MAX_CHECKOUT_LINES: usize = 50;

fn too_many_lines() -> AppError {
    AppError::ValidationError(format!(
        "Order cannot contain more than {MAX_CHECKOUT_LINES} distinct products"
    ))
}

/// Collapses repeated products into one line each, keeping first-seen order.
pub fn merge_checkout_lines(items: &[CheckoutItem]) -> AppResult<Vec<(i64, i32)>> {
    if items.is_empty() {
        return Err(AppError::ValidationError(
            "Order must contain at least one item".to_string(),
        ));
    }
    let mut merged: Vec<(i64, i32)> = Vec::with_capacity(items.len().min(MAX_CHECKOUT_LINES));
    for item in items {
        if !(1..=MAX_LINE_QUANTITY).contains(&item.quantity) {
            return Err(AppError::ValidationError(format!(
                "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
            )));
        }
        let merged_len = merged.len();
        match merged.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, quantity)) => *quantity += item.quantity,
            None if merged_len == MAX_CHECKOUT_LINES => return Err(too_many_lines()),
            None => merged.push((item.product_id, item.quantity)),
        }
    }

    if merged.iter().any(|(_, quantity)| *quantity > MAX_LINE_QUANTITY) {
        return Err(AppError::ValidationError(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(merged)
}

/// `(subtotal, total)` for `(unit_price, quantity)` lines plus shipping.
pub fn compute_totals(lines: &[(i64, i32)], shipping_fee: i64) -> AppResult<(i64, i64)> {
    let overflow = || AppError::ValidationError("Order total is too large".to_string());

    let subtotal = lines.iter().try_fold(0i64, |acc, (unit_price, quantity)| {
        unit_price
            .checked_mul(i64::from(*quantity))
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(overflow)
    })?;
    let total = subtotal.checked_add(shipping_fee).ok_or_else(overflow)?;
    Ok((subtotal, total))
}

/// Conditional decrement per line; the first short line fails the whole
/// reservation and the caller's transaction rolls back earlier lines.
async fn reserve_stock(
    txn: &DatabaseTransaction,
    lines: &[(&products::Model, i32)],
    now: DateTime<Utc>,
) -> AppResult<()> {
    for (product, quantity) in lines {
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::Stock,
                Expr::col(products::Column::Stock).sub(*quantity),
            )
            .col_expr(products::Column::UpdatedAt, Expr::value(now))
            .filter(products::Column::Id.eq(product.id))
            .filter(products::Column::Stock.gte(*quantity))
            .exec(txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::ValidationError(format!(
                "Insufficient stock for '{}'",
                product.name
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    tenant_service: TenantService,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, tenant_service: TenantService) -> Self {
        Self {
            pool,
            tenant_service,
        }
    }

    /// Cash-on-delivery checkout for an already gated tenant.
    ///
    /// Counter increment, stock decrements and inserts share one transaction;
    /// each decrement is conditional on `stock >= quantity`.
    pub async fn checkout(
        &self,
        tenant: &tenants::Model,
        request: CheckoutRequest,
    ) -> AppResult<OrderResponse> {
        let customer_name = require_text("Customer name", &request.customer_name, 2, 120)?;
        let customer_phone = validate_dz_phone(&request.customer_phone)?;
        let commune = require_text("Commune", &request.commune, 2, 120)?;
        let address = require_text("Address", &request.address, 5, 500)?;
        let notes = optional_text("Notes", request.notes.as_deref(), 1000)?;
        let lines = merge_checkout_lines(&request.items)?;

        let wilaya = wilayas::Entity::find_by_id(request.wilaya_code)
            .one(&self.pool)
            .await?
            .filter(|w| w.is_active)
            .ok_or_else(|| {
                AppError::ValidationError("Delivery is not available to this wilaya".to_string())
            })?;
        let shipping_fee = wilaya.delivery_fee(request.delivery_type);

        let product_ids: Vec<i64> = lines.iter().map(|(id, _)| *id).collect();
        let catalog: HashMap<i64, products::Model> = products::Entity::find()
            .filter(products::Column::TenantId.eq(tenant.id))
            .filter(products::Column::IsActive.eq(true))
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut priced: Vec<(&products::Model, i32)> = Vec::with_capacity(lines.len());
        for (product_id, quantity) in &lines {
            let product = catalog
                .get(product_id)
                .ok_or_else(|| AppError::NotFound(format!("Product {product_id} not found")))?;
            if !product.has_stock_for(*quantity) {
                return Err(AppError::ValidationError(format!(
                    "Insufficient stock for '{}'",
                    product.name
                )));
            }
            priced.push((product, *quantity));
        }

        let price_lines: Vec<(i64, i32)> = priced.iter().map(|(p, q)| (p.price, *q)).collect();
        let (subtotal, total) = compute_totals(&price_lines, shipping_fee)?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let sequence = self.next_order_sequence(&txn, tenant.id).await?;
        let order_number = generate_order_number(now, sequence);

        reserve_stock(&txn, &priced, now).await?;

        let order = orders::ActiveModel {
            tenant_id: Set(tenant.id),
            order_number: Set(order_number),
            customer_name: Set(customer_name),
            customer_phone: Set(customer_phone),
            wilaya_code: Set(wilaya.code),
            commune: Set(commune),
            address: Set(address),
            delivery_type: Set(request.delivery_type),
            notes: Set(notes),
            subtotal: Set(subtotal),
            shipping_fee: Set(shipping_fee),
            total: Set(total),
            status: Set(OrderStatus::Pending),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (product, quantity) in &priced {
            let item = order_items::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(product.id),
                product_name: Set(product.name.clone()),
                unit_price: Set(product.price),
                quantity: Set(*quantity),
                line_total: Set(product.price * i64::from(*quantity)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;

        log::info!(
            "Order {} placed on tenant {} (total {} DZD)",
            order.order_number,
            tenant.id,
            order.total
        );
        Ok(OrderResponse::from_parts(order, items))
    }

    pub async fn list(
        &self,
        tenant_id: i64,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderSummaryResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = orders::Entity::find().filter(orders::Column::TenantId.eq(tenant_id));
        if let Some(status) = query.status {
            select = select.filter(orders::Column::Status.eq(status));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let phone = normalize_dz_phone(term);
            select = select.filter(
                Condition::any()
                    .add(orders::Column::OrderNumber.contains(term.to_ascii_uppercase()))
                    .add(orders::Column::CustomerPhone.contains(phone)),
            );
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
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

    pub async fn get(&self, tenant_id: i64, order_id: i64) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::TenantId.eq(tenant_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let items = self.load_items(&self.pool, order.id).await?;
        Ok(OrderResponse::from_parts(order, items))
    }

    /// Moves an order along its lifecycle; cancel and return put stock back.
    pub async fn update_status(
        &self,
        tenant_id: i64,
        order_id: i64,
        next: OrderStatus,
    ) -> AppResult<OrderResponse> {
        self.tenant_service.require_writable(tenant_id).await?;

        let txn = self.pool.begin().await?;
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let current = order.status;
        if !current.can_transition_to(next) {
            return Err(AppError::ValidationError(format!(
                "Cannot change order status from {current} to {next}"
            )));
        }

        let items = self.load_items(&txn, order.id).await?;
        let now = Utc::now();
        if next.restocks() {
            for item in &items {
                products::Entity::update_many()
                    .col_expr(
                        products::Column::Stock,
                        Expr::col(products::Column::Stock).add(item.quantity),
                    )
                    .col_expr(products::Column::UpdatedAt, Expr::value(now))
                    .filter(products::Column::Id.eq(item.product_id))
                    .exec(&txn)
                    .await?;
            }
        }

        let mut model = order.into_active_model();
        model.status = Set(next);
        model.updated_at = Set(Some(now));
        let updated = model.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Order {} on tenant {}: {} -> {}",
            updated.order_number,
            tenant_id,
            current,
            next
        );
        Ok(OrderResponse::from_parts(updated, items))
    }

    /// Public lookup; a phone mismatch is reported as not found.
    pub async fn track(
        &self,
        tenant_id: i64,
        order_number: &str,
        phone: &str,
    ) -> AppResult<OrderTrackingResponse> {
        let not_found = || AppError::NotFound("Order not found".to_string());

        let order = orders::Entity::find()
            .filter(orders::Column::TenantId.eq(tenant_id))
            .filter(orders::Column::OrderNumber.eq(order_number.trim().to_ascii_uppercase()))
            .one(&self.pool)
            .await?
            .ok_or_else(not_found)?;

        if order.customer_phone != normalize_dz_phone(phone) {
            return Err(not_found());
        }

        let items = self.load_items(&self.pool, order.id).await?;
        Ok(OrderTrackingResponse::from_parts(order, items))
    }

    async fn next_order_sequence(&self, txn: &DatabaseTransaction, tenant_id: i64) -> AppResult<i64> {
        // Row lock from the update serializes concurrent checkouts per tenant
        tenants::Entity::update_many()
            .col_expr(
                tenants::Column::OrdersCount,
                Expr::col(tenants::Column::OrdersCount).add(1),
            )
            .filter(tenants::Column::Id.eq(tenant_id))
            .exec(txn)
            .await?;

        let tenant = tenants::Entity::find_by_id(tenant_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
        Ok(tenant.orders_count)
    }

    async fn load_items<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        order_id: i64,
    ) -> AppResult<Vec<order_items::Model>> {
        Ok(order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .order_by_asc(order_items::Column::Id)
            .all(conn)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DeliveryType, TenantStatus};
    use crate::test_utils::{reload_product, reload_tenant, seed_product, seed_tenant, seed_wilaya, setup_db};
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use chrono::Duration;

    fn item(product_id: i64, quantity: i32) -> CheckoutItem {
        CheckoutItem {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_merge_duplicate_lines() {
        let merged = merge_checkout_lines(&[item(7, 1), item(3, 2), item(7, 4)]).unwrap();
        assert_eq!(merged, vec![(7, 5), (3, 2)]);
    }

    #[test]
    fn test_merge_rejects_bad_quantities() {
        assert!(merge_checkout_lines(&[]).is_err());
        assert!(merge_checkout_lines(&[item(1, 0)]).is_err());
        assert!(merge_checkout_lines(&[item(1, 101)]).is_err());
        // each line valid, merged line over the cap
        assert!(merge_checkout_lines(&[item(1, 60), item(1, 60)]).is_err());
    }

    #[test]
    fn test_line_cap_counts_distinct_products() {
        let repeated: Vec<CheckoutItem> = (0..51).map(|_| item(9, 1)).collect();
        assert_eq!(merge_checkout_lines(&repeated).unwrap(), vec![(9, 51)]);

        let distinct: Vec<CheckoutItem> = (1..=51).map(|id| item(id, 1)).collect();
        assert!(merge_checkout_lines(&distinct).is_err());
        assert_eq!(merge_checkout_lines(&distinct[..50]).unwrap().len(), 50);
    }

    #[test]
    fn test_compute_totals() {
        let (subtotal, total) = compute_totals(&[(4500, 2), (1200, 1)], 600).unwrap();
        assert_eq!(subtotal, 10_200);
        assert_eq!(total, 10_800);
    }

    #[test]
    fn test_compute_totals_overflow() {
        assert!(compute_totals(&[(i64::MAX, 2)], 0).is_err());
        assert!(compute_totals(&[(i64::MAX, 1)], 1).is_err());
    }

    struct Store {
        db: DatabaseConnection,
        service: OrderService,
        tenant: tenants::Model,
        robe: products::Model,
        foulard: products::Model,
    }

    async fn open_store() -> Store {
        let db = setup_db().await;
        let tenant = seed_tenant(
            &db,
            "amina",
            TenantStatus::Trial,
            Some(Utc::now() + Duration::days(14)),
            None,
        )
        .await;
        seed_wilaya(&db, 16, "Alger", 600, 400).await;
        let robe = seed_product(&db, tenant.id, "Robe kabyle", 4500, 5).await;
        let foulard = seed_product(&db, tenant.id, "Foulard", 1200, 2).await;
        let service = OrderService::new(db.clone(), TenantService::new(db.clone()));
        Store {
            db,
            service,
            tenant,
            robe,
            foulard,
        }
    }

    fn request(items: Vec<CheckoutItem>) -> CheckoutRequest {
        CheckoutRequest {
            customer_name: "Karim Haddad".into(),
            customer_phone: "+213 551 23 45 67".into(),
            wilaya_code: 16,
            commune: "Bab Ezzouar".into(),
            address: "Cite 1200 logements, bloc 4".into(),
            delivery_type: DeliveryType::Home,
            notes: None,
            items,
        }
    }

    #[tokio::test]
    async fn test_checkout_prices_and_reserves_stock() {
        let store = open_store().await;
        let order = store
            .service
            .checkout(
                &store.tenant,
                request(vec![item(store.robe.id, 2), item(store.foulard.id, 1), item(store.robe.id, 1)]),
            )
            .await
            .unwrap();

        assert_eq!(order.subtotal, 3 * 4500 + 1200);
        assert_eq!(order.shipping_fee, 600);
        assert_eq!(order.total, 3 * 4500 + 1200 + 600);
        assert_eq!(order.customer_phone, "0551234567");
        assert_eq!(order.items.len(), 2);
        assert!(order.order_number.starts_with("ORD-"));
        assert!(order.order_number.ends_with("-00001"));

        assert_eq!(reload_product(&store.db, store.robe.id).await.stock, 2);
        assert_eq!(reload_product(&store.db, store.foulard.id).await.stock, 1);
        assert_eq!(reload_tenant(&store.db, store.tenant.id).await.orders_count, 1);

        let second = store
            .service
            .checkout(&store.tenant, request(vec![item(store.foulard.id, 1)]))
            .await
            .unwrap();
        assert!(second.order_number.ends_with("-00002"));
    }

    #[tokio::test]
    async fn test_checkout_with_insufficient_stock_returns_400() {
        let store = open_store().await;
        let err = store
            .service
            .checkout(
                &store.tenant,
                request(vec![item(store.robe.id, 1), item(store.foulard.id, 3)]),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, AppError::ValidationError(msg) if msg.contains("Foulard")));
        assert_eq!(reload_product(&store.db, store.robe.id).await.stock, 5);
        assert_eq!(reload_product(&store.db, store.foulard.id).await.stock, 2);
        assert_eq!(reload_tenant(&store.db, store.tenant.id).await.orders_count, 0);
        assert_eq!(orders::Entity::find().count(&store.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_rejects_unknown_product_and_inactive_wilaya() {
        let store = open_store().await;
        let err = store
            .service
            .checkout(&store.tenant, request(vec![item(9999, 1)]))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let mut req = request(vec![item(store.robe.id, 1)]);
        req.wilaya_code = 58;
        let err = store.service.checkout(&store.tenant, req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_short_line_rolls_back_reservation_and_counter() {
        let store = open_store().await;
        // Snapshot says 2 left, another checkout already took one
        let mut stale = store.foulard.clone();
        stale.stock = 2;
        products::Entity::update_many()
            .col_expr(products::Column::Stock, Expr::value(1))
            .filter(products::Column::Id.eq(store.foulard.id))
            .exec(&store.db)
            .await
            .unwrap();

        let txn = store.db.begin().await.unwrap();
        store
            .service
            .next_order_sequence(&txn, store.tenant.id)
            .await
            .unwrap();
        let err = reserve_stock(&txn, &[(&store.robe, 2), (&stale, 2)], Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        drop(txn);

        assert_eq!(reload_product(&store.db, store.robe.id).await.stock, 5);
        assert_eq!(reload_product(&store.db, store.foulard.id).await.stock, 1);
        assert_eq!(reload_tenant(&store.db, store.tenant.id).await.orders_count, 0);
    }

    #[tokio::test]
    async fn test_cancel_restocks_and_is_final() {
        let store = open_store().await;
        let order = store
            .service
            .checkout(&store.tenant, request(vec![item(store.robe.id, 3)]))
            .await
            .unwrap();
        assert_eq!(reload_product(&store.db, store.robe.id).await.stock, 2);

        let cancelled = store
            .service
            .update_status(store.tenant.id, order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(reload_product(&store.db, store.robe.id).await.stock, 5);

        let err = store
            .service
            .update_status(store.tenant.id, order.id, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(reload_product(&store.db, store.robe.id).await.stock, 5);
    }

    #[tokio::test]
    async fn test_track_requires_matching_phone() {
        let store = open_store().await;
        let order = store
            .service
            .checkout(&store.tenant, request(vec![item(store.foulard.id, 1)]))
            .await
            .unwrap();

        let tracked = store
            .service
            .track(store.tenant.id, &order.order_number.to_lowercase(), "0551 23 45 67")
            .await
            .unwrap();
        assert_eq!(tracked.total, order.total);

        let err = store
            .service
            .track(store.tenant.id, &order.order_number, "0661000000")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
