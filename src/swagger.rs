use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    DeliveryType, OrderStatus, PaymentMethod, PaymentStatus, SubscriptionPlan, SubscriptionStatus,
    TenantStatus, UserRole,
};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::store_settings::get_store_settings,
        handlers::store_settings::update_store_settings,
        handlers::product::list_products,
        handlers::product::create_product,
        handlers::product::get_product,
        handlers::product::update_product,
        handlers::product::delete_product,
        handlers::order::checkout,
        handlers::order::get_orders,
        handlers::order::get_order,
        handlers::order::update_order_status,
        handlers::dashboard::get_stats,
        handlers::billing::get_subscription,
        handlers::billing::get_payments,
        handlers::billing::submit_payment,
        handlers::storefront::get_store,
        handlers::storefront::get_store_products,
        handlers::storefront::get_store_product,
        handlers::storefront::get_storefront,
        handlers::storefront::get_storefront_products,
        handlers::storefront::get_storefront_product,
        handlers::storefront::storefront_checkout,
        handlers::storefront::track_order,
        handlers::shipping::get_wilayas,
        handlers::shipping::get_communes,
        handlers::admin::list_tenants,
        handlers::admin::get_tenant,
        handlers::admin::suspend_tenant,
        handlers::admin::activate_tenant,
        handlers::admin::extend_trial,
        handlers::admin::list_payments,
        handlers::admin::approve_payment,
        handlers::admin::reject_payment,
        handlers::admin::get_stats,
        handlers::admin::list_wilayas,
        handlers::admin::update_wilaya,
        handlers::admin::add_communes,
    ),
    components(
        schemas(
            ApiError,
            PaginationParams,
            UserRole,
            RegisterMerchantRequest,
            LoginRequest,
            RefreshTokenRequest,
            UserResponse,
            AuthResponse,
            MeResponse,
            TenantStatus,
            TenantResponse,
            StoreInfoResponse,
            UpdateStoreSettingsRequest,
            TenantQuery,
            SuspendTenantRequest,
            ExtendTrialRequest,
            TenantDetailResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductQuery,
            ProductResponse,
            PublicProductResponse,
            OrderStatus,
            DeliveryType,
            CheckoutItem,
            CheckoutRequest,
            OrderItemResponse,
            OrderResponse,
            OrderSummaryResponse,
            OrderTrackingResponse,
            OrderQuery,
            UpdateOrderStatusRequest,
            TrackOrderQuery,
            SubscriptionPlan,
            SubscriptionStatus,
            PaymentMethod,
            PaymentStatus,
            SubscriptionResponse,
            PlanPriceResponse,
            BillingOverviewResponse,
            SubmitPaymentRequest,
            PaymentResponse,
            PaymentQuery,
            RejectPaymentRequest,
            WilayaResponse,
            CommuneResponse,
            UpdateWilayaRequest,
            AddCommunesRequest,
            MerchantStatsResponse,
            PlatformStatsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Merchant accounts and tokens"),
        (name = "store", description = "Store settings"),
        (name = "product", description = "Merchant catalog"),
        (name = "order", description = "Merchant order management"),
        (name = "dashboard", description = "Merchant statistics"),
        (name = "billing", description = "Subscription and manual payments"),
        (name = "storefront", description = "Public storefront and checkout"),
        (name = "shipping", description = "Wilayas, communes and delivery fees"),
        (name = "admin", description = "Platform administration"),
    ),
    info(
        title = "Storefront Backend API",
        version = "1.0.0",
        description = "Multi-tenant storefront builder REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
