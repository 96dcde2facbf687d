use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use storefront_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, TenantMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let tenant_service = TenantService::new(pool.clone());
    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        config.tenancy.trial_days,
    );
    let order_service = OrderService::new(pool.clone(), tenant_service.clone());
    let product_service = ProductService::new(pool.clone(), tenant_service.clone());
    let storefront_service = StorefrontService::new(
        pool.clone(),
        tenant_service.clone(),
        order_service.clone(),
    );
    let shipping_service = ShippingService::new(pool.clone());
    let billing_service = BillingService::new(pool.clone(), config.billing.clone());
    let admin_service = AdminService::new(pool.clone());
    let dashboard_service = DashboardService::new(pool.clone());

    if let (Some(email), Some(password)) = (&config.admin.email, &config.admin.password) {
        if let Err(e) = auth_service.ensure_super_admin(email, password).await {
            log::error!("Failed to ensure super-admin account: {:?}", e);
        }
    } else {
        log::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, no super-admin bootstrapped");
    }

    tasks::spawn_all(tenant_service.clone());

    log::info!(
        "Starting HTTP server at {}:{} (stores on *.{})",
        config.server.host,
        config.server.port,
        config.tenancy.root_domain
    );

    let root_domain = config.tenancy.root_domain.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(TenantMiddleware::new(
                tenant_service.clone(),
                root_domain.clone(),
            ))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(tenant_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(storefront_service.clone()))
            .app_data(web::Data::new(shipping_service.clone()))
            .app_data(web::Data::new(billing_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .configure(swagger_config)
            .configure(handlers::health_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::store_settings_config)
                    .configure(handlers::product_config)
                    .configure(handlers::order_config)
                    .configure(handlers::dashboard_config)
                    .configure(handlers::billing_config)
                    .configure(handlers::store_config)
                    .configure(handlers::storefront_config)
                    .configure(handlers::shipping_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
