use actix_web::web;

use crate::web::handlers;

async fn health_check_handler() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Called from `main.rs` to configure services for the actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check_handler))
            .route("/nav/resolve", web::get().to(handlers::nav_handlers::resolve_handler))
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::product_handlers::list_products_handler)),
            )
            .service(
                web::scope("/cart")
                    .route("", web::get().to(handlers::cart_handlers::get_cart_handler))
                    .route("", web::delete().to(handlers::cart_handlers::clear_cart_handler))
                    .route("/items", web::post().to(handlers::cart_handlers::add_item_handler))
                    .route(
                        "/items/{product_id}",
                        web::put().to(handlers::cart_handlers::update_quantity_handler),
                    )
                    .route(
                        "/items/{product_id}",
                        web::delete().to(handlers::cart_handlers::remove_item_handler),
                    ),
            )
            .service(
                web::scope("/checkout")
                    .route("", web::post().to(handlers::checkout_handlers::place_order_handler)),
            )
            .service(
                web::scope("/order-confirmation").route(
                    "/view",
                    web::post().to(handlers::confirmation_handlers::confirmation_view_handler),
                ),
            )
            .service(
                web::scope("/profile")
                    .route("", web::get().to(handlers::profile_handlers::get_profile_handler))
                    .route("", web::put().to(handlers::profile_handlers::update_profile_handler))
                    .route(
                        "/privacy",
                        web::put().to(handlers::profile_handlers::update_privacy_handler),
                    ),
            )
            .service(
                web::scope("/vendors")
                    .route("", web::post().to(handlers::vendor_handlers::register_vendor_handler))
                    .route("/me", web::get().to(handlers::vendor_handlers::get_my_vendor_handler)),
            ),
    );
}
