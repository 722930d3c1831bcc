use crate::authentication;
use crate::routes;
use actix_web::middleware;
use actix_web::web;

pub fn feed_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/latest", web::get().to(routes::latest_feed))
        .route("/trending", web::get().to(routes::trending_feed))
        // Protected routes (require authentication)
        .service(
            web::scope("/me")
                .wrap(middleware::from_fn(authentication::reject_anonymous_users))
                .route("/personalized", web::get().to(routes::personalized_feed)),
        );
}
