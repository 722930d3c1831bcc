use crate::authentication;
use crate::routes;
use actix_web::middleware;
use actix_web::web;

pub fn review_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/get/{id}", web::get().to(routes::show_review))
        .route(
            "/liked/{user_id}",
            web::get().to(routes::show_liked_reviews),
        )
        // Protected routes (require authentication)
        .service(
            web::scope("/me")
                .wrap(middleware::from_fn(authentication::reject_anonymous_users))
                .route("/create", web::post().to(routes::create_review))
                .route("/update/{id}", web::patch().to(routes::update_review))
                .route("/status/{id}", web::post().to(routes::update_review_status))
                .route("/delete/{id}", web::delete().to(routes::delete_review))
                .route("/like/{id}", web::post().to(routes::like_review))
                .route("/bookmark/{id}", web::post().to(routes::bookmark_review))
                .route(
                    "/bookmarked",
                    web::get().to(routes::show_bookmarked_reviews),
                ),
        );
}
