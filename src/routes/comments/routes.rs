use crate::authentication;
use crate::routes;
use actix_web::middleware;
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route(
            "/get/review/{id}",
            web::get().to(routes::show_comments_for_review),
        )
        .route(
            "/liked/{user_id}",
            web::get().to(routes::show_liked_comments),
        )
        // Protected routes (require authentication)
        .service(
            web::scope("/me")
                .wrap(middleware::from_fn(authentication::reject_anonymous_users))
                .route("/create", web::post().to(routes::create_comment))
                .route(
                    "/update/{review_id}/{comment_id}",
                    web::patch().to(routes::update_comment),
                )
                .route(
                    "/delete/{review_id}/{comment_id}",
                    web::delete().to(routes::delete_comment),
                )
                .route(
                    "/like/{review_id}/{comment_id}",
                    web::post().to(routes::like_comment),
                ),
        );
}
