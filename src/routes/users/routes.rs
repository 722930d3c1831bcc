use crate::authentication;
use crate::routes;
use actix_web::middleware;
use actix_web::web;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::post().to(routes::login))
        .route("/register", web::post().to(routes::register_user))
        .route("/profile/{username}", web::get().to(routes::show_profile))
        .route("/search", web::get().to(routes::search_users))
        .route("/{id}/followers", web::get().to(routes::show_followers))
        .route("/{id}/following", web::get().to(routes::show_following))
        .route(
            "/{id}/follow-status",
            web::get().to(routes::show_follow_status),
        )
        // Protected routes (require authentication)
        .service(
            web::scope("/me")
                .wrap(middleware::from_fn(authentication::reject_anonymous_users))
                .route("/reset-password", web::post().to(routes::change_password))
                .route("/logout", web::post().to(routes::log_out))
                .route("/follow/{id}", web::post().to(routes::toggle_follow)),
        );
}
