use crate::authentication;
use crate::routes;
use actix_web::middleware;
use actix_web::web;

// The garage is always scoped to the caller; every route needs a session.
pub fn garage_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .wrap(middleware::from_fn(authentication::reject_anonymous_users))
            .route("", web::get().to(routes::show_garage))
            .route("/create", web::post().to(routes::add_garage_car))
            .route("/update/{id}", web::patch().to(routes::update_garage_car))
            .route("/delete/{id}", web::delete().to(routes::delete_garage_car))
            .route("/activate/{id}", web::post().to(routes::activate_garage_car)),
    );
}
