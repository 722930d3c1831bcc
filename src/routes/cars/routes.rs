use crate::routes;
use actix_web::web;

pub fn car_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(routes::list_cars))
        .route("/{id}", web::get().to(routes::show_car));
}
