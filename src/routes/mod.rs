// Route exports
pub mod league;

use actix_web::web;

pub use league::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(league::configure);
}
