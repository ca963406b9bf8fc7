use crate::{
    api::{attendance, employee},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("rate limiter period and burst are non-zero");
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_protected_per_min))
            .configure(api_routes),
    );
}

pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::mark_attendance)),
            )
            // /attendance/by_date?date=
            .service(web::resource("/by_date").route(web::get().to(attendance::by_date)))
            // /attendance/by_employee?employee_id=
            .service(web::resource("/by_employee").route(web::get().to(attendance::by_employee)))
            // /attendance/statistics?date=
            .service(web::resource("/statistics").route(web::get().to(attendance::statistics)))
            .service(
                web::resource("/statistics/daily")
                    .route(web::get().to(attendance::daily_statistics)),
            ),
    )
    .service(
        web::scope("/employees")
            .service(web::resource("").route(web::get().to(employee::list_employees))),
    );
}
