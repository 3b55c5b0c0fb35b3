use crate::{
    api::{attendance, proxy, user},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Per-scope limiter; a limit of 0 disables it
    fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
        if requests_per_min == 0 {
            return None;
        }
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()?;
        Some(Governor::new(&cfg))
    }

    // Backend pass-through
    let proxy_routes = web::scope(&config.api_prefix)
        .service(
            web::scope("/shifts")
                // /shifts
                .service(
                    web::resource("")
                        .route(web::get().to(proxy::get_shifts))
                        .route(web::post().to(proxy::create_shift)),
                )
                // /shifts/{user_name}
                .service(
                    web::resource("/{user_name}")
                        .route(web::get().to(proxy::get_user_shifts))
                        .route(web::post().to(proxy::create_user_shift)),
                ),
        )
        .service(
            web::resource("/users")
                .route(web::get().to(proxy::get_users))
                .route(web::post().to(proxy::create_user)),
        );

    match build_limiter(config.rate_proxy_per_min) {
        Some(limiter) => cfg.service(proxy_routes.wrap(limiter)),
        None => cfg.service(proxy_routes),
    };

    // Pages; `/user` must win over `/{user_name}`
    cfg.service(
        web::resource("/user")
            .route(web::get().to(proxy::get_users))
            .route(web::post().to(user::create_user)),
    )
    .service(web::resource("/{user_name}/monthly").route(web::get().to(attendance::monthly)))
    .service(web::resource("/{user_name}/clock-in").route(web::post().to(attendance::clock_in)))
    .service(web::resource("/{user_name}/clock-out").route(web::post().to(attendance::clock_out)))
    .service(
        web::resource("/{user_name}")
            .route(web::get().to(attendance::today))
            .route(web::post().to(attendance::save)),
    );
}
