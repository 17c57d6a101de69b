use crate::{
    api::{attendance, leave, location, notification, remote_schedule, reservation},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let clock_limiter = Arc::new(build_limiter(config.rate_clock_per_min));
    let default_limiter = Arc::new(build_limiter(config.rate_default_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/attendance")
                    // clock-in/out get their own, tighter limiter
                    .service(
                        web::resource("/clock-in")
                            .wrap(clock_limiter.clone())
                            .route(web::post().to(attendance::clock_in)),
                    )
                    .service(
                        web::resource("/clock-out")
                            .wrap(clock_limiter.clone())
                            .route(web::post().to(attendance::clock_out)),
                    )
                    .service(
                        web::resource("/summary/{user_id}")
                            .route(web::get().to(attendance::get_weekly_summary)),
                    )
                    .service(
                        web::resource("/alert/{user_id}")
                            .route(web::get().to(attendance::weekly_alert)),
                    )
                    .service(web::resource("").route(web::get().to(attendance::list_attendance))),
            )
            .service(
                web::scope("/reservations")
                    .wrap(default_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::post().to(reservation::create_reservation))
                            .route(web::get().to(reservation::list_reservations)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::patch().to(reservation::update_reservation)),
                    ),
            )
            .service(
                web::scope("/resources").wrap(default_limiter.clone()).service(
                    web::resource("")
                        .route(web::post().to(reservation::create_resource))
                        .route(web::get().to(reservation::list_resources)),
                ),
            )
            .service(
                web::scope("/leave")
                    .wrap(default_limiter.clone())
                    .service(
                        web::resource("/balances")
                            .route(web::post().to(leave::create_balance))
                            .route(web::get().to(leave::list_balances)),
                    )
                    .service(
                        web::resource("/balances/{id}")
                            .route(web::patch().to(leave::update_balance)),
                    )
                    .service(
                        web::resource("/requests")
                            .route(web::post().to(leave::create_leave_request))
                            .route(web::get().to(leave::list_leave_requests)),
                    )
                    .service(
                        web::resource("/requests/{id}")
                            .route(web::get().to(leave::get_leave_request))
                            .route(web::patch().to(leave::set_leave_status)),
                    )
                    .service(
                        web::resource("/reminder/{user_id}")
                            .route(web::get().to(leave::leave_reminder)),
                    ),
            )
            .service(
                web::scope("/locations")
                    .wrap(default_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::post().to(location::create_location))
                            .route(web::get().to(location::list_locations)),
                    )
                    .service(
                        web::resource("/{id}").route(web::delete().to(location::archive_location)),
                    ),
            )
            .service(
                web::scope("/remote-schedules")
                    .wrap(default_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::post().to(remote_schedule::create_schedule))
                            .route(web::get().to(remote_schedule::list_schedules)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::patch().to(remote_schedule::review_schedule))
                            .route(web::delete().to(remote_schedule::cancel_schedule)),
                    ),
            )
            .service(
                web::scope("/notifications").wrap(default_limiter).service(
                    web::resource("/pending-approvals/{user_id}")
                        .route(web::get().to(notification::pending_approvals)),
                ),
            ),
    );
}
