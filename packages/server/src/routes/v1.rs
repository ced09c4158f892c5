use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;
use crate::utils::upload::UploadRule;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .nest("/users", user_routes())
        .nest("/classes", class_routes())
        .nest("/lessons", lesson_routes(config))
        .nest("/papers", paper_routes(config))
        .nest("/videos", video_routes())
        .nest("/attendance", attendance_routes())
        .nest("/payments", payment_routes())
        .nest("/profile", profile_routes(config))
        .nest("/stats", stats_routes())
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::profile))
        .routes(routes!(handlers::auth::list_students))
}

fn class_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::class::list_classes,
            handlers::class::create_class
        ))
        .routes(routes!(handlers::class::my_classes))
        .routes(routes!(
            handlers::class::get_class,
            handlers::class::update_class,
            handlers::class::delete_class
        ))
        .routes(routes!(handlers::class::list_class_students))
        .routes(routes!(handlers::class::enroll_student))
        .routes(routes!(handlers::class::unenroll_student))
}

fn lesson_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::lesson::list_lessons,
            handlers::lesson::create_lesson
        ))
        .routes(routes!(handlers::lesson::list_student_lessons))
        .routes(routes!(
            handlers::lesson::update_lesson,
            handlers::lesson::delete_lesson
        ))
        .layer(UploadRule::document(&config.upload).body_limit())
}

fn paper_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::paper::list_papers,
            handlers::paper::create_paper
        ))
        .routes(routes!(handlers::paper::list_student_papers))
        .routes(routes!(
            handlers::paper::update_paper,
            handlers::paper::delete_paper
        ))
        .layer(UploadRule::document(&config.upload).body_limit())
}

fn video_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::video::list_videos,
            handlers::video::create_video
        ))
        .routes(routes!(handlers::video::list_student_videos))
        .routes(routes!(
            handlers::video::update_video,
            handlers::video::delete_video
        ))
}

fn attendance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::attendance::mark_attendance))
        .routes(routes!(handlers::attendance::class_attendance))
        .routes(routes!(handlers::attendance::my_attendance))
}

fn payment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::payment::list_received_payments,
            handlers::payment::record_payment
        ))
        .routes(routes!(handlers::payment::my_payments))
}

fn profile_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let uploads = OpenApiRouter::new()
        .routes(routes!(handlers::profile::upload_logo))
        .routes(routes!(handlers::profile::upload_main_image))
        .layer(UploadRule::image(&config.upload).body_limit());

    OpenApiRouter::new()
        .routes(routes!(
            handlers::profile::get_teacher_profile,
            handlers::profile::update_teacher_profile
        ))
        .routes(routes!(handlers::profile::public_profile))
        .merge(uploads)
}

fn stats_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::stats::teacher_stats))
        .routes(routes!(handlers::stats::student_stats))
}
