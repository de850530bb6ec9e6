pub mod auth;
pub mod file;
pub mod user;

use actix_web::{web, HttpResponse};

use crate::errors::AppError;

pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().json("OK")
}

/// Mounts every route. The caller provides `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("Invalid request body: {}", err)).into()
    }))
    .route("/healthz", web::get().to(healthz))
    .service(
        web::scope("/v1")
            .service(
                web::resource("/users")
                    .route(web::post().to(auth::register))
                    .route(web::get().to(user::get_all_users)),
            )
            .service(web::resource("/login").route(web::put().to(auth::login)))
            .service(web::resource("/files").route(web::get().to(user::get_all_files)))
            .service(web::resource("/users/{user_id}").route(web::get().to(user::get_user)))
            .service(
                web::resource("/users/{user_id}/upload").route(web::put().to(file::upload_file)),
            )
            .service(
                web::resource("/users/{user_id}/file-update")
                    .route(web::patch().to(file::update_file_description)),
            )
            .service(
                web::resource("/users/{user_id}/download")
                    .route(web::get().to(file::download_file)),
            )
            .service(
                web::resource("/admin/users/{user_id}/download")
                    .route(web::get().to(file::download_file)),
            )
            .service(
                web::resource("/users/{user_id}/file").route(web::delete().to(file::delete_file)),
            )
            .service(
                web::resource("/admin/users/{user_id}/file")
                    .route(web::delete().to(file::delete_file)),
            ),
    );
}
