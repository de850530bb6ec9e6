use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use crate::handlers;
use crate::state::AppState;

/// CORS policy for the browser front end: any origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Builds the HTTP server on an already bound listener. The caller awaits or spawns it.
pub fn serve(state: AppState, listener: TcpListener, workers: Option<usize>) -> std::io::Result<Server> {
    let data = web::Data::new(state);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(cors())
            .wrap(Logger::default())
            .configure(handlers::configure)
    });
    let server = match workers {
        Some(n) => server.workers(n),
        None => server,
    };
    Ok(server.listen(listener)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{header, Method, StatusCode};
    use actix_web::test;

    use crate::config::ServerConfig;
    use crate::db::MemoryUserRepository;
    use crate::utils::storage::MemoryStorage;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryUserRepository::default()),
            Arc::new(MemoryStorage::default()),
            &ServerConfig::default(),
        )
    }

    #[actix_web::test]
    async fn preflight_from_browser_origin_is_allowed() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .wrap(cors())
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/v1/users")
            .insert_header((header::ORIGIN, "http://localhost:4200"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:4200"
        );

        let req = test::TestRequest::get()
            .uri("/v1/users")
            .insert_header((header::ORIGIN, "http://localhost:4200"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
