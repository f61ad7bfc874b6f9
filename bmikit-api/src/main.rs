use actix_cors::Cors;
use actix_web::{post, web, App, HttpResponse, HttpServer};
use log::info;

use bmikit_model::bmi::evaluate;
use bmikit_model::measurement::Measurement;

use crate::config::Config;

mod config;

#[post("/classify")]
async fn classify_one(measurement: web::Json<Measurement>) -> HttpResponse {
    match evaluate(&measurement.into_inner()) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

#[post("/batch")]
async fn classify_many(measurements: web::Json<Vec<Measurement>>) -> HttpResponse {
    let evaluated: Result<Vec<_>, _> = measurements
        .iter()
        .enumerate()
        .map(|(i, measurement)| {
            evaluate(measurement).map_err(|e| format!("entry {}: {}", i, e))
        })
        .collect();

    match evaluated {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(message) => HttpResponse::BadRequest().body(message),
    }
}

#[post("/batch/file")]
async fn classify_file(body: web::Bytes) -> HttpResponse {
    match bmikit_batch::process_reader(body.as_ref()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

fn cors_for(config: &Config) -> Cors {
    if config.allowed_origins.is_empty() {
        return Cors::permissive();
    }
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    let config = Config::load();
    let bind_address = (config.host.clone(), config.port);
    info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_for(&config))
            .service(classify_one)
            .service(classify_many)
            .service(classify_file)
    })
    .bind(bind_address)?
    .run()
    .await
}
