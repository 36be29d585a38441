mod classifier;
mod handlers;
mod models;
mod recorder;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::info;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 5000;
const PREDICTION_LOG: &str = "predictions.json";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let model = classifier::TrainedModel::fit(5)?;
    info!("KNN model accuracy: {:.2}", model.accuracy());

    let model = web::Data::new(model);
    let prediction_log = web::Data::new(recorder::PredictionLog::new(PREDICTION_LOG));

    info!("Server running at http://{HOST}:{PORT}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(model.clone())
            .app_data(prediction_log.clone())
            .app_data(web::QueryConfig::default().error_handler(handlers::invalid_query))
            .app_data(web::FormConfig::default().error_handler(handlers::invalid_form))
            .service(web::resource("/").route(web::get().to(handlers::home)))
            .service(web::resource("/handle_get").route(web::get().to(handlers::handle_get)))
            .service(web::resource("/handle_post").route(web::post().to(handlers::handle_post)))
    })
    .bind((HOST, PORT))?
    .run()
    .await?;

    Ok(())
}
