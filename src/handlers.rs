use std::fmt;

use actix_web::error::{InternalError, QueryPayloadError, UrlencodedError};
use actix_web::{web, HttpRequest, HttpResponse};
use log::warn;

use crate::classifier::TrainedModel;
use crate::models::{Measurements, PredictionResponse, INVALID_INPUT};
use crate::recorder::PredictionLog;

/// Form page showing the model's held-out accuracy.
pub async fn home(model: web::Data<TrainedModel>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_form(model.accuracy()))
}

/// Prediction from query-string parameters, as JSON.
pub async fn handle_get(
    model: web::Data<TrainedModel>,
    log: web::Data<PredictionLog>,
    query: web::Query<Measurements>,
) -> HttpResponse {
    respond(&model, &log, &query)
}

/// Prediction from form-encoded fields, same contract as the GET variant.
pub async fn handle_post(
    model: web::Data<TrainedModel>,
    log: web::Data<PredictionLog>,
    form: web::Form<Measurements>,
) -> HttpResponse {
    respond(&model, &log, &form)
}

fn respond(model: &TrainedModel, log: &PredictionLog, input: &Measurements) -> HttpResponse {
    match model.predict(&input.as_features()) {
        Ok(species) => {
            let body = PredictionResponse::new(species);
            record(log, &body);
            HttpResponse::Ok().json(body)
        }
        Err(err) => {
            warn!("prediction failed: {err:#}");
            let body = PredictionResponse::new(INVALID_INPUT);
            record(log, &body);
            HttpResponse::BadRequest().json(body)
        }
    }
}

/// Replaces actix's default query-extraction error with the fixed payload.
pub fn invalid_query(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    rejected(err, req)
}

/// Replaces actix's default form-extraction error with the fixed payload.
pub fn invalid_form(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    rejected(err, req)
}

fn rejected<E>(err: E, req: &HttpRequest) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    let body = PredictionResponse::new(INVALID_INPUT);
    if let Some(log) = req.app_data::<web::Data<PredictionLog>>() {
        record(log, &body);
    }
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

fn record(log: &PredictionLog, body: &PredictionResponse) {
    if let Err(err) = log.append(body) {
        warn!("could not append to prediction log: {err}");
    }
}

fn render_form(accuracy: f64) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Iris Species Prediction</title></head>\n\
         <body>\n\
         <h1>Iris Species Prediction</h1>\n\
         <p>Model accuracy on held-out data: {accuracy:.2}</p>\n\
         <form action=\"/handle_post\" method=\"post\">\n\
           <label>Sepal length (cm): <input name=\"sepal_length\" type=\"number\" step=\"any\" required></label><br>\n\
           <label>Sepal width (cm): <input name=\"sepal_width\" type=\"number\" step=\"any\" required></label><br>\n\
           <label>Petal length (cm): <input name=\"petal_length\" type=\"number\" step=\"any\" required></label><br>\n\
           <label>Petal width (cm): <input name=\"petal_width\" type=\"number\" step=\"any\" required></label><br>\n\
           <button type=\"submit\">Predict</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    )
}
