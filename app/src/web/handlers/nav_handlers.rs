use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::web::handlers::auth::MaybeAuthenticated;
use crate::web::nav;

#[derive(Deserialize, Debug)]
pub struct ResolveQuery {
    pub path: String,
}

#[instrument(name = "handler::nav_resolve", skip(identity, query), fields(path = %query.path))]
pub async fn resolve_handler(
    identity: MaybeAuthenticated,
    query: web::Query<ResolveQuery>,
) -> Result<HttpResponse, AppError> {
    let outcome = nav::resolve(&query.path, identity.0.is_some());
    Ok(HttpResponse::Ok().json(outcome))
}
