use crate::config::ApiConfig;
use crate::form::{FormError, SearchForm};
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::http::{header, StatusCode};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use vmatch_core::{
    score_range, CategorySelector, Error, ProductId, QueryKey, ResultFilter, ScoredResult, Scorer,
};
use vmatch_storage::CatalogStore;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub scorer: Scorer,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<CatalogStore>, config: &ApiConfig) -> Self {
        Self {
            store,
            scorer: Scorer::default(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

#[derive(Deserialize)]
struct ProductsQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    min_similarity: Option<u32>,
    category: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    success: bool,
    query: &'a str,
    count: usize,
    total: usize,
    results: Vec<ScoredResult>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(store: Arc<CatalogStore>, config: ApiConfig) -> std::io::Result<()> {
        let state = web::Data::new(AppState::new(store, &config));
        let cors_config = config.clone();

        HttpServer::new(move || {
            App::new()
                .wrap(Self::cors(&cors_config))
                .app_data(state.clone())
                .configure(Self::configure)
        })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
    }

    /// Register all routes. Expects `web::Data<AppState>` in app data.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(index))
            .route("/api/products", web::get().to(list_products))
            .route("/api/products/reload", web::post().to(reload_products))
            .route("/api/products/{id}", web::get().to(get_product))
            .service(
                web::resource("/api/search")
                    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                        let response = search_error(StatusCode::BAD_REQUEST, &err);
                        InternalError::from_response(err, response).into()
                    }))
                    .route(web::post().to(search)),
            );
    }

    fn cors(config: &ApiConfig) -> Cors {
        let cors = if config.allows_any_origin() {
            Cors::default().allow_any_origin()
        } else {
            config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };

        cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_header(header::CONTENT_TYPE)
            .max_age(3600)
    }
}

fn status_for(e: &Error) -> StatusCode {
    match e {
        Error::MissingQueryKey => StatusCode::BAD_REQUEST,
        Error::ProductNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn search_error(status: StatusCode, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "success": false,
        "error": message.to_string(),
        "results": []
    }))
}

async fn index(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Visual Product Matcher API is running!",
        "loadedProducts": state.store.len()
    })))
}

async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ProductsQuery>,
) -> ActixResult<HttpResponse> {
    let catalog = state.store.snapshot();
    let selector = query
        .category
        .as_deref()
        .map(CategorySelector::from)
        .unwrap_or_default();
    let products: Vec<_> = catalog.by_category(&selector).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "count": products.len(),
        "products": products
    })))
}

async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = ProductId::parse_path(&path.into_inner());
    let catalog = state.store.snapshot();

    match catalog.get(&id) {
        Some(product) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "product": product
        }))),
        None => {
            let e = Error::ProductNotFound(id.to_string());
            Ok(HttpResponse::build(status_for(&e)).json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            })))
        }
    }
}

async fn reload_products(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.store.reload() {
        Ok(count) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "count": count
        }))),
        Err(e) => Ok(HttpResponse::build(status_for(&e)).json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        }))),
    }
}

async fn search(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<SearchParams>,
    payload: web::Payload,
) -> ActixResult<HttpResponse> {
    let form = SearchForm::extract(&req, payload.into_inner(), state.max_upload_bytes).await;
    let form = match form {
        Ok(form) => form,
        Err(e @ FormError::TooLarge { .. }) => {
            warn!("Rejected upload: {}", e);
            return Ok(search_error(StatusCode::PAYLOAD_TOO_LARGE, e));
        }
        Err(e) => {
            warn!("Rejected search form: {}", e);
            return Ok(search_error(StatusCode::BAD_REQUEST, e));
        }
    };

    if let Some(upload) = &form.upload {
        info!(
            "Received upload {:?} ({}, {} bytes)",
            upload.filename.as_deref().unwrap_or_default(),
            upload.mime_type.as_deref().unwrap_or("unknown type"),
            upload.size
        );
    }

    let key = match QueryKey::derive(form.upload.as_ref(), form.image_url.as_deref()) {
        Ok(key) => key,
        Err(e) => return Ok(search_error(status_for(&e), e)),
    };
    info!("Searching with input: {}", key);

    let catalog = state.store.snapshot();
    let ranked = catalog.rank(&state.scorer, key.as_str());
    let total = ranked.len();

    info!("Generated {} results", total);
    if let Some((low, high)) = score_range(&ranked) {
        info!("Similarity range: {}% - {}%", low, high);
    }

    let filter = ResultFilter::new(
        params.min_similarity.unwrap_or(0),
        params
            .category
            .as_deref()
            .map(CategorySelector::from)
            .unwrap_or_default(),
    );
    let results = if filter.is_pass_through() {
        ranked
    } else {
        filter.apply(&ranked)
    };

    let response = SearchResponse {
        success: true,
        query: key.as_str(),
        count: results.len(),
        total,
        results,
    };

    match serde_json::to_vec(&response) {
        Ok(body) => Ok(HttpResponse::Ok()
            .content_type("application/json")
            .body(body)),
        Err(e) => {
            error!("Search error: {}", e);
            Ok(search_error(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}
