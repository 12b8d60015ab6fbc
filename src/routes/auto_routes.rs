use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use crate::controllers::auto_controller::AutoController;
use crate::dto::auto_dto::{
    AutoCreate, AutoResponse, AutoUpdate, AutoWithVentasResponse, ListAutosQuery,
};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::state::AppState;
use crate::utils::errors::AppError;

// Las rutas con prefijo literal (/chasis/...) tienen prioridad sobre /:id
pub fn create_auto_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_autos).post(create_auto))
        .route("/chasis/:numero_chasis", get(get_auto_by_chasis))
        .route("/:id", get(get_auto).put(update_auto).delete(delete_auto))
        .route("/:id/with-ventas", get(get_auto_with_ventas))
}

async fn create_auto(
    State(state): State<AppState>,
    AppJson(request): AppJson<AutoCreate>,
) -> Result<(StatusCode, Json<AutoResponse>), AppError> {
    let controller = AutoController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_autos(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListAutosQuery>,
) -> Result<Json<Vec<AutoResponse>>, AppError> {
    let controller = AutoController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn get_auto_by_chasis(
    State(state): State<AppState>,
    AppPath(numero_chasis): AppPath<String>,
) -> Result<Json<AutoResponse>, AppError> {
    let controller = AutoController::new(&state);
    let response = controller.get_by_chasis(&numero_chasis).await?;
    Ok(Json(response))
}

async fn get_auto(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<AutoResponse>, AppError> {
    let controller = AutoController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_auto(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<AutoUpdate>,
) -> Result<Json<AutoResponse>, AppError> {
    let controller = AutoController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_auto(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let controller = AutoController::new(&state);
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_auto_with_ventas(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<AutoWithVentasResponse>, AppError> {
    let controller = AutoController::new(&state);
    let response = controller.get_with_ventas(id).await?;
    Ok(Json(response))
}
