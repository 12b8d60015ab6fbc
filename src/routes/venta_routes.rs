use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use crate::controllers::venta_controller::VentaController;
use crate::dto::venta_dto::{
    ListVentasQuery, VentaCreate, VentaResponse, VentaUpdate, VentaWithAutoResponse,
};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::state::AppState;
use crate::utils::errors::AppError;

// /auto/... y /comprador/... van antes que /:id
pub fn create_venta_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ventas).post(create_venta))
        .route("/auto/:auto_id", get(list_by_auto))
        .route("/comprador/:nombre", get(list_by_comprador))
        .route("/:id", get(get_venta).put(update_venta).delete(delete_venta))
        .route("/:id/with-auto", get(get_venta_with_auto))
}

async fn create_venta(
    State(state): State<AppState>,
    AppJson(request): AppJson<VentaCreate>,
) -> Result<(StatusCode, Json<VentaResponse>), AppError> {
    let controller = VentaController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_ventas(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListVentasQuery>,
) -> Result<Json<Vec<VentaResponse>>, AppError> {
    let controller = VentaController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn list_by_auto(
    State(state): State<AppState>,
    AppPath(auto_id): AppPath<i64>,
) -> Result<Json<Vec<VentaResponse>>, AppError> {
    let controller = VentaController::new(&state);
    let response = controller.list_by_auto(auto_id).await?;
    Ok(Json(response))
}

async fn list_by_comprador(
    State(state): State<AppState>,
    AppPath(nombre): AppPath<String>,
) -> Result<Json<Vec<VentaResponse>>, AppError> {
    let controller = VentaController::new(&state);
    let response = controller.list_by_comprador(&nombre).await?;
    Ok(Json(response))
}

async fn get_venta(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<VentaResponse>, AppError> {
    let controller = VentaController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_venta(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<VentaUpdate>,
) -> Result<Json<VentaResponse>, AppError> {
    let controller = VentaController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_venta(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let controller = VentaController::new(&state);
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_venta_with_auto(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<VentaWithAutoResponse>, AppError> {
    let controller = VentaController::new(&state);
    let response = controller.get_with_auto(id).await?;
    Ok(Json(response))
}
