//! Sweet catalog handlers.
//!
//! Every route here sits behind `auth_middleware`; admin checks are made by
//! the inventory service against the injected `Identity`.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::MSG_SWEET_DELETED;
use crate::domain::{Identity, NewSweet, RestockAmount, Sweet, SweetChanges, SweetFilter};
use crate::errors::{AppError, AppResult};
use crate::types::lenient::{self, parse_non_empty};
use crate::types::{Created, MessageResponse};

/// New sweet request. `price` and `quantity` accept numbers or numeric strings.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSweetRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ladoo")]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    #[schema(example = "Indian")]
    pub category: String,
    #[schema(value_type = f64, example = 2.5)]
    pub price: Decimal,
    #[serde(deserialize_with = "lenient::int")]
    #[schema(example = 3)]
    pub quantity: i32,
}

/// Partial sweet edit; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSweetRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_int")]
    pub quantity: Option<i32>,
}

impl From<UpdateSweetRequest> for SweetChanges {
    fn from(req: UpdateSweetRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            price: req.price,
            quantity: req.quantity,
        }
    }
}

/// Restock request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RestockRequest {
    #[serde(deserialize_with = "lenient::int")]
    #[validate(range(min = 1, message = "Restock amount must be greater than 0"))]
    #[schema(example = 5)]
    pub amount: i32,
}

/// Search query. Empty values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-sensitive substring of the name
    pub name: Option<String>,
    /// Case-sensitive substring of the category
    pub category: Option<String>,
    /// Inclusive lower price bound
    #[param(value_type = Option<f64>)]
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    #[param(value_type = Option<f64>)]
    pub max_price: Option<String>,
}

impl TryFrom<SearchParams> for SweetFilter {
    type Error = AppError;

    fn try_from(params: SearchParams) -> AppResult<Self> {
        let min_price = parse_non_empty::<Decimal>(params.min_price.as_deref(), "minPrice")
            .map_err(AppError::validation)?;
        let max_price = parse_non_empty::<Decimal>(params.max_price.as_deref(), "maxPrice")
            .map_err(AppError::validation)?;

        Ok(Self {
            name: params.name.filter(|s| !s.is_empty()),
            category: params.category.filter(|s| !s.is_empty()),
            min_price,
            max_price,
        })
    }
}

/// Create sweet routes
pub fn sweet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sweets).post(create_sweet))
        .route("/search", get(search_sweets))
        .route("/:id", get(get_sweet).put(update_sweet).delete(delete_sweet))
        .route("/:id/purchase", post(purchase_sweet))
        .route("/:id/restock", post(restock_sweet))
}

/// Add a sweet (admin only)
#[utoipa::path(
    post,
    path = "/api/sweets",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    request_body = CreateSweetRequest,
    responses(
        (status = 201, description = "Sweet created", body = Sweet),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_sweet(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSweetRequest>,
) -> AppResult<Created<Sweet>> {
    let new_sweet = NewSweet::new(payload.name, payload.category, payload.price, payload.quantity)?;
    let sweet = state
        .inventory_service
        .create_sweet(&identity, new_sweet)
        .await?;
    Ok(Created(sweet))
}

/// List all sweets
#[utoipa::path(
    get,
    path = "/api/sweets",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All sweets", body = Vec<Sweet>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_sweets(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Sweet>>> {
    let sweets = state.inventory_service.list_sweets(&identity).await?;
    Ok(Json(sweets))
}

/// Search sweets by name, category and price range
#[utoipa::path(
    get,
    path = "/api/sweets/search",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    params(SearchParams),
    responses(
        (status = 200, description = "Matching sweets", body = Vec<Sweet>),
        (status = 400, description = "Price bound is not a number"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn search_sweets(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Sweet>>> {
    let filter = SweetFilter::try_from(params)?;
    let sweets = state
        .inventory_service
        .search_sweets(&identity, filter)
        .await?;
    Ok(Json(sweets))
}

/// Get one sweet
#[utoipa::path(
    get,
    path = "/api/sweets/{id}",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sweet ID")),
    responses(
        (status = 200, description = "Sweet", body = Sweet),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sweet not found")
    )
)]
pub async fn get_sweet(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Sweet>> {
    let sweet = state.inventory_service.get_sweet(&identity, id).await?;
    Ok(Json(sweet))
}

/// Edit a sweet (admin only)
#[utoipa::path(
    put,
    path = "/api/sweets/{id}",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sweet ID")),
    request_body = UpdateSweetRequest,
    responses(
        (status = 200, description = "Updated sweet", body = Sweet),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Sweet not found")
    )
)]
pub async fn update_sweet(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateSweetRequest>,
) -> AppResult<Json<Sweet>> {
    let sweet = state
        .inventory_service
        .update_sweet(&identity, id, SweetChanges::from(payload))
        .await?;
    Ok(Json(sweet))
}

/// Delete a sweet (admin only)
#[utoipa::path(
    delete,
    path = "/api/sweets/{id}",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sweet ID")),
    responses(
        (status = 200, description = "Sweet deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Sweet not found")
    )
)]
pub async fn delete_sweet(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.inventory_service.delete_sweet(&identity, id).await?;
    Ok(Json(MessageResponse::new(MSG_SWEET_DELETED)))
}

/// Buy one unit of a sweet
#[utoipa::path(
    post,
    path = "/api/sweets/{id}/purchase",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sweet ID")),
    responses(
        (status = 200, description = "Sweet after purchase", body = Sweet),
        (status = 400, description = "Out of stock"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sweet not found")
    )
)]
pub async fn purchase_sweet(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Sweet>> {
    let sweet = state.inventory_service.purchase_sweet(&identity, id).await?;
    Ok(Json(sweet))
}

/// Add stock to a sweet (admin only)
#[utoipa::path(
    post,
    path = "/api/sweets/{id}/restock",
    tag = "Sweets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sweet ID")),
    request_body = RestockRequest,
    responses(
        (status = 200, description = "Sweet after restock", body = Sweet),
        (status = 400, description = "Amount must be a positive whole number"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Sweet not found")
    )
)]
pub async fn restock_sweet(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RestockRequest>,
) -> AppResult<Json<Sweet>> {
    let amount = RestockAmount::new(payload.amount)?;
    let sweet = state
        .inventory_service
        .restock_sweet(&identity, id, amount)
        .await?;
    Ok(Json(sweet))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(min: Option<&str>, max: Option<&str>) -> SearchParams {
        SearchParams {
            min_price: min.map(String::from),
            max_price: max.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_search_params_are_no_filter() {
        let filter = SweetFilter::try_from(SearchParams {
            name: Some(String::new()),
            category: Some(String::new()),
            min_price: Some(String::new()),
            max_price: None,
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_price_bounds_parsed() {
        let filter = SweetFilter::try_from(params(Some("5"), Some("10.5"))).unwrap();
        assert_eq!(filter.min_price, Some(Decimal::new(5, 0)));
        assert_eq!(filter.max_price, Some(Decimal::new(105, 1)));
    }

    #[test]
    fn test_non_numeric_price_bound_rejected() {
        let err = SweetFilter::try_from(params(Some("cheap"), None)).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "minPrice must be a number"));
    }

    #[test]
    fn test_update_request_accepts_numeric_strings() {
        let req: UpdateSweetRequest =
            serde_json::from_str(r#"{"price":"3.25","quantity":"7","unknown":true}"#).unwrap();
        let changes = SweetChanges::from(req);
        assert_eq!(changes.price, Some(Decimal::new(325, 2)));
        assert_eq!(changes.quantity, Some(7));
        assert!(changes.name.is_none());
    }

    #[test]
    fn test_create_request_rejects_non_numeric_quantity() {
        let result: Result<CreateSweetRequest, _> = serde_json::from_str(
            r#"{"name":"Ladoo","category":"Indian","price":2.5,"quantity":"lots"}"#,
        );
        assert!(result.is_err());
    }
}
