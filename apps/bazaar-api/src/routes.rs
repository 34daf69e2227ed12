use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{PathRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use bazaar_service::{
	CategoryStatsResponse, Error, ListingDetailRequest, ListingDetailResponse,
	PopularSearchesRequest, PopularSearchesResponse, RecordSearchRequest, RelatedRequest,
	RelatedResponse, SearchFilters, SearchHistoryRequest, SearchHistoryResponse, SearchRequest,
	SearchResponse, SortBy, SortOrder, SuggestRequest, SuggestResponse, TrendingRequest,
	TrendingResponse,
};

const INVALID_REQUEST: &str = "INVALID_REQUEST";
const NOT_FOUND: &str = "NOT_FOUND";
const STORAGE_ERROR: &str = "STORAGE_ERROR";

#[derive(Debug, Deserialize)]
struct SearchParams {
	#[serde(default)]
	q: String,
	min_price: Option<f64>,
	max_price: Option<f64>,
	category: Option<String>,
	community_id: Option<i64>,
	#[serde(default)]
	sort_by: SortBy,
	#[serde(default)]
	sort_order: SortOrder,
	limit: Option<i64>,
	offset: Option<i64>,
	/// When present, the query is appended to this user's search history.
	user_id: Option<i64>,
}
impl SearchParams {
	fn into_parts(self) -> (SearchRequest, Option<i64>) {
		let request = SearchRequest {
			query: self.q,
			filters: SearchFilters {
				min_price: self.min_price,
				max_price: self.max_price,
				category: self.category,
				community_id: self.community_id,
				sort_by: self.sort_by,
				sort_order: self.sort_order,
				limit: self.limit,
				offset: self.offset,
			},
		};

		(request, self.user_id)
	}
}

#[derive(Debug, Deserialize)]
struct QuickSearchParams {
	#[serde(default)]
	q: String,
	community_id: Option<i64>,
	limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
	#[serde(default)]
	q: String,
	limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LimitParams {
	limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, fields } => {
				let fields = if fields.is_empty() { None } else { Some(fields) };

				json_error(StatusCode::BAD_REQUEST, INVALID_REQUEST, message, fields)
			},
			Error::NotFound { message } => json_error(StatusCode::NOT_FOUND, NOT_FOUND, message, None),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage error.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR, message, None)
			},
		}
	}
}
impl From<QueryRejection> for ApiError {
	fn from(err: QueryRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, INVALID_REQUEST, err.body_text(), None)
	}
}
impl From<PathRejection> for ApiError {
	fn from(err: PathRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, INVALID_REQUEST, err.body_text(), None)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", get(search))
		.route("/v1/search/suggestions", get(suggestions))
		.route("/v1/search/popular", get(popular))
		.route("/v1/search/trending", get(trending))
		.route("/v1/search/stats", get(stats))
		.route("/v1/search/history/{user_id}", get(history))
		.route("/v1/listings/search", get(quick_search))
		.route("/v1/listings/{listing_id}", get(listing_detail))
		.route("/v1/listings/{listing_id}/related", get(related))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Query(params) = params?;
	let (request, user_id) = params.into_parts();
	let query = request.query.clone();
	let response = state.service.search(request).await?;

	if let Some(user_id) = user_id
		&& let Err(err) =
			state.service.record_search(RecordSearchRequest { user_id, query }).await
	{
		tracing::warn!(user_id, error = %err, "Failed to record search history.");
	}

	Ok(Json(response))
}

async fn quick_search(
	State(state): State<AppState>,
	params: Result<Query<QuickSearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Query(params) = params?;
	let request = SearchRequest {
		query: params.q,
		filters: SearchFilters {
			community_id: params.community_id,
			limit: params.limit,
			..Default::default()
		},
	};
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn suggestions(
	State(state): State<AppState>,
	params: Result<Query<SuggestParams>, QueryRejection>,
) -> Result<Json<SuggestResponse>, ApiError> {
	let Query(params) = params?;
	let response =
		state.service.suggest(SuggestRequest { prefix: params.q, limit: params.limit }).await?;

	Ok(Json(response))
}

async fn popular(
	State(state): State<AppState>,
	params: Result<Query<PopularSearchesRequest>, QueryRejection>,
) -> Result<Json<PopularSearchesResponse>, ApiError> {
	let Query(request) = params?;
	let response = state.service.popular_searches(request).await?;

	Ok(Json(response))
}

async fn trending(
	State(state): State<AppState>,
	params: Result<Query<TrendingRequest>, QueryRejection>,
) -> Result<Json<TrendingResponse>, ApiError> {
	let Query(request) = params?;
	let response = state.service.trending_listings(request).await?;

	Ok(Json(response))
}

async fn stats(State(state): State<AppState>) -> Result<Json<CategoryStatsResponse>, ApiError> {
	let response = state.service.category_stats().await?;

	Ok(Json(response))
}

async fn history(
	State(state): State<AppState>,
	user_id: Result<Path<i64>, PathRejection>,
	params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<SearchHistoryResponse>, ApiError> {
	let Path(user_id) = user_id?;
	let Query(params) = params?;
	let response =
		state.service.search_history(SearchHistoryRequest { user_id, limit: params.limit }).await?;

	Ok(Json(response))
}

async fn listing_detail(
	State(state): State<AppState>,
	listing_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ListingDetailResponse>, ApiError> {
	let Path(listing_id) = listing_id?;
	let response = state.service.listing_detail(ListingDetailRequest { listing_id }).await?;

	Ok(Json(response))
}

async fn related(
	State(state): State<AppState>,
	listing_id: Result<Path<i64>, PathRejection>,
	params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<RelatedResponse>, ApiError> {
	let Path(listing_id) = listing_id?;
	let Query(params) = params?;
	let response =
		state.service.related(RelatedRequest { listing_id, limit: params.limit }).await?;

	Ok(Json(response))
}
