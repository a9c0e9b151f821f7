use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::models::{CreateMarketplaceLink, MarketplaceLink, UpdateMarketplaceLink};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const SORTABLE: &[&str] = &["created_at", "price", "supplier"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/marketplace", get(list).post(create))
        // Price-comparison alias over the same listing
        .route("/marketplace/prices", get(list))
        .route(
            "/marketplace/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct MarketplaceListParams {
    pub piece_id: Option<String>,
    pub supplier: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/marketplace (and /marketplace/prices)
async fn list(
    State(state): State<AppState>,
    Query(params): Query<MarketplaceListParams>,
) -> Result<Json<Page<MarketplaceLink>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(piece_id) = params.piece_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()) {
        filters.eq("piece_id", Arg::Uuid(piece_id));
    }
    if let Some(supplier) = &params.supplier {
        filters.eq("supplier", Arg::Text(supplier.clone()));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) =
        query::fetch_page::<MarketplaceLink>(&state.pool, "marketplace_links", &filters, &page)
            .await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/marketplace/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MarketplaceLink>, ApiError> {
    let link =
        sqlx::query_as::<_, MarketplaceLink>("SELECT * FROM marketplace_links WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Marketplace link not found"))?;
    Ok(Json(link))
}

/// POST /api/v1/marketplace
async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateMarketplaceLink>,
) -> Result<(StatusCode, Json<MarketplaceLink>), ApiError> {
    dto.validate()?;

    let link = sqlx::query_as::<_, MarketplaceLink>(
        "INSERT INTO marketplace_links (piece_id, supplier, url, price, currency) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(dto.piece_id)
    .bind(&dto.supplier)
    .bind(&dto.url)
    .bind(dto.price)
    .bind(&dto.currency)
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// PUT /api/v1/marketplace/:id - full replace
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateMarketplaceLink>,
) -> Result<Json<MarketplaceLink>, ApiError> {
    dto.validate()?;

    let link = sqlx::query_as::<_, MarketplaceLink>(
        "UPDATE marketplace_links SET piece_id = $1, supplier = $2, url = $3, price = $4, \
         currency = $5 WHERE id = $6 RETURNING *",
    )
    .bind(dto.piece_id)
    .bind(&dto.supplier)
    .bind(&dto.url)
    .bind(dto.price)
    .bind(&dto.currency)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Marketplace link not found"))?;

    Ok(Json(link))
}

/// PATCH /api/v1/marketplace/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateMarketplaceLink>,
) -> Result<Json<MarketplaceLink>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        return get_by_id(State(state), Path(id)).await;
    }

    let mut qb = QueryBuilder::new("UPDATE marketplace_links SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(piece_id) = dto.piece_id {
            fields.push("piece_id = ").push_bind_unseparated(piece_id);
        }
        if let Some(supplier) = &dto.supplier {
            fields.push("supplier = ").push_bind_unseparated(supplier);
        }
        if let Some(url) = &dto.url {
            fields.push("url = ").push_bind_unseparated(url);
        }
        if let Some(price) = dto.price {
            fields.push("price = ").push_bind_unseparated(price);
        }
        if let Some(currency) = &dto.currency {
            fields.push("currency = ").push_bind_unseparated(currency);
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let link = qb
        .build_query_as::<MarketplaceLink>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Marketplace link not found"))?;

    Ok(Json(link))
}

/// DELETE /api/v1/marketplace/:id
async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MarketplaceLink>, ApiError> {
    let link = sqlx::query_as::<_, MarketplaceLink>(
        "DELETE FROM marketplace_links WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Marketplace link not found"))?;

    Ok(Json(link))
}
