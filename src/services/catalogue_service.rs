use crate::{
    domain::{
        catalogue::{CatalogueView, SortMode, build_view},
        transfer::{ParsedImport, export_csv, items_from_csv},
    },
    dto::catalogue::{CreateCatalogueItemRequest, ImportSummary, UpdateCatalogueItemRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{CartItem, CatalogueItem},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn query_catalogue(
    state: &AppState,
    query: Option<&str>,
    category: Option<&str>,
    sort: SortMode,
) -> AppResult<ApiResponse<CatalogueView>> {
    let items = state.store.load::<CatalogueItem>().await?;
    let cart = state.store.load::<CartItem>().await?;
    let view = build_view(&items, query, category, sort, &cart);

    let message = if view.fuzzy {
        "No exact matches, showing similar parts"
    } else {
        "Catalogue"
    };
    let meta = Meta::total(view.items.len());
    Ok(ApiResponse::success(message, view, Some(meta)))
}

pub async fn get_item(state: &AppState, part_id: &str) -> AppResult<ApiResponse<CatalogueItem>> {
    let item = state
        .store
        .find::<CatalogueItem>(part_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Part", item, None))
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::bad_request("Price must be a non-negative number"));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCatalogueItemRequest,
) -> AppResult<ApiResponse<CatalogueItem>> {
    ensure_admin(user)?;
    let part_id = payload.part_id.trim();
    let name = payload.name.trim();
    if part_id.is_empty() || name.is_empty() {
        return Err(AppError::bad_request("Part ID and name are required"));
    }
    validate_price(payload.price)?;

    let item = CatalogueItem {
        part_id: part_id.to_string(),
        name: name.to_string(),
        category: payload.category.trim().to_string(),
        price: payload.price,
        stock: payload.stock,
        description: payload.description.trim().to_string(),
        image: non_empty(payload.image),
    };

    let mut catalogue = state.store.lock::<CatalogueItem>().await?;
    if catalogue.contains(part_id) {
        return Err(AppError::bad_request(format!("Part {part_id} already exists")));
    }
    catalogue.items.push(item.clone());
    catalogue.commit().await?;

    tracing::info!(user_id = user.user_id, part_id = %item.part_id, "catalogue item created");
    Ok(ApiResponse::success("Part created", item, Some(Meta::empty())))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    part_id: &str,
    payload: UpdateCatalogueItemRequest,
) -> AppResult<ApiResponse<CatalogueItem>> {
    ensure_admin(user)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::bad_request("Name cannot be empty"));
    }

    let mut catalogue = state.store.lock::<CatalogueItem>().await?;
    let item = catalogue.get_mut(part_id).ok_or(AppError::NotFound)?;
    if let Some(name) = payload.name {
        item.name = name.trim().to_string();
    }
    if let Some(category) = payload.category {
        item.category = category.trim().to_string();
    }
    if let Some(price) = payload.price {
        item.price = price;
    }
    if let Some(stock) = payload.stock {
        item.stock = stock;
    }
    if let Some(description) = payload.description {
        item.description = description.trim().to_string();
    }
    if payload.image.is_some() {
        item.image = non_empty(payload.image);
    }
    let item = item.clone();
    catalogue.commit().await?;

    tracing::info!(user_id = user.user_id, part_id = %item.part_id, "catalogue item updated");
    Ok(ApiResponse::success("Part updated", item, Some(Meta::empty())))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    part_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if !state.store.remove::<CatalogueItem>(part_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = user.user_id, part_id = %part_id, "catalogue item deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn export_catalogue(state: &AppState, user: &AuthUser) -> AppResult<String> {
    ensure_admin(user)?;
    let items = state.store.load::<CatalogueItem>().await?;
    tracing::info!(user_id = user.user_id, parts = items.len(), "catalogue exported");
    Ok(export_csv(&items))
}

/// xlsx is a zip container, legacy xls an OLE compound file.
const WORKBOOK_SIGNATURES: [&[u8]; 2] = [b"PK\x03\x04", b"\xD0\xCF\x11\xE0"];

/// Spreadsheet uploads are recognised by content type or file signature.
fn is_spreadsheet(content_type: Option<&str>, body: &[u8]) -> bool {
    let by_type = content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.contains("spreadsheet") || ct.contains("excel")
    });
    by_type || WORKBOOK_SIGNATURES.iter().any(|sig| body.starts_with(sig))
}

/// Upserts CSV rows by part id. Workbooks stop at this boundary: there is no spreadsheet
/// reader behind it, so they are refused before any parsing.
pub async fn import_catalogue(
    state: &AppState,
    user: &AuthUser,
    content_type: Option<&str>,
    body: &[u8],
) -> AppResult<ApiResponse<ImportSummary>> {
    ensure_admin(user)?;
    if is_spreadsheet(content_type, body) {
        tracing::warn!(
            user_id = user.user_id,
            bytes = body.len(),
            "spreadsheet upload refused"
        );
        return Err(AppError::bad_request(
            "Spreadsheet import is not supported, upload a CSV file",
        ));
    }
    let body = std::str::from_utf8(body)
        .map_err(|_| AppError::bad_request("Import file must be UTF-8 encoded CSV"))?;
    if body.trim().is_empty() {
        return Err(AppError::bad_request("No file uploaded"));
    }

    let ParsedImport { items, skipped } = items_from_csv(body);
    let mut summary = ImportSummary {
        created: 0,
        updated: 0,
        skipped,
    };

    let mut catalogue = state.store.lock::<CatalogueItem>().await?;
    for item in items {
        match catalogue.get_mut(&item.part_id) {
            Some(existing) => {
                *existing = item;
                summary.updated += 1;
            }
            None => {
                catalogue.items.push(item);
                summary.created += 1;
            }
        }
    }
    if summary.created + summary.updated > 0 {
        catalogue.commit().await?;
    }

    tracing::info!(
        user_id = user.user_id,
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        "catalogue imported"
    );
    let message = format!(
        "Imported {} new and {} updated part(s)",
        summary.created, summary.updated
    );
    Ok(ApiResponse::success(message, summary, Some(Meta::empty())))
}
