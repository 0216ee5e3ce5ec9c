//! Event API endpoints

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use super::bookings;
use super::extract::{parse_id, ValidatedJson};
use crate::{
    models::{CreateEventForm, EventDto},
    utils::{validation::is_valid_image_url, AppError, AppResult},
    AppState,
};

/// Multipart part carrying the poster image
const IMAGE_FIELD: &str = "imageFile";

/// Create routes for event endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/slug/{slug}", get(get_event_by_slug))
        .merge(bookings::routes())
}

/// Create an event from a multipart form with an `imageFile` part
async fn create_event(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<EventDto>)> {
    let images = state.images.clone().ok_or_else(|| {
        AppError::ServiceUnavailable("Image uploads are not configured".to_string())
    })?;
    let mut multipart = multipart.map_err(|e| AppError::bad_request(e.body_text()))?;

    let mut form = CreateEventForm::default();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = field.bytes().await.map_err(invalid_multipart)?;
            if !bytes.is_empty() {
                image = Some((file_name, bytes.to_vec()));
            }
        } else {
            let value = field.text().await.map_err(invalid_multipart)?;
            form.set_field(&name, value);
        }
    }

    form.validate()?;
    let (file_name, bytes) =
        image.ok_or_else(|| AppError::bad_request(format!("{IMAGE_FIELD} is required")))?;

    let image_url = images
        .upload(bytes, &file_name)
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;
    if !is_valid_image_url(&image_url) {
        return Err(AppError::BadGateway(format!(
            "Image host returned an unsupported image URL: {image_url}"
        )));
    }

    let candidate = form
        .into_event(image_url)
        .map_err(|e| AppError::bad_request(e.to_string()))?;
    let event = state.events.create_event(candidate).await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

fn invalid_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
}

/// List all events
async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<EventDto>>> {
    let events = state.events.get_all_events().await?;
    Ok(Json(events.into_iter().map(EventDto::from).collect()))
}

/// Get a single event by id
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<EventDto>> {
    let id = parse_id(&id, "event")?;
    let event = state.events.get_event_by_id(id).await?;
    Ok(Json(event.into()))
}

/// Get a single event by slug
async fn get_event_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<EventDto>> {
    let event = state.events.get_event_by_slug(&slug).await?;
    Ok(Json(event.into()))
}

/// Replace the mutable fields of an event
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<EventDto>,
) -> AppResult<Json<EventDto>> {
    let id = parse_id(&id, "event")?;
    let event = state.events.update_event(id, payload.into()).await?;
    Ok(Json(event.into()))
}

/// Delete an event and its bookings
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "event")?;
    state.events.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
