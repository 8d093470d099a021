//! CRUD handlers for `/api/objects`
//!
//! Documents are always replaced as a whole. A body that fails to parse
//! never touches the store.

use crate::error::ApiError;
use crate::http::{build_empty_response, build_json_response, HttpResponse};
use crate::logger::Logger;
use crate::store::{identifier_of, Document, ObjectStore};
use hyper::StatusCode;

/// `GET /api/objects`
pub async fn list_objects(store: &ObjectStore, logger: &Logger) -> HttpResponse {
    logger.info("GET list");
    let objects = store.list().await;
    build_json_response(StatusCode::OK, &objects)
}

/// `POST /api/objects`
///
/// The identifier comes from the `id`, `Id` or `ID` key. An existing entry
/// with the same identifier is overwritten.
pub async fn create_object(
    body: &[u8],
    store: &ObjectStore,
    logger: &Logger,
) -> Result<HttpResponse, ApiError> {
    logger.info("POST");
    let document = parse_document(body, logger)?;

    let Some(id) = identifier_of(&document) else {
        logger.warn("Bad request - POST to /api/objects without id field");
        return Err(ApiError::MissingIdentifier);
    };

    if store.contains(&id).await {
        logger.info(&format!("Object exists. Allowing to overwrite: {id}"));
    }

    logger.info(&format!("Creating object {id}"));
    logger.debug(&format!("New data for {id}: {}", render(&document)));
    store.put(id, document.clone()).await;

    Ok(build_json_response(StatusCode::OK, &document))
}

/// `GET /api/objects/{id}`
pub async fn get_object(
    id: &str,
    store: &ObjectStore,
    logger: &Logger,
) -> Result<HttpResponse, ApiError> {
    let document = store
        .get(id)
        .await
        .ok_or_else(|| ApiError::ObjectNotFound(id.to_string()))?;

    logger.info("Returning object.");
    Ok(build_json_response(StatusCode::OK, &document))
}

/// `PUT /api/objects/{id}`: upsert
pub async fn update_object(
    id: &str,
    body: &[u8],
    store: &ObjectStore,
    logger: &Logger,
) -> Result<HttpResponse, ApiError> {
    logger.info("PUT");
    let document = parse_document(body, logger)?;

    logger.info(&format!("Overwriting {id}"));
    logger.debug(&format!("New data for {id}: {}", render(&document)));
    store.put(id, document.clone()).await;

    Ok(build_json_response(StatusCode::OK, &document))
}

/// `DELETE /api/objects/{id}`: missing ids are not an error
pub async fn delete_object(id: &str, store: &ObjectStore, logger: &Logger) -> HttpResponse {
    logger.info("DELETE");
    store.remove(id).await;
    build_empty_response(StatusCode::OK)
}

fn parse_document(body: &[u8], logger: &Logger) -> Result<Document, ApiError> {
    logger.debug(&format!(
        "data sent - unmarshalling from JSON: {}",
        String::from_utf8_lossy(body)
    ));

    serde_json::from_slice::<Document>(body).map_err(|e| {
        logger.error(&format!("Unmarshal of request failed: {e}"));
        logger.error(&format!(
            "BEGIN passed data:\n{}\nEND passed data.",
            String::from_utf8_lossy(body)
        ));
        ApiError::MalformedPayload(e)
    })
}

fn render(document: &Document) -> String {
    serde_json::to_string(document).unwrap_or_default()
}
