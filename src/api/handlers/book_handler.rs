//! Book catalog handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::{Book, BookDraft, CurrentUser};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// List all books, newest first
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.book_service.list(&caller).await?;
    Ok(Json(books))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    JsonBody(draft): JsonBody<BookDraft>,
) -> AppResult<Created<Book>> {
    let book = state.book_service.create(&caller, draft).await?;
    Ok(Created(book))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.book_service.get(&caller, id).await?;
    Ok(Json(book))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = BookDraft,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    JsonBody(draft): JsonBody<BookDraft>,
) -> AppResult<Json<Book>> {
    let book = state.book_service.update(&caller, id, draft).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.book_service.delete(&caller, id).await?;
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
