//! Book catalog service.
//!
//! The catalog is shared: every authenticated caller sees and edits the same
//! books. The caller is still passed in so that every change is attributable
//! in the logs.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Book, BookDraft, CurrentUser};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookService: Send + Sync {
    async fn list(&self, caller: &CurrentUser) -> AppResult<Vec<Book>>;

    async fn get(&self, caller: &CurrentUser, id: Uuid) -> AppResult<Book>;

    async fn create(&self, caller: &CurrentUser, draft: BookDraft) -> AppResult<Book>;

    /// Full replacement of title, author, description and year.
    async fn update(&self, caller: &CurrentUser, id: Uuid, draft: BookDraft) -> AppResult<Book>;

    async fn delete(&self, caller: &CurrentUser, id: Uuid) -> AppResult<()>;
}

pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Trim the required text fields before they are checked and stored.
fn tidy(mut draft: BookDraft) -> BookDraft {
    draft.title = draft.title.trim().to_string();
    draft.author = draft.author.trim().to_string();
    draft
}

#[async_trait]
impl<U: UnitOfWork> BookService for Catalog<U> {
    async fn list(&self, _caller: &CurrentUser) -> AppResult<Vec<Book>> {
        self.uow.books().list().await
    }

    async fn get(&self, _caller: &CurrentUser, id: Uuid) -> AppResult<Book> {
        self.uow.books().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create(&self, caller: &CurrentUser, draft: BookDraft) -> AppResult<Book> {
        let draft = tidy(draft);
        draft.validate()?;

        let book = self.uow.books().create(draft).await?;
        tracing::info!(book_id = %book.id, user_id = %caller.id, "Book created");
        Ok(book)
    }

    async fn update(&self, caller: &CurrentUser, id: Uuid, draft: BookDraft) -> AppResult<Book> {
        let draft = tidy(draft);
        draft.validate()?;

        let book = self.uow.books().update(id, draft).await?;
        tracing::info!(book_id = %book.id, user_id = %caller.id, "Book updated");
        Ok(book)
    }

    async fn delete(&self, caller: &CurrentUser, id: Uuid) -> AppResult<()> {
        self.uow.books().delete(id).await?;
        tracing::info!(book_id = %id, user_id = %caller.id, "Book deleted");
        Ok(())
    }
}
