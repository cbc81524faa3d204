//! Book repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::book::{self, ActiveModel, Entity as BookEntity};
use crate::domain::{Book, BookDraft};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Book repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, newest first
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    async fn create(&self, draft: BookDraft) -> AppResult<Book>;

    /// Replace every editable field. `NotFound` for an unknown id.
    async fn update(&self, id: Uuid, draft: BookDraft) -> AppResult<Book>;

    /// Hard delete. `NotFound` when nothing was removed.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of BookRepository
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for BookStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let models = BookEntity::find()
            .order_by_desc(book::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let result = BookEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Book::from))
    }

    async fn create(&self, draft: BookDraft) -> AppResult<Book> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(draft.title),
            author: Set(draft.author),
            description: Set(draft.description),
            year: Set(draft.year),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Book::from(model))
    }

    async fn update(&self, id: Uuid, draft: BookDraft) -> AppResult<Book> {
        let book = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = book.into();
        active.title = Set(draft.title);
        active.author = Set(draft.author);
        active.description = Set(draft.description);
        active.year = Set(draft.year);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Book::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = BookEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
