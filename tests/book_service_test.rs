//! Book catalog operations over the in-memory ports.

mod common;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use book_catalog::domain::{BookDraft, CurrentUser};
use book_catalog::errors::AppError;
use book_catalog::services::ServiceContainer;

use common::TestApp;

fn caller() -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        email: "reader@x.com".to_string(),
    }
}

fn draft(title: &str, year: Option<i32>) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: "Ursula K. Le Guin".to_string(),
        description: Some("Winter".to_string()),
        year,
    }
}

#[tokio::test]
async fn test_create_then_read_back() {
    let app = TestApp::new();
    let books = app.services.books();
    let me = caller();

    let created = books
        .create(&me, draft("  The Left Hand of Darkness ", Some(1969)))
        .await
        .unwrap();
    assert_eq!(created.title, "The Left Hand of Darkness");

    let fetched = books.get(&me, created.id).await.unwrap();
    assert_eq!(fetched, created);

    let listed = books.list(&me).await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = TestApp::new();
    let books = app.services.books();
    let me = caller();

    let first = books.create(&me, draft("First", None)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = books.create(&me, draft("Second", None)).await.unwrap();

    let ids: Vec<Uuid> = books.list(&me).await.unwrap().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_update_replaces_every_field() {
    let app = TestApp::new();
    let books = app.services.books();
    let me = caller();

    let book = books.create(&me, draft("Old", Some(1969))).await.unwrap();
    let updated = books
        .update(
            &me,
            book.id,
            BookDraft {
                title: "New".to_string(),
                author: "Someone Else".to_string(),
                description: None,
                year: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "New");
    assert_eq!(updated.author, "Someone Else");
    assert_eq!(updated.description, None);
    assert_eq!(updated.year, None);
}

#[tokio::test]
async fn test_invalid_drafts_are_rejected() {
    let app = TestApp::new();
    let books = app.services.books();
    let me = caller();
    let next_year = Utc::now().year() + 1;

    let err = books.create(&me, draft("", None)).await.unwrap_err();
    assert!(err.is_validation_on("title"));

    let err = books.create(&me, draft("T", Some(999))).await.unwrap_err();
    assert!(err.is_validation_on("year"));

    let err = books.create(&me, draft("T", Some(next_year))).await.unwrap_err();
    assert!(err.is_validation_on("year"));

    let err = books
        .create(&me, draft(&"x".repeat(256), None))
        .await
        .unwrap_err();
    assert!(err.is_validation_on("title"));

    assert!(books.list(&me).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let app = TestApp::new();
    let books = app.services.books();
    let me = caller();
    let missing = Uuid::new_v4();

    assert!(matches!(books.get(&me, missing).await, Err(AppError::NotFound)));
    assert!(matches!(
        books.update(&me, missing, draft("T", None)).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(books.delete(&me, missing).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_delete_twice() {
    let app = TestApp::new();
    let books = app.services.books();
    let me = caller();

    let book = books.create(&me, draft("Gone", None)).await.unwrap();
    books.delete(&me, book.id).await.unwrap();

    let err = books.delete(&me, book.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}
