//! In-memory implementations of the ports, shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use book_catalog::api::{create_router, AppState};
use book_catalog::config::Config;
use book_catalog::domain::{Book, BookDraft, DomainEvent, NewUser, OtpRecord, User};
use book_catalog::errors::{AppError, AppResult};
use book_catalog::infra::sessions::generate_session_id;
use book_catalog::infra::{
    BookRepository, EventSink, MailError, Mailer, OtpRepository, SessionData, SessionStore,
    UnitOfWork, UserRepository,
};
use book_catalog::services::Services;

pub const PASSWORD: &str = "SecurePass123!";

pub fn test_config() -> Config {
    Config::with_jwt_secret("integration-test-secret-at-least-32-chars")
}

// =============================================================================
// Persistence
// =============================================================================

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    otps: Vec<OtpRecord>,
    books: Vec<Book>,
}

/// Unit of work over plain vectors. Every repository handed out shares the
/// same tables.
#[derive(Clone, Default)]
pub struct InMemoryUow {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryUow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn otps_for(&self, email: &str) -> Vec<OtpRecord> {
        let tables = self.tables.lock().unwrap();
        tables
            .otps
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    /// Shift a record's creation and expiry into the past.
    pub fn age_otp(&self, email: &str, by: Duration) {
        let mut tables = self.tables.lock().unwrap();
        for record in tables.otps.iter_mut().filter(|r| r.email == email) {
            record.created_at -= by;
            record.expires_at -= by;
        }
    }

    /// Insert a user directly, bypassing registration.
    pub fn seed_user(&self, user: User) {
        self.tables.lock().unwrap().users.push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUow {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.user(email))
    }

    async fn update_name(&self, id: Uuid, name: String) -> AppResult<User> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;
        user.name = name;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl OtpRepository for InMemoryUow {
    async fn replace_for_email(&self, record: OtpRecord) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.otps.retain(|r| r.email != record.email);
        tables.otps.push(record);
        Ok(())
    }

    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<OtpRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .otps
            .iter()
            .filter(|r| r.accepts(email, code, now))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn find_verified_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Option<OtpRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .otps
            .iter()
            .filter(|r| r.email == email && r.is_verified_since(since))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .otps
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound)?;
        record.is_verified = true;
        Ok(())
    }
}

#[async_trait]
impl BookRepository for InMemoryUow {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.lock().unwrap();
        let mut books = tables.books.clone();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, draft: BookDraft) -> AppResult<Book> {
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: draft.title,
            author: draft.author,
            description: draft.description,
            year: draft.year,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, draft: BookDraft) -> AppResult<Book> {
        let mut tables = self.tables.lock().unwrap();
        let book = tables
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(AppError::NotFound)?;
        book.title = draft.title;
        book.author = draft.author;
        book.description = draft.description;
        book.year = draft.year;
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        if tables.books.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn otps(&self) -> Arc<dyn OtpRepository> {
        Arc::new(self.clone())
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        Arc::new(self.clone())
    }

    async fn create_user(&self, new_user: NewUser, consumed_otp: Option<Uuid>) -> AppResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            email_verified_at: new_user.email_verified_at,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());

        if let Some(id) = consumed_otp {
            tables.otps.retain(|r| r.id != id);
        }

        Ok(user)
    }
}

// =============================================================================
// Mail, sessions, events
// =============================================================================

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Code from the most recent OTP mail sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .filter(|m| m.to == email)
            .find_map(|m| {
                m.body
                    .split_whitespace()
                    .find(|word| word.len() == 6 && word.bytes().all(|b| b.is_ascii_digit()))
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            let err = "unreachable relay"
                .parse::<lettre::Address>()
                .expect_err("not an address");
            return Err(MailError::Address(err));
        }

        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, SessionData>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn create(&self, data: SessionData, _lifetime_secs: u64) -> AppResult<String> {
        let id = generate_session_id();
        self.sessions.lock().unwrap().insert(id.clone(), data);
        Ok(id)
    }

    async fn find(&self, session_id: &str) -> AppResult<Option<SessionData>> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn destroy(&self, session_id: &str) -> AppResult<()> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingEvents {
    async fn emit(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// Real services on top of the in-memory ports.
pub struct TestApp {
    pub uow: Arc<InMemoryUow>,
    pub mailer: Arc<RecordingMailer>,
    pub sessions: Arc<InMemorySessions>,
    pub events: Arc<RecordingEvents>,
    pub services: Services,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let uow = Arc::new(InMemoryUow::new());
        let mailer = Arc::new(RecordingMailer::new());
        let sessions = Arc::new(InMemorySessions::new());
        let events = Arc::new(RecordingEvents::default());
        let config = test_config();

        let services = Services::from_parts(
            uow.clone(),
            sessions.clone(),
            mailer.clone(),
            events.clone(),
            config.clone(),
        );

        Self {
            uow,
            mailer,
            sessions,
            events,
            services,
            config,
        }
    }

    pub fn router(&self) -> Router {
        create_router(AppState::new(&self.services, &self.config))
    }
}
