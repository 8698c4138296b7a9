//! In-memory mock implementations of the collaborator traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        clock::Clock,
        use_cases::{
            email_verification::ResendCooldownStore,
            user::{EmailSender, UserRepo},
        },
    },
    domain::entities::user::User,
};

// ============================================================================
// FixedClock
// ============================================================================

/// Manually advanced clock.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

/// In-memory implementation of UserRepo for testing.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
    verify_writes: Mutex<usize>,
    fail_next_write: Mutex<bool>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
            ..Default::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    /// Number of `set_email_verified` calls that changed a row.
    pub fn verify_writes(&self) -> usize {
        *self.verify_writes.lock().unwrap()
    }

    /// Make the next `set_email_verified` call fail with a database error.
    pub fn fail_next_write(&self) {
        *self.fail_next_write.lock().unwrap() = true;
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn set_email_verified(&self, id: Uuid, at: NaiveDateTime) -> AppResult<bool> {
        if std::mem::take(&mut *self.fail_next_write.lock().unwrap()) {
            return Err(AppError::Database("connection reset".into()));
        }

        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) if user.email_verified_at.is_none() => {
                user.email_verified_at = Some(at);
                *self.verify_writes.lock().unwrap() += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            email_verified_at: None,
            created_at: Some(Utc::now().naive_utc()),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.users.lock().unwrap().remove(&id);
        Ok(())
    }
}

// ============================================================================
// InMemoryEmailSender
// ============================================================================

#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records sent emails instead of delivering them.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<CapturedEmail>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send with `message` until `succeed` is called.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn captured_emails(&self) -> Vec<CapturedEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Token carried by the most recent verification link.
    pub fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let html = &sent.last()?.html;
        let start = html.find("token=")? + "token=".len();
        Some(
            html[start..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect(),
        )
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(AppError::EmailDelivery(message));
        }
        self.sent.lock().unwrap().push(CapturedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// InMemoryCooldownStore
// ============================================================================

/// Cooldown store with expiry driven by a `Clock`.
pub struct InMemoryCooldownStore {
    clock: Arc<dyn Clock>,
    until: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryCooldownStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            until: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ResendCooldownStore for InMemoryCooldownStore {
    async fn try_acquire(&self, email: &str, cooldown_secs: u64) -> AppResult<Option<u64>> {
        let now = self.clock.now();
        let mut until = self.until.lock().unwrap();
        if let Some(end) = until.get(email).filter(|end| **end > now) {
            return Ok(Some((*end - now).num_seconds().max(1) as u64));
        }
        until.insert(
            email.to_string(),
            now + Duration::seconds(cooldown_secs as i64),
        );
        Ok(None)
    }

    async fn release(&self, email: &str) -> AppResult<()> {
        self.until.lock().unwrap().remove(email);
        Ok(())
    }
}
