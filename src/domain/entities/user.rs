use chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Set once when a verification token is accepted. Never cleared.
    pub email_verified_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Name used to greet the user in emails.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "User" } else { name }
    }
}
