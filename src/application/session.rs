//! Session - per-user interactive context.
//!
//! Holds what one interactive user has entered so far and the API key they
//! supplied, so the key is resolved once and not asked for again.

use chrono::{DateTime, Utc};
use secrecy::Secret;
use uuid::Uuid;

use crate::domain::runner::UserRecord;

/// State of one interactive session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    api_key: Option<Secret<String>>,
    last_text: Option<String>,
    last_record: Option<UserRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            api_key: None,
            last_text: None,
            last_record: None,
        }
    }

    /// Caches the key for the rest of the session.
    pub fn set_api_key(&mut self, api_key: Secret<String>) {
        self.api_key = Some(api_key);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn api_key(&self) -> Option<&Secret<String>> {
        self.api_key.as_ref()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    pub fn last_record(&self) -> Option<&UserRecord> {
        self.last_record.as_ref()
    }

    /// Remembers a submission and, when extraction succeeded, its record.
    pub fn record_submission(&mut self, text: impl Into<String>, record: Option<UserRecord>) {
        self.last_text = Some(text.into());
        self.last_record = record;
    }

    /// Forgets entered data. The API key is kept.
    pub fn reset(&mut self) {
        self.last_text = None;
        self.last_record = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::runner::Gender;
    use secrecy::ExposeSecret;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert!(session.api_key().is_none());
        assert!(session.last_text().is_none());
        assert!(session.last_record().is_none());
    }

    #[test]
    fn sessions_have_distinct_ids() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn records_last_submission() {
        let mut session = Session::new();
        let record = UserRecord::new(Some(30), Some(Gender::Male), "00:25:00").unwrap();

        session.record_submission("Mam 30 lat", Some(record.clone()));

        assert_eq!(session.last_text(), Some("Mam 30 lat"));
        assert_eq!(session.last_record(), Some(&record));
    }

    #[test]
    fn failed_extraction_clears_previous_record() {
        let mut session = Session::new();
        session.record_submission("first", Some(UserRecord::unresolved()));

        session.record_submission("second", None);

        assert_eq!(session.last_text(), Some("second"));
        assert!(session.last_record().is_none());
    }

    #[test]
    fn reset_keeps_api_key() {
        let mut session = Session::new();
        session.set_api_key(Secret::new("sk-test".to_string()));
        session.record_submission("Mam 30 lat", Some(UserRecord::unresolved()));

        session.reset();

        assert!(session.last_text().is_none());
        assert!(session.last_record().is_none());
        assert_eq!(session.api_key().unwrap().expose_secret(), "sk-test");
    }
}
