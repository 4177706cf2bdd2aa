//! Lead capture: validation, submission and the in-flight guard.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{BackendClient, BackendError};
use crate::listings::ListingKind;

/// Payload appended to the `/leads` collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<ListingKind>,
    pub timestamp: DateTime<Utc>,
}

impl LeadRequest {
    /// Build a lead stamped with the current time. Blank search terms are
    /// dropped.
    pub fn new(email: &str, search_term: Option<&str>, filter_type: Option<ListingKind>) -> Self {
        Self {
            email: email.trim().to_string(),
            search_term: search_term
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string),
            filter_type,
            timestamp: Utc::now(),
        }
    }
}

/// How strictly the email field is checked before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailPolicy {
    /// Non-empty after trimming.
    #[default]
    RequiredOnly,
    /// Non-empty and shaped like `local@domain.tld`.
    RequireFormat,
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("email is required")]
    MissingEmail,

    #[error("email address is malformed")]
    InvalidEmail,

    #[error("a lead submission is already in flight")]
    InFlight,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl LeadError {
    /// Translation key of the message shown to the visitor.
    pub fn message_key(&self) -> &'static str {
        match self {
            LeadError::MissingEmail => "errors.emailRequired",
            LeadError::InvalidEmail => "errors.emailInvalid",
            LeadError::InFlight => "errors.submitInProgress",
            LeadError::Backend(_) => "errors.generic",
        }
    }

    /// Whether the error was raised before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, LeadError::MissingEmail | LeadError::InvalidEmail)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn validate_email(email: &str, policy: EmailPolicy) -> Result<(), LeadError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(LeadError::MissingEmail);
    }
    if policy == EmailPolicy::RequireFormat && !email_pattern().is_match(email) {
        return Err(LeadError::InvalidEmail);
    }
    Ok(())
}

/// Log-safe form of an email: first character of the local part only.
pub fn mask_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Lead form state for one visitor.
///
/// `begin` and `complete` bracket a submission so the submit control can be
/// disabled while a request is outstanding; `submit` runs both.
#[derive(Debug, Clone, Default)]
pub struct LeadForm {
    pub email: String,
    pub search_term: String,
    policy: EmailPolicy,
    state: SubmitState,
    error_key: Option<&'static str>,
}

impl LeadForm {
    pub fn new(policy: EmailPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn with_input(policy: EmailPolicy, email: &str, search_term: &str) -> Self {
        Self {
            email: email.to_string(),
            search_term: search_term.to_string(),
            ..Self::new(policy)
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Translation key of the current error message, if any.
    pub fn error_key(&self) -> Option<&'static str> {
        self.error_key
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state != SubmitState::InFlight
    }

    /// Validate the input and move to `InFlight`.
    ///
    /// Validation failures and a second call while in flight return an error
    /// without producing a request.
    pub fn begin(&mut self, filter_type: Option<ListingKind>) -> Result<LeadRequest, LeadError> {
        if self.state == SubmitState::InFlight {
            return Err(LeadError::InFlight);
        }
        if let Err(e) = validate_email(&self.email, self.policy) {
            self.error_key = Some(e.message_key());
            return Err(e);
        }

        self.state = SubmitState::InFlight;
        self.error_key = None;
        Ok(LeadRequest::new(
            &self.email,
            Some(self.search_term.as_str()),
            filter_type,
        ))
    }

    /// Record the outcome of the request started by `begin`.
    pub fn complete(&mut self, outcome: Result<(), BackendError>) -> Result<(), LeadError> {
        match outcome {
            Ok(()) => {
                self.state = SubmitState::Succeeded;
                self.error_key = None;
                Ok(())
            }
            Err(e) => {
                self.state = SubmitState::Failed;
                self.error_key = Some("errors.generic");
                Err(LeadError::Backend(e))
            }
        }
    }

    /// Validate, send and record the outcome.
    pub async fn submit(
        &mut self,
        backend: &BackendClient,
        filter_type: Option<ListingKind>,
    ) -> Result<LeadRequest, LeadError> {
        let lead = self.begin(filter_type)?;
        let outcome = backend.submit_lead(&lead).await;

        match &outcome {
            Ok(()) => info!(
                "Lead captured for {} (type: {})",
                mask_email(&lead.email),
                lead.filter_type.map(|k| k.as_str()).unwrap_or("none")
            ),
            Err(e) => warn!("Lead submission for {} failed: {}", mask_email(&lead.email), e),
        }

        self.complete(outcome).map(|()| lead)
    }
}

/// Emails with a submission outstanding, shared across requests.
///
/// A repeated POST for the same address while the first is still being sent
/// is turned away instead of producing a second lead.
#[derive(Debug, Clone, Default)]
pub struct PendingLeads {
    emails: Arc<Mutex<HashSet<String>>>,
}

/// Held for the duration of one submission; releases the email on drop.
#[derive(Debug)]
pub struct PendingGuard {
    emails: Arc<Mutex<HashSet<String>>>,
    key: Option<String>,
}

impl PendingLeads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `email` for one submission.
    ///
    /// Blank emails are not tracked; they fail validation without a request.
    pub fn claim(&self, email: &str) -> Result<PendingGuard, LeadError> {
        let key = email.trim().to_lowercase();
        if key.is_empty() {
            return Ok(PendingGuard {
                emails: Arc::clone(&self.emails),
                key: None,
            });
        }

        let mut emails = self.emails.lock().unwrap_or_else(PoisonError::into_inner);
        if !emails.insert(key.clone()) {
            return Err(LeadError::InFlight);
        }
        Ok(PendingGuard {
            emails: Arc::clone(&self.emails),
            key: Some(key),
        })
    }

    pub fn len(&self) -> usize {
        self.emails.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.emails
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
        }
    }
}
