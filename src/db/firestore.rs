// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and email reservations (sign-in identity)
//! - Sessions (bearer-token hashes with absolute expiry)
//! - Wallet documents, themes, ask logs
//!
//! Natural keys double as document IDs where uniqueness matters: sessions
//! are keyed by token hash and email reservations by the (url-encoded)
//! email, so duplicate inserts surface as create conflicts instead of
//! silent duplicate rows.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{AskLog, EmailReservation, Session, Theme, User, WalletDocument};
use crate::time_utils::now_rfc3339;
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Upper bound for list queries; the UI never pages past this.
const LIST_LIMIT: u32 = 100;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by generated ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email (the natural key for returning sign-ins).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Create a user document. Fails on a duplicate ID.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let _: User = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user document (compensation path for a lost sign-in race).
    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Reserve an email for a user with insert-if-absent semantics.
    ///
    /// Returns `None` when this caller won the reservation, or
    /// `Some(user_id)` of the winner when the email was already reserved
    /// by a concurrent sign-in.
    pub async fn reserve_user_email(
        &self,
        email: &str,
        user_id: &str,
    ) -> Result<Option<String>, AppError> {
        let doc_id = urlencoding::encode(email).into_owned();
        let reservation = EmailReservation {
            email: email.to_string(),
            user_id: user_id.to_string(),
            created_at: now_rfc3339(),
        };

        let inserted: Result<EmailReservation, firestore::errors::FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&doc_id)
            .object(&reservation)
            .execute()
            .await;

        match inserted {
            Ok(_) => Ok(None),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                let existing: Option<EmailReservation> = self
                    .get_client()?
                    .fluent()
                    .select()
                    .by_id_in(collections::USER_EMAILS)
                    .obj()
                    .one(&doc_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                existing.map(|r| Some(r.user_id)).ok_or_else(|| {
                    AppError::Database(format!("Email reservation vanished for {}", email))
                })
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Point lookup of a session by token hash (the document ID).
    pub async fn get_session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SESSIONS)
            .obj()
            .one(token_hash)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new session. Keyed by token hash, so a (vanishingly
    /// unlikely) hash collision surfaces as a create conflict.
    pub async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        let _: Session = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::SESSIONS)
            .document_id(&session.token_hash)
            .object(session)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the session matching a token hash. Idempotent: deleting a
    /// hash with no session is not an error.
    pub async fn delete_session_by_token_hash(&self, token_hash: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SESSIONS)
            .document_id(token_hash)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete all sessions whose expiry is before `now`.
    ///
    /// Used by the background reaper; the authentication gate filters
    /// expired sessions at lookup time regardless, so this only bounds
    /// storage growth. Returns the number of sessions removed.
    pub async fn delete_expired_sessions(&self, now: &str) -> Result<usize, AppError> {
        let cutoff = now.to_string();
        let expired: Vec<Session> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SESSIONS)
            .filter(move |q| q.field("expires_at").less_than(cutoff.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let client = self.get_client()?;
        let deleted: Vec<Result<(), AppError>> = stream::iter(expired)
            .map(|session| async move {
                client
                    .fluent()
                    .delete()
                    .from(collections::SESSIONS)
                    .document_id(&session.token_hash)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut count = 0;
        for result in deleted {
            match result {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!(error = %e, "Failed to delete expired session"),
            }
        }
        Ok(count)
    }

    // ─── Wallet Operations ───────────────────────────────────────

    pub async fn insert_wallet_doc(&self, doc: &WalletDocument) -> Result<(), AppError> {
        let _: WalletDocument = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::WALLET_DOCS)
            .document_id(&doc.id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List wallet documents for an owner, newest first.
    ///
    /// `None` scopes the query to ownerless (anonymously saved) documents
    /// rather than returning everything.
    pub async fn list_wallet_docs(
        &self,
        owner_id: Option<&str>,
    ) -> Result<Vec<WalletDocument>, AppError> {
        let owner = owner_id.map(|s| s.to_string());
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WALLET_DOCS)
            // Firestore expresses "no owner" as an is-null unary filter,
            // not an equality against null.
            .filter(move |q| match owner.clone() {
                Some(owner_id) => q.field("user_id").eq(owner_id),
                None => q.field("user_id").is_null(),
            })
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(LIST_LIMIT)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_wallet_doc(&self, doc_id: &str) -> Result<Option<WalletDocument>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WALLET_DOCS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn delete_wallet_doc(&self, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WALLET_DOCS)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Theme Operations ────────────────────────────────────────

    pub async fn insert_theme(&self, theme: &Theme) -> Result<(), AppError> {
        let _: Theme = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::THEMES)
            .document_id(&theme.id)
            .object(theme)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List published themes for a scope, owner-scoped.
    ///
    /// Themes only ever hold status "published" or "deleted", so the
    /// filter is an equality on "published" rather than a not-equal.
    pub async fn list_themes(
        &self,
        owner_id: Option<&str>,
        scope: &str,
    ) -> Result<Vec<Theme>, AppError> {
        let owner = owner_id.map(|s| s.to_string());
        let scope = scope.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::THEMES)
            .filter(move |q| {
                let owner_term = match owner.clone() {
                    Some(owner_id) => q.field("owner_id").eq(owner_id),
                    None => q.field("owner_id").is_null(),
                };
                q.for_all([
                    q.field("scope").eq(scope.clone()),
                    q.field("status").eq(crate::models::theme::STATUS_PUBLISHED),
                    owner_term,
                ])
            })
            .limit(LIST_LIMIT)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_theme(&self, theme_id: &str) -> Result<Option<Theme>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::THEMES)
            .obj()
            .one(theme_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite a theme document (upsert). Ownership checks happen in
    /// the route layer before calling this.
    pub async fn update_theme(&self, theme: &Theme) -> Result<(), AppError> {
        let _: Theme = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::THEMES)
            .document_id(&theme.id)
            .object(theme)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Ask Log Operations ──────────────────────────────────────

    pub async fn insert_ask_log(&self, log: &AskLog) -> Result<(), AppError> {
        let _: AskLog = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::ASK_LOGS)
            .document_id(&log.id)
            .object(log)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
