// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email-uniqueness reservations (keyed by url-encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    /// Sessions (keyed by token hash)
    pub const SESSIONS: &str = "sessions";
    pub const WALLET_DOCS: &str = "wallet_docs";
    pub const THEMES: &str = "themes";
    pub const ASK_LOGS: &str = "ask_logs";
}
