// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod ask;
pub mod theme;
pub mod user;
pub mod wallet;

pub use ask::AskLog;
pub use theme::Theme;
pub use user::{EmailReservation, Session, User};
pub use wallet::WalletDocument;
