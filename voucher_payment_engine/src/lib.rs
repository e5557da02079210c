//! Voucher Payment Engine
//!
//! The persistence backend for the voucher payment gateway. It is provider-agnostic: the server crate translates
//! Stripe webhook payloads into the plain identifiers and amounts that this crate works with.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db_types`] and the backend implementations). Currently SQLite is the
//!    only supported backend. You should never need to access the database directly; go through the public API.
//!    The exception is the data types used in the database, which are defined in `db_types` and are public.
//! 2. The engine public API ([`WebhookFlowApi`]). This is what the webhook handlers call. Specific backends need to
//!    implement the [`traits::PaymentWebhookDatabase`] trait in order to act as a backend for the gateway.
mod db;

pub mod db_types;
pub mod helpers;
mod vpe_api;

pub use db::traits;
#[cfg(feature = "sqlite")]
pub use db::sqlite::{db_url, SqliteDatabase, SqliteDatabaseError};
pub use vpe_api::{errors::WebhookFlowError, webhook_flow_api::WebhookFlowApi};
