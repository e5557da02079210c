//! # Voucher payment gateway server
//! This crate hosts the HTTP surface of the voucher payment gateway. It is responsible for:
//! Listening for incoming webhook deliveries from Stripe.
//! Verifying each delivery's `Stripe-Signature` header against the webhook signing secret.
//! Dispatching verified events to the payment engine, which applies the database mutations.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/webhooks/stripe`: The webhook route for receiving payment events from Stripe.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
