use std::env;

use chrono::Duration;
use log::*;
use vpg_common::Secret;

use crate::errors::ServerError;

const DEFAULT_VPG_HOST: &str = "127.0.0.1";
const DEFAULT_VPG_PORT: u16 = 4800;
/// Stripe rejects signatures older than 5 minutes by default; we follow the same tolerance.
const DEFAULT_SIGNATURE_TOLERANCE: Duration = Duration::seconds(300);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Stripe credentials and webhook verification settings.
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_VPG_HOST.to_string(),
            port: DEFAULT_VPG_PORT,
            database_url: String::default(),
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("VPG_HOST").ok().unwrap_or_else(|| DEFAULT_VPG_HOST.into());
        let port = env::var("VPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for VPG_PORT. {e} Using the default, {DEFAULT_VPG_PORT}, instead."
                    );
                    DEFAULT_VPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_VPG_PORT);
        let database_url = voucher_payment_engine::db_url();
        let stripe = StripeConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🚨️ Could not load the Stripe configuration from environment variables. {e}. The server will run, \
                 but every webhook delivery will fail signature verification until the secrets are set. 🚨️"
            );
            StripeConfig::default()
        });
        Self { host, port, database_url, stripe }
    }
}

//-------------------------------------------------  StripeConfig  ----------------------------------------------------
#[derive(Clone, Debug)]
pub struct StripeConfig {
    /// The account API secret. It is not used to verify webhooks, but outbound processor calls need it, so its
    /// absence is treated as a configuration failure at startup.
    pub secret_key: Secret<String>,
    /// The webhook endpoint signing secret (`whsec_...`) used to verify the `Stripe-Signature` header.
    pub webhook_secret: Secret<String>,
    /// How far a signature's timestamp may lie from the server clock before the delivery is rejected as stale.
    pub signature_tolerance: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: Secret::default(),
            webhook_secret: Secret::default(),
            signature_tolerance: DEFAULT_SIGNATURE_TOLERANCE,
        }
    }
}

impl StripeConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret_key = env::var("VPG_STRIPE_SECRET_KEY")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [VPG_STRIPE_SECRET_KEY]")))?;
        let webhook_secret = env::var("VPG_STRIPE_WEBHOOK_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [VPG_STRIPE_WEBHOOK_SECRET]")))?;
        let signature_tolerance = env::var("VPG_STRIPE_SIGNATURE_TOLERANCE")
            .map_err(|_| {
                info!(
                    "🪛️ VPG_STRIPE_SIGNATURE_TOLERANCE is not set. Using the default value of {} seconds.",
                    DEFAULT_SIGNATURE_TOLERANCE.num_seconds()
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::seconds)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for VPG_STRIPE_SIGNATURE_TOLERANCE. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_SIGNATURE_TOLERANCE);
        Ok(Self {
            secret_key: Secret::new(secret_key),
            webhook_secret: Secret::new(webhook_secret),
            signature_tolerance,
        })
    }
}
