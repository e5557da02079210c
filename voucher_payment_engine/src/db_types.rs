use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct ConversionError(String);

//--------------------------------------   PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// The payment intent has been created upstream, but the processor has not settled it yet.
    Pending,
    /// The processor reported a successful capture.
    Completed,
    /// The processor reported a failed payment attempt.
    Failed,
    /// The captured charge has been (fully or partially) refunded.
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status in database: {value}. Defaulting to pending.");
            PaymentStatus::Pending
        })
    }
}

//--------------------------------------   VoucherStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    /// The voucher can be redeemed against its week/property inventory unit.
    Active,
    /// The voucher has been redeemed. Redemption happens elsewhere; the webhook engine never sets this.
    Redeemed,
    /// The voucher has lapsed. Expiry happens elsewhere; the webhook engine never sets this.
    Expired,
}

impl Display for VoucherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoucherStatus::Active => write!(f, "active"),
            VoucherStatus::Redeemed => write!(f, "redeemed"),
            VoucherStatus::Expired => write!(f, "expired"),
        }
    }
}

//--------------------------------------      Payment        ---------------------------------------------------------
/// A single fiat payment attempt, keyed by the processor-assigned payment intent id and, once captured, separately
/// queryable by the charge id for refund correlation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub stripe_payment_intent_id: String,
    pub stripe_charge_id: Option<String>,
    pub user_wallet: String,
    pub week_id: Option<String>,
    pub property_id: Option<String>,
    /// The paid amount in major units, recorded when the payment intent was created upstream.
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    /// Free-form JSON blob. The failure handler writes `{"error_message": ...}` here.
    pub metadata: Option<String>,
    pub refund_amount: Option<f64>,
    pub voucher_id: Option<i64>,
    pub succeeded_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// The error message recorded by the failure handler, if one has been stored in the metadata blob.
    pub fn error_message(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| serde_json::from_str::<serde_json::Value>(m).ok())
            .and_then(|v| v.get("error_message").and_then(|m| m.as_str()).map(String::from))
    }
}

impl Display for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Payment #{} [{}] ({} {})", self.id, self.stripe_payment_intent_id, self.amount, self.currency)
    }
}

//--------------------------------------     NewPayment      ---------------------------------------------------------
/// The subset of payment fields supplied by the upstream checkout flow when a pending record is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub stripe_payment_intent_id: String,
    pub stripe_charge_id: Option<String>,
    pub user_wallet: String,
    pub week_id: Option<String>,
    pub property_id: Option<String>,
    pub amount: f64,
    pub currency: String,
}

//--------------------------------------      Voucher        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Voucher {
    pub id: i64,
    pub user_id: String,
    pub week_id: String,
    pub property_id: String,
    pub voucher_code: String,
    pub amount_paid: f64,
    pub payment_method: String,
    pub status: VoucherStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoucher {
    pub user_id: String,
    pub week_id: String,
    pub property_id: String,
    pub voucher_code: String,
    pub amount_paid: f64,
    pub payment_method: String,
}

//--------------------------------------  PaymentConfirmation -------------------------------------------------------
/// The result of applying a `payment_intent.succeeded` event: the updated payment record, plus the voucher if this
/// event caused one to be created. Redeliveries and records without week/property inventory carry `None`.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub payment: Payment,
    pub voucher: Option<Voucher>,
}
