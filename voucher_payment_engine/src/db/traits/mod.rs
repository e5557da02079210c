mod payment_webhook_database;

pub use payment_webhook_database::PaymentWebhookDatabase;
