pub mod errors;
pub mod webhook_flow_api;
