pub mod app_error;
pub mod config;
pub mod sms_client;
pub mod validated_query;
