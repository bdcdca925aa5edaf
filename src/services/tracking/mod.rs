pub mod alert_trigger;
pub mod foreground;
pub mod location_monitor;
pub mod permission_gate;
pub mod tracking_service;
