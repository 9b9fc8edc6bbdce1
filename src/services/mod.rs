pub mod alert_monitor;
pub mod alert_store;
pub mod market;
pub mod push;
