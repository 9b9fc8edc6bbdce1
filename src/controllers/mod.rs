pub mod alerts_controller;
pub mod push_controller;
pub mod realtime_controller;
pub mod system_controller;
