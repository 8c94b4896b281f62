pub mod helper;
pub mod telemetry;
