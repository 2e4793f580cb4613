// Domain layer - Telemetry samples, plot series and trend signals
pub mod sample;
pub mod series;
pub mod trend;
