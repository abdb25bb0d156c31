// Domain layer - Records exchanged with the diagnostic API
pub mod calendar;
pub mod chart;
pub mod device;
pub mod equipment;
pub mod page;
pub mod status;
