//! Domain model types.

mod diagnostics;
mod rate;
mod settings;

pub use diagnostics::RefreshFailure;
pub use rate::RateRecord;
pub use settings::{ConverterSettings, OperatingMode, RestDayOverride, ScheduleConfig};
