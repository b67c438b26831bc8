//! API route handlers

pub mod assessment;
pub mod events;
pub mod health;
pub mod report;
pub mod ui;
pub mod vitals;
pub mod xray;

pub use assessment::assessment_routes;
pub use events::event_stream;
pub use health::health_routes;
pub use report::report_routes;
pub use ui::ui_routes;
pub use vitals::vitals_routes;
pub use xray::xray_routes;
