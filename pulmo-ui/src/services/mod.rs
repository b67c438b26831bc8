//! External model clients and the simulated vitals stream

pub mod report_client;
pub mod simulator;
pub mod vitals_model;
pub mod xray_model;

pub use report_client::ReportClient;
pub use simulator::{Scenario, VitalsSimulator};
pub use vitals_model::{VitalsAnalysis, VitalsModelClient};
pub use xray_model::{XrayAnalysis, XrayModelClient};
