//! UI layer for the dashboard: app shell and panels.

pub mod app;
mod panels;

pub use app::DashboardApp;
