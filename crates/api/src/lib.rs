//! HTTP host for the invoice dashboard: login, session guard, invoice forms.

pub mod app;
pub mod context;
pub mod middleware;
