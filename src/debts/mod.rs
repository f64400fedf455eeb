//! Debt tracking module

pub mod export;
pub mod model;
pub mod rules;
pub mod service;
pub mod summary;

pub use export::ExportService;
pub use model::{
    CreateDebtRequest, DebtQuery, ExportFormat, ExportRequest, ExportResult, ExportStats,
    UpdateDebtRequest,
};
pub use service::DebtService;
