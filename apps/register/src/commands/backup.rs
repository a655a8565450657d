//! # Backup and Export Commands
//!
//! ```text
//! export_sales_csv(today) ──► sales_YYYY-MM-DD.csv           (NO_HISTORY if empty)
//! export_backup(today)    ──► cashier_backup_YYYY-MM-DD.json
//! import_backup(text)     ──► settings / products / sales replaced
//!                             (IMPORT_PARSE_FAILURE: nothing changed)
//! ```
//!
//! Commands return the file contents; writing them somewhere is up to the
//! front end.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ImportSummary, RegisterState};

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    /// Suggested file name
    pub file_name: String,
    pub contents: String,
}

/// Import counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub products: usize,
    pub sales: usize,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        ImportResponse {
            products: summary.products,
            sales: summary.sales,
        }
    }
}

pub fn sales_csv_file_name(date: NaiveDate) -> String {
    format!("sales_{}.csv", date.format("%Y-%m-%d"))
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("cashier_backup_{}.json", date.format("%Y-%m-%d"))
}

/// CSV of every sale line. Refused when there is no history.
pub async fn export_sales_csv(state: &RegisterState, today: NaiveDate) -> Result<ExportFile, ApiError> {
    debug!("export_sales_csv command");
    let register = state.lock().await;
    if register.ledger().is_empty() {
        return Err(ApiError::no_history());
    }

    let file = ExportFile {
        file_name: sales_csv_file_name(today),
        contents: register.sales_csv(),
    };
    info!(file_name = %file.file_name, sales = register.ledger().len(), "Sales CSV exported");
    Ok(file)
}

pub async fn export_backup(state: &RegisterState, today: NaiveDate) -> Result<ExportFile, ApiError> {
    debug!("export_backup command");
    let register = state.lock().await;
    let file = ExportFile {
        file_name: backup_file_name(today),
        contents: register.export_backup()?,
    };
    info!(file_name = %file.file_name, "Backup exported");
    Ok(file)
}

pub async fn import_backup(state: &RegisterState, text: String) -> Result<ImportResponse, ApiError> {
    debug!(bytes = text.len(), "import_backup command");
    let mut register = state.lock().await;
    Ok(register.import_backup(&text).await?.into())
}
