use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};
use crate::schedule::Schedule;
use crate::summary::ScheduleSummary;
use crate::types::ExportLocale;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// one exported row, every amount fixed to two decimals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub period: String,
    pub payment_date: String,
    pub principal: String,
    pub interest: String,
    pub payment: String,
    pub remaining_principal: String,
}

impl ExportRow {
    pub fn fields(&self) -> [&str; 6] {
        [
            self.period.as_str(),
            self.payment_date.as_str(),
            self.principal.as_str(),
            self.interest.as_str(),
            self.payment.as_str(),
            self.remaining_principal.as_str(),
        ]
    }
}

/// tabular rendering of a schedule plus its total row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExport {
    pub headers: Vec<String>,
    pub rows: Vec<ExportRow>,
    pub total: ExportRow,
}

impl ScheduleExport {
    pub fn from_schedule(schedule: &Schedule, locale: ExportLocale) -> Self {
        let rows = schedule
            .iter()
            .map(|p| ExportRow {
                period: p.period.to_string(),
                payment_date: p.payment_date.format("%Y-%m-%d").to_string(),
                principal: p.principal.format_cents(),
                interest: p.interest.format_cents(),
                payment: p.payment.format_cents(),
                remaining_principal: p.remaining_principal.format_cents(),
            })
            .collect();

        // totals are summed at full precision, then rounded once
        let summary = ScheduleSummary::from_schedule(schedule);
        let total = ExportRow {
            period: locale.total_label().to_string(),
            payment_date: String::new(),
            principal: summary.total_principal.format_cents(),
            interest: summary.total_interest.format_cents(),
            payment: summary.total_payment.format_cents(),
            remaining_principal: String::new(),
        };

        Self {
            headers: locale.headers().iter().map(|h| h.to_string()).collect(),
            rows,
            total,
        }
    }

    /// write as CSV, optionally prefixed with a UTF-8 byte order mark for spreadsheets
    pub fn write_csv<W: Write>(&self, mut writer: W, with_bom: bool) -> Result<()> {
        if with_bom {
            writer.write_all(UTF8_BOM).map_err(io_error)?;
        }

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers).map_err(csv_error)?;
        for row in &self.rows {
            wtr.write_record(row.fields()).map_err(csv_error)?;
        }
        wtr.write_record(self.total.fields()).map_err(csv_error)?;
        wtr.flush().map_err(io_error)?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf, false)?;
        String::from_utf8(buf).map_err(|e| LoanError::CalculationError {
            message: e.to_string(),
        })
    }
}

fn csv_error(e: csv::Error) -> LoanError {
    LoanError::CalculationError {
        message: format!("csv export failed: {}", e),
    }
}

fn io_error(e: std::io::Error) -> LoanError {
    LoanError::CalculationError {
        message: format!("export write failed: {}", e),
    }
}
