use chrono::NaiveDate;

/// A symbol whose fetch was abandoned during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: String,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionSummary {
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub rows_upserted: usize,
    pub symbols_ingested: Vec<String>,
    pub failures: Vec<SymbolFailure>,
}

impl IngestionSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
