//! Database models for daily price records.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use stockfeed_core::constants::DATE_FORMAT;
use stockfeed_core::errors::{Error, ValidationError};
use stockfeed_core::prices::{PriceAverages, PriceRecord};

/// Row of `financial_data`. Dates and prices are kept as text.
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::financial_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceRecordDB {
    pub symbol: String,
    pub date: String,
    pub open_price: String,
    pub close_price: String,
    pub volume: i64,
}

impl From<PriceRecord> for PriceRecordDB {
    fn from(record: PriceRecord) -> Self {
        Self {
            symbol: record.symbol,
            date: record.date.format(DATE_FORMAT).to_string(),
            open_price: record.open_price.to_string(),
            close_price: record.close_price.to_string(),
            volume: record.volume,
        }
    }
}

impl TryFrom<PriceRecordDB> for PriceRecord {
    type Error = Error;

    fn try_from(db: PriceRecordDB) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&db.date, DATE_FORMAT).map_err(|e| {
            ValidationError::InvalidInput(format!("stored date '{}' for {}: {}", db.date, db.symbol, e))
        })?;
        Ok(Self {
            open_price: Decimal::from_str(&db.open_price)?,
            close_price: Decimal::from_str(&db.close_price)?,
            symbol: db.symbol,
            date,
            volume: db.volume,
        })
    }
}

/// Result row of the per-symbol averages query.
#[derive(QueryableByName, Debug, Clone)]
pub struct PriceAveragesDB {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub symbol: String,
    #[diesel(sql_type = diesel::sql_types::Double)]
    pub average_open_price: f64,
    #[diesel(sql_type = diesel::sql_types::Double)]
    pub average_close_price: f64,
    #[diesel(sql_type = diesel::sql_types::Double)]
    pub average_volume: f64,
}

impl From<PriceAveragesDB> for PriceAverages {
    fn from(db: PriceAveragesDB) -> Self {
        Self {
            symbol: db.symbol,
            average_open_price: db.average_open_price,
            average_close_price: db.average_close_price,
            average_volume: db.average_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_db_row_keeps_exact_decimals() {
        let record = PriceRecord {
            symbol: "IBM".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            open_price: dec!(140.1200),
            close_price: dec!(141.5),
            volume: 3_000_000,
        };

        let db: PriceRecordDB = record.clone().into();
        assert_eq!(db.date, "2023-01-05");
        assert_eq!(db.open_price, "140.1200");

        let back = PriceRecord::try_from(db).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_corrupt_row_is_rejected() {
        let db = PriceRecordDB {
            symbol: "IBM".to_string(),
            date: "05/01/2023".to_string(),
            open_price: "1".to_string(),
            close_price: "1".to_string(),
            volume: 1,
        };
        assert!(PriceRecord::try_from(db).is_err());
    }
}
