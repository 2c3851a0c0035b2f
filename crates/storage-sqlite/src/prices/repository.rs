use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use stockfeed_core::constants::DATE_FORMAT;
use stockfeed_core::prices::{
    PriceAverages, PriceRecord, PriceRecordFilter, PriceRecordPage, PriceRecordRepositoryTrait,
};
use stockfeed_core::Result;

use super::model::{PriceAveragesDB, PriceRecordDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::financial_data;

const AVERAGES_SQL: &str = "SELECT symbol, \
        AVG(CAST(open_price AS REAL)) AS average_open_price, \
        AVG(CAST(close_price AS REAL)) AS average_close_price, \
        AVG(CAST(volume AS REAL)) AS average_volume \
     FROM financial_data \
     WHERE symbol = ? AND date >= ? AND date <= ? \
     GROUP BY symbol";

/// Rows per multi-row INSERT. At five columns a row, a chunk stays under
/// SQLite's 999 bound-parameter limit.
const UPSERT_CHUNK_ROWS: usize = 150;

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Applies `filter` to the table. Shared by the count and the page query so
/// both always see the same rows.
fn filtered(filter: &PriceRecordFilter) -> financial_data::BoxedQuery<'static, Sqlite> {
    let mut query = financial_data::table.into_boxed();
    if let Some(symbol) = &filter.symbol {
        query = query.filter(financial_data::symbol.eq(symbol.clone()));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(financial_data::date.ge(date_key(start)));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(financial_data::date.le(date_key(end)));
    }
    query
}

pub struct PriceRecordRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PriceRecordRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PriceRecordRepository { pool, writer }
    }
}

#[async_trait]
impl PriceRecordRepositoryTrait for PriceRecordRepository {
    fn find_price_records(
        &self,
        filter: &PriceRecordFilter,
        limit: i64,
        offset: i64,
    ) -> Result<PriceRecordPage> {
        let mut conn = get_connection(&self.pool)?;

        let count = filtered(filter)
            .select(count_star())
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;

        let rows = filtered(filter)
            .order((financial_data::date.desc(), financial_data::symbol.asc()))
            .limit(limit)
            .offset(offset)
            .select(PriceRecordDB::as_select())
            .load::<PriceRecordDB>(&mut conn)
            .map_err(StorageError::from)?;

        debug!(
            "Loaded {} of {} price record(s) for {:?}",
            rows.len(),
            count,
            filter
        );

        let records = rows
            .into_iter()
            .map(PriceRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(PriceRecordPage { count, records })
    }

    fn get_price_averages(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<PriceAverages>> {
        let mut conn = get_connection(&self.pool)?;

        let row = diesel::sql_query(AVERAGES_SQL)
            .bind::<Text, _>(symbol)
            .bind::<Text, _>(date_key(start_date))
            .bind::<Text, _>(date_key(end_date))
            .get_result::<PriceAveragesDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(PriceAverages::from))
    }

    async fn upsert_price_records(&self, records: Vec<PriceRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let rows: Vec<PriceRecordDB> = records.into_iter().map(PriceRecordDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected = 0;
                for chunk in rows.chunks(UPSERT_CHUNK_ROWS) {
                    affected += diesel::insert_into(financial_data::table)
                        .values(chunk)
                        .on_conflict((financial_data::symbol, financial_data::date))
                        .do_update()
                        .set((
                            financial_data::open_price.eq(excluded(financial_data::open_price)),
                            financial_data::close_price.eq(excluded(financial_data::close_price)),
                            financial_data::volume.eq(excluded(financial_data::volume)),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                debug!("Upserted {} price record(s)", affected);
                Ok(affected)
            })
            .await
    }
}
