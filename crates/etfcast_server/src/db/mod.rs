//! SQLite store of daily index closes
//!
//! Dates are stored as ISO `YYYY-MM-DD` text so that lexical order is
//! chronological order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use etfcast_core::SourceError;
use etfcast_core::history::{ReturnSource, monthly_returns_from_prices};
use etfcast_core::model::ReturnSeries;
use jiff::civil::Date;
use rusqlite::{Connection, types::Type};

pub type DbConn = Arc<Mutex<Connection>>;

pub fn init_db(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS index_historical_data (
            index_code TEXT NOT NULL,
            date TEXT NOT NULL,
            close_price REAL NOT NULL,
            PRIMARY KEY (index_code, date)
        )",
        [],
    )?;

    Ok(())
}

fn parse_stored_date(column: usize, text: &str) -> Result<Date, rusqlite::Error> {
    text.parse::<Date>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err)))
}

/// Daily closes of `index_code` with `start <= date <= end`, ascending.
pub fn load_prices(
    conn: &Connection,
    index_code: &str,
    start: Date,
    end: Date,
) -> Result<Vec<(Date, f64)>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT date, close_price FROM index_historical_data
         WHERE index_code = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC",
    )?;

    let rows = stmt.query_map(
        rusqlite::params![index_code, start.to_string(), end.to_string()],
        |row| {
            let date: String = row.get(0)?;
            Ok((parse_stored_date(0, &date)?, row.get::<_, f64>(1)?))
        },
    )?;

    rows.collect()
}

/// Insert or replace closes for one index in a single transaction.
pub fn upsert_prices(
    conn: &mut Connection,
    index_code: &str,
    prices: &[(Date, f64)],
) -> Result<usize, rusqlite::Error> {
    let tx = conn.transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO index_historical_data (index_code, date, close_price) VALUES (?1, ?2, ?3)
             ON CONFLICT (index_code, date) DO UPDATE SET close_price = excluded.close_price",
        )?;
        for (date, price) in prices {
            count += stmt.execute(rusqlite::params![index_code, date.to_string(), price])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Stored range of one index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRange {
    pub index_code: String,
    pub first_date: Date,
    pub last_date: Date,
    pub data_points: usize,
}

pub fn list_indexes(conn: &Connection) -> Result<Vec<IndexRange>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT index_code, MIN(date), MAX(date), COUNT(*) FROM index_historical_data
         GROUP BY index_code ORDER BY index_code",
    )?;

    let rows = stmt.query_map([], |row| {
        let first: String = row.get(1)?;
        let last: String = row.get(2)?;
        Ok(IndexRange {
            index_code: row.get(0)?,
            first_date: parse_stored_date(1, &first)?,
            last_date: parse_stored_date(2, &last)?,
            data_points: row.get::<_, i64>(3)? as usize,
        })
    })?;

    rows.collect()
}

/// Monthly returns read from the price store.
///
/// Each instrument is looked up under its mapped index code, or under its own
/// identifier when unmapped. The connection is locked per lookup only.
#[derive(Debug, Clone)]
pub struct IndexReturnSource {
    db: DbConn,
    index_codes: HashMap<String, String>,
}

impl IndexReturnSource {
    pub fn new(db: DbConn, index_codes: HashMap<String, String>) -> Self {
        Self { db, index_codes }
    }

    fn index_code<'a>(&'a self, instrument_id: &'a str) -> &'a str {
        self.index_codes
            .get(instrument_id)
            .map_or(instrument_id, String::as_str)
    }
}

impl ReturnSource for IndexReturnSource {
    fn monthly_returns(
        &self,
        instrument_id: &str,
        start: Date,
        end: Date,
    ) -> Result<ReturnSeries, SourceError> {
        let unavailable = |reason: String| SourceError::Unavailable {
            instrument: instrument_id.to_string(),
            reason,
        };

        let index_code = self.index_code(instrument_id);
        let prices = {
            let conn = self
                .db
                .lock()
                .map_err(|_| unavailable("price store lock poisoned".to_string()))?;
            load_prices(&conn, index_code, start, end).map_err(|e| unavailable(e.to_string()))?
        };

        tracing::debug!(instrument_id, index_code, prices = prices.len(), "loaded index prices");
        monthly_returns_from_prices(instrument_id, &prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    fn month_ends(first_close: f64, growth: f64, months: i8) -> Vec<(Date, f64)> {
        let mut close = first_close;
        (1..=months)
            .map(|m| {
                let d = date(2023, m, 1).last_of_month();
                let row = (d, close);
                close *= 1.0 + growth;
                row
            })
            .collect()
    }

    #[test]
    fn test_upsert_and_load() {
        let mut conn = memory_db();
        let prices = month_ends(100.0, 0.01, 6);
        assert_eq!(upsert_prices(&mut conn, "MSCI_WORLD", &prices).unwrap(), 6);

        // Replacing one close does not add a row
        upsert_prices(&mut conn, "MSCI_WORLD", &[(date(2023, 1, 31), 99.0)]).unwrap();

        let loaded = load_prices(&conn, "MSCI_WORLD", date(2023, 1, 1), date(2023, 3, 31)).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0], (date(2023, 1, 31), 99.0));
        assert!(loaded.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_list_indexes() {
        let mut conn = memory_db();
        upsert_prices(&mut conn, "SP500", &month_ends(4000.0, 0.005, 12)).unwrap();
        upsert_prices(&mut conn, "MSCI_WORLD", &month_ends(100.0, 0.01, 3)).unwrap();

        let indexes = list_indexes(&conn).unwrap();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].index_code, "MSCI_WORLD");
        assert_eq!(indexes[0].data_points, 3);
        assert_eq!(indexes[1].first_date, date(2023, 1, 31));
        assert_eq!(indexes[1].last_date, date(2023, 12, 31));
    }

    #[test]
    fn test_return_source_maps_identifier_to_index() {
        let mut conn = memory_db();
        upsert_prices(&mut conn, "MSCI_WORLD", &month_ends(100.0, 0.02, 6)).unwrap();
        let db: DbConn = Arc::new(Mutex::new(conn));

        let source = IndexReturnSource::new(
            db,
            HashMap::from([("IE00B4L5Y983".to_string(), "MSCI_WORLD".to_string())]),
        );

        let series = source
            .monthly_returns("IE00B4L5Y983", date(2023, 1, 1), date(2023, 6, 30))
            .unwrap();
        assert_eq!(series.len(), 5);
        assert!(series.values().all(|r| (r - 0.02).abs() < 1e-12));

        let unmapped = source
            .monthly_returns("IE00BKM4GZ66", date(2023, 1, 1), date(2023, 6, 30))
            .unwrap();
        assert!(unmapped.is_empty());
    }
}
