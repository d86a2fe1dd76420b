//! Column conversion helpers shared by the SQLite-backed stores.

use std::error::Error as StdError;
use std::str::FromStr;

use chrono::{DateTime, Local};
use rusqlite::types::{FromSqlError, Type};

use crate::utils::date::from_millis;

pub(crate) fn millis_to_local(column: usize, millis: i64) -> rusqlite::Result<DateTime<Local>> {
    from_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Integer,
            Box::new(FromSqlError::OutOfRange(millis)),
        )
    })
}

pub(crate) fn parse_id<T>(column: usize, value: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
