use chrono::{NaiveDateTime, SecondsFormat};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Text};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::content::RawJson;
use rocket::response::{self, Responder, Response};
use serde::Serializer;
use serde_json::Value;

use crate::types::ApiError;

pub fn try_respond(
    req: &Request<'_>,
    json: &Value,
    status: Status,
) -> response::Result<'static> {
    let as_json = serde_json::to_string(json);
    match as_json {
        Ok(json) => RawJson(json)
            .respond_to(req)
            .and_then(|resp| Response::build_from(resp).status(status).ok()),

        Err(_) => Err(Status::InternalServerError),
    }
}

pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = date.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}

#[derive(QueryableByName)]
struct Existence {
    #[diesel(sql_type = Bool)]
    found: bool,
}

/// Probes for any row where `column` matches `value`, failing with a
/// `NotFound` so callers can turn a dangling reference into a 404 before the
/// main query runs. Table and column names come from call-site literals only;
/// the column is cast to text so ids and slugs bind the same way.
pub fn check_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
    value: &str,
) -> Result<(), ApiError> {
    let probe = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {column}::text = $1) AS found");
    let row = sql_query(probe)
        .bind::<Text, _>(value)
        .get_result::<Existence>(conn)?;
    if row.found {
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}
