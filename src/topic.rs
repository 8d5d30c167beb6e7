use diesel::prelude::*;
use rocket::serde::json::Json;
use serde::Serialize;

use crate::db::schema::topics;
use crate::db::DbConnection;
use crate::types::ApiResult;

#[derive(Debug, Queryable, Serialize)]
pub struct Topic {
    slug: String,
    description: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    topics: Vec<Topic>,
}

#[get("/topics")]
pub fn index(mut conn: DbConnection) -> ApiResult<TopicsResponse> {
    let topics = topics::table.load::<Topic>(&mut *conn)?;
    Ok(Json(TopicsResponse { topics }))
}
