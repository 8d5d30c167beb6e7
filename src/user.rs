use diesel::prelude::*;
use rocket::serde::json::Json;
use serde::Serialize;

use crate::db::schema::users;
use crate::db::DbConnection;
use crate::types::ApiResult;

#[derive(Debug, Queryable, Serialize)]
pub struct User {
    username: String,
    name: String,
    avatar_url: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    users: Vec<User>,
}

#[get("/users")]
pub fn index(mut conn: DbConnection) -> ApiResult<UsersResponse> {
    let users = users::table.load::<User>(&mut *conn)?;
    Ok(Json(UsersResponse { users }))
}
