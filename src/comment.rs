use chrono::NaiveDateTime;
use diesel::delete as diesel_delete;
use diesel::insert_into;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::response::status::NoContent;
use rocket::serde::json::{Error as JsonError, Json};
use serde::{Deserialize, Serialize};

use crate::db::schema::comments;
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult};
use crate::utils::check_exists;

#[derive(Debug, Queryable, Serialize)]
pub struct Comment {
    comment_id: i32,
    body: String,
    article_id: i32,
    author: String,
    votes: i32,
    #[serde(serialize_with = "crate::utils::serialize_date")]
    created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment<'a> {
    body: &'a str,
    author: &'a str,
    article_id: i32,
}

/// What a client posts. Anything else in the payload is dropped on the floor.
#[derive(Debug, Deserialize)]
pub struct NewCommentBody {
    username: String,
    body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    comments: Vec<Comment>,
}

#[get("/articles/<article_id>/comments")]
pub fn index(
    mut conn: DbConnection,
    article_id: Result<i32, &str>,
) -> ApiResult<CommentsResponse> {
    let id = article_id.map_err(|_| ApiError::BadRequest)?;
    check_exists(&mut conn, "articles", "article_id", &id.to_string())?;

    let comments = comments::table
        .filter(comments::article_id.eq(id))
        .order(comments::created_at.desc())
        .load::<Comment>(&mut *conn)?;
    Ok(Json(CommentsResponse { comments }))
}

#[post("/articles/<article_id>/comments", format = "json", data = "<comment>")]
pub fn create(
    mut conn: DbConnection,
    article_id: Result<i32, &str>,
    comment: Result<Json<NewCommentBody>, JsonError<'_>>,
) -> Result<(Status, Json<CommentResponse>), ApiError> {
    let id = article_id.map_err(|_| ApiError::BadRequest)?;
    let details = comment.map_err(|_| ApiError::BadRequest)?.into_inner();
    if details.body.trim().is_empty() {
        return Err(ApiError::BadRequest);
    }

    let new_comment = NewComment {
        body: &details.body,
        author: &details.username,
        article_id: id,
    };
    // An unknown article (or username) trips the foreign key, which the
    // error translation reports as a 404.
    let comment = insert_into(comments::table)
        .values(&new_comment)
        .get_result::<Comment>(&mut *conn)?;
    Ok((Status::Created, Json(CommentResponse { comment })))
}

#[delete("/comments/<comment_id>")]
pub fn delete(mut conn: DbConnection, comment_id: Result<i32, &str>) -> Result<NoContent, ApiError> {
    let id = comment_id.map_err(|_| ApiError::BadRequest)?;
    // A DELETE that matches nothing is not an error to the database, so the
    // affected-row count is the existence check.
    let deleted = diesel_delete(comments::table.find(id)).execute(&mut *conn)?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(NoContent)
}
