use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text, Timestamp};
use diesel::update as diesel_update;
use rocket::serde::json::{Error as JsonError, Json};
use serde::{Deserialize, Serialize};

use crate::db::schema::articles;
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult};
use crate::utils::check_exists;

#[derive(Debug, Queryable, Serialize)]
pub struct Article {
    article_id: i32,
    title: String,
    topic: String,
    author: String,
    body: String,
    #[serde(serialize_with = "crate::utils::serialize_date")]
    created_at: NaiveDateTime,
    votes: i32,
    article_img_url: String,
}

/// One listing row: the article columns minus `body`, plus the derived
/// comment count.
#[derive(Debug, QueryableByName, Serialize)]
pub struct ArticleSummary {
    #[diesel(sql_type = Text)]
    author: String,
    #[diesel(sql_type = Text)]
    title: String,
    #[diesel(sql_type = Integer)]
    article_id: i32,
    #[diesel(sql_type = Text)]
    topic: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "crate::utils::serialize_date")]
    created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    votes: i32,
    #[diesel(sql_type = Text)]
    article_img_url: String,
    #[diesel(sql_type = Integer)]
    comment_count: i32,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    article: Article,
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    articles: Vec<ArticleSummary>,
}

/// The columns a listing may be sorted on. Sort identifiers cannot be bound
/// as statement parameters, so anything outside this enumeration is rejected
/// before query construction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortBy {
    Title,
    ArticleId,
    Topic,
    #[default]
    CreatedAt,
    Votes,
}

impl SortBy {
    fn as_sql(self) -> &'static str {
        match self {
            SortBy::Title => "articles.title",
            SortBy::ArticleId => "articles.article_id",
            SortBy::Topic => "articles.topic",
            SortBy::CreatedAt => "articles.created_at",
            SortBy::Votes => "articles.votes",
        }
    }
}

impl FromStr for SortBy {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<SortBy, ApiError> {
        match value {
            "title" => Ok(SortBy::Title),
            "article_id" => Ok(SortBy::ArticleId),
            "topic" => Ok(SortBy::Topic),
            "created_at" => Ok(SortBy::CreatedAt),
            "votes" => Ok(SortBy::Votes),
            _ => Err(ApiError::BadRequest),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Order, ApiError> {
        match value {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err(ApiError::BadRequest),
        }
    }
}

// A LEFT JOIN rather than an inner one, so articles nobody has commented on
// still list with a count of zero.
fn listing_sql(with_topic: bool, sort_by: SortBy, order: Order) -> String {
    let mut sql = String::from(
        "SELECT articles.author, \
                articles.title, \
                articles.article_id, \
                articles.topic, \
                articles.created_at, \
                articles.votes, \
                articles.article_img_url, \
                COUNT(comments.comment_id)::INT AS comment_count \
         FROM articles \
         LEFT JOIN comments ON comments.article_id = articles.article_id",
    );
    if with_topic {
        sql.push_str(" WHERE articles.topic = $1");
    }
    sql.push_str(" GROUP BY articles.article_id");
    sql.push_str(&format!(" ORDER BY {} {}", sort_by.as_sql(), order.as_sql()));
    sql
}

#[get("/articles?<topic>&<sort_by>&<order>")]
pub fn index(
    mut conn: DbConnection,
    topic: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
) -> ApiResult<ArticlesResponse> {
    let sort_by = sort_by
        .as_deref()
        .map(|value| value.parse::<SortBy>())
        .transpose()?
        .unwrap_or_default();
    let order = order
        .as_deref()
        .map(|value| value.parse::<Order>())
        .transpose()?
        .unwrap_or_default();

    if let Some(ref topic) = topic {
        check_exists(&mut conn, "topics", "slug", topic)?;
    }

    let articles = match topic {
        Some(topic) => sql_query(listing_sql(true, sort_by, order))
            .bind::<Text, _>(topic)
            .load::<ArticleSummary>(&mut *conn)?,
        None => sql_query(listing_sql(false, sort_by, order)).load::<ArticleSummary>(&mut *conn)?,
    };
    Ok(Json(ArticlesResponse { articles }))
}

#[get("/articles/<article_id>")]
pub fn show(mut conn: DbConnection, article_id: Result<i32, &str>) -> ApiResult<ArticleResponse> {
    let id = article_id.map_err(|_| ApiError::BadRequest)?;
    let article = articles::table
        .find(id)
        .get_result::<Article>(&mut *conn)?;
    Ok(Json(ArticleResponse { article }))
}

#[derive(Debug, Deserialize)]
pub struct VoteUpdate {
    inc_votes: Option<i32>,
}

#[patch("/articles/<article_id>", format = "json", data = "<update>")]
pub fn update_votes(
    mut conn: DbConnection,
    article_id: Result<i32, &str>,
    update: Result<Json<VoteUpdate>, JsonError<'_>>,
) -> ApiResult<ArticleResponse> {
    let id = article_id.map_err(|_| ApiError::BadRequest)?;
    let delta = update
        .map_err(|_| ApiError::BadRequest)?
        .inc_votes
        .ok_or(ApiError::BadRequest)?;

    // A single UPDATE .. RETURNING; zero matched rows comes back from the
    // driver as a missing record, so no separate existence query is needed.
    let article = diesel_update(articles::table.find(id))
        .set(articles::votes.eq(articles::votes + delta))
        .get_result::<Article>(&mut *conn)?;
    Ok(Json(ArticleResponse { article }))
}
