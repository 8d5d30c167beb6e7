#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod db;

mod article;
mod comment;
mod topic;
mod types;
mod user;
mod utils;

use rocket::response::content::RawJson;
use rocket::serde::json::{json, Json, Value};
use rocket::{Build, Rocket};

lazy_static! {
    static ref ENDPOINTS: Value = serde_json::from_str(include_str!("../endpoints.json"))
        .expect("endpoints.json is valid JSON");
}

#[get("/")]
fn api_index() -> Json<Value> {
    Json(json!({ "endpoints": &*ENDPOINTS }))
}

#[catch(404)]
fn not_found() -> RawJson<String> {
    RawJson(json!({ "msg": "Not found." }).to_string())
}

#[catch(400)]
fn bad_request() -> RawJson<String> {
    RawJson(json!({ "msg": "Bad request." }).to_string())
}

pub fn rocket(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                api_index,
                topic::index,
                user::index,
                article::index,
                article::show,
                article::update_votes,
                comment::index,
                comment::create,
                comment::delete,
            ],
        )
        .register("/", catchers![not_found, bad_request])
}
