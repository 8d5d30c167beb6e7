use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde_json::json;

use crate::utils::try_respond;

/// Everything a handler can fail with. Expected conditions are raised as
/// `BadRequest`/`NotFound`; anything coming out of the database rides along
/// in `Diesel` and is classified when the response is built.
#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    NotFound,
    Diesel(DieselError),
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest => Status::BadRequest,
            ApiError::NotFound => Status::NotFound,
            ApiError::Diesel(DieselError::NotFound) => Status::NotFound,
            ApiError::Diesel(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                _,
            )) => Status::NotFound,
            ApiError::Diesel(DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _)) => {
                Status::BadRequest
            }
            ApiError::Diesel(_) => Status::InternalServerError,
        }
    }

    pub fn message(&self) -> String {
        match self.status().code {
            400 => String::from("Bad request."),
            404 => String::from("Not found."),
            _ => match self {
                ApiError::Diesel(error) => error.to_string(),
                _ => String::from("Internal server error."),
            },
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!(
                "unhandled error on {} {}: {:?}",
                request.method(),
                request.uri(),
                self
            );
        }
        try_respond(request, &json!({ "msg": self.message() }), status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_error(kind: DatabaseErrorKind, message: &str) -> ApiError {
        ApiError::from(DieselError::DatabaseError(kind, Box::new(message.to_string())))
    }

    #[test]
    fn deliberate_errors_keep_their_statuses() {
        assert_eq!(ApiError::BadRequest.status(), Status::BadRequest);
        assert_eq!(ApiError::BadRequest.message(), "Bad request.");
        assert_eq!(ApiError::NotFound.status(), Status::NotFound);
        assert_eq!(ApiError::NotFound.message(), "Not found.");
    }

    #[test]
    fn missing_rows_are_not_found() {
        let err = ApiError::from(DieselError::NotFound);
        assert_eq!(err.status(), Status::NotFound);
        assert_eq!(err.message(), "Not found.");
    }

    #[test]
    fn foreign_key_violations_are_not_found() {
        let err = db_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "insert or update on table \"comments\" violates foreign key constraint",
        );
        assert_eq!(err.status(), Status::NotFound);
        assert_eq!(err.message(), "Not found.");
    }

    #[test]
    fn not_null_violations_are_bad_requests() {
        let err = db_error(DatabaseErrorKind::NotNullViolation, "null value in column");
        assert_eq!(err.status(), Status::BadRequest);
        assert_eq!(err.message(), "Bad request.");
    }

    #[test]
    fn unrecognized_database_errors_fall_through_as_500s() {
        let err = db_error(DatabaseErrorKind::UniqueViolation, "duplicate key value");
        assert_eq!(err.status(), Status::InternalServerError);
        // The development behavior: the raw driver error is echoed back.
        assert!(err.message().contains("duplicate key value"));
    }
}
