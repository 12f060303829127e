use crate::{
    auth::{hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest, TokenService},
    error::AppError,
    models::{User, UserRecord},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::validate_email;

/// Uniform login failure message. "No such email" and "wrong password" are
/// deliberately indistinguishable to prevent account enumeration.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Register a new user
///
/// Creates an account and returns a session token alongside the user's
/// public fields. Inputs are trimmed first; an empty name, email, or
/// password is rejected. Email uniqueness is case-sensitive: `ann@x.com`
/// and `Ann@x.com` register distinct accounts.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let name = register_data.name.trim();
    let email = register_data.email.trim();
    let password = register_data.password.trim();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Name, email, and password are required".into(),
        ));
    }
    if !validate_email(email) {
        return Err(AppError::InvalidInput(
            "A valid email address is required".into(),
        ));
    }

    // Check if email already exists
    let existing_user = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = hash_password(password)?;

    // The unique index on users.email backs the check above; a concurrent
    // registration losing the race surfaces here as a unique violation.
    let insert = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING id, name, email",
    )
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await;

    let user = match insert {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::Conflict("Email is already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = tokens.issue(user.id, &user.email)?;
    log::info!("registered user {} ({})", user.id, user.email);

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        message: "Registration successful".to_string(),
        token,
        user,
    }))
}

/// Login user
///
/// Authenticates a user and returns a session token. The failure response is
/// identical whether the email is unknown or the password is wrong.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let email = login_data.email.trim();
    let password = login_data.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".into(),
        ));
    }

    let record = sqlx::query_as::<_, UserRecord>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&**pool)
    .await?;

    let record = match record {
        Some(record) => record,
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };

    if !verify_password(password, &record.password_hash)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = tokens.issue(record.id, &record.email)?;
    log::info!("user {} logged in", record.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: record.public(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::{test, App, Error};
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    // A lazy pool never connects until a query runs, so the input-rejection
    // paths (which return before any query) are testable without a database.
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/taskboard_test")
            .expect("lazy pool")
    }

    async fn status_of<S, R, B>(app: &S, req: R) -> actix_web::http::StatusCode
    where
        S: Service<R, Response = ServiceResponse<B>, Error = Error>,
    {
        match test::try_call_service(app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        }
    }

    #[actix_rt::test]
    async fn test_register_rejects_blank_inputs() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(TokenService::new("test-secret")))
                .service(register),
        )
        .await;

        // Whitespace-only fields must trim down to empty and be rejected.
        let payloads = vec![
            json!({ "name": "", "email": "ann@x.com", "password": "secret1" }),
            json!({ "name": "Ann", "email": "   ", "password": "secret1" }),
            json!({ "name": "Ann", "email": "ann@x.com", "password": "  " }),
        ];

        for payload in payloads {
            let req = test::TestRequest::post()
                .uri("/register")
                .set_json(&payload)
                .to_request();
            assert_eq!(status_of(&app, req).await, 400, "payload: {}", payload);
        }
    }

    #[actix_rt::test]
    async fn test_register_rejects_malformed_email() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(TokenService::new("test-secret")))
                .service(register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "name": "Ann", "email": "not-an-email", "password": "secret1" }))
            .to_request();
        assert_eq!(status_of(&app, req).await, 400);
    }

    #[actix_rt::test]
    async fn test_login_rejects_blank_inputs() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(TokenService::new("test-secret")))
                .service(login),
        )
        .await;

        let payloads = vec![
            json!({ "email": "", "password": "secret1" }),
            json!({ "email": "ann@x.com", "password": "   " }),
        ];

        for payload in payloads {
            let req = test::TestRequest::post()
                .uri("/login")
                .set_json(&payload)
                .to_request();
            assert_eq!(status_of(&app, req).await, 400, "payload: {}", payload);
        }
    }
}
