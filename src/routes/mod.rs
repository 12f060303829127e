pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::{AuthMiddleware, TokenService};

/// Registers the public auth routes and the guarded task scope.
///
/// The auth guard wraps only `/tasks`: registration and login are reachable
/// without a token, and every task-resource route requires one.
pub fn config(cfg: &mut web::ServiceConfig, tokens: TokenService) {
    cfg.service(auth::register).service(auth::login).service(
        web::scope("/tasks")
            .wrap(AuthMiddleware::new(tokens))
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
