use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskQuery, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): restricts the list to one status value
///   (`Pending`, `In Progress`, `Completed`). Absent or `All` means no
///   restriction; anything else is rejected.
///
/// ## Responses:
/// - `200 OK`: `{"success": true, "tasks": [...]}`.
/// - `400 Bad Request`: unknown status filter value.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let status_filter = query_params
        .status_filter()
        .map_err(AppError::InvalidInput)?;

    let tasks = match status_filter {
        Some(status) => {
            sqlx::query_as::<_, Task>(
                "SELECT id, user_id, title, description, status, due_date, created_at \
                 FROM tasks WHERE user_id = $1 AND status = $2 \
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(user.id)
            .bind(status)
            .fetch_all(&**pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Task>(
                "SELECT id, user_id, title, description, status, due_date, created_at \
                 FROM tasks WHERE user_id = $1 \
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(user.id)
            .fetch_all(&**pool)
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "tasks": tasks
    })))
}

/// Creates a new task owned by the authenticated user.
///
/// The owner is always the verified caller; it is not part of the payload
/// and cannot be supplied by the client. Status defaults to `Pending`.
///
/// ## Responses:
/// - `201 Created`: `{"success": true, "message": ..., "task_id": ...}`.
/// - `400 Bad Request`: empty or overlong title, overlong description.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let status = task_data.status.unwrap_or_default();

    let created = sqlx::query_as::<_, (i32,)>(
        "INSERT INTO tasks (user_id, title, description, status, due_date) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(user.id)
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(status)
    .bind(task_data.due_date)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Task created successfully",
        "task_id": created.0
    })))
}

/// Updates a task's mutable fields (title, description, status, due date).
///
/// Ownership is verified before mutating: a task that exists but belongs to
/// another user yields `403 Forbidden`, never a silent update. Owner and id
/// are immutable.
///
/// ## Responses:
/// - `200 OK`: task updated.
/// - `400 Bad Request`: invalid payload.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: caller is not the owner.
/// - `404 Not Found`: no task with this id.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    check_ownership(&pool, task_id, user.id).await?;

    let result = sqlx::query(
        "UPDATE tasks SET title = $1, description = $2, status = $3, due_date = $4 \
         WHERE id = $5 AND user_id = $6",
    )
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.status)
    .bind(task_data.due_date)
    .bind(task_id)
    .bind(user.id)
    .execute(&**pool)
    .await?;

    // Row can vanish between the ownership check and the update.
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task updated successfully"
    })))
}

/// Deletes a task. Same ownership contract as update.
///
/// ## Responses:
/// - `200 OK`: task deleted.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: caller is not the owner.
/// - `404 Not Found`: no task with this id.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    check_ownership(&pool, task_id, user.id).await?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task deleted successfully"
    })))
}

/// Fails with `NotFound` when no task has this id, and with `Forbidden` when
/// the task exists but is owned by someone else.
async fn check_ownership(pool: &PgPool, task_id: i32, user_id: i32) -> Result<(), AppError> {
    let owner = sqlx::query_as::<_, (i32,)>("SELECT user_id FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    match owner {
        None => Err(AppError::NotFound("Task not found".into())),
        Some((owner_id,)) if owner_id != user_id => {
            Err(AppError::Forbidden("You do not own this task".into()))
        }
        Some(_) => Ok(()),
    }
}
