use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::error::{Result, TodoError};
use crate::models::todo::{NewTodo, Success};
use crate::repository::TodoStore;

#[get("/todos")]
pub async fn get_todos(store: web::Data<dyn TodoStore>) -> Result<HttpResponse> {
    let todos = store.find_all().await?;
    Ok(HttpResponse::Ok().json(todos))
}

#[post("/todos")]
pub async fn create_todo(
    store: web::Data<dyn TodoStore>,
    new_todo: web::Json<NewTodo>,
) -> Result<HttpResponse> {
    let new_todo = new_todo.into_inner();
    if new_todo.body.is_empty() {
        return Err(TodoError::EmptyBody);
    }
    let todo = store.insert(new_todo).await?;
    tracing::debug!(id = ?todo.id, "created todo");
    Ok(HttpResponse::Created().json(todo))
}

/// Marks a todo as completed. Any request body is ignored.
#[patch("/todos/{id}")]
pub async fn complete_todo(
    store: web::Data<dyn TodoStore>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = store.parse_id(&id)?;
    if store.complete(id).await? == 0 {
        return Err(TodoError::NotFound);
    }
    Ok(HttpResponse::Ok().json(Success::ok()))
}

#[delete("/todos/{id}")]
pub async fn delete_todo(
    store: web::Data<dyn TodoStore>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = store.parse_id(&id)?;
    if store.delete(id).await? == 0 {
        return Err(TodoError::NotFound);
    }
    Ok(HttpResponse::Ok().json(Success::ok()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| TodoError::InvalidPayload(err.to_string()).into());

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .service(get_todos)
            .service(create_todo)
            .service(complete_todo)
            .service(delete_todo),
    );
}
