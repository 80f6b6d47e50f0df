pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup).service(auth::login).service(
        web::scope("/users/{user_id}/tasks")
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::toggle_task_completion)
            .service(tasks::delete_task),
    );
}
