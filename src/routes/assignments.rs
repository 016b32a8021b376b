use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::UserRole;
use crate::routes::{missing_identity, submissions};
use crate::services::AssignmentService;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    ASSIGNMENT_SERVICE
        .create_assignment(&req, caller, body.into_inner())
        .await
}

// 获取作业（作答视图）
pub async fn get_assignment(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    ASSIGNMENT_SERVICE
        .get_assignment(&req, caller, path.into_inner())
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            // 创建作业 - 仅教师和管理员（业务层再校验是否为任课教师）
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_assignment)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            // 获取作业 - 业务层校验选课或任课关系
            .service(web::resource("/{id}").route(web::get().to(get_assignment)))
            .service(
                web::resource("/{id}/submissions")
                    // 提交测验
                    .route(web::post().to(submissions::submit_test))
                    // 提交列表 - 仅任课教师和管理员（业务层校验）
                    .route(web::get().to(submissions::list_submissions)),
            )
            // 我的提交历史
            .service(
                web::resource("/{id}/submissions/my")
                    .route(web::get().to(submissions::list_my_submissions)),
            ),
    );
}
