use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::submissions::requests::{
    GradeSubmissionRequest, SubmissionListParams, SubmitTestRequest,
};
use crate::models::users::entities::UserRole;
use crate::routes::missing_identity;
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 提交测验
pub async fn submit_test(
    req: HttpRequest,
    path: web::Path<i64>, // assignment_id
    body: web::Json<SubmitTestRequest>,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    SUBMISSION_SERVICE
        .submit_test(&req, caller, path.into_inner(), body.into_inner())
        .await
}

// 获取我的提交历史
pub async fn list_my_submissions(
    req: HttpRequest,
    path: web::Path<i64>, // assignment_id
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    SUBMISSION_SERVICE
        .list_my_submissions(&req, caller, path.into_inner())
        .await
}

// 列出作业的提交
pub async fn list_submissions(
    req: HttpRequest,
    path: web::Path<i64>, // assignment_id
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    SUBMISSION_SERVICE
        .list_submissions(&req, caller, path.into_inner(), query.into_inner())
        .await
}

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    SUBMISSION_SERVICE
        .get_submission(&req, caller, path.into_inner())
        .await
}

// 人工评分
pub async fn grade_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_identity(&req) else {
        return Ok(missing_identity());
    };

    SUBMISSION_SERVICE
        .grade_submission(&req, caller, path.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::get().to(get_submission))
            // 评分 - 仅教师和管理员（业务层再校验是否为任课教师）
            .service(
                web::resource("/{id}/grade").route(
                    web::put()
                        .to(grade_submission)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
