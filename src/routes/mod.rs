pub mod assignments;

pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use submissions::configure_submissions_routes;

use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

// RequireJWT 之后仍取不到身份时的统一响应
pub(crate) fn missing_identity() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "无法获取用户信息",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    use crate::models::courses::entities::EnrollmentStatus;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::jwt::test_tokens::access_token;
    use crate::utils::{json_error_handler, query_error_handler};

    const TEACHER: i64 = 7;
    const STUDENT: i64 = 1;

    async fn seeded_storage() -> (Arc<dyn Storage>, i64) {
        let storage = memory_storage().await;
        let course_id = storage.seed_course(TEACHER).await;
        storage
            .seed_enrollment(course_id, STUDENT, EnrollmentStatus::Active)
            .await;
        (Arc::new(storage), course_id)
    }

    macro_rules! test_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::Data::new($storage.clone()))
                    .configure(configure_assignments_routes)
                    .configure(configure_submissions_routes),
            )
            .await
        };
    }

    fn bearer(user_id: i64, role: UserRole) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", access_token(user_id, role)))
    }

    fn assignment_body(course_id: i64, with_essay: bool) -> Value {
        let mut questions = vec![
            json!({
                "prompt": "1 + 1 = ?",
                "question_type": "single_choice",
                "points": 10,
                "options": [
                    {"text": "2", "is_correct": true},
                    {"text": "3"}
                ]
            }),
        ];
        if with_essay {
            questions.push(json!({
                "prompt": "证明勾股定理",
                "question_type": "long_answer",
                "points": 10
            }));
        }
        json!({
            "course_id": course_id,
            "title": "第一次测验",
            "kind": "test",
            "max_score": 20.0,
            "passing_score": 60.0,
            "questions": questions
        })
    }

    #[actix_web::test]
    async fn test_requests_without_token_are_rejected() {
        let (storage, _) = seeded_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::get()
            .uri("/api/v1/assignments/1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_students_cannot_create_assignments() {
        let (storage, course_id) = seeded_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/assignments")
            .insert_header(bearer(STUDENT, UserRole::Student))
            .set_json(assignment_body(course_id, false))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_objective_test_flow() {
        let (storage, course_id) = seeded_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/assignments")
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .set_json(assignment_body(course_id, false))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let assignment_id = body["data"]["id"].as_i64().unwrap();

        // 学生视图不含正确答案
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/assignments/{assignment_id}"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let question = &body["data"]["questions"][0];
        assert!(question["options"][0].get("is_correct").is_none());
        let question_id = question["id"].as_i64().unwrap();
        let correct_option = question["options"][0]["id"].as_i64().unwrap();

        // 未选课的学生无法查看
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/assignments/{assignment_id}"))
            .insert_header(bearer(42, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .set_json(json!({
                "answers": [
                    {"type": "choice", "question_id": question_id, "selected_options": [correct_option]}
                ],
                "time_spent": 60
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["submission"]["status"], "graded");
        assert_eq!(body["data"]["score"], 10);
        assert_eq!(body["data"]["percentage"], 100.0);
        assert_eq!(body["data"]["passed"], true);
        assert_eq!(body["data"]["attempt_number"], 1);
        let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions/my"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["attempts_used"], 1);
        assert_eq!(body["data"]["items"][0]["id"], submission_id);

        // 作业未开放参考答案，学生详情中不附带
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"].get("answer_key").is_none());
        assert_eq!(body["data"]["submission"]["answers"][0]["points"], 10);

        // 任课教师看到参考答案
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["data"]["answer_key"][0]["correct_options"][0],
            correct_option
        );

        // 其他学生无权查看
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(bearer(2, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_pending_submission_is_graded_by_teacher() {
        let (storage, course_id) = seeded_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/assignments")
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .set_json(assignment_body(course_id, true))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let assignment_id = body["data"]["id"].as_i64().unwrap();
        let essay_id = body["data"]["questions"][1]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .set_json(json!({
                "answers": [{"type": "text", "question_id": essay_id, "text": "由面积关系可得"}]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["submission"]["status"], "pending");
        assert!(body["data"]["score"].is_null());
        let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/v1/assignments/{assignment_id}/submissions?status=pending&page=1&size=10"
            ))
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["pagination"]["total"], 1);

        // 学生不能评分
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .set_json(json!({"score": 20.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .set_json(json!({"score": 25.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .set_json(json!({"score": 18.0, "feedback": "Good reasoning"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "graded");
        assert_eq!(body["data"]["score"], 18.0);
        assert_eq!(body["data"]["feedback"], "Good reasoning");
    }

    #[actix_web::test]
    async fn test_empty_submission_is_bad_request() {
        let (storage, course_id) = seeded_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/assignments")
            .insert_header(bearer(TEACHER, UserRole::Teacher))
            .set_json(assignment_body(course_id, false))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let assignment_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(STUDENT, UserRole::Student))
            .set_json(json!({"answers": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::MissingAnswers as i32);

        let req = test::TestRequest::post()
            .uri("/api/v1/assignments/999/submissions")
            .insert_header(bearer(STUDENT, UserRole::Student))
            .set_json(json!({"answers": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
