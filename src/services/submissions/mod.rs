pub mod detail;
pub mod grade;
pub mod history;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::submissions::requests::{
    GradeSubmissionRequest, SubmissionListParams, SubmitTestRequest,
};
use crate::models::users::entities::CallerIdentity;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .map(|cache| cache.get_ref().clone())
    }

    /// 提交测验
    pub async fn submit_test(
        &self,
        request: &HttpRequest,
        caller: CallerIdentity,
        assignment_id: i64,
        req: SubmitTestRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_test(self, request, caller, assignment_id, req).await
    }

    /// 获取自己的提交历史
    pub async fn list_my_submissions(
        &self,
        request: &HttpRequest,
        caller: CallerIdentity,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        history::list_my_submissions(self, request, caller, assignment_id).await
    }

    /// 列出作业的提交（教师视角）
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        caller: CallerIdentity,
        assignment_id: i64,
        params: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, caller, assignment_id, params).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        caller: CallerIdentity,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, caller, submission_id).await
    }

    /// 人工评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        caller: CallerIdentity,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, caller, submission_id, req).await
    }
}
