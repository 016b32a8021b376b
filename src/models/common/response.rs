use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::HWSystemError;
use crate::models::ErrorCode;

/// 统一的 API 响应信封
///
/// `code` 为 0 表示成功；失败时为 `ErrorCode`，`message` 携带业务错误详情。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success as i32
    }
}

impl ApiResponse<()> {
    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 由业务错误构造，错误码按错误种类映射
    pub fn from_error(err: &HWSystemError) -> Self {
        Self::error_empty(ErrorCode::from(err), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_carries_code_and_message() {
        let resp = ApiResponse::from_error(&HWSystemError::attempts_exceeded_limit(3));
        assert!(!resp.is_success());
        assert_eq!(resp.code, ErrorCode::AttemptsExceeded as i32);
        assert!(resp.message.contains('3'));

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(42_i64, "ok");
        assert!(resp.is_success());
        assert_eq!(resp.data, Some(42));
    }
}
