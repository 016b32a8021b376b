//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 基础设施错误使用 E0xx 代码，测评业务错误使用 E1xx 代码。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_hwsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum HWSystemError {
            $($variant(String),)*
        }

        impl HWSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(HWSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(HWSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(HWSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl HWSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        HWSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_hwsystem_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E007", "Validation Error"),
    Serialization("E009", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
    AssignmentNotFound("E101", "Assignment Not Found"),
    SubmissionNotFound("E102", "Submission Not Found"),
    InvalidAssignmentKind("E103", "Invalid Assignment Kind"),
    NotEnrolled("E104", "Not Enrolled"),
    AttemptsExceeded("E105", "Attempts Exceeded"),
    MissingAnswers("E106", "Missing Answers"),
    NotAuthorized("E107", "Not Authorized"),
    ScoreOutOfRange("E108", "Score Out Of Range"),
    DeadlinePassed("E109", "Deadline Passed"),
    InvalidQuestionBank("E110", "Invalid Question Bank"),
}

impl HWSystemError {
    /// 超出最大尝试次数，消息中携带配置的上限
    pub fn attempts_exceeded_limit(limit: i32) -> Self {
        HWSystemError::AttemptsExceeded(format!("已达到最大尝试次数限制 ({limit} 次)"))
    }

    /// 人工评分超出范围，消息中携带合法区间
    pub fn score_out_of_range_bound(max_score: f64) -> Self {
        HWSystemError::ScoreOutOfRange(format!("分数必须在 0 到 {max_score} 之间"))
    }

    /// 是否为可重试的瞬时错误（仅限存储连接类错误）
    pub fn is_transient(&self) -> bool {
        matches!(self, HWSystemError::DatabaseConnection(_))
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HWSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HWSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for HWSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
                HWSystemError::DatabaseConnection(err.to_string())
            }
            _ => HWSystemError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for HWSystemError {
    fn from(err: std::io::Error) -> Self {
        HWSystemError::DatabaseOperation(format!("IO 错误: {err}"))
    }
}

impl From<serde_json::Error> for HWSystemError {
    fn from(err: serde_json::Error) -> Self {
        HWSystemError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HWSystemError>;
