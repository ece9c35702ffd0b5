/// API 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 用户与学籍；3xxx 公告；4xxx 活动；
/// 5xxx 评估；6xxx 成绩；7xxx 权限。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    InternalServerError = 1500,

    UserNotFound = 2000,
    UserAlreadyExists = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    PeriodNotFound = 2100,
    PeriodAlreadyExists = 2101,
    CourseNotFound = 2200,
    CourseAlreadyExists = 2201,
    CoursePermissionDenied = 2202,
    EnrollmentNotFound = 2300,
    AlreadyEnrolled = 2301,
    StudentNotEnrolled = 2302,

    AnnouncementNotFound = 3000,
    AnnouncementPermissionDenied = 3001,

    EventNotFound = 4000,
    EventPermissionDenied = 4001,
    EventRegistrationClosed = 4002,
    EventFull = 4003,
    EventAlreadyRegistered = 4004,
    EventRegistrationNotFound = 4005,

    EvaluationNotFound = 5000,
    EvaluationWeightExceeded = 5001,

    GradeNotFound = 6000,
    GradeValueInvalid = 6001,

    PermissionNotFound = 7000,
    PermissionAlreadyExists = 7001,
    RoleNotFound = 7100,
    RoleAlreadyExists = 7101,
    AssignmentNotFound = 7200,
    PermissionDenied = 7300,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_zero() {
        assert_eq!(ErrorCode::Success.as_i32(), 0);
        assert_eq!(ErrorCode::EvaluationWeightExceeded as i32, 5001);
    }
}
