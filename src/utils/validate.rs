use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{1,19}$").expect("Invalid course code regex"));

static PERMISSION_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z_]*\.[a-z][a-z_]*$").expect("Invalid permission code regex")
});

static ROLE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z_]*$").expect("Invalid role code regex"));

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("Invalid url regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：4 <= x <= 32
    if username.len() < 4 || username.len() > 32 {
        return Err("Username length must be between 4 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 校验去除首尾空白后的字符数（按字符而非字节计数）
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(format!("{field}长度必须在 {min}-{max} 个字符之间"));
    }
    Ok(())
}

/// 校验可选文本的最大长度
pub fn validate_max_length(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max => Err(format!("{field}不能超过 {max} 个字符")),
        _ => Ok(()),
    }
}

pub fn validate_course_code(code: &str) -> Result<(), String> {
    if !COURSE_CODE_RE.is_match(code) {
        return Err("课程代码只能包含大写字母、数字和连字符，长度 2-20".to_string());
    }
    Ok(())
}

/// 权限代码格式：`模块.操作`，如 `grades.record`
pub fn validate_permission_code(code: &str) -> Result<(), String> {
    if code.len() > 64 || !PERMISSION_CODE_RE.is_match(code) {
        return Err(format!("无效的权限代码: '{code}'，格式应为 module.action"));
    }
    Ok(())
}

/// 角色代码格式：大写字母与下划线，如 `TEACHER`
pub fn validate_role_code(code: &str) -> Result<(), String> {
    if code.len() > 32 || !ROLE_CODE_RE.is_match(code) {
        return Err(format!("无效的角色代码: '{code}'，只能包含大写字母和下划线"));
    }
    Ok(())
}

pub fn validate_url(field: &str, url: &str) -> Result<(), String> {
    if !URL_RE.is_match(url) {
        return Err(format!("{field}必须是有效的 http(s) 地址"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("mlopez").is_ok());
        assert!(validate_username("m.lopez_2").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("with space").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("docente@colegio.edu.pe").is_ok());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn test_length_counts_chars() {
        // 多字节字符按字符计数
        assert!(validate_length("标题", "Añó", 3, 10).is_ok());
        assert!(validate_length("标题", "  ab  ", 3, 10).is_err());
        let err = validate_length("标题", "x", 3, 10).unwrap_err();
        assert!(err.contains("3-10"));
    }

    #[test]
    fn test_max_length() {
        assert!(validate_max_length("备注", None, 5).is_ok());
        assert!(validate_max_length("备注", Some("12345"), 5).is_ok());
        assert!(validate_max_length("备注", Some("123456"), 5).is_err());
    }

    #[test]
    fn test_permission_code() {
        assert!(validate_permission_code("grades.record").is_ok());
        assert!(validate_permission_code("announcements.manage_all").is_ok());
        assert!(validate_permission_code("Grades.record").is_err());
        assert!(validate_permission_code("grades").is_err());
        assert!(validate_permission_code("grades.record.extra").is_err());
    }

    #[test]
    fn test_role_code() {
        assert!(validate_role_code("TEACHER").is_ok());
        assert!(validate_role_code("HEAD_TEACHER").is_ok());
        assert!(validate_role_code("teacher").is_err());
        assert!(validate_role_code("_ADMIN").is_err());
    }

    #[test]
    fn test_course_code() {
        assert!(validate_course_code("MAT-101").is_ok());
        assert!(validate_course_code("m101").is_err());
    }

    #[test]
    fn test_url() {
        assert!(validate_url("会议链接", "https://meet.example.com/abc").is_ok());
        assert!(validate_url("会议链接", "ftp://example.com").is_err());
    }
}
