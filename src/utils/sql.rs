use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};

/// 转义 LIKE 模式中的通配符，使用户输入按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `%关键词%` 形式的模式：先转小写再转义
pub fn contains_pattern(search: &str) -> String {
    format!("%{}%", escape_like_pattern(&search.trim().to_lowercase()))
}

/// `LOWER(col) LIKE '%kw%' ESCAPE '\'`
///
/// SQLite 的 LOWER 只折叠 ASCII，非 ASCII 字母按原样比较
pub fn contains_ignore_case<C: ColumnTrait>(column: C, search: &str) -> Expr {
    Func::lower(column.into_expr()).like(LikeExpr::new(contains_pattern(search)).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_like_pattern("Matemática"), "Matemática");
    }

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("c:\\"), "c:\\\\");
    }

    #[test]
    fn test_contains_pattern_lowercases() {
        assert_eq!(contains_pattern("  ÁLGEBRA "), "%álgebra%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
    }
}
