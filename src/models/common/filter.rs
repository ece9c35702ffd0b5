//! 内存列表过滤
//!
//! 派生字段（如公告、活动的状态）无法在 SQL 中直接筛选，
//! 先由存储层按可下推的条件取数，再在内存中过滤、排序、分页。

/// 列表过滤谓词
pub trait ListFilter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// 保持原有顺序过滤列表
pub fn apply_filter<T, F: ListFilter<T> + ?Sized>(items: Vec<T>, filter: &F) -> Vec<T> {
    items.into_iter().filter(|item| filter.matches(item)).collect()
}

/// 忽略大小写的子串匹配；空关键词视为匹配
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 任一字段匹配关键词
pub fn any_field_matches<'a, I>(fields: I, needle: Option<&str>) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    match needle {
        Some(needle) if !needle.trim().is_empty() => fields
            .into_iter()
            .flatten()
            .any(|field| contains_ignore_case(field, needle)),
        _ => true,
    }
}

/// 可选等值匹配；未指定条件时视为匹配
pub fn matches_eq<T: PartialEq>(expected: Option<&T>, actual: &T) -> bool {
    expected.is_none_or(|e| e == actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        title: &'static str,
        kind: u8,
    }

    struct ByKindAndText {
        kind: Option<u8>,
        search: Option<&'static str>,
    }

    impl ListFilter<Item> for ByKindAndText {
        fn matches(&self, item: &Item) -> bool {
            matches_eq(self.kind.as_ref(), &item.kind)
                && any_field_matches([Some(item.title)], self.search)
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { title: "Reunión de padres", kind: 1 },
            Item { title: "Examen parcial", kind: 2 },
            Item { title: "reunión docente", kind: 1 },
            Item { title: "Feria de ciencias", kind: 3 },
        ]
    }

    #[test]
    fn test_filter_keeps_fetch_order() {
        let filter = ByKindAndText { kind: Some(1), search: Some("REUNIÓN") };
        let result = apply_filter(items(), &filter);
        assert_eq!(
            result.iter().map(|i| i.title).collect::<Vec<_>>(),
            vec!["Reunión de padres", "reunión docente"]
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = ByKindAndText { kind: None, search: Some("e") };
        let once = apply_filter(items(), &filter);
        let twice = apply_filter(once.clone(), &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let filter = ByKindAndText { kind: None, search: Some("  ") };
        assert_eq!(apply_filter(items(), &filter).len(), 4);
    }
}
