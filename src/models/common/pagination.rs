use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

/// 单页最大条数
pub const MAX_PAGE_SIZE: i64 = 100;

/// 页码上限，保证 `page * MAX_PAGE_SIZE` 不溢出
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
    /// 当前页第一条的序号（从 1 开始）
    pub range_start: i64,
    /// 当前页最后一条的序号；总数为 0 时为 0
    pub range_end: i64,
}

impl PaginationInfo {
    /// 由页码、页大小和总数构建分页信息
    ///
    /// 显示区间为 `[(page-1)*size+1, min(page*size, total)]`。
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let (page, page_size) = normalize_page(Some(page), Some(page_size), page_size);
        let total = total.max(0);
        let total_pages = if total == 0 {
            0
        } else {
            (total - 1) / page_size + 1
        };

        Self {
            page,
            page_size,
            total,
            total_pages,
            range_start: (page - 1) * page_size + 1,
            range_end: (page * page_size).min(total),
        }
    }

    /// 当前页在完整列表中的下标区间（左闭右开）
    pub fn slice_bounds(&self) -> (usize, usize) {
        let start = ((self.range_start - 1).max(0) as usize).min(self.total as usize);
        let end = (self.range_end.max(0) as usize).max(start);
        (start, end)
    }
}

/// 规范化页码与页大小：页码限制在 1..=MAX_PAGE，页大小限制在 1..=100
pub fn normalize_page(page: Option<i64>, size: Option<i64>, default_size: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let size = size.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE);
    (page, size)
}

/// 对已加载到内存的列表分页（用于派生字段过滤后的结果）
pub fn paginate_slice<T>(items: Vec<T>, page: i64, size: i64) -> (Vec<T>, PaginationInfo) {
    let info = PaginationInfo::new(page, size, items.len() as i64);
    let (start, end) = info.slice_bounds();
    let page_items = items.into_iter().skip(start).take(end - start).collect();
    (page_items, info)
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_range() {
        for (page, size, total) in [(1, 10, 95), (3, 10, 95), (10, 10, 95), (2, 20, 20), (4, 7, 30)] {
            let info = PaginationInfo::new(page, size, total);
            assert_eq!(info.range_start, (page - 1) * size + 1);
            assert_eq!(info.range_end, (page * size).min(total));
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationInfo::new(1, 10, 95).total_pages, 10);
        assert_eq!(PaginationInfo::new(1, 10, 100).total_pages, 10);
        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn test_clamps_page_and_size() {
        let info = PaginationInfo::new(0, 1000, 5);
        assert_eq!(info.page, 1);
        assert_eq!(info.page_size, MAX_PAGE_SIZE);
        assert_eq!(info.range_end, 5);
    }

    #[test]
    fn test_paginate_slice() {
        let items: Vec<i32> = (1..=25).collect();
        let (page, info) = paginate_slice(items.clone(), 3, 10);
        assert_eq!(page, vec![21, 22, 23, 24, 25]);
        assert_eq!(info.range_start, 21);
        assert_eq!(info.range_end, 25);

        // 超出范围的页返回空列表
        let (page, info) = paginate_slice(items, 5, 10);
        assert!(page.is_empty());
        assert_eq!(info.range_end, 25);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let info = PaginationInfo::new(i64::MAX, 10, 3);
        assert_eq!(info.page, MAX_PAGE);
        assert!(info.range_start > info.total);
        assert_eq!(info.range_end, 3);

        let (page, info) = paginate_slice(vec![1, 2, 3], i64::MAX, MAX_PAGE_SIZE);
        assert!(page.is_empty());
        assert_eq!(info.total_pages, 1);
    }

    #[test]
    fn test_query_accepts_string_numbers() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"2","size":"15"}"#).unwrap();
        assert_eq!(q.page, 2);
        assert_eq!(q.size, 15);
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((q.page, q.size), (1, 10));
    }
}
