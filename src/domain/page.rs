// Caller-driven pagination (skip/limit) for list endpoints
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// One page of a list endpoint. `total` is only present when the server reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: Option<u64>) -> Self {
        Self { items, total }
    }
}

/// Translate a 1-based page number into the `(skip, limit)` pair sent upstream.
pub fn page_window(page: u32, page_size: u32) -> (u32, u32) {
    let page = page.max(1);
    ((page - 1).saturating_mul(page_size), page_size)
}

/// Position of a loaded page within the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_items: Option<u64>,
    pub total_pages: Option<u32>,
    pub has_more: bool,
    pub first_item: u64,
    pub last_item: u64,
}

impl PageInfo {
    pub fn new(page: u32, page_size: u32, item_count: usize, total: Option<u64>) -> Self {
        let page = page.max(1);
        let (skip, _) = page_window(page, page_size);

        // Without a server-reported total, a full page means there may be more.
        let (total_pages, has_more) = match total {
            Some(total) if page_size > 0 => {
                let pages = total.div_ceil(page_size as u64).max(1);
                let pages = u32::try_from(pages).unwrap_or(u32::MAX);
                (Some(pages), page < pages)
            }
            Some(_) => (Some(1), false),
            None => (
                None,
                page < u32::MAX && page_size > 0 && item_count as u32 >= page_size,
            ),
        };

        let first_item = if item_count == 0 { 0 } else { skip as u64 + 1 };
        let last_item = skip as u64 + item_count as u64;

        Self {
            page,
            page_size,
            total_items: total,
            total_pages,
            has_more,
            first_item,
            last_item,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        for page_size in [1u32, 8, 10, 25] {
            for page in 1u32..=20 {
                let (skip, limit) = page_window(page, page_size);
                assert_eq!(skip, (page - 1) * page_size);
                assert_eq!(limit, page_size);
            }
        }
        // page 0 is treated as the first page
        assert_eq!(page_window(0, 8), (0, 8));
    }

    #[test]
    fn test_page_window_saturates() {
        assert_eq!(page_window(u32::MAX, 8), (u32::MAX, 8));

        let info = PageInfo::new(u32::MAX, 8, 8, None);
        assert!(!info.has_more);
        assert_eq!(info.first_item, u32::MAX as u64 + 1);
    }

    #[test]
    fn test_huge_total_clamps_page_count() {
        let info = PageInfo::new(1, 1, 1, Some(u64::MAX));
        assert_eq!(info.total_pages, Some(u32::MAX));
        assert!(info.has_more);
    }

    #[test]
    fn test_page_info_with_reported_total() {
        let info = PageInfo::new(2, 8, 8, Some(20));
        assert_eq!(info.total_pages, Some(3));
        assert!(info.has_more);
        assert!(info.has_previous());
        assert_eq!((info.first_item, info.last_item), (9, 16));

        let last = PageInfo::new(3, 8, 4, Some(20));
        assert!(!last.has_more);
        assert_eq!((last.first_item, last.last_item), (17, 20));
    }

    #[test]
    fn test_page_info_without_total() {
        let full = PageInfo::new(1, 8, 8, None);
        assert_eq!(full.total_pages, None);
        assert!(full.has_more);

        let partial = PageInfo::new(2, 8, 3, None);
        assert!(!partial.has_more);

        let empty = PageInfo::new(1, 8, 0, None);
        assert_eq!((empty.first_item, empty.last_item), (0, 0));
        assert!(!empty.has_more);
    }

    #[test]
    fn test_page_deserialize_total_optional() {
        let page: Page<u32> = serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, None);

        let page: Page<u32> = serde_json::from_str(r#"{"items": [], "total": 16}"#).unwrap();
        assert_eq!(page.total, Some(16));
    }
}
