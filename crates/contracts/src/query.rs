//! List query state and pagination math shared by every generic list.

use std::fmt::Write as _;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Current query of a generic list. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search_term: String,
    pub status_filter: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search_term: String::new(),
            status_filter: None,
        }
    }
}

impl ListQuery {
    pub fn with_status(status: Option<String>) -> Self {
        Self {
            status_filter: status,
            ..Self::default()
        }
    }

    pub fn skip(&self) -> u32 {
        self.page.saturating_sub(1) * self.limit
    }

    /// Builds the `skip&limit&search_term&situacao` query string. Empty or
    /// whitespace-only search terms are omitted.
    pub fn query_string(&self) -> String {
        let mut qs = format!("skip={}&limit={}", self.skip(), self.limit);
        let term = self.search_term.trim();
        if !term.is_empty() {
            let _ = write!(qs, "&search_term={}", urlencoding::encode(term));
        }
        if let Some(status) = &self.status_filter {
            let _ = write!(qs, "&situacao={}", urlencoding::encode(status));
        }
        qs
    }
}

/// What the server told us about the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub total_count: u32,
    pub limit: u32,
}

impl PageInfo {
    /// Ceiling division, but an empty result set still has one page so the
    /// pager always renders "1 / 1".
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        self.total_count.div_ceil(self.limit).max(1)
    }

    pub fn has_prev(&self, page: u32) -> bool {
        page > 1
    }

    pub fn has_next(&self, page: u32) -> bool {
        page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(total_count: u32, limit: u32) -> PageInfo {
        PageInfo { total_count, limit }
    }

    #[test]
    fn total_pages_is_ceiling_with_floor_of_one() {
        assert_eq!(info(0, 10).total_pages(), 1);
        assert_eq!(info(1, 10).total_pages(), 1);
        assert_eq!(info(10, 10).total_pages(), 1);
        assert_eq!(info(11, 10).total_pages(), 2);
        assert_eq!(info(95, 10).total_pages(), 10);
        assert_eq!(info(0, 0).total_pages(), 1);
    }

    #[test]
    fn first_and_last_page_bounds() {
        let p = info(25, 10);
        assert!(!p.has_prev(1));
        assert!(p.has_next(1));
        assert!(p.has_prev(3));
        assert!(!p.has_next(3));
    }

    #[test]
    fn skip_is_zero_based_offset() {
        let mut q = ListQuery::default();
        assert_eq!(q.skip(), 0);
        q.page = 3;
        assert_eq!(q.skip(), 20);
    }

    #[test]
    fn query_string_omits_blank_search() {
        let q = ListQuery::default();
        assert_eq!(q.query_string(), "skip=0&limit=10");

        let q = ListQuery {
            search_term: "   ".into(),
            ..Default::default()
        };
        assert_eq!(q.query_string(), "skip=0&limit=10");
    }

    #[test]
    fn query_string_encodes_search_and_status() {
        let q = ListQuery {
            page: 2,
            limit: 10,
            search_term: "caixa papelão".into(),
            status_filter: Some("Aprovação".into()),
        };
        assert_eq!(
            q.query_string(),
            "skip=10&limit=10&search_term=caixa%20papel%C3%A3o&situacao=Aprova%C3%A7%C3%A3o"
        );
    }
}
