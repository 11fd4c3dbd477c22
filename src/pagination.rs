use serde::{Deserialize, Serialize};

/// One slice of a feed plus the navigation metadata the presentation layer
/// renders as pager controls.
#[derive(Serialize, Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Slices feeds into fixed-size pages. The page size is injected from
/// configuration rather than read from module state so every feed-producing
/// operation shares one explicit value.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    page_size: u64,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: u64::from(page_size.max(1)),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// An empty feed still has exactly one (empty) page.
    pub fn total_pages(&self, total_items: u64) -> u64 {
        if total_items == 0 {
            1
        } else {
            (total_items + self.page_size - 1) / self.page_size
        }
    }

    /// Requests past the last page clamp to the last page instead of erroring.
    pub fn clamp(&self, requested: u64, total_items: u64) -> u64 {
        requested.clamp(1, self.total_pages(total_items))
    }

    /// Row offset of a (clamped) page number.
    pub fn offset(&self, number: u64) -> u64 {
        (number - 1) * self.page_size
    }

    /// Assembles the page object for an already-clamped page number.
    pub fn page_of<T>(&self, items: Vec<T>, number: u64, total_items: u64) -> Page<T> {
        let total_pages = self.total_pages(total_items);
        Page {
            has_previous: number > 1,
            has_next: number < total_pages,
            items,
            number,
            total_pages,
            total_items,
        }
    }
}

/// Query parameters accepted by every feed route.
///
/// `page` is kept as a raw string: an absent or non-numeric value falls back
/// to page 1 rather than rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> u64 {
        parse_page_param(self.page.as_deref())
    }
}

pub fn parse_page_param(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let pager = Pager::new(10);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(10), 1);
        assert_eq!(pager.total_pages(11), 2);
        assert_eq!(pager.total_pages(14), 2);
        assert_eq!(pager.total_pages(20), 2);
        assert_eq!(pager.total_pages(21), 3);
    }

    #[test]
    fn clamp_limits_to_last_page() {
        let pager = Pager::new(10);
        assert_eq!(pager.clamp(1, 14), 1);
        assert_eq!(pager.clamp(2, 14), 2);
        assert_eq!(pager.clamp(3, 14), 2);
        assert_eq!(pager.clamp(99, 14), 2);
        assert_eq!(pager.clamp(5, 0), 1);
    }

    #[test]
    fn offset_is_zero_based() {
        let pager = Pager::new(10);
        assert_eq!(pager.offset(1), 0);
        assert_eq!(pager.offset(2), 10);
        assert_eq!(pager.offset(3), 20);
    }

    #[test]
    fn page_of_sets_navigation_flags() {
        let pager = Pager::new(10);

        let first = pager.page_of(vec![0; 10], 1, 14);
        assert!(!first.has_previous);
        assert!(first.has_next);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_items, 14);

        let last = pager.page_of(vec![0; 4], 2, 14);
        assert!(last.has_previous);
        assert!(!last.has_next);

        let only = pager.page_of(Vec::<i32>::new(), 1, 0);
        assert!(!only.has_previous);
        assert!(!only.has_next);
        assert_eq!(only.total_pages, 1);
    }

    #[test]
    fn page_size_of_zero_is_bumped_to_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
    }

    #[test]
    fn page_param_defaults_to_first_page() {
        assert_eq!(parse_page_param(None), 1);
        assert_eq!(parse_page_param(Some("")), 1);
        assert_eq!(parse_page_param(Some("abc")), 1);
        assert_eq!(parse_page_param(Some("0")), 1);
        assert_eq!(parse_page_param(Some("-3")), 1);
        assert_eq!(parse_page_param(Some("2")), 2);
        assert_eq!(parse_page_param(Some(" 7 ")), 7);
    }
}
