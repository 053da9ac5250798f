/// Zero-based page cursor over a server-paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    count: u64,
}

impl Pagination {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            count: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// One-based page number for display.
    pub fn display_page(&self) -> u32 {
        self.page + 1
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Server-reported total. If it shrank below the cursor, the cursor is
    /// pulled back to the last page and true is returned.
    pub fn set_count(&mut self, count: u64) -> bool {
        self.count = count;
        let last = self.last_page();
        if self.page > last {
            self.page = last;
            return true;
        }
        false
    }

    /// `ceil(count / page_size)`; zero for an empty list.
    pub fn page_count(&self) -> u32 {
        let pages = self.count.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    fn last_page(&self) -> u32 {
        self.page_count().saturating_sub(1)
    }

    /// Jump to a one-based page, clamped to the valid range.
    /// Returns true if the cursor moved.
    pub fn go_to(&mut self, display_page: u32) -> bool {
        let target = display_page.saturating_sub(1).min(self.last_page());
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to(self.display_page() + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.go_to(self.page)
    }

    /// Change the page size and go back to the first page.
    /// A zero size is ignored.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if page_size == 0 {
            return false;
        }
        self.page_size = page_size;
        self.page = 0;
        true
    }

    pub fn total_label(&self) -> String {
        format!("共 {} 条记录", self.count)
    }

    pub fn position_label(&self) -> String {
        format!("{}/{}", self.display_page(), self.page_count().max(1))
    }
}

/// Neighbouring entry in a sorted list of page sizes, or the size itself at either end.
pub fn step_page_size(options: &[u32], current: u32, larger: bool) -> u32 {
    let next = if larger {
        options.iter().copied().find(|&s| s > current)
    } else {
        options.iter().rev().copied().find(|&s| s < current)
    };
    next.unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_count(page_size: u32, count: u64) -> Pagination {
        let mut p = Pagination::new(page_size);
        p.set_count(count);
        p
    }

    #[test]
    fn test_page_count() {
        assert_eq!(with_count(10, 0).page_count(), 0);
        assert_eq!(with_count(10, 1).page_count(), 1);
        assert_eq!(with_count(10, 10).page_count(), 1);
        assert_eq!(with_count(10, 11).page_count(), 2);
    }

    #[test]
    fn test_go_to_clamps_to_range() {
        let mut p = with_count(10, 35);
        assert!(p.go_to(9));
        assert_eq!(p.page(), 3);
        assert_eq!(p.display_page(), 4);
        assert!(p.go_to(0));
        assert_eq!(p.page(), 0);
        assert!(!p.go_to(1));
    }

    #[test]
    fn test_empty_list_stays_on_first_page() {
        let mut p = with_count(10, 0);
        assert!(!p.next_page());
        assert!(!p.previous_page());
        assert_eq!(p.page(), 0);
        assert_eq!(p.position_label(), "1/1");
        assert_eq!(p.total_label(), "共 0 条记录");
    }

    #[test]
    fn test_page_size_change_resets_page_for_every_position() {
        for start in 1..=5 {
            for size in [1, 7, 10, 100] {
                let mut p = with_count(10, 50);
                p.go_to(start);
                assert!(p.set_page_size(size));
                assert_eq!(p.page(), 0);
                assert_eq!(p.page_size(), size);
            }
        }
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        let mut p = Pagination::new(0);
        assert_eq!(p.page_size(), 1);
        assert!(!p.set_page_size(0));
        assert_eq!(p.page_size(), 1);
    }

    #[test]
    fn test_shrinking_count_clamps_cursor() {
        let mut p = with_count(10, 35);
        p.go_to(4);
        assert!(p.set_count(15));
        assert_eq!(p.page(), 1);
        assert_eq!(p.position_label(), "2/2");
        assert!(p.set_count(0));
        assert_eq!(p.page(), 0);
        assert!(!p.set_count(100));
        assert_eq!(p.page(), 0);
    }

    #[test]
    fn test_next_and_previous() {
        let mut p = with_count(5, 12);
        assert!(p.next_page());
        assert!(p.next_page());
        assert!(!p.next_page());
        assert_eq!(p.page(), 2);
        assert!(p.previous_page());
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_step_page_size() {
        let options = [10, 20, 50, 100];
        assert_eq!(step_page_size(&options, 10, true), 20);
        assert_eq!(step_page_size(&options, 100, true), 100);
        assert_eq!(step_page_size(&options, 50, false), 20);
        assert_eq!(step_page_size(&options, 10, false), 10);
        assert_eq!(step_page_size(&options, 30, true), 50);
    }
}
