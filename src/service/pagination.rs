//! Count-based pagination for list pages.
//!
//! The paginator only needs the total row count; the caller fetches the
//! rows of the selected page with `LIMIT`/`OFFSET` and hands them back to
//! [`Paginator::page`].

use serde::Serialize;
use thiserror::Error as ThisError;

/// Query-string value selecting the final page.
pub const LAST_PAGE: &str = "last";

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PaginationError {
    #[error("That page contains no results")]
    EmptyPage,
    #[error("That page number is not an integer")]
    PageNotAnInteger,
    #[error("That page number is less than 1")]
    LessThanOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    count: usize,
    per_page: usize,
}

impl Paginator {
    pub fn new(count: usize, per_page: usize) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Resolve the raw `page` query value to a page number.
    ///
    /// Missing or blank values select page 1.
    pub fn validate_number(&self, raw: Option<&str>) -> Result<usize, PaginationError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(1);
        }
        if raw == LAST_PAGE {
            return Ok(self.num_pages());
        }
        let number: usize = raw
            .parse()
            .map_err(|_| PaginationError::PageNotAnInteger)?;
        if number < 1 {
            return Err(PaginationError::LessThanOne);
        }
        if number > self.num_pages() {
            return Err(PaginationError::EmptyPage);
        }
        Ok(number)
    }

    /// Row offset of the first item on page `number`.
    pub fn offset(&self, number: usize) -> usize {
        number.saturating_sub(1) * self.per_page
    }

    pub fn page<T>(&self, object_list: Vec<T>, number: usize) -> Page<T> {
        Page {
            object_list,
            number,
            paginator: *self,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: usize,
    pub paginator: Paginator,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.paginator.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then_some(self.number - 1)
    }

    /// 1-based index of the first object on this page, 0 for an empty page.
    pub fn start_index(&self) -> usize {
        if self.paginator.count() == 0 {
            0
        } else {
            self.paginator.offset(self.number) + 1
        }
    }

    pub fn end_index(&self) -> usize {
        self.paginator.offset(self.number) + self.object_list.len()
    }

    /// Navigation data for templates, without the objects themselves.
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            number: self.number,
            num_pages: self.paginator.num_pages(),
            count: self.paginator.count(),
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            next_page_number: self.next_page_number(),
            previous_page_number: self.previous_page_number(),
            start_index: self.start_index(),
            end_index: self.end_index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
    pub start_index: usize,
    pub end_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items_make_three_pages_of_five() {
        let p = Paginator::new(13, 5);
        assert_eq!(p.num_pages(), 3);
        assert_eq!(p.offset(1), 0);
        assert_eq!(p.offset(3), 10);

        let last = p.page(vec![11, 12, 13], 3);
        assert!(!last.has_next());
        assert!(last.has_previous());
        assert_eq!(last.start_index(), 11);
        assert_eq!(last.end_index(), 13);
    }

    #[test]
    fn empty_result_set_has_one_empty_page() {
        let p = Paginator::new(0, 5);
        assert_eq!(p.num_pages(), 1);
        assert_eq!(p.validate_number(None), Ok(1));
        let page = p.page(Vec::<u8>::new(), 1);
        assert!(!page.has_other_pages());
        assert_eq!(page.start_index(), 0);
        assert_eq!(page.end_index(), 0);
    }

    #[test]
    fn page_numbers_are_validated() {
        let p = Paginator::new(13, 5);
        assert_eq!(p.validate_number(Some("")), Ok(1));
        assert_eq!(p.validate_number(Some("2")), Ok(2));
        assert_eq!(p.validate_number(Some("last")), Ok(3));
        assert_eq!(p.validate_number(Some("0")), Err(PaginationError::LessThanOne));
        assert_eq!(p.validate_number(Some("4")), Err(PaginationError::EmptyPage));
        assert_eq!(
            p.validate_number(Some("two")),
            Err(PaginationError::PageNotAnInteger)
        );
    }

    #[test]
    fn meta_reports_navigation() {
        let p = Paginator::new(13, 5);
        let meta = p.page(vec![(); 5], 2).meta();
        assert_eq!(meta.previous_page_number, Some(1));
        assert_eq!(meta.next_page_number, Some(3));
        assert_eq!(meta.num_pages, 3);
        assert_eq!(meta.count, 13);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(Paginator::new(3, 0).num_pages(), 3);
    }
}
