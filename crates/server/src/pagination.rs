use matching::Page;
use serde::Deserialize;

pub const MAX_PAGE_SIZE: u64 = 100;

/// Optional pagination query parameters.
///
/// Lists are paginated only when both the page number (starting at 1)
/// and the page size are present.
#[derive(Default, Deserialize)]
pub struct Pagination {
    page: Option<u64>,
    page_size: Option<u64>,
}

impl Pagination {
    pub fn page(&self) -> Option<Page> {
        let limit = self.page_size?.min(MAX_PAGE_SIZE);
        let offset = self.page?.saturating_sub(1).saturating_mul(limit);

        Some(Page { offset, limit })
    }
}

#[cfg(test)]
mod tests {
    use matching::Page;

    use super::{Pagination, MAX_PAGE_SIZE};

    #[test]
    fn both_parameters_are_required() {
        let pagination = Pagination {
            page: Some(2),
            page_size: None,
        };

        assert_eq!(pagination.page(), None);
        assert_eq!(Pagination::default().page(), None);
    }

    #[test]
    fn pages_start_at_one() {
        let pagination = Pagination {
            page: Some(3),
            page_size: Some(20),
        };

        assert_eq!(
            pagination.page(),
            Some(Page {
                offset: 40,
                limit: 20
            })
        );

        let pagination = Pagination {
            page: Some(0),
            page_size: Some(5),
        };

        assert_eq!(
            pagination.page(),
            Some(Page {
                offset: 0,
                limit: 5
            })
        );
    }

    #[test]
    fn page_size_is_capped() {
        let pagination = Pagination {
            page: Some(1),
            page_size: Some(10_000),
        };

        assert_eq!(pagination.page().map(|page| page.limit), Some(MAX_PAGE_SIZE));
    }
}
