use serde::Deserialize;

/// The list shapes the server produces
///
/// Paginated endpoints answer `{items, max_page}`; older ones answer a bare
/// array, which counts as a single page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Paginated {
        items: Vec<T>,
        #[serde(default = "one", alias = "total_pages")]
        max_page: u32,
    },
    Bare(Vec<T>),
}

const fn one() -> u32 {
    1
}

/// Normalized list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub max_page: u32,
}

impl<T> ListResult<T> {
    /// The result used when the server reports no matches (404)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            max_page: 1,
        }
    }
}

impl<T> From<ListPayload<T>> for ListResult<T> {
    fn from(payload: ListPayload<T>) -> Self {
        match payload {
            ListPayload::Paginated { items, max_page } => Self {
                items,
                max_page: max_page.max(1),
            },
            ListPayload::Bare(items) => Self { items, max_page: 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Ticket;
    use crate::test_utils::sample_tickets;

    #[test]
    fn test_paginated_shape() {
        let payload: ListPayload<i64> =
            serde_json::from_str(r#"{"items":[1,2],"max_page":4}"#).unwrap();
        let result = ListResult::from(payload);
        assert_eq!(result.items, vec![1, 2]);
        assert_eq!(result.max_page, 4);
    }

    #[test]
    fn test_bare_array_is_one_page() {
        let payload: ListPayload<i64> = serde_json::from_str("[5,6,7]").unwrap();
        let result = ListResult::from(payload);
        assert_eq!(result.items.len(), 3);
        assert_eq!(result.max_page, 1);
    }

    #[test]
    fn test_ticket_page_decodes() {
        let body = serde_json::json!({ "items": sample_tickets(), "max_page": 2 });
        let payload: ListPayload<Ticket> = serde_json::from_value(body).unwrap();
        let result = ListResult::from(payload);
        assert_eq!(result.items, sample_tickets());
        assert_eq!(result.max_page, 2);
    }

    #[test]
    fn test_zero_max_page_is_clamped() {
        let payload: ListPayload<i64> =
            serde_json::from_str(r#"{"items":[],"total_pages":0}"#).unwrap();
        assert_eq!(ListResult::from(payload).max_page, 1);
    }
}
