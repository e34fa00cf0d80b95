//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size, larger requests are lowered to it.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated page request, ready to be turned into `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    /// The 1-based page number.
    pub number: u64,
    /// The number of items per page.
    pub size: u64,
}

impl Page {
    /// Build a page from the raw `page` and `perPage` query parameters,
    /// falling back to the defaults in `config` for missing or empty values.
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if either value is not a positive
    /// integer.
    ///
    /// A page size larger than `config.max_page_size` is lowered to it.
    pub(crate) fn from_params(
        page: Option<&str>,
        per_page: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let number = parse_positive("page", page)?.unwrap_or(config.default_page);
        let size = parse_positive("perPage", per_page)?
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);

        let page = Self { number, size };
        // Reject pages whose offset cannot be represented in SQL.
        page.offset()?;

        Ok(page)
    }

    /// The number of items to skip, `(number - 1) * size`.
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if the offset overflows an SQLite integer.
    pub(crate) fn offset(&self) -> Result<i64, Error> {
        self.number
            .saturating_sub(1)
            .checked_mul(self.size)
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or_else(|| Error::InvalidRequest(format!("page {} is too large", self.number)))
    }

    /// The maximum number of items on the page.
    pub(crate) fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }
}

fn parse_positive(name: &str, value: Option<&str>) -> Result<Option<u64>, Error> {
    let Some(text) = value.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };

    match text.parse::<u64>() {
        Ok(number) if number > 0 => Ok(Some(number)),
        _ => Err(Error::InvalidRequest(format!(
            "{name} must be a positive integer, got \"{text}\""
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{Page, PaginationConfig};

    #[test]
    fn missing_params_use_defaults() {
        let config = PaginationConfig::default();

        let got = Page::from_params(None, Some(""), &config).unwrap();

        assert_eq!(got, Page { number: 1, size: 10 });
        assert_eq!(got.offset(), Ok(0));
        assert_eq!(got.limit(), 10);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let config = PaginationConfig::default();

        let got = Page::from_params(Some("3"), Some("25"), &config).unwrap();

        assert_eq!(got.offset(), Ok(50));
        assert_eq!(got.limit(), 25);
    }

    #[test]
    fn rejects_zero_and_non_numeric_values() {
        let config = PaginationConfig::default();

        for (page, per_page) in [
            (Some("0"), None),
            (Some("-1"), None),
            (Some("one"), None),
            (None, Some("0")),
            (None, Some("1.5")),
        ] {
            let got = Page::from_params(page, per_page, &config);

            assert!(
                matches!(got, Err(Error::InvalidRequest(_))),
                "want invalid request for page={page:?} perPage={per_page:?}, got {got:?}"
            );
        }
    }

    #[test]
    fn clamps_page_size_to_max() {
        let config = PaginationConfig {
            max_page_size: 50,
            ..Default::default()
        };

        let at_max = Page::from_params(None, Some("50"), &config).unwrap();
        let above_max = Page::from_params(Some("2"), Some("51"), &config).unwrap();

        assert_eq!(at_max.limit(), 50);
        assert_eq!(above_max, Page { number: 2, size: 50 });
        assert_eq!(above_max.offset(), Ok(50));
    }

    #[test]
    fn rejects_overflowing_offset() {
        let config = PaginationConfig::default();

        let got = Page::from_params(Some(u64::MAX.to_string().as_str()), Some("100"), &config);

        assert!(matches!(got, Err(Error::InvalidRequest(_))));
    }
}
