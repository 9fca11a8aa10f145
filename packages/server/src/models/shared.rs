use serde::Deserialize;

use crate::error::AppError;
use crate::pagination::PageRequest;

/// Cursor parameters accepted by every paginated listing.
///
/// At most one positioning parameter may be given; with none the
/// newest page is served.
#[derive(Debug, Default, Deserialize)]
pub struct CursorQuery {
    pub next: Option<i32>,
    pub previous: Option<i32>,
    #[serde(default)]
    pub oldest: bool,
}

impl CursorQuery {
    pub fn to_page_request(&self) -> Result<PageRequest, AppError> {
        let positional = usize::from(self.next.is_some())
            + usize::from(self.previous.is_some())
            + usize::from(self.oldest);
        if positional > 1 {
            return Err(AppError::Validation(
                "At most one of next, previous, oldest may be given".into(),
            ));
        }

        Ok(match (self.next, self.previous, self.oldest) {
            (Some(c), _, _) => PageRequest::Next(c),
            (_, Some(c), _) => PageRequest::Previous(c),
            (_, _, true) => PageRequest::Oldest,
            _ => PageRequest::Newest,
        })
    }
}

/// Validate a trimmed author handle (1-128 characters).
pub fn validate_author(author: &str, field: &str) -> Result<(), AppError> {
    let author = author.trim();
    if author.is_empty() || author.chars().count() > 128 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-128 characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_means_newest() {
        let query = CursorQuery::default();
        assert_eq!(query.to_page_request().unwrap(), PageRequest::Newest);
    }

    #[test]
    fn next_cursor_is_selected() {
        let query = CursorQuery {
            next: Some(42),
            ..Default::default()
        };
        assert_eq!(query.to_page_request().unwrap(), PageRequest::Next(42));
    }

    #[test]
    fn previous_cursor_is_selected() {
        let query = CursorQuery {
            previous: Some(7),
            ..Default::default()
        };
        assert_eq!(query.to_page_request().unwrap(), PageRequest::Previous(7));
    }

    #[test]
    fn oldest_flag_is_selected() {
        let query = CursorQuery {
            oldest: true,
            ..Default::default()
        };
        assert_eq!(query.to_page_request().unwrap(), PageRequest::Oldest);
    }

    #[test]
    fn conflicting_parameters_are_rejected() {
        let query = CursorQuery {
            next: Some(1),
            previous: Some(2),
            oldest: false,
        };
        assert!(query.to_page_request().is_err());
    }

    #[test]
    fn author_validation() {
        assert!(validate_author("ana", "recipient").is_ok());
        assert!(validate_author("  ", "recipient").is_err());
        assert!(validate_author(&"x".repeat(129), "recipient").is_err());
    }
}
