use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::entity::activity;

/// Which window of the activity log the caller wants, selected by the
/// cursor parameter they supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Head of the (filtered) log.
    Newest,
    /// Tail of the log.
    Oldest,
    /// Window at and below the last-seen ordering key.
    Next(i32),
    /// Window at and above the first key of the current page.
    Previous(i32),
}

/// One window of the log, always in descending (reverse-chronological)
/// presentation order.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<i32>,
    pub previous_cursor: Option<i32>,
}

/// Keyset pagination over the activity log, ordering key `activity.id`.
///
/// `base` carries the optional equality filter (e.g. unvoted only); it
/// composes before ordering and key comparison and never leaks into
/// cursor values. Every mode except `Oldest` over-fetches one row to
/// detect the next page without a count query; `Oldest` fetches
/// exactly `page_size` because the tail boundary is known by
/// construction. "Has previous" comes from comparing the first row
/// against the head-of-log key fetched once per request under the same
/// filter.
pub async fn fetch_page<C: ConnectionTrait>(
    db: &C,
    base: Select<activity::Entity>,
    request: PageRequest,
    page_size: u64,
) -> Result<Page<activity::Model>, DbErr> {
    let rows = match request {
        PageRequest::Newest => {
            base.clone()
                .order_by_desc(activity::Column::Id)
                .limit(page_size + 1)
                .all(db)
                .await?
        }
        PageRequest::Next(cursor) => {
            base.clone()
                .filter(activity::Column::Id.lte(cursor))
                .order_by_desc(activity::Column::Id)
                .limit(page_size + 1)
                .all(db)
                .await?
        }
        PageRequest::Previous(cursor) => {
            let mut rows = base
                .clone()
                .filter(activity::Column::Id.gte(cursor))
                .order_by_asc(activity::Column::Id)
                .limit(page_size + 1)
                .all(db)
                .await?;
            rows.reverse();
            rows
        }
        PageRequest::Oldest => {
            let mut rows = base
                .clone()
                .order_by_asc(activity::Column::Id)
                .limit(page_size)
                .all(db)
                .await?;
            rows.reverse();
            rows
        }
    };

    let head_id = base
        .order_by_desc(activity::Column::Id)
        .one(db)
        .await?
        .map(|m| m.id);

    let skipped_back = matches!(request, PageRequest::Previous(_));
    Ok(assemble_page(rows, head_id, page_size as usize, skipped_back))
}

/// Turn over-fetched rows (descending order) into a page with cursors.
///
/// `skipped_back` marks a backward (previous-cursor) request. Walking
/// backwards can land on a short head page while the log continues
/// below it; without a next cursor there the client would be stranded
/// above the rest of the log. In that case the page links forward from
/// its own last row, re-serving that one row at the top of the next
/// page.
fn assemble_page(
    mut rows: Vec<activity::Model>,
    head_id: Option<i32>,
    page_size: usize,
    skipped_back: bool,
) -> Page<activity::Model> {
    let at_head = matches!((rows.first(), head_id), (Some(first), Some(head)) if first.id == head);

    let next_cursor = if rows.len() > page_size {
        let cursor = rows[page_size].id;
        rows.truncate(page_size);
        Some(cursor)
    } else if skipped_back && at_head {
        rows.last().map(|m| m.id)
    } else {
        None
    };

    let previous_cursor = match (rows.first(), head_id) {
        (Some(first), Some(head)) if first.id != head => Some(first.id),
        _ => None,
    };

    Page {
        items: rows,
        next_cursor,
        previous_cursor,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase};

    use super::*;

    fn act(id: i32) -> activity::Model {
        activity::Model {
            id,
            activity_id: format!("a{id}"),
            photo_uid: "101".into(),
            author: "ana".into(),
            kind: "tag".into(),
            content: "sunset".into(),
            vote_sum: 0,
            vote_count: 0,
            created_at: Utc::now(),
        }
    }

    fn ids(page: &Page<activity::Model>) -> Vec<i32> {
        page.items.iter().map(|m| m.id).collect()
    }

    #[test]
    fn full_page_trims_extra_row_into_next_cursor() {
        let rows = vec![act(12), act(11), act(10), act(9), act(8), act(7)];
        let page = assemble_page(rows, Some(12), 5, false);
        assert_eq!(ids(&page), vec![12, 11, 10, 9, 8]);
        assert_eq!(page.next_cursor, Some(7));
        // First row is the head of the log: no previous page.
        assert_eq!(page.previous_cursor, None);
    }

    #[test]
    fn middle_page_has_both_cursors() {
        let rows = vec![act(7), act(6), act(5), act(4), act(3), act(2)];
        let page = assemble_page(rows, Some(12), 5, false);
        assert_eq!(ids(&page), vec![7, 6, 5, 4, 3]);
        assert_eq!(page.next_cursor, Some(2));
        assert_eq!(page.previous_cursor, Some(7));
    }

    #[test]
    fn final_partial_page_has_no_next_cursor() {
        let rows = vec![act(2), act(1)];
        let page = assemble_page(rows, Some(12), 5, false);
        assert_eq!(ids(&page), vec![2, 1]);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.previous_cursor, Some(2));
    }

    #[test]
    fn exactly_one_page_yields_no_cursors() {
        let rows = vec![act(5), act(4), act(3), act(2), act(1)];
        let page = assemble_page(rows, Some(5), 5, false);
        assert_eq!(ids(&page), vec![5, 4, 3, 2, 1]);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.previous_cursor, None);
    }

    #[test]
    fn empty_log_yields_empty_page() {
        let page = assemble_page(vec![], None, 5, false);
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.previous_cursor, None);
    }

    /// A backward jump that lands on a short head page must still link
    /// forward, or the pages between the head and the caller's old
    /// position become unreachable. The link re-serves the page's last
    /// row, so the overlap row tops the following page.
    #[test]
    fn backward_jump_to_short_head_page_links_forward() {
        let rows = vec![act(12), act(11), act(10)];
        let page = assemble_page(rows, Some(12), 5, true);
        assert_eq!(ids(&page), vec![12, 11, 10]);
        assert_eq!(page.next_cursor, Some(10));
        assert_eq!(page.previous_cursor, None);
    }

    /// The same short head page reached forward is simply the whole
    /// log; a next cursor there would loop the client.
    #[test]
    fn forward_short_head_page_has_no_next() {
        let rows = vec![act(12), act(11), act(10)];
        let page = assemble_page(rows, Some(12), 5, false);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.previous_cursor, None);
    }

    /// Following next cursors from the head visits every entry exactly
    /// once, in descending order, and the last page reports no next.
    #[test]
    fn next_chain_walks_the_whole_log() {
        let all: Vec<i32> = (1..=12).rev().collect();
        let page_size = 5usize;
        let head = Some(12);

        let mut visited = Vec::new();
        let mut cursor: Option<i32> = None;
        loop {
            // Mirror the query each mode issues: descending, bounded
            // above by the cursor, over-fetched by one.
            let window: Vec<activity::Model> = all
                .iter()
                .filter(|&&id| cursor.is_none_or(|c| id <= c))
                .take(page_size + 1)
                .map(|&id| act(id))
                .collect();
            let page = assemble_page(window, head, page_size, false);
            visited.extend(ids(&page));
            match page.next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        assert_eq!(visited, all);
    }

    #[tokio::test]
    async fn fetch_page_over_empty_log() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<activity::Model>::new(), vec![]])
            .into_connection();

        let page = fetch_page(&db, activity::Entity::find(), PageRequest::Newest, 5)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.previous_cursor, None);
    }

    #[tokio::test]
    async fn fetch_page_newest_trims_and_links() {
        let rows: Vec<activity::Model> = (7..=12).rev().map(act).collect();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows, vec![act(12)]])
            .into_connection();

        let page = fetch_page(&db, activity::Entity::find(), PageRequest::Newest, 5)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![12, 11, 10, 9, 8]);
        assert_eq!(page.next_cursor, Some(7));
        assert_eq!(page.previous_cursor, None);
    }

    #[tokio::test]
    async fn fetch_page_previous_restores_descending_order() {
        // Previous fetches ascending from the cursor; the engine must
        // reverse before assembling.
        let ascending: Vec<activity::Model> = (7..=12).map(act).collect();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ascending, vec![act(12)]])
            .into_connection();

        let page = fetch_page(&db, activity::Entity::find(), PageRequest::Previous(7), 5)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![12, 11, 10, 9, 8]);
        assert_eq!(page.next_cursor, Some(7));
        assert_eq!(page.previous_cursor, None);
    }

    #[tokio::test]
    async fn fetch_page_previous_at_head_keeps_forward_link() {
        // Only three rows above the cursor: the head page is short, and
        // the backward request still gets a next cursor back down.
        let ascending: Vec<activity::Model> = (10..=12).map(act).collect();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ascending, vec![act(12)]])
            .into_connection();

        let page = fetch_page(&db, activity::Entity::find(), PageRequest::Previous(10), 5)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![12, 11, 10]);
        assert_eq!(page.next_cursor, Some(10));
        assert_eq!(page.previous_cursor, None);
    }
}
