//! Breadth-first crawl of the remote block tree.
//!
//! The queue is seeded with `(root, 0)` and the visited set with the root id.
//! Each dequeued node deeper than `max_depth` is discarded without a fetch;
//! otherwise all of its children are fetched (following pagination cursors)
//! and appended to the result in API order. Children with `has_children`
//! that have not been seen are enqueued one level deeper.
//!
//! The root itself never appears in the result. Every fetched block is kept,
//! so a block listed under several parents (synced copies) appears once per
//! listing; the visited set only stops a node from being fetched twice.

use std::collections::{HashSet, VecDeque};

use driftwatch_core::{Block, PageId};

use crate::client::BlockSource;
use crate::error::AuditError;

/// Crawl the tree under `root`. The first failing fetch aborts the crawl.
pub fn crawl<S>(
    source: &S,
    root: &PageId,
    max_depth: usize,
    page_size: u32,
) -> Result<Vec<Block>, AuditError>
where
    S: BlockSource + ?Sized,
{
    let mut blocks = Vec::new();
    let mut visited: HashSet<String> = HashSet::from([root.as_str().to_string()]);
    let mut queue: VecDeque<(String, usize)> = VecDeque::from([(root.as_str().to_string(), 0)]);
    let mut requests = 0usize;

    while let Some((id, depth)) = queue.pop_front() {
        if depth > max_depth {
            continue;
        }

        for child in fetch_all_children(source, &id, page_size, &mut requests)? {
            if child.has_children && visited.insert(child.id.0.clone()) {
                queue.push_back((child.id.0.clone(), depth + 1));
            }
            blocks.push(child);
        }
        tracing::debug!(node = %id, depth, total = blocks.len(), "crawled node");
    }

    tracing::info!(root = %root, blocks = blocks.len(), requests, "crawl complete");
    Ok(blocks)
}

fn fetch_all_children<S>(
    source: &S,
    id: &str,
    page_size: u32,
    requests: &mut usize,
) -> Result<Vec<Block>, AuditError>
where
    S: BlockSource + ?Sized,
{
    let mut children = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = source.fetch_children(id, page_size, cursor.as_deref())?;
        *requests += 1;
        children.extend(page.results);
        match page.next_cursor {
            Some(next) if page.has_more => {
                if cursor.as_deref() == Some(next.as_str()) {
                    return Err(AuditError::Parse(format!(
                        "children of {id}: next_cursor repeats '{next}'"
                    )));
                }
                cursor = Some(next);
            }
            _ => break,
        }
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChildrenPage;
    use driftwatch_core::BlockKind;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const ROOT: &str = "00000000000000000000000000000000";

    /// In-memory tree keyed by parent id; records every request.
    #[derive(Default)]
    struct FakeTree {
        children: HashMap<String, Vec<Block>>,
        page_limit: Option<usize>,
        calls: RefCell<Vec<(String, Option<String>)>>,
    }

    impl FakeTree {
        fn with(mut self, parent: &str, kids: Vec<Block>) -> Self {
            self.children.insert(parent.to_string(), kids);
            self
        }

        fn fetched(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(id, _)| id.clone()).collect()
        }
    }

    impl BlockSource for FakeTree {
        fn fetch_children(
            &self,
            block_id: &str,
            _page_size: u32,
            start_cursor: Option<&str>,
        ) -> Result<ChildrenPage, AuditError> {
            self.calls
                .borrow_mut()
                .push((block_id.to_string(), start_cursor.map(str::to_string)));
            let all = self.children.get(block_id).cloned().unwrap_or_default();
            let Some(limit) = self.page_limit else {
                return Ok(ChildrenPage { results: all, has_more: false, next_cursor: None });
            };
            let start: usize = start_cursor.map_or(0, |c| c.parse().expect("cursor"));
            let end = (start + limit).min(all.len());
            let has_more = end < all.len();
            Ok(ChildrenPage {
                results: all[start..end].to_vec(),
                has_more,
                next_cursor: has_more.then(|| end.to_string()),
            })
        }
    }

    struct Failing;

    impl BlockSource for Failing {
        fn fetch_children(&self, _: &str, _: u32, _: Option<&str>) -> Result<ChildrenPage, AuditError> {
            Err(AuditError::Network { message: "timed out".into() })
        }
    }

    fn root() -> PageId {
        PageId::canonicalize(ROOT).expect("root")
    }

    fn root_key() -> String {
        root().as_str().to_string()
    }

    fn ids(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.id.0.as_str()).collect()
    }

    #[test]
    fn breadth_first_order_across_levels() {
        let tree = FakeTree::default()
            .with(&root_key(), vec![
                Block::child_page("p1", "One").with_children(),
                Block::paragraph("a", "x"),
                Block::child_page("p2", "Two").with_children(),
            ])
            .with("p1", vec![Block::paragraph("p1-a", "y")])
            .with("p2", vec![Block::paragraph("p2-a", "z")]);

        let blocks = crawl(&tree, &root(), 8, 100).expect("crawl");
        assert_eq!(ids(&blocks), vec!["p1", "a", "p2", "p1-a", "p2-a"]);
        assert_eq!(tree.fetched(), vec![root_key(), "p1".into(), "p2".into()]);
    }

    #[test]
    fn shared_child_is_fetched_once() {
        let shared = Block::child_page("shared", "Shared").with_children();
        let tree = FakeTree::default()
            .with(&root_key(), vec![
                Block::child_page("p1", "One").with_children(),
                Block::child_page("p2", "Two").with_children(),
            ])
            .with("p1", vec![shared.clone()])
            .with("p2", vec![shared])
            .with("shared", vec![Block::paragraph("leaf", "leaf")]);

        let blocks = crawl(&tree, &root(), 8, 100).expect("crawl");
        assert_eq!(ids(&blocks), vec!["p1", "p2", "shared", "shared", "leaf"]);
        let shared_fetches = tree.fetched().iter().filter(|id| *id == "shared").count();
        assert_eq!(shared_fetches, 1);
    }

    #[test]
    fn depth_zero_fetches_no_grandchildren() {
        let tree = FakeTree::default()
            .with(&root_key(), vec![Block::child_page("p1", "One").with_children()])
            .with("p1", vec![Block::paragraph("deep", "never")]);

        let blocks = crawl(&tree, &root(), 0, 100).expect("crawl");
        assert_eq!(ids(&blocks), vec!["p1"]);
        assert_eq!(tree.fetched(), vec![root_key()]);
    }

    #[test]
    fn cycle_back_to_root_terminates() {
        let tree = FakeTree::default()
            .with(&root_key(), vec![Block::child_page("p1", "One").with_children()])
            .with("p1", vec![Block::child_page(root_key().as_str(), "Root again").with_children()]);

        let blocks = crawl(&tree, &root(), 8, 100).expect("crawl");
        let key = root_key();
        assert_eq!(ids(&blocks), vec!["p1", key.as_str()]);
        let root_fetches = tree.fetched().iter().filter(|id| **id == root_key()).count();
        assert_eq!(root_fetches, 1);
    }

    #[test]
    fn synced_copies_keep_both_marker_sections() {
        let section = vec![Block::callout("m", "New Navigation Block"), Block::link_to_page("l", ROOT)];
        let tree = FakeTree::default()
            .with(&root_key(), vec![
                Block::new("orig", BlockKind::Unsupported { kind: "synced_block".into(), plain_text: Vec::new() })
                    .with_children(),
                Block::paragraph("old", "old links"),
                Block::paragraph("stale-link", "stale"),
                Block::new("copy", BlockKind::Unsupported { kind: "synced_block".into(), plain_text: Vec::new() })
                    .with_children(),
            ])
            .with("orig", section.clone())
            .with("copy", section);

        let blocks = crawl(&tree, &root(), 8, 100).expect("crawl");
        assert_eq!(
            ids(&blocks),
            vec!["orig", "old", "stale-link", "copy", "m", "l", "m", "l"]
        );
    }

    #[test]
    fn repeated_cursor_is_a_parse_error() {
        struct Stuck;
        impl BlockSource for Stuck {
            fn fetch_children(&self, _: &str, _: u32, _: Option<&str>) -> Result<ChildrenPage, AuditError> {
                Ok(ChildrenPage {
                    results: vec![Block::paragraph("x", "x")],
                    has_more: true,
                    next_cursor: Some("same".into()),
                })
            }
        }

        let err = crawl(&Stuck, &root(), 8, 100).unwrap_err();
        assert!(matches!(err, AuditError::Parse(ref m) if m.contains("repeats")), "got: {err}");
    }

    #[test]
    fn follows_pagination_cursors() {
        let mut tree = FakeTree::default().with(
            &root_key(),
            (0..5).map(|i| Block::paragraph(format!("b{i}").as_str(), "x")).collect(),
        );
        tree.page_limit = Some(2);

        let blocks = crawl(&tree, &root(), 8, 2).expect("crawl");
        assert_eq!(ids(&blocks), vec!["b0", "b1", "b2", "b3", "b4"]);
        let cursors: Vec<Option<String>> =
            tree.calls.borrow().iter().map(|(_, c)| c.clone()).collect();
        assert_eq!(cursors, vec![None, Some("2".into()), Some("4".into())]);
    }

    #[test]
    fn first_failure_aborts() {
        let err = crawl(&Failing, &root(), 8, 100).unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
