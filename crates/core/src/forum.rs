//! Pure transformation functions for forum API responses
//!
//! This module contains zero I/O operations and is fully testable with fixture data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Domain Models (Input from API)
// ============================================================================

/// `GET /api/categories` response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryNode>,
}

/// A node of the category tree
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryNode {
    pub cid: u64,
    pub slug: String,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

/// `GET /api/category/{id}` response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryInfo {
    pub name: String,
    pub slug: String,
    pub topic_count: usize,
    #[serde(default)]
    pub post_count: usize,
}

/// `GET /api/category/{slug}/{start}` response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryPage {
    #[serde(default)]
    pub topics: Vec<TopicSummary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TopicSummary {
    pub tid: u64,
    pub title: String,
}

/// `GET /api/topic/{id}` response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TopicInfo {
    pub slug: String,
    pub postcount: usize,
}

/// `GET /api/topic/{slug}/{start}` response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TopicPage {
    #[serde(default)]
    pub tid: Option<u64>,
    #[serde(default)]
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PostSummary {
    pub pid: u64,
    pub content: String,
}

// ============================================================================
// Output Models (Domain Model)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: u64,
    pub title: String,
    pub category_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub topic_id: u64,
    pub content: String,
}

// ============================================================================
// Pure Transformation Functions
// ============================================================================

/// Flatten the category tree into a list of categories.
///
/// Nodes are visited depth first, parents before their children, siblings in
/// the order the API returned them. A `cid` that was already visited is
/// skipped along with its subtree, so every category appears exactly once.
pub fn flatten_categories(response: &CategoriesResponse) -> Vec<Category> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    let mut stack: Vec<&CategoryNode> = response.categories.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if !seen.insert(node.cid) {
            continue;
        }

        categories.push(Category {
            id: node.cid,
            slug: node.slug.clone(),
        });

        stack.extend(node.children.iter().rev());
    }

    categories
}

/// Convert one page of a category listing into topics.
pub fn transform_category_page(category_id: u64, page: CategoryPage) -> Vec<Topic> {
    page.topics
        .into_iter()
        .map(|topic| Topic {
            id: topic.tid,
            title: topic.title,
            category_id,
        })
        .collect()
}

/// Convert one page of a topic listing into posts.
pub fn transform_topic_page(topic_id: u64, page: TopicPage) -> Vec<Post> {
    page.posts
        .into_iter()
        .map(|post| Post {
            id: post.pid,
            topic_id,
            content: post.content,
        })
        .collect()
}

/// Build the API path from the relative topic path `GET /api/post/{pid}` returns.
///
/// The forum answers with a path such as `/topic/12/slug/4`, which is served
/// under `/api` like every other listing.
pub fn post_lookup_path(relative: &str) -> String {
    let relative = relative.trim().trim_matches('"');
    if relative.starts_with('/') {
        format!("/api{relative}")
    } else {
        format!("/api/{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(cid: u64, slug: &str, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            cid,
            slug: slug.to_string(),
            children,
        }
    }

    fn ids(categories: &[Category]) -> Vec<u64> {
        categories.iter().map(|c| c.id).collect()
    }

    // ============================================================================
    // flatten_categories tests
    // ============================================================================

    #[test]
    fn test_flatten_categories_from_json() {
        let json = r#"{
            "categories": [
                {"cid": 1, "slug": "1/announcements", "children": []},
                {"cid": 2, "slug": "2/general", "children": [
                    {"cid": 5, "slug": "5/off-topic", "children": []}
                ]}
            ]
        }"#;

        let response: CategoriesResponse = serde_json::from_str(json).unwrap();
        let categories = flatten_categories(&response);

        assert_eq!(ids(&categories), vec![1, 2, 5]);
        assert_eq!(categories[2].slug, "5/off-topic");
    }

    #[test]
    fn test_flatten_categories_missing_children_field() {
        let json = r#"{"categories": [{"cid": 3, "slug": "3/help"}]}"#;

        let response: CategoriesResponse = serde_json::from_str(json).unwrap();

        assert_eq!(ids(&flatten_categories(&response)), vec![3]);
    }

    #[test]
    fn test_flatten_categories_deep_nesting() {
        let mut leaf = node(100, "100/leaf", vec![]);
        for cid in (1..100).rev() {
            leaf = node(cid, &format!("{cid}/level"), vec![leaf]);
        }

        let response = CategoriesResponse {
            categories: vec![leaf],
        };
        let categories = flatten_categories(&response);

        assert_eq!(categories.len(), 100);
        assert_eq!(ids(&categories), (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn test_flatten_categories_preorder() {
        let response = CategoriesResponse {
            categories: vec![
                node(
                    1,
                    "a",
                    vec![node(2, "b", vec![node(3, "c", vec![])]), node(4, "d", vec![])],
                ),
                node(5, "e", vec![]),
            ],
        };

        assert_eq!(ids(&flatten_categories(&response)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flatten_categories_skips_revisited_nodes() {
        let response = CategoriesResponse {
            categories: vec![
                node(1, "a", vec![node(2, "b", vec![])]),
                node(2, "b", vec![node(3, "c", vec![])]),
            ],
        };

        assert_eq!(ids(&flatten_categories(&response)), vec![1, 2]);
    }

    #[test]
    fn test_flatten_categories_empty() {
        let response = CategoriesResponse { categories: vec![] };
        assert!(flatten_categories(&response).is_empty());
    }

    // ============================================================================
    // page transformation tests
    // ============================================================================

    #[test]
    fn test_transform_category_page() {
        let json = r#"{"topics": [{"tid": 10, "title": "Hello"}, {"tid": 11, "title": "World"}]}"#;
        let page: CategoryPage = serde_json::from_str(json).unwrap();

        let topics = transform_category_page(4, page);

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].id, 10);
        assert_eq!(topics[1].title, "World");
        assert!(topics.iter().all(|t| t.category_id == 4));
    }

    #[test]
    fn test_transform_topic_page() {
        let json = r#"{"tid": 10, "posts": [{"pid": 100, "content": "<p>Hi</p>"}]}"#;
        let page: TopicPage = serde_json::from_str(json).unwrap();

        let posts = transform_topic_page(10, page);

        assert_eq!(
            posts,
            vec![Post {
                id: 100,
                topic_id: 10,
                content: "<p>Hi</p>".to_string(),
            }]
        );
    }

    #[test]
    fn test_category_info_from_json() {
        let json = r#"{"name": "General", "slug": "2/general", "topic_count": 42, "post_count": 300}"#;
        let info: CategoryInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.slug, "2/general");
        assert_eq!(info.topic_count, 42);
    }

    // ============================================================================
    // post_lookup_path tests
    // ============================================================================

    #[test]
    fn test_post_lookup_path_absolute() {
        assert_eq!(post_lookup_path("/topic/12/slug/4"), "/api/topic/12/slug/4");
    }

    #[test]
    fn test_post_lookup_path_quoted_json_string() {
        assert_eq!(post_lookup_path("\"/topic/12/slug\""), "/api/topic/12/slug");
    }

    #[test]
    fn test_post_lookup_path_relative() {
        assert_eq!(post_lookup_path("topic/12"), "/api/topic/12");
    }
}
