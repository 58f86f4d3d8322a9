use crate::prelude::{println, *};
use colored::Colorize;
use forumfix_core::forum::Post;
use forumfix_core::repair::Diagnostic;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;

/// Unit of work a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Category(u64),
    Topic(u64),
    Post { topic_id: u64, post_id: u64 },
    /// A post requested by id whose topic is not known yet
    PostLookup(u64),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Category(id) => write!(f, "category {id}"),
            Scope::Topic(id) => write!(f, "topic {id}"),
            Scope::Post { topic_id, post_id } => write!(f, "topic {topic_id}, post {post_id}"),
            Scope::PostLookup(id) => write!(f, "post {id}"),
        }
    }
}

/// Receives what happens to each post during a run
pub trait Reporter {
    fn unchanged(&mut self, post: &Post);

    /// Dry-run output for a post the pipeline changed
    fn preview(&mut self, post: &Post, repaired: &str);

    fn updated(&mut self, post: &Post);

    fn diagnostic(&mut self, post: &Post, diagnostic: &Diagnostic);

    fn failure(&mut self, scope: Scope, error: &Report);
}

/// Reports through the `log` facade, printing dry-run previews to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

fn post_scope(post: &Post) -> Scope {
    Scope::Post {
        topic_id: post.topic_id,
        post_id: post.id,
    }
}

impl Reporter for ConsoleReporter {
    fn unchanged(&mut self, post: &Post) {
        log::info!("Not updated: {}", post_scope(post));
    }

    fn preview(&mut self, post: &Post, repaired: &str) {
        println!("{}", f!("== {} ==", post_scope(post)).bold().cyan());
        println!("{}", post.content.red());
        println!("{}", "----------".bright_black());
        println!("{}", repaired.green());
        println!();
    }

    fn updated(&mut self, post: &Post) {
        log::info!("Updated: {}", post_scope(post));
    }

    fn diagnostic(&mut self, post: &Post, diagnostic: &Diagnostic) {
        log::warn!("{} in {}", diagnostic, post_scope(post));
    }

    fn failure(&mut self, scope: Scope, error: &Report) {
        log::error!("Could not handle {scope}: {error:#}");
    }
}

/// Counters for one run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub categories: usize,
    pub topics: usize,
    pub posts: usize,
    pub updated: usize,
    pub previewed: usize,
    pub unchanged: usize,
    pub diagnostics: usize,
    pub failed_posts: usize,
    pub failed_topics: usize,
    pub failed_categories: usize,
}

impl Summary {
    pub fn has_failures(&self) -> bool {
        self.failed_posts + self.failed_topics + self.failed_categories > 0
    }
}

pub fn summary_table(summary: &Summary) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["Categories", summary.categories]);
    table.add_row(prettytable::row!["Topics", summary.topics]);
    table.add_row(prettytable::row!["Posts", summary.posts]);
    table.add_row(prettytable::row!["Updated", summary.updated]);
    table.add_row(prettytable::row!["Previewed", summary.previewed]);
    table.add_row(prettytable::row!["Unchanged", summary.unchanged]);
    table.add_row(prettytable::row!["Warnings", summary.diagnostics]);
    table.add_row(prettytable::row!["Failed posts", summary.failed_posts]);
    table.add_row(prettytable::row!["Failed topics", summary.failed_topics]);
    table.add_row(prettytable::row!["Failed categories", summary.failed_categories]);
    table
}

/// Progress bar for a listing of `total` items; hidden when `enabled` is false
pub fn progress_bar(total: usize, label: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:30.cyan/blue}] {pos}/{len} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(label.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Category(3).to_string(), "category 3");
        assert_eq!(
            Scope::Post {
                topic_id: 1,
                post_id: 2
            }
            .to_string(),
            "topic 1, post 2"
        );
        assert_eq!(Scope::PostLookup(9).to_string(), "post 9");
    }

    #[test]
    fn test_summary_has_failures() {
        let mut summary = Summary::default();
        assert!(!summary.has_failures());

        summary.failed_topics = 1;
        assert!(summary.has_failures());
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = Summary {
            posts: 4,
            updated: 3,
            unchanged: 1,
            ..Default::default()
        };

        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["posts"], 4);
        assert_eq!(json["updated"], 3);
        assert_eq!(json["failed_posts"], 0);
    }

    #[test]
    fn test_summary_table_has_a_row_per_counter() {
        assert_eq!(summary_table(&Summary::default()).len(), 10);
    }

    #[test]
    fn test_disabled_progress_bar_is_hidden() {
        assert!(progress_bar(10, "topics", false).is_hidden());
    }
}
