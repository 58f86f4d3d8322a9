//! Traversal of the forum: categories, then topics, then posts
//!
//! Every post goes through the reparation pipeline. Changed posts are either
//! previewed (dry run) or written back. A failure is reported against the
//! smallest unit of work that contains it and the traversal moves on to the
//! next sibling; nothing is retried.

use crate::prelude::*;
use crate::report::{Reporter, Scope, Summary};
use forumfix_core::config::Selection;
use forumfix_core::forum::{Category, Post, Topic};
use forumfix_core::repair::Pipeline;

/// Read and write access to the forum, as the driver needs it
#[allow(async_fn_in_trait)]
pub trait Forum {
    /// Every category of the forum, flattened
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn list_topics(&self, category_id: u64) -> Result<Vec<Topic>>;

    async fn list_posts(&self, topic_id: u64) -> Result<Vec<Post>>;

    /// A single post looked up by id
    async fn get_post(&self, post_id: u64) -> Result<Post>;

    /// Replace the body of a post. `topic_id` is only used for context.
    async fn set_post_content(&self, topic_id: u64, post_id: u64, content: &str) -> Result<()>;
}

pub struct Driver<'a, F, R> {
    forum: &'a F,
    pipeline: Pipeline,
    dry_run: bool,
    reporter: &'a mut R,
    summary: Summary,
}

impl<'a, F: Forum, R: Reporter> Driver<'a, F, R> {
    pub fn new(forum: &'a F, pipeline: Pipeline, dry_run: bool, reporter: &'a mut R) -> Self {
        Self {
            forum,
            pipeline,
            dry_run,
            reporter,
            summary: Summary::default(),
        }
    }

    /// Process the explicit selection, or the whole forum when it is empty.
    ///
    /// Only a failure to list the categories themselves aborts the run.
    pub async fn run(mut self, selection: &Selection) -> Result<Summary> {
        if selection.is_empty() {
            let categories = self
                .forum
                .list_categories()
                .await
                .wrap_err("Could not list categories")?;

            for category in &categories {
                self.process_category(category).await;
            }
        } else {
            for &post_id in &selection.post_include {
                self.process_post_by_id(post_id).await;
            }
            for &topic_id in &selection.topic_include {
                self.process_topic(topic_id).await;
            }
        }

        Ok(self.summary)
    }

    async fn process_category(&mut self, category: &Category) {
        log::debug!("Entering category {} ({})", category.id, category.slug);
        self.summary.categories += 1;

        let topics = match self.forum.list_topics(category.id).await {
            Ok(topics) => topics,
            Err(err) => {
                self.summary.failed_categories += 1;
                self.reporter.failure(Scope::Category(category.id), &err);
                return;
            }
        };

        for topic in &topics {
            log::debug!("Entering topic {} ({})", topic.id, topic.title);
            self.process_topic(topic.id).await;
        }
    }

    async fn process_topic(&mut self, topic_id: u64) {
        self.summary.topics += 1;

        let posts = match self.forum.list_posts(topic_id).await {
            Ok(posts) => posts,
            Err(err) => {
                self.summary.failed_topics += 1;
                self.reporter.failure(Scope::Topic(topic_id), &err);
                return;
            }
        };

        for post in &posts {
            self.process_post(post).await;
        }
    }

    async fn process_post_by_id(&mut self, post_id: u64) {
        match self.forum.get_post(post_id).await {
            Ok(post) => self.process_post(&post).await,
            Err(err) => {
                self.summary.failed_posts += 1;
                self.reporter.failure(Scope::PostLookup(post_id), &err);
            }
        }
    }

    async fn process_post(&mut self, post: &Post) {
        self.summary.posts += 1;
        let scope = Scope::Post {
            topic_id: post.topic_id,
            post_id: post.id,
        };

        let repair = match self.pipeline.apply(&post.content) {
            Ok(repair) => repair,
            Err(err) => {
                self.summary.failed_posts += 1;
                self.reporter.failure(scope, &Report::new(err));
                return;
            }
        };

        for diagnostic in &repair.diagnostics {
            self.summary.diagnostics += 1;
            self.reporter.diagnostic(post, diagnostic);
        }

        if !repair.changed() {
            self.summary.unchanged += 1;
            self.reporter.unchanged(post);
            return;
        }

        if self.dry_run {
            self.summary.previewed += 1;
            self.reporter.preview(post, &repair.text);
            return;
        }

        match self
            .forum
            .set_post_content(post.topic_id, post.id, &repair.text)
            .await
        {
            Ok(()) => {
                self.summary.updated += 1;
                self.reporter.updated(post);
            }
            Err(err) => {
                self.summary.failed_posts += 1;
                self.reporter.failure(scope, &err);
            }
        }
    }
}
