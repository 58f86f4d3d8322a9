use crate::driver::Forum;
use crate::pagination::collect_pages;
use crate::prelude::*;
use crate::report::progress_bar;
use serde::de::DeserializeOwned;
use std::time::Duration;

// Import domain models and pure functions from core crate
use forumfix_core::forum::{
    flatten_categories, post_lookup_path, transform_category_page, transform_topic_page,
    CategoriesResponse, Category, CategoryInfo, CategoryPage, Post, Topic, TopicInfo, TopicPage,
};

/// Timeout for single-object reads (category and topic metadata)
const METADATA_TIMEOUT: Duration = Duration::from_secs(2);
/// Timeout for listing pages, which are heavier than metadata
const PAGE_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP access to a NodeBB forum
#[derive(Debug, Clone)]
pub struct ForumClient {
    client: reqwest::Client,
    base_url: String,
    progress: bool,
}

/// Create an HTTP client sending the bearer token on every request
pub fn create_authenticated_client(token: &str) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| eyre!("Invalid header value: {}", e))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

impl ForumClient {
    pub fn new(base_url: &str, token: &str, progress: bool) -> Result<Self> {
        Ok(Self {
            client: create_authenticated_client(token)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            progress,
        })
    }

    /// Build a client and, when `check_auth` is set, make sure the token is accepted.
    pub async fn connect(base_url: &str, token: &str, check_auth: bool, progress: bool) -> Result<Self> {
        let client = Self::new(base_url, token, progress)?;

        if check_auth {
            client
                .check_auth()
                .await
                .wrap_err_with(|| f!("Could not authenticate against {}", client.base_url))?;
            log::debug!("Authenticated against {}", client.base_url);
        }

        Ok(client)
    }

    /// Probe an endpoint that requires a logged-in user
    pub async fn check_auth(&self) -> Result<(), Error> {
        let url = self.url("/api/notifications");
        let response = self
            .client
            .get(&url)
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::network(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::Status {
                method: "GET",
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<T, Error> {
        let url = self.url(path);
        log::trace!("GET {url}");

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::network(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::Status {
                method: "GET",
                url,
                status: response.status().as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| Error::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl Forum for ForumClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let response: CategoriesResponse = self.get_json("/api/categories", METADATA_TIMEOUT).await?;
        Ok(flatten_categories(&response))
    }

    async fn list_topics(&self, category_id: u64) -> Result<Vec<Topic>> {
        log::info!("Downloading info of category {category_id}...");
        let info: CategoryInfo = self
            .get_json(&f!("/api/category/{category_id}"), METADATA_TIMEOUT)
            .await?;
        log::debug!(
            "{} topics and {} posts in category {}",
            info.topic_count,
            info.post_count,
            info.name
        );

        let bar = progress_bar(info.topic_count, &info.name, self.progress);
        let slug = info.slug.as_str();
        let topics = collect_pages(info.topic_count, &bar, |start| {
            let path = f!("/api/category/{slug}/{start}");
            async move {
                self.get_json::<CategoryPage>(&path, PAGE_TIMEOUT)
                    .await
                    .map(|page| transform_category_page(category_id, page))
            }
        })
        .await;
        bar.finish_and_clear();

        Ok(topics?)
    }

    async fn list_posts(&self, topic_id: u64) -> Result<Vec<Post>> {
        log::info!("Downloading info of topic {topic_id}...");
        let info: TopicInfo = self
            .get_json(&f!("/api/topic/{topic_id}"), METADATA_TIMEOUT)
            .await?;

        let bar = progress_bar(info.postcount, &f!("topic {topic_id}"), self.progress);
        let slug = info.slug.as_str();
        let posts = collect_pages(info.postcount, &bar, |start| {
            let path = f!("/api/topic/{slug}/{start}");
            async move {
                self.get_json::<TopicPage>(&path, PAGE_TIMEOUT)
                    .await
                    .map(|page| transform_topic_page(topic_id, page))
            }
        })
        .await;
        bar.finish_and_clear();

        Ok(posts?)
    }

    async fn get_post(&self, post_id: u64) -> Result<Post> {
        let relative: String = self
            .get_json(&f!("/api/post/{post_id}"), METADATA_TIMEOUT)
            .await?;
        let page: TopicPage = self
            .get_json(&post_lookup_path(&relative), PAGE_TIMEOUT)
            .await?;

        let topic_id = page.tid.unwrap_or_default();
        transform_topic_page(topic_id, page)
            .into_iter()
            .find(|post| post.id == post_id)
            .ok_or_else(|| Error::PostNotFound(post_id).into())
    }

    async fn set_post_content(&self, topic_id: u64, post_id: u64, content: &str) -> Result<()> {
        let url = self.url(&f!("/api/v1/posts/{post_id}"));
        log::debug!("PUT {url} (topic {topic_id})");

        let response = self
            .client
            .put(&url)
            .form(&[("content", content)])
            .timeout(WRITE_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::network(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::Status {
                method: "PUT",
                url,
                status: response.status().as_u16(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ForumClient::new("https://forum.example.org/", "token", false).unwrap();
        assert_eq!(
            client.url("/api/categories"),
            "https://forum.example.org/api/categories"
        );
    }

    #[test]
    fn test_create_authenticated_client_rejects_invalid_token() {
        assert!(create_authenticated_client("bad\ntoken").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ForumClient::new("http://127.0.0.1:9", "token", false).unwrap();

        let err = client.check_auth().await.unwrap_err();

        assert!(matches!(err, Error::Network { .. }));
    }
}
