use yokai_common::articles::{Article, ArticleFields};
use yokai_common::{ArticleId, Categories, CategoryId};

use crate::domain::error::ServiceError;
use crate::domain::{ArticleService, LikeState, QuickSearchHit};
use crate::infrastructure::http::ApiClient;
use crate::infrastructure::http::api::{check_status, read_json};
use crate::infrastructure::http::dto::{
    ArticleRecord, CountRecord, LikeStatusRecord, QuickSearchRecord,
};

/// Article server client.
#[derive(Debug, Clone)]
pub struct HttpArticleService {
    api: ApiClient,
    categories: &'static dyn Categories,
}

impl HttpArticleService {
    pub fn new(api: ApiClient, categories: &'static dyn Categories) -> Self {
        Self { api, categories }
    }

    fn article(&self, record: ArticleRecord) -> Result<Article, ServiceError> {
        record.into_article(self.categories)
    }

    fn articles(&self, records: Vec<ArticleRecord>) -> Result<Vec<Article>, ServiceError> {
        records.into_iter().map(|record| self.article(record)).collect()
    }
}

impl ArticleService for HttpArticleService {
    async fn popular(&self) -> Result<Vec<Article>, ServiceError> {
        let response = self.api.get(&["articles", "popular"]).send().await?;
        let records: Vec<ArticleRecord> = read_json(response, "popular articles").await?;
        self.articles(records)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Article, ServiceError> {
        let response = self.api.get(&["articles", slug]).send().await?;
        let record: ArticleRecord = read_json(response, slug).await?;
        self.article(record)
    }

    async fn increment_views(&self, slug: &str) -> Result<(), ServiceError> {
        let response = self.api.post(&["articles", slug, "view"]).send().await?;
        check_status(response, slug).await?;
        Ok(())
    }

    async fn toggle_like(&self, slug: &str) -> Result<LikeState, ServiceError> {
        let response = self.api.post(&["articles", slug, "like"]).send().await?;
        read_json(response, slug).await
    }

    async fn like_status(&self, slug: &str) -> Result<bool, ServiceError> {
        let response = self
            .api
            .get(&["articles", slug, "like-status"])
            .send()
            .await?;
        let record: LikeStatusRecord = read_json(response, slug).await?;
        Ok(record.liked)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Article>, ServiceError> {
        let response = self
            .api
            .get(&["articles"])
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        let records: Vec<ArticleRecord> = read_json(response, "articles").await?;
        self.articles(records)
    }

    async fn quick_search(&self, query: &str, limit: u32) -> Result<Vec<QuickSearchHit>, ServiceError> {
        let response = self
            .api
            .get(&["articles", "search", "quick"])
            .query(&[("q", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let records: Vec<QuickSearchRecord> = read_json(response, "quick search").await?;
        records.into_iter().map(QuickSearchHit::try_from).collect()
    }

    async fn count(&self, category: Option<&CategoryId>) -> Result<u64, ServiceError> {
        let mut request = self.api.get(&["count", "articles", "count"]);
        if let Some(category) = category {
            request = request.query(&[("category", category.as_ref())]);
        }
        let record: CountRecord = read_json(request.send().await?, "article count").await?;
        Ok(record.count)
    }

    async fn create(&self, fields: ArticleFields) -> Result<Article, ServiceError> {
        let response = self
            .api
            .post(&["articles", "create-article"])
            .json(&fields)
            .send()
            .await?;
        let record: ArticleRecord = read_json(response, &fields.title).await?;
        let article = self.article(record)?;
        tracing::info!("created article {} ({})", article.id, article.slug);
        Ok(article)
    }

    async fn update(&self, id: &ArticleId, fields: ArticleFields) -> Result<Article, ServiceError> {
        let response = self
            .api
            .put(&["articles", id.as_ref()])
            .json(&fields)
            .send()
            .await?;
        let record: ArticleRecord = read_json(response, id.as_ref()).await?;
        tracing::info!("updated article {}", id);
        self.article(record)
    }

    async fn delete(&self, id: &ArticleId) -> Result<(), ServiceError> {
        let response = self.api.delete(&["articles", id.as_ref()]).send().await?;
        check_status(response, id.as_ref()).await?;
        tracing::info!("deleted article {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use yokai_common::test_utils::{SimpleCategories, make_category};
    use yokai_common::Slug;

    use super::*;
    use crate::infrastructure::http::HttpClientConfig;

    fn article_json(id: &str, title: &str, slug: &str, category: serde_json::Value) -> serde_json::Value {
        json!({
            "_id": id,
            "title": title,
            "slug": slug,
            "content": "text",
            "excerpt": "short",
            "author": "Admin",
            "category": category,
            "views": 3,
            "likes": 9,
            "sources": [],
            "readingTime": 1,
            "createdAt": "2024-05-01T12:00:00.000Z",
            "updatedAt": "2024-05-02T12:00:00.000Z",
            "publishedAt": "2024-05-01T12:00:00.000Z"
        })
    }

    async fn service(server: &MockServer) -> HttpArticleService {
        service_at(&format!("{}/api", server.uri()))
    }

    fn service_at(base_url: &str) -> HttpArticleService {
        let categories =
            SimpleCategories::new(vec![make_category("yokai-animals", "Animal Yokai")]).leak();
        let api = ApiClient::new(HttpClientConfig {
            base_url,
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        HttpArticleService::new(api, categories)
    }

    fn fields() -> ArticleFields {
        ArticleFields {
            title: "Kitsune".to_string(),
            slug: Slug::new("kitsune"),
            content: "Fox spirit".to_string(),
            excerpt: String::new(),
            author: "Admin".to_string(),
            category: CategoryId::try_new("yokai-animals").unwrap(),
            image_url: None,
            sources: vec![],
            reading_time: 1,
            views: 0,
            likes: 0,
        }
    }

    #[tokio::test]
    async fn find_by_slug_normalizes_legacy_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/kitsune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(article_json(
                "a1",
                "Kitsune",
                "kitsune",
                json!("yokai-animals"),
            )))
            .mount(&server)
            .await;

        let article = service(&server).await.find_by_slug("kitsune").await.unwrap();

        assert_eq!(article.id.as_ref(), "a1");
        assert_eq!(article.category.name, "Animal Yokai");
        assert_eq!(article.likes, 9);
    }

    #[tokio::test]
    async fn reserved_characters_stay_inside_the_slug_segment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/fox%3Fwedding%2Fnight/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"liked": true, "likes": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let state = service(&server).await.toggle_like("fox?wedding/night").await.unwrap();

        assert!(state.liked);
    }

    #[tokio::test]
    async fn missing_article_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/nue"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Article not found"})))
            .mount(&server)
            .await;

        let result = service(&server).await.find_by_slug("nue").await;

        assert_eq!(result, Err(ServiceError::NotFound("nue".to_string())));
    }

    #[tokio::test]
    async fn list_sends_paging_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([article_json(
                "a1",
                "Kitsune",
                "kitsune",
                json!({"_id": "yokai-animals", "name": "Animal Yokai", "slug": "yokai-animals"}),
            )])))
            .expect(1)
            .mount(&server)
            .await;

        let page = service(&server).await.list(2, 5).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].category.slug.as_deref(), Some("yokai-animals"));
    }

    #[tokio::test]
    async fn quick_search_reads_partial_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/search/quick"))
            .and(query_param("q", "kits"))
            .and(query_param("limit", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a1", "title": "Kitsune", "slug": "kitsune"}
            ])))
            .mount(&server)
            .await;

        let hits = service(&server).await.quick_search("kits", 8).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "kitsune");
        assert_eq!(hits[0].excerpt, None);
    }

    #[tokio::test]
    async fn count_filters_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/count/articles/count"))
            .and(query_param("category", "yokai-animals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 12})))
            .mount(&server)
            .await;

        let category = CategoryId::try_new("yokai-animals").unwrap();
        let count = service(&server).await.count(Some(&category)).await.unwrap();

        assert_eq!(count, 12);
    }

    #[tokio::test]
    async fn toggle_like_returns_new_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/kitsune/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"likes": 10, "liked": true})))
            .mount(&server)
            .await;

        let state = service(&server).await.toggle_like("kitsune").await.unwrap();

        assert_eq!(state, LikeState { likes: 10, liked: true });
    }

    #[tokio::test]
    async fn create_posts_derived_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/create-article"))
            .and(body_partial_json(json!({
                "title": "Kitsune",
                "slug": "kitsune",
                "category": "yokai-animals",
                "readingTime": 1
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(article_json(
                "a2",
                "Kitsune",
                "kitsune",
                json!("yokai-animals"),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let article = service(&server).await.create(fields()).await.unwrap();

        assert_eq!(article.id.as_ref(), "a2");
    }

    #[tokio::test]
    async fn update_and_delete_use_the_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/a2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(article_json(
                "a2",
                "Kitsune",
                "kitsune",
                json!("yokai-animals"),
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles/a2"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server).await;
        let id = ArticleId::try_new("a2").unwrap();

        service.update(&id, fields()).await.unwrap();
        service.delete(&id).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_carries_its_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/create-article"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Slug already exists"})))
            .mount(&server)
            .await;

        let error = service(&server).await.create(fields()).await.unwrap_err();

        assert_eq!(
            error,
            ServiceError::Remote {
                status: 400,
                message: "Slug already exists".to_string()
            }
        );
        assert_eq!(error.user_message(), "Slug already exists");
    }

    #[tokio::test]
    async fn unauthorized_write_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles/a2"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = service(&server)
            .await
            .delete(&ArticleId::try_new("a2").unwrap())
            .await;

        assert_eq!(result, Err(ServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = service(&server).await.popular().await;

        assert!(matches!(result, Err(ServiceError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // reserve a port, then free it so nothing listens there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let service = service_at(&format!("http://{address}/api"));

        let result = service.popular().await;

        assert!(matches!(result, Err(ServiceError::Transport(_))));
    }
}
