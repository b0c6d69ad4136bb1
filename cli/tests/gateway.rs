//! Integration tests for the CLI gateway.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use blog_cli::{
        api::BlogApiClient,
        card::ArticleCard,
        gateway::{AdminGateway, GatewayError},
    };
    use blog_shared::{
        AdminSession, ArticleDraft, ArticlePresenter, ArticleSummary, ContentBlock, LoadState,
        ADMIN_AUTH_HEADER,
    };
    use futures::future::join_all;
    use serde_json::{json, Value};
    use wiremock::{
        matchers::{body_partial_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const SECRET: &str = "admin66L:123QWE!asd";

    fn article_json(id: i64, title: &str, full_content: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "category": "Logistics",
            "short_description": format!("{title} teaser"),
            "full_content": full_content,
            "image_url": null,
            "created_at": "2024-06-01T09:30:00Z",
            "updated_at": "2024-06-01T09:30:00Z"
        })
    }

    fn draft() -> ArticleDraft {
        ArticleDraft {
            id: None,
            title: Some("Cross docking".to_string()),
            category: Some("Logistics".to_string()),
            short_description: Some("Skip the shelf".to_string()),
            full_content: Some("1.\tReceive\n2.\tShip".to_string()),
            image_url: None,
        }
    }

    fn api(server: &MockServer) -> BlogApiClient {
        BlogApiClient::new(format!("{}/api", server.uri()))
    }

    #[tokio::test]
    async fn anonymous_mutations_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = AdminGateway::new(api(&server), AdminSession::anonymous());
        assert_eq!(gateway.create(draft()).await, Err(GatewayError::Unauthorized));
        assert_eq!(gateway.delete(1).await, Err(GatewayError::Unauthorized));
    }

    #[tokio::test]
    async fn create_sends_credential_and_returns_article() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .and(header(ADMIN_AUTH_HEADER, SECRET))
            .and(body_partial_json(json!({"title": "Cross docking", "image_url": null})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(article_json(1, "Cross docking", "1.\tReceive\n2.\tShip")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = AdminGateway::new(api(&server), AdminSession::with_credential(SECRET));
        let article = gateway.create(draft()).await.expect("created");
        assert_eq!(article.id, 1);
        assert_eq!(article.title, "Cross docking");
    }

    #[tokio::test]
    async fn rejected_secret_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized", "code": 401})),
            )
            .mount(&server)
            .await;

        let gateway = AdminGateway::new(api(&server), AdminSession::with_credential("wrong"));
        assert_eq!(gateway.delete(4).await, Err(GatewayError::Unauthorized));
    }

    #[tokio::test]
    async fn update_targets_id_and_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/articles"))
            .and(body_partial_json(json!({"id": 42})))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Article not found", "code": 404})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = AdminGateway::new(api(&server), AdminSession::with_credential(SECRET));
        assert_eq!(gateway.update(42, draft()).await, Err(GatewayError::NotFound));
    }

    #[tokio::test]
    async fn incomplete_draft_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = AdminGateway::new(api(&server), AdminSession::with_credential(SECRET));
        let missing_body = ArticleDraft {
            full_content: Some("   ".to_string()),
            ..draft()
        };
        assert_eq!(
            gateway.create(missing_body).await,
            Err(GatewayError::Validation("`full_content` is required".to_string()))
        );
    }

    #[tokio::test]
    async fn server_errors_keep_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles"))
            .and(query_param("id", "5"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "Internal server error", "code": 500})),
            )
            .mount(&server)
            .await;

        let gateway = AdminGateway::new(api(&server), AdminSession::with_credential(SECRET));
        assert_eq!(gateway.delete(5).await, Err(GatewayError::Server {
            status: 500,
            message: "Internal server error".to_string(),
        }));
    }

    #[tokio::test]
    async fn expanding_cards_fetches_each_article_once() {
        let server = MockServer::start().await;
        for id in [1_i64, 2] {
            Mock::given(method("GET"))
                .and(path("/api/articles"))
                .and(query_param("id", id.to_string()))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(article_json(id, "Body", &format!("•\tItem {id}"))),
                )
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = Arc::new(api(&server));
        let summaries: Vec<ArticleSummary> = [1_i64, 2]
            .into_iter()
            .map(|id| {
                let article: blog_shared::Article =
                    serde_json::from_value(article_json(id, "Card", "unused")).expect("article json");
                ArticleSummary::from(article)
            })
            .collect();
        let mut cards: Vec<_> = summaries
            .into_iter()
            .map(|summary| ArticleCard::new(summary, client.clone()))
            .collect();

        join_all(cards.iter_mut().map(|card| card.expand())).await;
        join_all(cards.iter_mut().map(|card| card.expand())).await;

        let presenter = ArticlePresenter::default();
        assert_eq!(cards[0].presentation(&presenter).blocks, vec![ContentBlock::BulletItem {
            text: "Item 1".to_string()
        }]);
        assert_eq!(cards[1].load_state(), LoadState::Loaded {
            body: "•\tItem 2".to_string()
        });
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_teaser() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let article: blog_shared::Article =
            serde_json::from_value(article_json(9, "Dock", "unused")).expect("article json");
        let mut card = ArticleCard::new(ArticleSummary::from(article), Arc::new(api(&server)));

        assert_eq!(card.expand().await, LoadState::Failed {
            fallback: "Dock teaser".to_string()
        });
        assert_eq!(card.presentation(&ArticlePresenter::default()).blocks, vec![
            ContentBlock::Paragraph {
                text: "Dock teaser".to_string()
            }
        ]);
        card.expand().await;
    }
}
