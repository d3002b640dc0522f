use crate::{
    error::AppResult,
    models::{Category, Credential, RecommendationSet},
    services::{parser, prompts, RecommendationClient},
};

/// Generates mood-based recommendations for one category
///
/// Builds the category prompt around the shopper's mood, sends it to the
/// text-generation service and parses the reply into typed records. Scoring
/// and display are left to the caller.
pub async fn get_recommendations(
    client: &dyn RecommendationClient,
    credential: &Credential,
    category: Category,
    mood: &str,
) -> AppResult<RecommendationSet> {
    let prompt = prompts::build(category, mood);

    tracing::debug!(
        category = %category,
        client = client.name(),
        prompt_chars = prompt.len(),
        "Requesting recommendations"
    );

    let raw = client.send(&prompt, credential).await?;
    let set = parser::parse(&raw, category)?;

    tracing::info!(
        category = %category,
        count = set.len(),
        "Recommendations parsed"
    );

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::client::MockRecommendationClient;

    #[tokio::test]
    async fn test_pipeline_sends_built_prompt() {
        let mut client = MockRecommendationClient::new();
        client.expect_name().return_const("mock");
        client
            .expect_send()
            .withf(|prompt, _| {
                prompt.contains("User mood/input: \"stressed\"") && prompt.contains("\"dish\"")
            })
            .times(1)
            .returning(|_, _| {
                Ok(r#"Try these {"recommendations":[{"restaurant":"Jollibee","dish":"Chickenjoy","price":"₱99"}],"moodAnalysis":"comfort"}"#.to_string())
            });

        let set = get_recommendations(
            &client,
            &Credential::new("sk-test"),
            Category::Cravings,
            "stressed",
        )
        .await
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.recommendations[0].headline(), "Chickenjoy - Jollibee");
    }

    #[tokio::test]
    async fn test_pipeline_propagates_client_errors() {
        let mut client = MockRecommendationClient::new();
        client.expect_name().return_const("mock");
        client
            .expect_send()
            .returning(|_, _| Err(AppError::Auth("invalid x-api-key".to_string())));

        let result =
            get_recommendations(&client, &Credential::new("bad"), Category::Travel, "bored").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_pipeline_reports_malformed_output() {
        let mut client = MockRecommendationClient::new();
        client.expect_name().return_const("mock");
        client
            .expect_send()
            .returning(|_, _| Ok("I'm not sure what you mean.".to_string()));

        let result =
            get_recommendations(&client, &Credential::new("sk"), Category::Ootd, "meh").await;
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
