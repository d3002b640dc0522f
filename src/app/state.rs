use std::fmt::Display;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::sequence::{analysis_span, RequestSeq, SequenceCounter};
use crate::{
    error::{AppError, AppResult},
    models::{
        Amount, CartItem, Category, Credential, OrderConfirmation, RecommendationSet,
        SessionState,
    },
    services::{
        get_recommendations, prompts, CartManager, CredentialStore, RecommendationClient,
        SessionManager,
    },
    storage::KeyValueStore,
};

/// Storefront tab; `Home` has no category and cannot be analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Category(Category),
}

impl Tab {
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Category(category) => category.id(),
        }
    }

    pub fn from_id(id: &str) -> Option<Tab> {
        if id == "home" {
            return Some(Tab::Home);
        }
        Category::from_id(id).map(Tab::Category)
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Tab::Home => None,
            Tab::Category(category) => Some(*category),
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Everything needed to run one analysis away from the state
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub seq: RequestSeq,
    pub category: Category,
    pub mood: String,
    credential: Credential,
}

impl AnalysisRequest {
    /// Runs the pipeline; the outcome is applied later via
    /// [`AppState::complete_analysis`]
    pub async fn run(self, client: &dyn RecommendationClient) -> AnalysisCompletion {
        let span = analysis_span(self.seq, self.category);
        let result = get_recommendations(client, &self.credential, self.category, &self.mood)
            .instrument(span)
            .await;

        AnalysisCompletion {
            seq: self.seq,
            category: self.category,
            result,
        }
    }
}

#[derive(Debug)]
pub struct AnalysisCompletion {
    pub seq: RequestSeq,
    pub category: Category,
    pub result: AppResult<RecommendationSet>,
}

/// Application state shared by every storefront action
///
/// Mutated only from the control loop. Analyses are split into
/// [`begin_analysis`](Self::begin_analysis) and
/// [`complete_analysis`](Self::complete_analysis) so the network call can run
/// elsewhere; only the most recently issued request may apply its result.
pub struct AppState {
    client: Arc<dyn RecommendationClient>,
    credentials: CredentialStore,
    session: SessionManager,
    cart: CartManager,
    tab: Tab,
    recommendations: Option<RecommendationSet>,
    sequence: SequenceCounter,
    pending: Option<RequestSeq>,
}

impl AppState {
    /// Loads persisted state from `store`
    pub fn new(
        client: Arc<dyn RecommendationClient>,
        store: Arc<dyn KeyValueStore>,
        credential_seed: Option<&str>,
    ) -> Self {
        Self {
            client,
            credentials: CredentialStore::load(store.clone(), credential_seed),
            session: SessionManager::load(store.clone()),
            cart: CartManager::load(store),
            tab: Tab::Home,
            recommendations: None,
            sequence: SequenceCounter::default(),
            pending: None,
        }
    }

    pub fn client(&self) -> Arc<dyn RecommendationClient> {
        self.client.clone()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    pub fn recommendations(&self) -> Option<&RecommendationSet> {
        self.recommendations.as_ref()
    }

    pub fn pending(&self) -> Option<RequestSeq> {
        self.pending
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.is_set()
    }

    /// Switching tabs drops the shown results and any in-flight analysis
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.recommendations = None;
        if let Some(seq) = self.pending.take() {
            tracing::debug!(seq = %seq, "Abandoning pending analysis on tab switch");
        }
    }

    /// Validates input and issues a new request sequence number
    pub fn begin_analysis(&mut self, mood: &str) -> AppResult<AnalysisRequest> {
        let category = self
            .tab
            .category()
            .ok_or_else(|| AppError::InvalidInput("Pick a category first".to_string()))?;

        if mood.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Tell us how you're feeling first".to_string(),
            ));
        }

        let credential = self
            .credentials
            .get()
            .cloned()
            .ok_or_else(|| AppError::Auth("No API key configured".to_string()))?;

        let seq = self.sequence.issue();
        self.pending = Some(seq);

        tracing::info!(seq = %seq, category = %category, "Analysis started");

        Ok(AnalysisRequest {
            seq,
            category,
            mood: mood.to_string(),
            credential,
        })
    }

    /// Applies a finished analysis if it is still the latest one.
    ///
    /// Returns `Ok(None)` for superseded or abandoned requests, whatever their
    /// outcome. A current success replaces the results and credits the
    /// session; a current failure is returned as-is. A rejected key is
    /// forgotten so the shopper is asked for a new one.
    pub fn complete_analysis(
        &mut self,
        completion: AnalysisCompletion,
    ) -> AppResult<Option<&RecommendationSet>> {
        if self.pending != Some(completion.seq) {
            tracing::debug!(
                seq = %completion.seq,
                category = %completion.category,
                latest = ?self.pending,
                "Dropping stale analysis result"
            );
            return Ok(None);
        }
        self.pending = None;

        let set = match completion.result {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(
                    seq = %completion.seq,
                    category = %completion.category,
                    error = %e,
                    "Analysis failed"
                );
                if e.needs_credential() {
                    self.clear_credential();
                }
                return Err(e);
            }
        };

        self.session.record_success();
        self.recommendations = Some(set);
        Ok(self.recommendations.as_ref())
    }

    /// Runs a whole analysis in place
    pub async fn analyze(&mut self, mood: &str) -> AppResult<&RecommendationSet> {
        let request = self.begin_analysis(mood)?;
        let client = self.client.clone();
        let completion = request.run(client.as_ref()).await;
        self.complete_analysis(completion)?;
        self.recommendations
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("Analysis was superseded".to_string()))
    }

    /// Adds the pick at `index` (zero-based) of the shown results
    pub fn add_to_cart(&mut self, index: usize) -> AppResult<CartItem> {
        let set = self
            .recommendations
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("No recommendations to add from".to_string()))?;
        let recommendation = set
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::InvalidInput(format!("No recommendation #{}", index + 1)))?;

        Ok(self.cart.add(recommendation, set.category))
    }

    pub fn remove_from_cart(&mut self, id: Uuid) -> Option<CartItem> {
        self.cart.remove(id)
    }

    pub fn cart_total(&self) -> Amount {
        self.cart.total()
    }

    pub fn checkout(&mut self) -> AppResult<OrderConfirmation> {
        let address = self.session.state().address.clone();
        self.cart.checkout(&address)
    }

    pub fn set_address(&mut self, address: &str) -> SessionState {
        self.session.set_address(address)
    }

    pub fn set_credential(&mut self, raw: &str) -> AppResult<()> {
        self.credentials.set(raw)
    }

    pub fn clear_credential(&mut self) {
        self.credentials.clear();
    }

    pub fn share_text(&self) -> &'static str {
        prompts::share_text(self.tab.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::MockRecommendationClient;
    use crate::storage::{MemoryStore, StorageKey};

    const CRAVINGS_REPLY: &str = r#"Here: {"recommendations":[{"restaurant":"Max's Restaurant","dish":"Fried Chicken","price":"₱450"},{"restaurant":"Army Navy","dish":"Burrito","price":"₱1,200.50"}],"moodAnalysis":"hungry"}"#;

    fn replying_client(reply: &'static str) -> Arc<dyn RecommendationClient> {
        let mut client = MockRecommendationClient::new();
        client.expect_name().return_const("mock");
        client
            .expect_send()
            .returning(move |_, _| Ok(reply.to_string()));
        Arc::new(client)
    }

    fn create_test_state(client: Arc<dyn RecommendationClient>) -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(client, store.clone(), Some("sk-test"));
        (store, state)
    }

    fn completion(seq: RequestSeq, category: Category) -> AnalysisCompletion {
        AnalysisCompletion {
            seq,
            category,
            result: Ok(RecommendationSet {
                category,
                recommendations: Vec::new(),
                mood_analysis: Some(format!("result {}", seq)),
            }),
        }
    }

    #[test]
    fn test_tab_ids() {
        assert_eq!(Tab::from_id("home"), Some(Tab::Home));
        assert_eq!(Tab::from_id("ootd"), Some(Tab::Category(Category::Ootd)));
        assert_eq!(Tab::from_id("shop"), None);
        assert_eq!(Tab::Category(Category::Travel).to_string(), "travel");
    }

    #[test]
    fn test_begin_analysis_requires_category() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        assert!(matches!(
            state.begin_analysis("happy"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_begin_analysis_rejects_blank_mood() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        state.select_tab(Tab::Category(Category::Travel));
        assert!(matches!(
            state.begin_analysis("   "),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_begin_analysis_requires_credential() {
        let store = Arc::new(MemoryStore::new());
        let mut state = AppState::new(Arc::new(MockRecommendationClient::new()), store, None);
        state.select_tab(Tab::Category(Category::Travel));
        assert!(matches!(state.begin_analysis("bored"), Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_analyze_updates_results_and_score() {
        let (store, mut state) = create_test_state(replying_client(CRAVINGS_REPLY));
        state.select_tab(Tab::Category(Category::Cravings));

        let set = state.analyze("gutom").await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(state.session().score, 10);
        assert_eq!(state.session().streak, 1);
        assert_eq!(store.get(StorageKey::Points).unwrap().as_deref(), Some("10"));
        assert_eq!(state.pending(), None);
    }

    #[tokio::test]
    async fn test_failed_analysis_does_not_score() {
        let mut client = MockRecommendationClient::new();
        client.expect_name().return_const("mock");
        client
            .expect_send()
            .returning(|_, _| Err(AppError::Transport("connection reset".to_string())));
        let (_, mut state) = create_test_state(Arc::new(client));
        state.select_tab(Tab::Category(Category::Ootd));

        let result = state.analyze("chill").await;
        assert!(matches!(result, Err(AppError::Transport(_))));
        assert_eq!(state.session().score, 0);
        assert!(state.recommendations().is_none());
    }

    #[tokio::test]
    async fn test_rejected_key_is_forgotten() {
        let mut client = MockRecommendationClient::new();
        client.expect_name().return_const("mock");
        client
            .expect_send()
            .times(1)
            .returning(|_, _| Err(AppError::Auth("invalid x-api-key".to_string())));
        let (store, mut state) = create_test_state(Arc::new(client));
        state.set_credential("sk-revoked").unwrap();
        state.select_tab(Tab::Category(Category::Travel));

        let result = state.analyze("bored").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
        assert!(!state.has_credential());
        assert_eq!(store.get(StorageKey::ApiKey).unwrap(), None);

        // no second request goes out with the rejected key
        assert!(matches!(state.begin_analysis("bored"), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_out_of_order_completion_is_dropped() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        state.select_tab(Tab::Category(Category::Travel));

        let slow = state.begin_analysis("first").unwrap();
        let fast = state.begin_analysis("second").unwrap();

        let applied = state
            .complete_analysis(completion(fast.seq, fast.category))
            .unwrap()
            .cloned();
        assert!(applied.is_some());

        let stale = state
            .complete_analysis(completion(slow.seq, slow.category))
            .unwrap();
        assert!(stale.is_none());

        assert_eq!(state.session().score, 10);
        assert_eq!(
            state.recommendations().unwrap().mood_analysis.as_deref(),
            Some("result #2")
        );
    }

    #[test]
    fn test_stale_failure_is_not_surfaced() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        state.select_tab(Tab::Category(Category::Travel));

        let old = state.begin_analysis("first").unwrap();
        state.begin_analysis("second").unwrap();

        let result = state.complete_analysis(AnalysisCompletion {
            seq: old.seq,
            category: old.category,
            result: Err(AppError::MalformedResponse("junk".to_string())),
        });
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_tab_switch_abandons_pending_analysis() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        state.select_tab(Tab::Category(Category::Concerts));
        let request = state.begin_analysis("hyped").unwrap();

        state.select_tab(Tab::Category(Category::Travel));
        let applied = state
            .complete_analysis(completion(request.seq, request.category))
            .unwrap();

        assert!(applied.is_none());
        assert!(state.recommendations().is_none());
        assert_eq!(state.session().streak, 0);
    }

    #[tokio::test]
    async fn test_add_to_cart_from_results_and_checkout() {
        let (_, mut state) = create_test_state(replying_client(CRAVINGS_REPLY));
        state.select_tab(Tab::Category(Category::Cravings));
        state.analyze("gutom").await.unwrap();

        let item = state.add_to_cart(1).unwrap();
        assert_eq!(item.category, Category::Cravings);
        state.add_to_cart(0).unwrap();
        assert!(matches!(state.add_to_cart(5), Err(AppError::InvalidInput(_))));

        assert_eq!(state.cart_total(), Amount::from_centavos(165_050));

        let confirmation = state.checkout().unwrap();
        assert_eq!(confirmation.destination, "Metro Manila, Philippines");
        assert!(state.cart().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_blocked_by_blank_address() {
        let (_, mut state) = create_test_state(replying_client(CRAVINGS_REPLY));
        state.select_tab(Tab::Category(Category::Cravings));
        state.analyze("gutom").await.unwrap();
        state.add_to_cart(0).unwrap();

        state.set_address("");
        assert!(matches!(state.checkout(), Err(AppError::MissingAddress)));
        assert_eq!(state.cart().len(), 1);
    }

    #[test]
    fn test_tab_switch_clears_results() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        state.select_tab(Tab::Category(Category::Travel));
        let request = state.begin_analysis("bored").unwrap();
        state
            .complete_analysis(completion(request.seq, request.category))
            .unwrap();
        assert!(state.recommendations().is_some());

        state.select_tab(Tab::Category(Category::Travel));
        assert!(state.recommendations().is_none());
    }

    #[test]
    fn test_share_text_follows_tab() {
        let (_, mut state) = create_test_state(Arc::new(MockRecommendationClient::new()));
        assert_eq!(state.share_text(), prompts::GENERIC_SHARE_TEXT);
        state.select_tab(Tab::Category(Category::Concerts));
        assert!(state.share_text().contains("#ConcertsPH"));
    }
}
