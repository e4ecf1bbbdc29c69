//! Chat operations exposed by the HTTP surface.

use std::sync::Arc;

use tracing::{debug, info};

use crate::composer::{RecipeComposer, RecipePreferences, RecipeRequest};
use crate::error::ChatError;
use crate::session::{ChatSession, Message, Role, SessionRepository};

/// Reply used when a user message carries no ingredients.
pub const ASK_FOR_INGREDIENTS: &str =
    "Please upload images of your ingredients or tell me what ingredients you have available.";

/// A user turn as received from the client.
#[derive(Debug, Clone, Default)]
pub struct UserTurn {
    pub message: String,
    pub ingredients: Option<Vec<String>>,
    pub preferences: Option<RecipePreferences>,
}

#[derive(Clone)]
pub struct ChatService {
    sessions: Arc<dyn SessionRepository>,
    composer: RecipeComposer,
}

impl ChatService {
    pub fn new(sessions: Arc<dyn SessionRepository>, composer: RecipeComposer) -> Self {
        Self { sessions, composer }
    }

    /// Text providers in the order they are tried.
    pub fn text_providers(&self) -> Vec<String> {
        self.composer
            .chain()
            .provider_names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub async fn create_chat(&self) -> ChatSession {
        let session = self.sessions.create().await;
        info!(chat_id = %session.id, "chat session created");
        session
    }

    pub async fn history(&self, chat_id: &str) -> Result<Vec<Message>, ChatError> {
        self.sessions.history(chat_id).await
    }

    /// Record a user turn and the assistant's reply, returning the reply.
    ///
    /// The session's writer lock is held for the whole exchange so the reply
    /// always directly follows its user message.
    pub async fn send_message(&self, chat_id: &str, turn: UserTurn) -> Result<Message, ChatError> {
        let _writer = self.sessions.lock(chat_id).await?;

        // The message keeps the list as sent, `[]` included.
        let user = Message::new(chat_id, Role::User, turn.message)
            .with_ingredients(turn.ingredients.clone());
        self.sessions.append(chat_id, user).await?;

        let reply = match turn.ingredients.filter(|list| !list.is_empty()) {
            Some(ingredients) => {
                debug!(chat_id, count = ingredients.len(), "generating recipes");
                let request = RecipeRequest {
                    ingredients,
                    preferences: turn.preferences.unwrap_or_default(),
                };
                self.composer.compose(&request).await
            }
            None => ASK_FOR_INGREDIENTS.to_owned(),
        };

        let assistant = Message::new(chat_id, Role::Assistant, reply);
        self.sessions.append(chat_id, assistant.clone()).await?;
        Ok(assistant)
    }

    /// Revise a recipe from user feedback.
    ///
    /// With no explicit `recipe`, the latest assistant message is refined.
    pub async fn refine(
        &self,
        chat_id: &str,
        feedback: &str,
        recipe: Option<&str>,
    ) -> Result<Message, ChatError> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(ChatError::Validation("feedback must not be empty".into()));
        }

        let _writer = self.sessions.lock(chat_id).await?;

        let current = match recipe.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => r.to_owned(),
            None => self
                .sessions
                .history(chat_id)
                .await?
                .into_iter()
                .rev()
                .find(|m| m.role == Role::Assistant)
                .map(|m| m.content)
                .ok_or_else(|| ChatError::Validation("no recipe to refine in this chat".into()))?,
        };

        self.sessions
            .append(chat_id, Message::new(chat_id, Role::User, feedback))
            .await?;
        let refined = self.composer.refine(&current, feedback).await;
        let assistant = Message::new(chat_id, Role::Assistant, refined);
        self.sessions.append(chat_id, assistant.clone()).await?;
        Ok(assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ProviderChain, FALLBACK_RECIPE};
    use crate::error::ProviderError;
    use crate::providers::TextProvider;
    use crate::session::InMemorySessionRepository;
    use async_trait::async_trait;
    use std::time::Duration;

    struct SlowEcho {
        delay: Duration,
    }

    #[async_trait]
    impl TextProvider for SlowEcho {
        fn name(&self) -> &str {
            "slow-echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            tokio::time::sleep(self.delay).await;
            Ok(format!("recipe for [{prompt}]"))
        }
    }

    fn service_with(providers: Vec<Arc<dyn TextProvider>>) -> ChatService {
        ChatService::new(
            Arc::new(InMemorySessionRepository::new()),
            RecipeComposer::new(ProviderChain::new(providers)),
        )
    }

    fn echo_service() -> ChatService {
        service_with(vec![Arc::new(SlowEcho { delay: Duration::ZERO }) as Arc<dyn TextProvider>])
    }

    fn turn(message: &str, ingredients: &[&str]) -> UserTurn {
        UserTurn {
            message: message.into(),
            ingredients: Some(ingredients.iter().map(|s| (*s).to_owned()).collect()),
            preferences: None,
        }
    }

    #[tokio::test]
    async fn create_then_history_is_empty() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        assert!(svc.history(&chat.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_to_unknown_chat_is_not_found() {
        let svc = echo_service();
        let err = svc.send_message("missing", turn("hi", &["egg"])).await.unwrap_err();
        assert_eq!(err, ChatError::NotFound("missing".into()));
    }

    #[tokio::test]
    async fn one_send_yields_user_then_assistant() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        let reply = svc.send_message(&chat.id, turn("what can I cook?", &["egg"])).await.unwrap();

        let history = svc.history(&chat.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "what can I cook?");
        assert_eq!(history[0].ingredients, Some(vec!["egg".to_owned()]));
        assert_eq!(history[1], reply);
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.chat_id, chat.id);
    }

    #[tokio::test]
    async fn no_ingredients_asks_for_them() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        let reply = svc
            .send_message(&chat.id, UserTurn { message: "hello".into(), ..UserTurn::default() })
            .await
            .unwrap();
        assert_eq!(reply.content, ASK_FOR_INGREDIENTS);

        let history = svc.history(&chat.id).await.unwrap();
        assert_eq!(history[0].ingredients, None);
    }

    #[tokio::test]
    async fn empty_ingredient_list_is_kept_on_the_message() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        let reply = svc.send_message(&chat.id, turn("hello", &[])).await.unwrap();
        assert_eq!(reply.content, ASK_FOR_INGREDIENTS);

        let history = svc.history(&chat.id).await.unwrap();
        assert_eq!(history[0].ingredients, Some(Vec::new()));
    }

    #[tokio::test]
    async fn italian_egg_and_flour_scenario() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        let reply = svc
            .send_message(
                &chat.id,
                UserTurn {
                    message: "Suggest something".into(),
                    ingredients: Some(vec!["egg".into(), "flour".into()]),
                    preferences: Some(RecipePreferences {
                        cuisine: Some("Italian".into()),
                        ..RecipePreferences::default()
                    }),
                },
            )
            .await
            .unwrap();
        assert!(!reply.content.is_empty());
        assert_ne!(reply.content, ASK_FOR_INGREDIENTS);
        assert!(reply.content.contains("Ingredients: egg, flour"));
        assert!(reply.content.contains("Cuisine: Italian"));
    }

    #[tokio::test]
    async fn all_providers_down_still_replies() {
        let svc = service_with(Vec::new());
        let chat = svc.create_chat().await;
        let reply = svc.send_message(&chat.id, turn("hi", &["rice"])).await.unwrap();
        assert_eq!(reply.content, FALLBACK_RECIPE);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sends_keep_pairs_adjacent() {
        let svc = service_with(vec![
            Arc::new(SlowEcho { delay: Duration::from_millis(10) }) as Arc<dyn TextProvider>,
        ]);
        let chat = svc.create_chat().await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = svc.clone();
            let id = chat.id.clone();
            handles.push(tokio::spawn(async move {
                let item = format!("item{i}");
                svc.send_message(&id, turn(&format!("turn {i}"), &[item.as_str()]))
                    .await
                    .unwrap()
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let history = svc.history(&chat.id).await.unwrap();
        assert_eq!(history.len(), 16);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            let ingredient = &pair[0].ingredients.as_ref().unwrap()[0];
            assert!(pair[1].content.contains(ingredient.as_str()));
        }
    }

    #[tokio::test]
    async fn refine_uses_latest_assistant_message() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        let first = svc.send_message(&chat.id, turn("cook", &["egg"])).await.unwrap();

        let refined = svc.refine(&chat.id, "less salt", None).await.unwrap();
        assert!(refined.content.contains(&format!("Current recipe: {}", first.content)));
        assert!(refined.content.contains("User feedback: less salt"));

        let history = svc.history(&chat.id).await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2].content, "less salt");
        assert_eq!(history[3], refined);
    }

    #[tokio::test]
    async fn refine_validates_input() {
        let svc = echo_service();
        let chat = svc.create_chat().await;
        assert!(matches!(
            svc.refine(&chat.id, "  ", Some("x")).await,
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            svc.refine(&chat.id, "spicier", None).await,
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            svc.refine("missing", "spicier", Some("x")).await,
            Err(ChatError::NotFound(_))
        ));
    }
}
