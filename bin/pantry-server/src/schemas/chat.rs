use pantry_core::{ChatSession, Message, RecipePreferences, Role, UserTurn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `POST /api/chat/create`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatResponse {
    pub success: bool,
    pub chat_id: String,
    pub message: String,
}

/// Optional recipe preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesBody {
    /// Dietary restrictions, e.g. `["vegan"]`.
    #[serde(default)]
    pub dietary: Option<Vec<String>>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Maximum total time in minutes.
    #[serde(default)]
    pub max_time: Option<u32>,
}

/// Request body for `POST /api/chat/{chatId}/message`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Free-form user text.
    #[serde(default)]
    pub message: String,
    /// Ingredients to cook with; when empty the assistant asks for some.
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub preferences: Option<PreferencesBody>,
}

/// Request body for `POST /api/chat/{chatId}/refine`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    /// What to change about the recipe.
    pub feedback: String,
    /// Recipe text to refine; defaults to the latest assistant message.
    #[serde(default)]
    pub recipe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    /// `"user"`, `"assistant"`, or `"system"`.
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

/// Response body for the message and refine routes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: MessageResponse,
}

/// Response body for `GET /api/chat/{chatId}/history`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub success: bool,
    pub messages: Vec<MessageResponse>,
}

impl From<PreferencesBody> for RecipePreferences {
    fn from(p: PreferencesBody) -> Self {
        RecipePreferences {
            dietary: p.dietary,
            cuisine: p.cuisine,
            difficulty: p.difficulty,
            max_time: p.max_time,
        }
    }
}

impl From<SendMessageRequest> for UserTurn {
    fn from(req: SendMessageRequest) -> Self {
        UserTurn {
            message: req.message,
            ingredients: req.ingredients,
            preferences: req.preferences.map(Into::into),
        }
    }
}

impl CreateChatResponse {
    pub fn created(session: &ChatSession) -> Self {
        Self {
            success: true,
            chat_id: session.id.clone(),
            message: "Chat session created".to_owned(),
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        let role = match m.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        MessageResponse {
            id: m.id,
            chat_id: m.chat_id,
            role: role.to_owned(),
            content: m.content,
            ingredients: m.ingredients,
            images: m.images,
            timestamp: m.timestamp.to_rfc3339(),
        }
    }
}
