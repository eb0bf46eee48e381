//! Companion backend adapter.
//!
//! Every call is a plain JSON `fetch()` via gloo-net. Session cookies ride
//! along (`credentials: include`) so a non-same-origin `base_url` still
//! authenticates.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use web_sys::RequestCredentials;

use companion_core::ports::BackendPort;
use companion_types::{
    CompanionError, Result,
    auth::{LoginRequest, OAuthProvider, RegisterRequest},
    config::BackendConfig,
    emotion::{AnalyzeImageRequest, AnalyzeImageResponse, EmotionResult},
    message::{ChatMessage, ChatReply, ChatRequest},
    profile::{ProfileResponse, UserProfile},
    session::{ChatSessionRef, MessageListResponse, SessionListResponse},
    wellness::{
        MeditationStartRequest, MeditationStartResponse, MindfulnessPrompt,
        MindfulnessPromptResponse, Reminder, ReminderListResponse,
    },
};

/// Error body shape: `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpBackend {
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        Request::get(&self.url(path)).credentials(RequestCredentials::Include)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        Request::post(&self.url(path)).credentials(RequestCredentials::Include)
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        Request::delete(&self.url(path)).credentials(RequestCredentials::Include)
    }
}

/// Turn a non-2xx response into `CompanionError::Backend`, keeping the
/// server's `error` text when the body has one.
async fn check(response: Response) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error);
    Err(CompanionError::Backend { status, message })
}

async fn send(builder: RequestBuilder) -> Result<Response> {
    let response = builder
        .send()
        .await
        .map_err(|e| CompanionError::Network(e.to_string()))?;
    check(response).await
}

async fn send_json<B: serde::Serialize>(builder: RequestBuilder, body: &B) -> Result<Response> {
    let request = builder
        .json(body)
        .map_err(|e| CompanionError::Serialization(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| CompanionError::Network(e.to_string()))?;
    check(response).await
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| CompanionError::Serialization(e.to_string()))
}

#[async_trait(?Send)]
impl BackendPort for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> Result<()> {
        send_json(self.post("/login"), req).await?;
        Ok(())
    }

    async fn register(&self, req: &RegisterRequest) -> Result<()> {
        send_json(self.post("/register"), req).await?;
        Ok(())
    }

    async fn guest_login(&self) -> Result<()> {
        send_json(self.post("/auth/guest"), &json!({})).await?;
        Ok(())
    }

    fn oauth_url(&self, provider: OAuthProvider) -> String {
        self.url(&provider.path())
    }

    async fn profile(&self) -> Result<UserProfile> {
        let response = send(self.get("/profile")).await?;
        Ok(parse::<ProfileResponse>(response).await?.user)
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSessionRef>> {
        let response = send(self.get("/chat/sessions")).await?;
        Ok(parse::<SessionListResponse>(response).await?.into_sessions())
    }

    async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let path = format!("/chat/sessions/{}/messages", session_id);
        let response = send(self.get(&path)).await?;
        Ok(parse::<MessageListResponse>(response).await?.into_messages())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        send(self.delete(&format!("/chat/sessions/{}", session_id))).await?;
        Ok(())
    }

    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatReply> {
        let response = send_json(self.post("/chat"), req).await?;
        parse(response).await
    }

    async fn analyze_image(&self, data_url: &str) -> Result<Vec<EmotionResult>> {
        let body = AnalyzeImageRequest {
            image: data_url.to_string(),
        };
        let response = send_json(self.post("/emotions/analyze-image"), &body).await?;
        Ok(parse::<AnalyzeImageResponse>(response).await?.emotions)
    }

    async fn reminders(&self) -> Result<Vec<Reminder>> {
        let response = send(self.get("/wellness/reminders")).await?;
        Ok(parse::<ReminderListResponse>(response).await?.into_reminders())
    }

    async fn mindfulness_prompt(&self) -> Result<MindfulnessPrompt> {
        let response = send(self.get("/wellness/mindfulness")).await?;
        Ok(parse::<MindfulnessPromptResponse>(response).await?.prompt)
    }

    async fn start_meditation(&self, duration_minutes: u32) -> Result<String> {
        let body = MeditationStartRequest {
            duration: duration_minutes,
        };
        let response = send_json(self.post("/meditation/start"), &body).await?;
        Ok(parse::<MeditationStartResponse>(response).await?.session_id)
    }

    async fn complete_meditation(&self, session_id: &str) -> Result<()> {
        send(self.post(&format!("/meditation/complete/{}", session_id))).await?;
        Ok(())
    }
}
