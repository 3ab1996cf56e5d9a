//! AI-assisted translation of team member profiles.
//!
//! Jobs are tracked in an in-memory [`TranslationRegistry`] keyed by team
//! member id and move through `queued -> running -> done | failed`. At most
//! one job per member is active at a time.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::team_member::{TranslatedProfile, TranslationSource};
use crate::domain::types::{RichText, TeamMemberId};
use crate::models::config::TranslationConfig;
use crate::repository::{ErrorLogWriter, TeamMemberReader, TeamMemberWriter};
use crate::services::error_log::record_error;
use crate::services::{ServiceError, ServiceResult, ensure_access};

const SYSTEM_PROMPT: &str = "You translate Brazilian Portuguese law firm profiles into \
English. Answer with a JSON object with the keys \"title\", \"bio\" and \"education\". \
Keep any HTML markup and legal terminology intact.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Done,
    Failed(String),
}

impl JobState {
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Queued | JobState::Running)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TranslationRegistry {
    jobs: Arc<Mutex<HashMap<TeamMemberId, JobState>>>,
}

impl TranslationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_jobs<T>(&self, f: impl FnOnce(&mut HashMap<TeamMemberId, JobState>) -> T) -> T {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut jobs)
    }

    /// Registers a queued job unless one is already queued or running.
    pub fn try_enqueue(&self, id: TeamMemberId) -> ServiceResult<()> {
        self.with_jobs(|jobs| {
            if jobs.get(&id).is_some_and(JobState::is_active) {
                return Err(ServiceError::Conflict(
                    "Uma tradução já está em andamento para este perfil.".to_string(),
                ));
            }
            jobs.insert(id, JobState::Queued);
            Ok(())
        })
    }

    pub fn set(&self, id: TeamMemberId, state: JobState) {
        self.with_jobs(|jobs| {
            jobs.insert(id, state);
        });
    }

    pub fn state(&self, id: TeamMemberId) -> Option<JobState> {
        self.with_jobs(|jobs| jobs.get(&id).cloned())
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation api returned status {0}")]
    Status(u16),

    #[error("unexpected translation response: {0}")]
    InvalidResponse(String),
}

/// Produces English texts for a Portuguese profile.
pub trait Translator {
    fn translate(
        &self,
        source: &TranslationSource,
    ) -> impl Future<Output = Result<TranslatedProfile, TranslationError>>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: serde_json::Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranslatedFields {
    title: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    education: String,
}

/// Extracts the translated fields from a chat-completion reply.
fn parse_completion(body: ChatResponse) -> Result<TranslatedProfile, TranslationError> {
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TranslationError::InvalidResponse("empty completion".to_string()))?;

    let fields: TranslatedFields = serde_json::from_str(content.trim())
        .map_err(|err| TranslationError::InvalidResponse(err.to_string()))?;

    Ok(TranslatedProfile {
        title_en: fields.title.trim().to_string(),
        bio_en: RichText::new(fields.bio),
        education_en: RichText::new(fields.education),
    })
}

/// Chat-completion client speaking the OpenAI-compatible protocol.
#[derive(Clone)]
pub struct HttpTranslator {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl Translator for HttpTranslator {
    async fn translate(
        &self,
        source: &TranslationSource,
    ) -> Result<TranslatedProfile, TranslationError> {
        let payload = serde_json::to_string(source)
            .map_err(|err| TranslationError::InvalidResponse(err.to_string()))?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: payload,
                },
            ],
            response_format: serde_json::json!({ "type": "json_object" }),
            temperature: 0.2,
        };

        let mut builder = self.http.post(&self.api_url).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(TranslationError::Status(response.status().as_u16()));
        }
        let body = response.json::<ChatResponse>().await?;
        parse_completion(body)
    }
}

/// Runs one job to completion, persisting the English fields on success.
pub async fn run_job<R, T>(
    repo: R,
    translator: T,
    registry: TranslationRegistry,
    id: TeamMemberId,
    source: TranslationSource,
) where
    R: TeamMemberWriter + ErrorLogWriter,
    T: Translator,
{
    registry.set(id, JobState::Running);

    let outcome = match translator.translate(&source).await {
        Ok(profile) => repo
            .save_translation(id, &profile)
            .map(|_| ())
            .map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };

    match outcome {
        Ok(()) => {
            log::info!("Translation of team member {id} finished");
            registry.set(id, JobState::Done);
        }
        Err(message) => {
            log::error!("Translation of team member {id} failed: {message}");
            record_error(&repo, "translation", &message, None, None);
            registry.set(id, JobState::Failed(message));
        }
    }
}

/// Queues a translation of the member's Portuguese profile and spawns it on
/// the current runtime.
pub fn start_translation<R, T>(
    repo: &R,
    translator: &T,
    registry: &TranslationRegistry,
    user: &AuthenticatedUser,
    member_id: i32,
) -> ServiceResult<JobState>
where
    R: TeamMemberReader + TeamMemberWriter + ErrorLogWriter + Clone + 'static,
    T: Translator + Clone + 'static,
{
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = TeamMemberId::new(member_id)?;
    let member = repo
        .get_team_member_by_id(id)?
        .ok_or(ServiceError::NotFound)?;

    registry.try_enqueue(id)?;
    log::info!("User {} queued translation of team member {id}", user.id);

    actix_web::rt::spawn(run_job(
        repo.clone(),
        translator.clone(),
        registry.clone(),
        id,
        member.translation_source(),
    ));

    Ok(JobState::Queued)
}

pub fn translation_status(
    registry: &TranslationRegistry,
    user: &AuthenticatedUser,
    member_id: i32,
) -> ServiceResult<Option<JobState>> {
    ensure_access(user, RouteRequirements::ADMIN)?;

    let id = TeamMemberId::new(member_id)?;
    Ok(registry.state(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: i32) -> TeamMemberId {
        TeamMemberId::new(value).unwrap()
    }

    #[test]
    fn active_job_blocks_second_enqueue() {
        let registry = TranslationRegistry::new();
        registry.try_enqueue(id(1)).unwrap();
        assert!(matches!(
            registry.try_enqueue(id(1)),
            Err(ServiceError::Conflict(_))
        ));

        registry.set(id(1), JobState::Running);
        assert!(registry.try_enqueue(id(1)).is_err());

        registry.try_enqueue(id(2)).unwrap();
    }

    #[test]
    fn finished_jobs_can_be_requeued() {
        let registry = TranslationRegistry::new();
        registry.set(id(1), JobState::Done);
        registry.try_enqueue(id(1)).unwrap();
        assert_eq!(registry.state(id(1)), Some(JobState::Queued));

        registry.set(id(1), JobState::Failed("timeout".to_string()));
        registry.try_enqueue(id(1)).unwrap();
    }

    #[test]
    fn job_state_serializes_with_tag() {
        assert_eq!(
            serde_json::to_value(JobState::Running).unwrap(),
            serde_json::json!({ "state": "running" })
        );
        assert_eq!(
            serde_json::to_value(JobState::Failed("boom".into())).unwrap(),
            serde_json::json!({ "state": "failed", "message": "boom" })
        );
    }

    #[test]
    fn completion_content_is_parsed() {
        let body: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content":
                "{\"title\": \" Partner \", \"bio\": \"<p>Labor lawyer</p>\", \"education\": \"USP\"}"
            }}]
        }))
        .unwrap();

        let profile = parse_completion(body).unwrap();

        assert_eq!(profile.title_en, "Partner");
        assert_eq!(profile.bio_en.as_str(), "<p>Labor lawyer</p>");
        assert_eq!(profile.education_en.as_str(), "USP");
    }

    #[test]
    fn completion_without_json_is_rejected() {
        let body: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": "Sorry, I cannot help." } }]
        }))
        .unwrap();

        assert!(matches!(
            parse_completion(body),
            Err(TranslationError::InvalidResponse(_))
        ));
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod job_tests {
    use super::*;
    use crate::domain::team_member::TeamMember;
    use crate::domain::types::{Email, PersonName, Title};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    #[derive(Clone)]
    struct FakeTranslator {
        fail: bool,
    }

    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            source: &TranslationSource,
        ) -> Result<TranslatedProfile, TranslationError> {
            if self.fail {
                return Err(TranslationError::Status(503));
            }
            Ok(TranslatedProfile {
                title_en: format!("EN {}", source.title),
                bio_en: RichText::new("bio"),
                education_en: RichText::new("education"),
            })
        }
    }

    fn member() -> TeamMember {
        let now = Utc::now().naive_utc();
        TeamMember {
            id: TeamMemberId::new(3).unwrap(),
            name: PersonName::new("Paula Reis").unwrap(),
            email: Email::new("paula@firma.com.br").unwrap(),
            phone: None,
            oab_number: None,
            title_pt: Title::new("Sócia").unwrap(),
            title_en: String::new(),
            bio_pt: RichText::new("Advogada trabalhista"),
            bio_en: RichText::default(),
            education_pt: RichText::new("USP"),
            education_en: RichText::default(),
            practice_areas: vec!["trabalhista".to_string()],
            photo_url: None,
            display_order: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// A successful translation is stored and the job ends as done.
    #[actix_web::test]
    async fn job_saves_translation() {
        let mut repo = MockRepository::new();
        repo.expect_save_translation()
            .withf(|_, profile| profile.title_en == "EN Sócia")
            .times(1)
            .returning(|_, _| Ok(member()));
        repo.expect_create_error_log().times(0);
        let registry = TranslationRegistry::new();
        let id = TeamMemberId::new(3).unwrap();

        run_job(
            repo,
            FakeTranslator { fail: false },
            registry.clone(),
            id,
            member().translation_source(),
        )
        .await;

        assert_eq!(registry.state(id), Some(JobState::Done));
    }

    /// Translator failures are logged and reported through the registry.
    #[actix_web::test]
    async fn job_failure_is_recorded() {
        let mut repo = MockRepository::new();
        repo.expect_save_translation().times(0);
        repo.expect_create_error_log()
            .withf(|entry| entry.context.as_str() == "translation")
            .times(1)
            .returning(|_| Ok(()));
        let registry = TranslationRegistry::new();
        let id = TeamMemberId::new(3).unwrap();

        run_job(
            repo,
            FakeTranslator { fail: true },
            registry.clone(),
            id,
            member().translation_source(),
        )
        .await;

        assert!(matches!(registry.state(id), Some(JobState::Failed(msg)) if msg.contains("503")));
    }

    /// A repository failure while saving also fails the job.
    #[actix_web::test]
    async fn job_fails_when_save_fails() {
        let mut repo = MockRepository::new();
        repo.expect_save_translation()
            .returning(|_, _| Err(RepositoryError::NotFound));
        repo.expect_create_error_log().returning(|_| Ok(()));
        let registry = TranslationRegistry::new();
        let id = TeamMemberId::new(3).unwrap();

        run_job(
            repo,
            FakeTranslator { fail: false },
            registry.clone(),
            id,
            member().translation_source(),
        )
        .await;

        assert!(matches!(registry.state(id), Some(JobState::Failed(_))));
    }
}
