//! In-memory service state and the behavior behind each procedure.

use std::{
    collections::{HashMap, HashSet},
    time::{SystemTime, UNIX_EPOCH},
};

use epistemic_proto::{
    AddPhilosophyRequest, AddPhilosophyResponse, Belief, BeliefContext, BeliefSystem,
    BeliefSystemMetrics, BeliefType, Content, CreateBeliefRequest, CreateBeliefResponse, CreateDeveloperRequest,
    CreateDeveloperResponse, CreateDialecticRequest, CreateDialecticResponse,
    CreatePhilosophyRequest, CreatePhilosophyResponse, CreateSelfModelRequest,
    CreateSelfModelResponse, Developer, Dialectic, DialecticStatus, DialecticType,
    DialecticalInteraction, EpistemicEmotion, GetBeliefSystemRequest, GetBeliefSystemResponse,
    GetDeveloperRequest, GetDeveloperResponse, GetSelfModelRequest, GetSelfModelResponse,
    InteractionType, ListBeliefsRequest, ListBeliefsResponse, ListDialecticsRequest,
    ListDialecticsResponse, ObservationContext, Philosophy, PreprocessQuestionAnswerRequest,
    PreprocessQuestionAnswerResponse, QaPair, Question, QuestionAnswerInteraction, SelfModel,
    UpdateDialecticRequest, UpdateDialecticResponse, UpdatePhilosophyRequest,
    UpdatePhilosophyResponse,
};
use uuid::Uuid;

use crate::connect::Rejection;

pub const MISSING_API_KEY: &str = "missing API key";
pub const INVALID_API_KEY: &str = "invalid API key";

const GENERAL_CONTEXT_ID: &str = "general";

#[derive(Debug, Default)]
pub struct Store {
    developers: HashMap<String, Developer>,
    api_keys: HashSet<String>,
    self_models: HashMap<String, SelfModel>,
    beliefs: HashMap<String, Vec<Belief>>,
    dialectics: Vec<Dialectic>,
    philosophies: HashMap<String, Philosophy>,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Store {
    /// Registers a key as if a developer had been issued it.
    pub fn issue_api_key(&mut self, key: impl Into<String>) {
        self.api_keys.insert(key.into());
    }

    pub fn authorize(&self, api_key: Option<&str>) -> Result<(), Rejection> {
        match api_key {
            None | Some("") => Err(Rejection::unauthenticated(MISSING_API_KEY)),
            Some(key) if self.api_keys.contains(key) => Ok(()),
            Some(_) => Err(Rejection::unauthenticated(INVALID_API_KEY)),
        }
    }

    // --- beliefs ---

    pub fn create_belief(&mut self, req: CreateBeliefRequest) -> Result<CreateBeliefResponse, Rejection> {
        if req.belief_content.trim().is_empty() {
            return Err(Rejection::invalid_argument("belief content is required"));
        }
        let belief = self.add_belief(&req.self_model_id, &req.belief_content);
        Ok(CreateBeliefResponse {
            belief: Some(belief),
            belief_system: Some(self.belief_system(&req.self_model_id, false, false)),
        })
    }

    pub fn list_beliefs(&self, req: ListBeliefsRequest) -> ListBeliefsResponse {
        let beliefs = self
            .beliefs_of(&req.self_model_id)
            .iter()
            .filter(|b| req.belief_ids.is_empty() || req.belief_ids.contains(&b.id))
            .cloned()
            .collect();
        ListBeliefsResponse {
            beliefs,
            belief_system: Some(self.belief_system(&req.self_model_id, false, false)),
        }
    }

    pub fn get_belief_system(&self, req: GetBeliefSystemRequest) -> GetBeliefSystemResponse {
        GetBeliefSystemResponse {
            belief_system: Some(self.belief_system(
                &req.self_model_id,
                req.conceptualize,
                req.include_metrics,
            )),
        }
    }

    fn add_belief(&mut self, self_model_id: &str, content: &str) -> Belief {
        let belief = Belief {
            id: new_id(),
            self_model_id: self_model_id.to_string(),
            version: 0,
            r#type: BeliefType::Statement.into(),
            content: vec![Content {
                raw_str: content.to_string(),
            }],
        };
        self.beliefs
            .entry(self_model_id.to_string())
            .or_default()
            .push(belief.clone());
        belief
    }

    fn beliefs_of(&self, self_model_id: &str) -> &[Belief] {
        self.beliefs.get(self_model_id).map(Vec::as_slice).unwrap_or_default()
    }

    fn belief_system(&self, self_model_id: &str, conceptualize: bool, include_metrics: bool) -> BeliefSystem {
        let beliefs = self.beliefs_of(self_model_id).to_vec();
        let (observation_contexts, belief_contexts) = if conceptualize && !beliefs.is_empty() {
            let context = ObservationContext {
                id: GENERAL_CONTEXT_ID.to_string(),
                name: "General".to_string(),
                parent_id: String::new(),
                possible_states: Vec::new(),
            };
            let links = beliefs
                .iter()
                .map(|b| BeliefContext {
                    belief_id: b.id.clone(),
                    observation_context_id: GENERAL_CONTEXT_ID.to_string(),
                    conditional_probability: 1.0,
                    epistemic_emotion: EpistemicEmotion::Confirmation.into(),
                    emotion_intensity: 0.5,
                })
                .collect();
            (vec![context], links)
        } else {
            (Vec::new(), Vec::new())
        };
        let metrics = include_metrics.then(|| metrics_for(&beliefs));
        BeliefSystem {
            beliefs,
            observation_contexts,
            belief_contexts,
            metrics,
        }
    }

    // --- dialectics ---

    pub fn list_dialectics(&self, req: ListDialecticsRequest) -> ListDialecticsResponse {
        ListDialecticsResponse {
            dialectics: self
                .dialectics
                .iter()
                .filter(|d| d.self_model_id == req.self_model_id)
                .cloned()
                .collect(),
        }
    }

    pub fn create_dialectic(&mut self, req: CreateDialecticRequest) -> Result<CreateDialecticResponse, Rejection> {
        if req.self_model_id.is_empty() {
            return Err(Rejection::invalid_argument("self model id is required"));
        }
        let kind = DialecticType::try_from(req.dialectic_type).unwrap_or_default();
        let dialectic = Dialectic {
            id: new_id(),
            self_model_id: req.self_model_id.clone(),
            user_interactions: vec![pending_interaction(question_for(kind, 0))],
            belief_system: Some(self.belief_system(&req.self_model_id, false, false)),
            learning_objective: req.learning_objective,
            dialectic_type: kind.into(),
        };
        self.dialectics.push(dialectic.clone());
        Ok(CreateDialecticResponse {
            dialectic: Some(dialectic),
        })
    }

    /// Answers the dialectic's pending interaction, records the answer as a
    /// belief and opens the next question.
    pub fn update_dialectic(&mut self, req: UpdateDialecticRequest) -> Result<UpdateDialecticResponse, Rejection> {
        let position = self
            .dialectics
            .iter()
            .position(|d| d.id == req.id)
            .ok_or_else(|| Rejection::not_found(format!("dialectic {} not found", req.id)))?;
        if self.dialectics[position].self_model_id != req.self_model_id {
            return Err(Rejection::invalid_argument(format!(
                "dialectic {} does not belong to self model {}",
                req.id, req.self_model_id
            )));
        }
        let answer = req
            .answer
            .ok_or_else(|| Rejection::invalid_argument("answer is required"))?;
        if !self.dialectics[position].user_interactions.iter().any(is_pending) {
            return Err(Rejection::new("failed_precondition", "no question is awaiting an answer"));
        }

        let extracted = if answer.user_answer.trim().is_empty() {
            Vec::new()
        } else {
            vec![self.add_belief(&req.self_model_id, &answer.user_answer)]
        };
        let belief_system = self.belief_system(&req.self_model_id, false, false);

        let dialectic = &mut self.dialectics[position];
        let kind = DialecticType::try_from(dialectic.dialectic_type).unwrap_or_default();
        let pending = dialectic
            .user_interactions
            .iter_mut()
            .rev()
            .find(|i| is_pending(i))
            .ok_or_else(|| Rejection::new("failed_precondition", "no question is awaiting an answer"))?;
        let now = now_millis();
        pending.status = DialecticStatus::Answered.into();
        pending.updated_at_millis_utc = now;
        if let Some(qa) = pending.interaction.as_mut() {
            if let Some(custom) = req.custom_question.filter(|q| !q.is_empty()) {
                qa.question = Some(Question {
                    question: custom,
                    created_at_millis_utc: now,
                });
            }
            qa.answer = Some(answer);
            qa.extracted_beliefs = extracted;
        }

        let asked = dialectic.user_interactions.len();
        dialectic
            .user_interactions
            .push(pending_interaction(question_for(kind, asked)));
        dialectic.belief_system = Some(belief_system);

        Ok(UpdateDialecticResponse {
            dialectic: Some(dialectic.clone()),
        })
    }

    // --- developers ---

    pub fn create_developer(&mut self, req: CreateDeveloperRequest) -> Result<CreateDeveloperResponse, Rejection> {
        if req.name.trim().is_empty() || req.email.trim().is_empty() {
            return Err(Rejection::invalid_argument("name and email are required"));
        }
        let now = now_millis();
        let key = format!("key-{}", Uuid::new_v4().simple());
        let developer = Developer {
            id: new_id(),
            name: req.name,
            email: req.email,
            api_keys: vec![key.clone()],
            created_at: now,
            updated_at: now,
        };
        self.api_keys.insert(key);
        self.developers.insert(developer.id.clone(), developer.clone());
        Ok(CreateDeveloperResponse {
            developer: Some(developer),
        })
    }

    pub fn get_developer(&self, req: GetDeveloperRequest) -> Result<GetDeveloperResponse, Rejection> {
        let developer = self
            .developers
            .get(&req.id)
            .cloned()
            .ok_or_else(|| Rejection::not_found(format!("developer {} not found", req.id)))?;
        Ok(GetDeveloperResponse {
            developer: Some(developer),
        })
    }

    // --- self models ---

    pub fn create_self_model(&mut self, req: CreateSelfModelRequest) -> Result<CreateSelfModelResponse, Rejection> {
        if req.id.is_empty() {
            return Err(Rejection::invalid_argument("self model id is required"));
        }
        if self.self_models.contains_key(&req.id) {
            return Err(Rejection::new(
                "already_exists",
                format!("self model {} already exists", req.id),
            ));
        }
        self.self_models.insert(
            req.id.clone(),
            SelfModel {
                id: req.id.clone(),
                philosophies: req.philosophies,
                belief_system: None,
                dialectics: Vec::new(),
            },
        );
        Ok(CreateSelfModelResponse {
            self_model: self.self_model_view(&req.id),
        })
    }

    pub fn get_self_model(&self, req: GetSelfModelRequest) -> Result<GetSelfModelResponse, Rejection> {
        let self_model = self
            .self_model_view(&req.self_model_id)
            .ok_or_else(|| Rejection::not_found(format!("self model {} not found", req.self_model_id)))?;
        Ok(GetSelfModelResponse {
            self_model: Some(self_model),
        })
    }

    pub fn add_philosophy(&mut self, req: AddPhilosophyRequest) -> Result<AddPhilosophyResponse, Rejection> {
        let model = self
            .self_models
            .get_mut(&req.self_model_id)
            .ok_or_else(|| Rejection::not_found(format!("self model {} not found", req.self_model_id)))?;
        if !model.philosophies.contains(&req.philosophy_id) {
            model.philosophies.push(req.philosophy_id);
        }
        Ok(AddPhilosophyResponse {
            self_model: self.self_model_view(&req.self_model_id),
        })
    }

    /// A stored self model with its current belief system and dialectics
    /// attached.
    fn self_model_view(&self, id: &str) -> Option<SelfModel> {
        let stored = self.self_models.get(id)?;
        Some(SelfModel {
            id: stored.id.clone(),
            philosophies: stored.philosophies.clone(),
            belief_system: Some(self.belief_system(id, false, false)),
            dialectics: self.list_dialectics(ListDialecticsRequest {
                self_model_id: id.to_string(),
            })
            .dialectics,
        })
    }

    // --- preprocessing ---

    pub fn preprocess_question_answer(
        &self,
        req: PreprocessQuestionAnswerRequest,
    ) -> Result<PreprocessQuestionAnswerResponse, Rejection> {
        let questions: Vec<String> = req.question_blobs.iter().flat_map(|b| blob_entries(b)).collect();
        let answers: Vec<String> = req.answer_blobs.iter().flat_map(|b| blob_entries(b)).collect();
        if questions.is_empty() || answers.is_empty() {
            return Err(Rejection::invalid_argument("question and answer blobs are required"));
        }
        let qa_pairs = questions
            .into_iter()
            .zip(answers)
            .map(|(question, answer)| QaPair { question, answer })
            .collect();
        Ok(PreprocessQuestionAnswerResponse { qa_pairs })
    }

    // --- philosophies ---

    pub fn create_philosophy(&mut self, req: CreatePhilosophyRequest) -> Result<CreatePhilosophyResponse, Rejection> {
        if req.description.trim().is_empty() {
            return Err(Rejection::invalid_argument("description is required"));
        }
        let philosophy = Philosophy {
            id: new_id(),
            description: req.description,
            extrapolate_contexts: req.extrapolate_contexts,
        };
        self.philosophies.insert(philosophy.id.clone(), philosophy.clone());
        Ok(CreatePhilosophyResponse {
            extrapolated_observation_contexts: extrapolate(&philosophy),
            philosophy: Some(philosophy),
        })
    }

    pub fn update_philosophy(&mut self, req: UpdatePhilosophyRequest) -> Result<UpdatePhilosophyResponse, Rejection> {
        let philosophy = self
            .philosophies
            .get_mut(&req.philosophy_id)
            .ok_or_else(|| Rejection::not_found(format!("philosophy {} not found", req.philosophy_id)))?;
        philosophy.description = req.description;
        philosophy.extrapolate_contexts = req.extrapolate_contexts;
        let philosophy = philosophy.clone();
        Ok(UpdatePhilosophyResponse {
            extrapolated_observation_contexts: extrapolate(&philosophy),
            philosophy: Some(philosophy),
        })
    }
}

fn metrics_for(beliefs: &[Belief]) -> BeliefSystemMetrics {
    let count = |kind: BeliefType| beliefs.iter().filter(|b| b.r#type == i32::from(kind)).count() as i32;
    let total = beliefs.len() as i32;
    let falsifiable = count(BeliefType::Falsifiable);
    BeliefSystemMetrics {
        total_beliefs: total,
        total_falsifiable_beliefs: falsifiable,
        total_causal_beliefs: count(BeliefType::Causal),
        total_belief_statements: count(BeliefType::Statement),
        clarification_score: if total == 0 {
            0.0
        } else {
            f64::from(falsifiable) / f64::from(total)
        },
    }
}

fn is_pending(interaction: &DialecticalInteraction) -> bool {
    interaction.status == i32::from(DialecticStatus::PendingAnswer)
}

fn pending_interaction(question: &str) -> DialecticalInteraction {
    let now = now_millis();
    DialecticalInteraction {
        id: new_id(),
        status: DialecticStatus::PendingAnswer.into(),
        r#type: InteractionType::QuestionAnswer.into(),
        interaction: Some(QuestionAnswerInteraction {
            question: Some(Question {
                question: question.to_string(),
                created_at_millis_utc: now,
            }),
            answer: None,
            extracted_beliefs: Vec::new(),
        }),
        updated_at_millis_utc: now,
    }
}

fn question_for(kind: DialecticType, asked: usize) -> &'static str {
    const DEFAULT: [&str; 3] = [
        "What is something you believe strongly?",
        "Why do you hold that belief?",
        "What would change your mind?",
    ];
    const HYPOTHESIS: [&str; 2] = [
        "What do you expect to happen if you act on this belief?",
        "How would you test that expectation?",
    ];
    const SLEEP_DIET_EXERCISE: [&str; 3] = [
        "How many hours do you usually sleep?",
        "How would you describe your diet?",
        "How often do you exercise?",
    ];
    let questions: &[&str] = match kind {
        DialecticType::Default => &DEFAULT,
        DialecticType::Hypothesis => &HYPOTHESIS,
        DialecticType::SleepDietExercise => &SLEEP_DIET_EXERCISE,
    };
    questions[asked % questions.len()]
}

/// Splits a free-form blob into entries: one per non-empty line, ignoring
/// markdown headings and stripping list markers and `Q:`/`A:` prefixes.
fn blob_entries(blob: &str) -> Vec<String> {
    blob.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let line = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .unwrap_or(line);
            let line = line
                .strip_prefix("Q:")
                .or_else(|| line.strip_prefix("A:"))
                .unwrap_or(line);
            line.trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// One observation context per sentence of the description, when the
/// philosophy asks for extrapolation.
fn extrapolate(philosophy: &Philosophy) -> Vec<ObservationContext> {
    if !philosophy.extrapolate_contexts {
        return Vec::new();
    }
    philosophy
        .description
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|sentence| ObservationContext {
            id: new_id(),
            name: sentence.to_string(),
            parent_id: philosophy.id.clone(),
            possible_states: Vec::new(),
        })
        .collect()
}
