//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in its own thread and runtime,
//! then drives `EpistemicMeClient` over real HTTP with the default ureq
//! executor. The server's shared state is kept so tests can assert on what
//! actually arrived on the wire.

use std::sync::Arc;

use epistemic_core::proto::methods;
use epistemic_core::{
    AddPhilosophyParams, ClientConfig, ClientError, Code, CreateBeliefParams,
    CreateDeveloperParams, CreateDialecticParams, CreatePhilosophyParams, CreateSelfModelParams,
    DialecticStatus, DialecticType, EpistemicMeClient, GetBeliefSystemDetailParams,
    GetDeveloperParams, GetSelfModelParams, ListBeliefsParams, ListDialecticsParams,
    UpdateDialecticParams, UpdatePhilosophyParams, UreqExecutor, UserAnswer,
};
use mock_server::AppState;

fn start_server() -> (String, Arc<AppState>) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let state = Arc::new(AppState::default());
    let server_state = state.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, server_state).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), state)
}

async fn register_developer(client: &EpistemicMeClient) -> String {
    let developer = client
        .create_developer(CreateDeveloperParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .unwrap()
        .developer
        .unwrap();
    assert_eq!(developer.api_keys.len(), 1);
    developer.api_keys[0].clone()
}

#[tokio::test]
async fn developer_key_unlocks_privileged_operations() {
    let (base_url, state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url));

    // Step 1: without a key the gate stops the call locally.
    let err = client
        .create_dialectic(CreateDialecticParams {
            user_id: "u1".to_string(),
            dialectic_type: DialecticType::Default,
            learning_objective: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AuthenticationRequired(_)));
    assert_eq!(state.calls_to(methods::CREATE_DIALECTIC).await, 0);

    // Step 2: obtain a key from the service and install it.
    let key = register_developer(&client).await;
    client.set_api_key(key.clone());

    // Step 3: the same call now succeeds and carries the key.
    let dialectic = client
        .create_dialectic(CreateDialecticParams {
            user_id: "u1".to_string(),
            dialectic_type: DialecticType::SleepDietExercise,
            learning_objective: None,
        })
        .await
        .unwrap()
        .dialectic
        .unwrap();
    assert_eq!(dialectic.dialectic_type, i32::from(DialecticType::SleepDietExercise));

    let recorded = state.requests().await;
    let call = recorded
        .iter()
        .find(|r| r.procedure == methods::CREATE_DIALECTIC)
        .unwrap();
    assert_eq!(call.api_key.as_deref(), Some(key.as_str()));
    assert_eq!(call.origin.as_deref(), Some("http://localhost:3000"));
    assert_eq!(call.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn unknown_key_is_reported_as_authentication_required() {
    let (base_url, _state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url).with_api_key("not-a-real-key"));

    let err = client
        .create_philosophy(CreatePhilosophyParams {
            description: "Rest well.".to_string(),
            extrapolate_contexts: None,
        })
        .await
        .unwrap_err();
    match err {
        ClientError::AuthenticationRequired(msg) => assert_eq!(
            msg,
            "Invalid or missing API key. Please check your API key configuration."
        ),
        other => panic!("expected AuthenticationRequired, got {other:?}"),
    }
}

#[tokio::test]
async fn belief_and_dialectic_lifecycle() {
    let (base_url, _state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url));
    let key = register_developer(&client).await;
    client.set_api_key(key);

    // Step 1: record a belief.
    let created = client
        .create_belief(CreateBeliefParams {
            user_id: "u1".to_string(),
            belief_content: "Sleep improves focus".to_string(),
        })
        .await
        .unwrap();
    let belief = created.belief.unwrap();
    assert_eq!(belief.content[0].raw_str, "Sleep improves focus");

    let listed = client
        .list_beliefs(ListBeliefsParams {
            user_id: "u1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(listed.beliefs, vec![belief.clone()]);

    // Step 2: the detail view always comes back with metrics.
    let detail = client
        .get_belief_system_detail(GetBeliefSystemDetailParams {
            user_id: "u1".to_string(),
            current_observation_context_ids: Vec::new(),
        })
        .await
        .unwrap()
        .belief_system
        .unwrap();
    assert_eq!(detail.metrics.unwrap().total_beliefs, 1);
    assert_eq!(detail.belief_contexts.len(), 1);

    // Step 3: open a dialectic and answer its first question.
    let dialectic = client
        .create_dialectic(CreateDialecticParams {
            user_id: "u1".to_string(),
            dialectic_type: DialecticType::Default,
            learning_objective: None,
        })
        .await
        .unwrap()
        .dialectic
        .unwrap();

    let updated = client
        .update_dialectic(UpdateDialecticParams {
            dialectic_id: dialectic.id.clone(),
            user_id: "u1".to_string(),
            answer: UserAnswer {
                user_answer: "Honesty matters".to_string(),
                created_at_millis_utc: 1_700_000_000_000,
            },
            custom_question: None,
            question_blob: None,
            answer_blob: None,
        })
        .await
        .unwrap()
        .dialectic
        .unwrap();
    assert_eq!(updated.user_interactions.len(), 2);
    assert_eq!(
        updated.user_interactions[0].status,
        i32::from(DialecticStatus::Answered)
    );
    let answer = updated.user_interactions[0]
        .interaction
        .as_ref()
        .and_then(|qa| qa.answer.as_ref())
        .unwrap();
    assert_eq!(answer.created_at_millis_utc, 1_700_000_000_000);

    let dialectics = client
        .list_dialectics(ListDialecticsParams {
            self_model_id: "u1".to_string(),
        })
        .await
        .unwrap()
        .dialectics;
    assert_eq!(dialectics.len(), 1);
    assert_eq!(dialectics[0].id, dialectic.id);
}

#[tokio::test]
async fn self_model_and_philosophy_lifecycle() {
    let (base_url, _state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url));
    let key = register_developer(&client).await;
    client.set_api_key(key);

    let philosophy = client
        .create_philosophy(CreatePhilosophyParams {
            description: "Rest well. Move daily.".to_string(),
            extrapolate_contexts: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(philosophy.extrapolated_observation_contexts.len(), 2);
    let philosophy_id = philosophy.philosophy.unwrap().id;

    let updated = client
        .update_philosophy(UpdatePhilosophyParams {
            philosophy_id: philosophy_id.clone(),
            description: "Rest well.".to_string(),
            extrapolate_contexts: None,
        })
        .await
        .unwrap();
    assert!(updated.extrapolated_observation_contexts.is_empty());

    client
        .create_self_model(CreateSelfModelParams {
            id: "sm1".to_string(),
            philosophies: None,
        })
        .await
        .unwrap();
    let model = client
        .add_philosophy(AddPhilosophyParams {
            self_model_id: "sm1".to_string(),
            philosophy_id: philosophy_id.clone(),
        })
        .await
        .unwrap()
        .self_model
        .unwrap();
    assert_eq!(model.philosophies, vec![philosophy_id.clone()]);

    let fetched = client
        .get_self_model(GetSelfModelParams { id: "sm1".to_string() })
        .await
        .unwrap()
        .self_model
        .unwrap();
    assert_eq!(fetched.philosophies, vec![philosophy_id]);
    assert!(fetched.belief_system.is_some());
}

#[tokio::test]
async fn binary_format_round_trip() {
    let (base_url, state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url).with_binary_format(true));

    let developer = client
        .create_developer(CreateDeveloperParams {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
        })
        .await
        .unwrap()
        .developer
        .unwrap();
    let fetched = client
        .get_developer(GetDeveloperParams {
            id: developer.id.clone(),
        })
        .await
        .unwrap()
        .developer
        .unwrap();
    assert_eq!(fetched, developer);

    // Key rotation keeps the binary codec.
    client.set_api_key(developer.api_keys[0].clone());
    client
        .create_dialectic(CreateDialecticParams {
            user_id: "u1".to_string(),
            dialectic_type: DialecticType::Hypothesis,
            learning_objective: None,
        })
        .await
        .unwrap();

    let recorded = state.requests().await;
    assert_eq!(recorded.len(), 3);
    assert!(recorded
        .iter()
        .all(|r| r.content_type.as_deref() == Some("application/proto")));
}

#[tokio::test]
async fn preprocess_pairs_questions_with_answers() {
    let (base_url, _state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url));

    let pairs = client
        .preprocess_question_answer(
            "\n# Intake\nQ: How do you sleep?\nQ: Do you exercise?\n",
            "A: Poorly\nA: Twice a week\n",
        )
        .await
        .unwrap()
        .qa_pairs;
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].question, "How do you sleep?");
    assert_eq!(pairs[1].answer, "Twice a week");
}

#[tokio::test]
async fn remote_not_found_passes_through() {
    let (base_url, _state) = start_server();
    let client = EpistemicMeClient::new(ClientConfig::new(&base_url));

    let err = client
        .get_developer(GetDeveloperParams {
            id: uuid::Uuid::new_v4().to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ClientError::RemoteCallFailed(rpc) => assert_eq!(rpc.code(), Code::NotFound),
        other => panic!("expected RemoteCallFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EpistemicMeClient::new(ClientConfig::new(format!("http://{addr}")).with_timeout_ms(2000));
    let err = client
        .list_dialectics(ListDialecticsParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RemoteCallFailed(_)));
}

#[tokio::test]
async fn response_over_body_limit_is_resource_exhausted() {
    let (base_url, _state) = start_server();
    let executor = Arc::new(UreqExecutor::new().with_body_limit(16));
    let client = EpistemicMeClient::with_executor(ClientConfig::new(&base_url), executor);

    let err = client
        .create_developer(CreateDeveloperParams {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ClientError::RemoteCallFailed(rpc) => assert_eq!(rpc.code(), Code::ResourceExhausted),
        other => panic!("expected RemoteCallFailed, got {other:?}"),
    }
}
