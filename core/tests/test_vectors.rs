//! Verify facade operations against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its caller-side input, the request that must
//! reach the wire, a simulated response and what the caller gets back.
//! Bodies are compared as parsed JSON (not raw strings) so field order does
//! not matter; expected results only list the fields a case cares about.

mod common;

use common::RecordingExecutor;
use epistemic_core::{
    AddPhilosophyParams, ClientConfig, ClientError, CreateBeliefParams, CreateDeveloperParams,
    CreateDialecticParams, CreatePhilosophyParams, CreateSelfModelParams, EpistemicMeClient,
    GetBeliefSystemDetailParams, GetDeveloperParams, GetSelfModelParams, HttpResponse,
    ListBeliefsParams, ListDialecticsParams, UpdateDialecticParams, UpdatePhilosophyParams,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn vectors() -> Value {
    let raw = include_str!("../../test-vectors/requests.json");
    serde_json::from_str(raw).unwrap()
}

fn client_for(vectors: &Value, executor: &std::sync::Arc<RecordingExecutor>) -> EpistemicMeClient {
    let config: ClientConfig = serde_json::from_value(vectors["config"].clone()).unwrap();
    EpistemicMeClient::with_executor(config, executor.clone())
}

fn simulated(case: &Value) -> std::sync::Arc<RecordingExecutor> {
    let sim = &case["simulated_response"];
    let status = sim["status"].as_u64().unwrap() as u16;
    let body = sim["body"].as_str().unwrap().as_bytes().to_vec();
    RecordingExecutor::new(move |_| {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.clone(),
        })
    })
}

fn input<T: DeserializeOwned>(case: &Value) -> T {
    serde_json::from_value(case["input"].clone()).unwrap()
}

fn to_json<T: serde::Serialize>(result: Result<T, ClientError>) -> Result<Value, ClientError> {
    result.map(|response| serde_json::to_value(response).unwrap())
}

/// Dispatch a vector case to the facade operation it names.
async fn invoke(client: &EpistemicMeClient, case: &Value) -> Result<Value, ClientError> {
    match case["operation"].as_str().unwrap() {
        "createBelief" => to_json(client.create_belief(input::<CreateBeliefParams>(case)).await),
        "listBeliefs" => to_json(client.list_beliefs(input::<ListBeliefsParams>(case)).await),
        "listDialectics" => to_json(client.list_dialectics(input::<ListDialecticsParams>(case)).await),
        "createDialectic" => to_json(client.create_dialectic(input::<CreateDialecticParams>(case)).await),
        "updateDialectic" => to_json(client.update_dialectic(input::<UpdateDialecticParams>(case)).await),
        "getBeliefSystemDetail" => {
            to_json(client.get_belief_system_detail(input::<GetBeliefSystemDetailParams>(case)).await)
        }
        "createDeveloper" => to_json(client.create_developer(input::<CreateDeveloperParams>(case)).await),
        "getDeveloper" => to_json(client.get_developer(input::<GetDeveloperParams>(case)).await),
        "createSelfModel" => to_json(client.create_self_model(input::<CreateSelfModelParams>(case)).await),
        "getSelfModel" => to_json(client.get_self_model(input::<GetSelfModelParams>(case)).await),
        "addPhilosophy" => to_json(client.add_philosophy(input::<AddPhilosophyParams>(case)).await),
        "preprocessQuestionAnswer" => {
            let blobs = &case["input"];
            to_json(
                client
                    .preprocess_question_answer(
                        blobs["questionBlob"].as_str().unwrap(),
                        blobs["answerBlob"].as_str().unwrap(),
                    )
                    .await,
            )
        }
        "createPhilosophy" => to_json(client.create_philosophy(input::<CreatePhilosophyParams>(case)).await),
        "updatePhilosophy" => to_json(client.update_philosophy(input::<UpdatePhilosophyParams>(case)).await),
        other => panic!("unknown operation: {other}"),
    }
}

/// `expected` is contained in `actual`: objects may carry extra keys,
/// arrays must match element by element.
fn assert_subset(expected: &Value, actual: &Value, at: &str) {
    match (expected, actual) {
        (Value::Object(want), Value::Object(got)) => {
            for (key, value) in want {
                let path = format!("{at}.{key}");
                let found = got.get(key).unwrap_or_else(|| panic!("{path}: missing in {actual}"));
                assert_subset(value, found, &path);
            }
        }
        (Value::Array(want), Value::Array(got)) => {
            assert_eq!(want.len(), got.len(), "{at}: array length");
            for (i, (w, g)) in want.iter().zip(got).enumerate() {
                assert_subset(w, g, &format!("{at}[{i}]"));
            }
        }
        _ => assert_eq!(expected, actual, "{at}"),
    }
}

#[tokio::test]
async fn request_test_vectors() {
    let vectors = vectors();
    let base_url = vectors["config"]["baseUrl"].as_str().unwrap().to_string();
    let expected_headers: Vec<(String, String)> =
        serde_json::from_value(vectors["expected_headers"].clone()).unwrap();

    let cases = vectors["cases"].as_array().unwrap();
    let mut covered: Vec<&str> = Vec::new();
    for case in cases {
        let name = case["name"].as_str().unwrap();
        let executor = simulated(case);
        let client = client_for(&vectors, &executor);

        let result = invoke(&client, case)
            .await
            .unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));

        // Verify the request
        assert_eq!(executor.call_count(), 1, "{name}: call count");
        let request = executor.last_request();
        let expected_req = &case["expected_request"];
        assert_eq!(
            request.url,
            format!("{base_url}{}", expected_req["path"].as_str().unwrap()),
            "{name}: url"
        );
        assert_eq!(request.headers, expected_headers, "{name}: headers");
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body, expected_req["body"], "{name}: body");

        // Verify the result
        assert_subset(&case["expected_result"], &result, name);
        covered.push(case["operation"].as_str().unwrap());
    }

    covered.sort_unstable();
    covered.dedup();
    assert_eq!(covered.len(), 14, "every operation has at least one vector");
}

#[tokio::test]
async fn error_test_vectors() {
    let vectors = vectors();
    for case in vectors["error_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let executor = simulated(case);
        let client = client_for(&vectors, &executor);

        let err = match invoke(&client, case).await {
            Ok(value) => panic!("{name}: expected an error, got {value}"),
            Err(err) => err,
        };
        let expected = &case["expected_error"];
        assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
        match (expected["kind"].as_str().unwrap(), &err) {
            ("AuthenticationRequired", ClientError::AuthenticationRequired(_)) => {
                assert_eq!(executor.call_count(), 1, "{name}: call count");
            }
            ("InvalidArgument", ClientError::InvalidArgument(_)) => {
                assert_eq!(executor.call_count(), 0, "{name}: nothing sent");
            }
            ("RemoteCallFailed", ClientError::RemoteCallFailed(rpc)) => {
                assert_eq!(rpc.code().as_str(), expected["code"].as_str().unwrap(), "{name}: code");
            }
            (kind, other) => panic!("{name}: expected {kind}, got {other:?}"),
        }
    }
}
