use std::sync::Arc;
use std::time::Duration;

use azrm::arm::{ArmClient, ArmError, ClientOptions, RetryPolicy, StaticToken};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLUSTER_PATH: &str =
    "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.ContainerService/managedClusters/aks1";
const API_VERSION: &str = "2024-02-01";

fn client_with(server: &MockServer, poll_interval: Duration, poll_timeout: Duration) -> ArmClient {
    let options = ClientOptions {
        base_url: server.uri(),
        poll_interval,
        poll_timeout,
        retry: RetryPolicy {
            max_retries: 0,
            base_delay: Duration::ZERO,
        },
    };
    ArmClient::new(Arc::new(StaticToken::new("test_token")), options).unwrap()
}

fn client(server: &MockServer) -> ArmClient {
    client_with(server, Duration::ZERO, Duration::from_secs(5))
}

fn cluster(state: &str) -> serde_json::Value {
    serde_json::json!({
        "id": CLUSTER_PATH,
        "name": "aks1",
        "type": "Microsoft.ContainerService/managedClusters",
        "location": "westeurope",
        "properties": { "provisioningState": state }
    })
}

#[tokio::test]
async fn test_put_polls_async_operation_then_reads_resource() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/op1", mock_server.uri());

    Mock::given(method("PUT"))
        .and(path(CLUSTER_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Azure-AsyncOperation", operation_url.as_str())
                .insert_header("Retry-After", "0")
                .set_body_json(cluster("Creating")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "InProgress"})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Succeeded"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Succeeded")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let poller = client(&mock_server)
        .create_or_update(CLUSTER_PATH, API_VERSION, &serde_json::json!({"location": "westeurope"}))
        .await
        .unwrap();
    assert!(!poller.is_done());

    let body = poller.poll_until_done().await.unwrap().unwrap();
    assert_eq!(body["properties"]["provisioningState"], "Succeeded");
}

#[tokio::test]
async fn test_async_operation_failure_surfaces_error() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/op2", mock_server.uri());

    Mock::given(method("PATCH"))
        .and(path(CLUSTER_PATH))
        .respond_with(
            ResponseTemplate::new(202).insert_header("Azure-AsyncOperation", operation_url.as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/op2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "failed",
            "error": {
                "code": "QuotaExceeded",
                "message": "Operation could not be completed as it results in exceeding approved cores quota."
            }
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .update(CLUSTER_PATH, API_VERSION, &serde_json::json!({"tags": {}}))
        .await
        .unwrap()
        .poll_until_done()
        .await
        .unwrap_err();

    match err {
        ArmError::OperationFailed {
            status,
            code,
            message,
        } => {
            assert_eq!(status, "Failed");
            assert_eq!(code, "QuotaExceeded");
            assert!(message.contains("cores quota"));
        }
        other => panic!("Expected OperationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_polls_location_until_no_content() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/operationResults/del1", mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path(CLUSTER_PATH))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", location.as_str())
                .insert_header("Retry-After", "0"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/del1"))
        .respond_with(ResponseTemplate::new(202).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/del1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .delete(CLUSTER_PATH, API_VERSION)
        .await
        .unwrap()
        .poll_until_done()
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_put_created_with_location_polls_for_result() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/operationResults/put1", mock_server.uri());

    Mock::given(method("PUT"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", location.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/put1"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/put1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Succeeded")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let poller = client(&mock_server)
        .create_or_update(CLUSTER_PATH, API_VERSION, &serde_json::json!({}))
        .await
        .unwrap();
    assert!(!poller.is_done());

    let body = poller.poll_until_done().await.unwrap().unwrap();
    assert_eq!(body["name"], "aks1");
}

#[tokio::test]
async fn test_delete_location_not_found_means_gone() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/operationResults/del2", mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/del2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .delete(CLUSTER_PATH, API_VERSION)
        .await
        .unwrap()
        .poll_until_done()
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_no_content_is_done_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let poller = client(&mock_server)
        .delete(CLUSTER_PATH, API_VERSION)
        .await
        .unwrap();
    assert!(poller.is_done());
    assert!(poller.poll_until_done().await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_polls_provisioning_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Creating")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Updating")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("succeeded")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client(&mock_server)
        .create_or_update(CLUSTER_PATH, API_VERSION, &serde_json::json!({}))
        .await
        .unwrap()
        .poll_until_done()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(body["properties"]["provisioningState"], "succeeded");
}

#[tokio::test]
async fn test_put_failed_provisioning_state_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Failed")))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .create_or_update(CLUSTER_PATH, API_VERSION, &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::OperationFailed { .. }));
}

#[tokio::test]
async fn test_post_follows_location_for_result() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/post1", mock_server.uri());
    let location = format!("{}/operationResults/post1", mock_server.uri());
    let action = format!("{}/listClusterUserCredential", CLUSTER_PATH);

    Mock::given(method("POST"))
        .and(path(action.as_str()))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Azure-AsyncOperation", operation_url.as_str())
                .insert_header("Location", location.as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/post1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Succeeded"})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operationResults/post1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kubeconfigs": [{ "name": "clusterUser", "value": "YXBpVmVyc2lvbjogdjE=" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client(&mock_server)
        .post(&action, API_VERSION, None)
        .await
        .unwrap()
        .poll_until_done()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(body["kubeconfigs"][0]["name"], "clusterUser");
}

#[tokio::test]
async fn test_poll_timeout() {
    let mock_server = MockServer::start().await;
    let operation_url = format!("{}/operations/slow", mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path(CLUSTER_PATH))
        .respond_with(
            ResponseTemplate::new(202).insert_header("Azure-AsyncOperation", operation_url.as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "InProgress"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_with(&mock_server, Duration::from_millis(20), Duration::from_millis(200));
    let err = client
        .delete(CLUSTER_PATH, API_VERSION)
        .await
        .unwrap()
        .poll_until_done()
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::PollTimeout { .. }));
}

#[tokio::test]
async fn test_wait_for_provisioning_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Deleting")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster("Canceled")))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .wait_for_provisioning_state(CLUSTER_PATH, API_VERSION)
        .await
        .unwrap_err();
    match err {
        ArmError::OperationFailed { status, .. } => assert_eq!(status, "Canceled"),
        other => panic!("Expected OperationFailed, got {:?}", other),
    }
}
