//! Request shapes for each Gate resource, against a mock Gate.

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use spin_gate::{Backoff, ExecutionQuery, GateClient, GateError, TaskRef, TaskWatcher, task_request};

async fn client(server: &MockServer) -> GateClient {
    GateClient::builder(server.base_url())
        .build()
        .await
        .expect("client should build")
}

#[tokio::test]
async fn applications_forward_expand_flag() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/applications")
                .query_param("expand", "false");
            then.status(200).json_body(json!([{"name": "checkout"}]));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/applications/checkout")
                .query_param("expand", "true");
            then.status(200)
                .json_body(json!({"name": "checkout", "attributes": {"email": "a@b.c"}}));
        })
        .await;

    let client = client(&server).await;
    let apps = client.list_applications(false).await.expect("list");
    let app = client.get_application("checkout", true).await.expect("get");

    list.assert_async().await;
    get.assert_async().await;
    assert_eq!(apps[0]["name"], "checkout");
    assert_eq!(app["attributes"]["email"], "a@b.c");
}

#[tokio::test]
async fn accounts_list_and_get() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/credentials")
                .query_param("expand", "true");
            then.status(200).json_body(json!([{"name": "prod"}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/credentials/ghost");
            then.status(404);
        })
        .await;

    let client = client(&server).await;
    client.list_accounts(true).await.expect("list");
    let err = client.get_account("ghost").await.expect_err("missing");

    list.assert_async().await;
    assert!(err.is_not_found());
}

#[tokio::test]
async fn pipeline_config_lifecycle() {
    let server = MockServer::start_async().await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/applications/checkout/pipelineConfigs/deploy");
            then.status(200).json_body(json!({"id": "p-1", "name": "deploy"}));
        })
        .await;
    let save = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pipelines")
                .json_body(json!({"id": "p-1", "name": "deploy", "application": "checkout"}));
            then.status(200);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/pipelines/checkout/deploy");
            then.status(200);
        })
        .await;
    let invoke = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pipelines/checkout/deploy")
                .body_matches(r#""type":"manual""#);
            then.status(202).json_body(json!({"ref": "/pipelines/01EXEC"}));
        })
        .await;

    let client = client(&server).await;
    let existing = client
        .get_pipeline_config("checkout", "deploy")
        .await
        .expect("get");
    client
        .save_pipeline(&json!({"id": existing["id"], "name": "deploy", "application": "checkout"}))
        .await
        .expect("save");
    let started = client
        .invoke_pipeline("checkout", "deploy", &json!({"type": "manual", "parameters": {}}))
        .await
        .expect("invoke");
    client
        .delete_pipeline("checkout", "deploy")
        .await
        .expect("delete");

    get.assert_async().await;
    save.assert_async().await;
    invoke.assert_async().await;
    delete.assert_async().await;
    assert_eq!(started["ref"], "/pipelines/01EXEC");
}

#[tokio::test]
async fn executions_query_and_control() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/executions")
                .query_param("pipelineConfigIds", "p-1,p-2")
                .query_param("limit", "5")
                .query_param("statuses", "RUNNING,TERMINAL");
            then.status(200).json_body(json!([]));
        })
        .await;
    let cancel = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/pipelines/01EXEC/cancel")
                .query_param("reason", "bad deploy");
            then.status(200);
        })
        .await;
    let pause = server
        .mock_async(|when, then| {
            when.method(PUT).path("/pipelines/01EXEC/pause");
            then.status(200);
        })
        .await;
    let resume = server
        .mock_async(|when, then| {
            when.method(PUT).path("/pipelines/01EXEC/resume");
            then.status(200);
        })
        .await;

    let client = client(&server).await;
    client
        .list_executions(&ExecutionQuery {
            pipeline_config_ids: vec!["p-1".into(), "p-2".into()],
            limit: Some(5),
            statuses: vec!["RUNNING".into(), "TERMINAL".into()],
        })
        .await
        .expect("list");
    client
        .cancel_execution("01EXEC", Some("bad deploy"))
        .await
        .expect("cancel");
    client.pause_execution("01EXEC").await.expect("pause");
    client.resume_execution("01EXEC").await.expect("resume");

    list.assert_async().await;
    cancel.assert_async().await;
    pause.assert_async().await;
    resume.assert_async().await;
}

#[tokio::test]
async fn pipeline_template_writes_return_task_refs() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2/pipelineTemplates/create")
                .query_param("tag", "stable");
            then.status(202).json_body(json!({"ref": "/tasks/create-1"}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2/pipelineTemplates/update/tmpl")
                .query_param("skipPlanDependents", "true");
            then.status(202).json_body(json!({"ref": "/tasks/update-1"}));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/pipelineTemplates/tmpl")
                .query_param("tag", "stable");
            then.status(200).json_body(json!({"id": "tmpl", "schema": "v2"}));
        })
        .await;

    let client = client(&server).await;
    let template = json!({"id": "tmpl", "schema": "v2"});
    let created = client
        .create_pipeline_template(&template, Some("stable"))
        .await
        .expect("create");
    let updated = client
        .update_pipeline_template("tmpl", &template, None, true)
        .await
        .expect("update");
    client
        .get_pipeline_template("tmpl", Some("stable"), None)
        .await
        .expect("get");

    create.assert_async().await;
    update.assert_async().await;
    get.assert_async().await;
    assert_eq!(created.id(), "create-1");
    assert_eq!(updated.id(), "update-1");
}

#[tokio::test]
async fn canary_config_create_and_update() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/v2/canaryConfig");
            then.status(200).json_body(json!({"canaryConfigId": "c-1"}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/v2/canaryConfig/c-1");
            then.status(200).json_body(json!({"canaryConfigId": "c-1"}));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/canaryConfig")
                .query_param("application", "checkout");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = client(&server).await;
    let config = json!({"name": "latency"});
    client.create_canary_config(&config).await.expect("create");
    client
        .update_canary_config("c-1", &config)
        .await
        .expect("update");
    client
        .list_canary_configs(Some("checkout"))
        .await
        .expect("list");

    create.assert_async().await;
    update.assert_async().await;
    list.assert_async().await;
}

#[tokio::test]
async fn project_pipelines_forward_limit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/projects/storefront/pipelines")
                .query_param("limit", "3");
            then.status(200).json_body(json!([]));
        })
        .await;

    client(&server)
        .await
        .get_project_pipelines("storefront", Some(3))
        .await
        .expect("pipelines");
    mock.assert_async().await;
}

#[tokio::test]
async fn submitted_task_is_watched_to_completion() {
    let server = MockServer::start_async().await;
    let submit = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/tasks")
                .body_matches(r#""application":"checkout""#)
                .body_matches(r#""job":\[\{"type":"deleteApplication"\}\]"#);
            then.status(200).json_body(json!({"ref": "/tasks/01TASK"}));
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/tasks/01TASK");
            then.status(200)
                .json_body(json!({"id": "01TASK", "status": "SUCCEEDED"}));
        })
        .await;

    let client = client(&server).await;
    let task_ref = client
        .submit_task(&task_request(
            "checkout",
            "Delete Application: checkout",
            json!({"type": "deleteApplication"}),
        ))
        .await
        .expect("submit");
    let task = TaskWatcher::new(3)
        .with_backoff(Backoff::immediate())
        .wait_for_successful_task(&client, &task_ref)
        .await
        .expect("task should succeed");

    submit.assert_async().await;
    poll.assert_async().await;
    assert_eq!(task["status"], "SUCCEEDED");
}

#[tokio::test]
async fn missing_task_aborts_the_watch() {
    let server = MockServer::start_async().await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/tasks/gone");
            then.status(404);
        })
        .await;

    let client = client(&server).await;
    let err = TaskWatcher::new(5)
        .with_backoff(Backoff::immediate())
        .wait_for_successful_task(&client, &TaskRef::new("/tasks/gone"))
        .await
        .expect_err("should abort");

    poll.assert_async().await;
    assert!(matches!(err, GateError::Api { status: 404, .. }));
}
