// Copyright 2023-2026 The hyperdb-client authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{connect, finished_query, start_server};
use hyperdb_client::{CompletionStatus, Error};

#[tokio::test]
async fn cancel_while_running_surfaces_57014_on_the_next_wait() {
    let mut script = finished_query(&[b"c0"]);
    script.run_for = Some(Duration::from_secs(30));
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let handle = client
        .execute_query_async(&statement, "SELECT pg_sleep(5000000)", &[])
        .await
        .unwrap();
    let status = client.query_status(handle.query_id()).await.unwrap();
    assert_eq!(status.completion, CompletionStatus::Running);

    client.cancel_query(handle.query_id()).await.unwrap();

    let err = client
        .wait_for(handle.query_id(), Some(Duration::from_secs(5)), |s| {
            s.all_results_produced()
        })
        .await
        .unwrap_err();
    assert_eq!(err.sqlstate(), "57014");
    assert!(matches!(&err, Error::Canceled(m) if m.contains("canceled by user")));
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let mut script = finished_query(&[b"c0"]);
    script.run_for = Some(Duration::from_secs(30));
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    client.cancel_query("q-1").await.unwrap();
    client.cancel_query("q-1").await.unwrap();
    assert_eq!(server.state.cancel_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn canceling_an_unknown_query_succeeds_silently() {
    let server = start_server(finished_query(&[b"c0"])).await;
    let client = connect(&server, &[]).await;

    client.cancel_query("no-such-query").await.unwrap();
    assert_eq!(server.state.cancel_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_side_query_timeout_carries_its_sqlstate_and_message() {
    let mut script = finished_query(&[b"c0"]);
    script.run_for = Some(Duration::from_millis(100));
    script.fail_after_run = Some((
        "57014".to_string(),
        "canceled by query timeout".to_string(),
    ));
    let server = start_server(script).await;
    let client = connect(&server, &[("queryTimeout", "1")]).await;

    let statement = client.statement();
    let handle = client
        .execute_query_async(&statement, "SELECT pg_sleep(100)", &[])
        .await
        .unwrap();

    // The server was told the unadorned timeout.
    assert_eq!(
        server.state.recorded_settings().get("query_timeout").map(String::as_str),
        Some("1s")
    );

    let err = client
        .wait_for(handle.query_id(), Some(Duration::from_secs(10)), |s| {
            s.all_results_produced()
        })
        .await
        .unwrap_err();
    assert_eq!(err.sqlstate(), "57014");
    assert!(matches!(&err, Error::Canceled(m) if m.contains("canceled by query timeout")));
}
