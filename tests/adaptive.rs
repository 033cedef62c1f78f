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

use std::time::Duration;

use common::{collect_frames, connect, finished_query, start_server, RangeKind, ResultCall};
use hyperdb_client::{grpc, Error, ResultByteChannel};

#[tokio::test]
async fn small_inline_result_arrives_in_one_burst() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut script = finished_query(&[b"select-1-result"]);
    script.inline_chunks = 1;
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let mut rows = client
        .execute_query(&statement, "SELECT 1 as id, 'test' as name", &[])
        .await
        .unwrap();
    let frames = collect_frames(&mut rows).await;

    assert_eq!(rows.query_id(), Some("q-1"));
    assert_eq!(frames, vec![b"SCHEMA".to_vec(), b"select-1-result".to_vec()]);
    assert!(rows.status().unwrap().execution_finished());
    // Everything was inline; no range fetch happened.
    assert!(server.state.recorded_result_calls().is_empty());
}

#[tokio::test]
async fn remaining_chunks_are_fetched_in_order_without_schema() {
    let mut script = finished_query(&[b"c0", b"c1", b"c2"]);
    script.inline_chunks = 1;
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let mut rows = client
        .execute_query(&statement, "SELECT a FROM t", &[])
        .await
        .unwrap();
    let frames = collect_frames(&mut rows).await;

    assert_eq!(
        frames,
        vec![
            b"SCHEMA".to_vec(),
            b"c0".to_vec(),
            b"c1".to_vec(),
            b"c2".to_vec()
        ]
    );
    assert_eq!(
        server.state.recorded_result_calls(),
        vec![ResultCall {
            omit_schema: true,
            range: RangeKind::Chunks { chunk_id: 1, limit: 2 },
        }]
    );
}

#[tokio::test]
async fn polls_status_when_chunk_count_is_not_final() {
    let mut script = finished_query(&[b"c0", b"c1", b"c2"]);
    script.inline_chunks = 1;
    // The inline status only announces the first chunk and claims the query
    // is still running; the machine must poll to learn about the rest.
    script.inline_status = Some(grpc::QueryStatus {
        query_id: "q-1".to_string(),
        completion_status: grpc::CompletionStatus::RunningOrUnspecified as i32,
        chunk_count: 1,
        row_count: 1,
        progress: 0.3,
        error: None,
    });
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let mut rows = client
        .execute_query(&statement, "SELECT a FROM t", &[])
        .await
        .unwrap();
    let frames = collect_frames(&mut rows).await;

    assert_eq!(
        frames,
        vec![
            b"SCHEMA".to_vec(),
            b"c0".to_vec(),
            b"c1".to_vec(),
            b"c2".to_vec()
        ]
    );
    assert!(server.state.info_calls.load(std::sync::atomic::Ordering::SeqCst) >= 1);
    assert_eq!(
        server.state.recorded_result_calls(),
        vec![ResultCall {
            omit_schema: true,
            range: RangeKind::Chunks { chunk_id: 1, limit: 2 },
        }]
    );
}

#[tokio::test]
async fn first_fetch_carries_schema_when_nothing_was_inline() {
    let script = finished_query(&[b"c0", b"c1"]);
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let mut rows = client
        .execute_query(&statement, "SELECT a FROM t", &[])
        .await
        .unwrap();
    let frames = collect_frames(&mut rows).await;

    assert_eq!(
        frames,
        vec![b"SCHEMA".to_vec(), b"c0".to_vec(), b"c1".to_vec()]
    );
    assert_eq!(
        server.state.recorded_result_calls(),
        vec![ResultCall {
            omit_schema: false,
            range: RangeKind::Chunks { chunk_id: 0, limit: 2 },
        }]
    );
}

#[tokio::test]
async fn byte_channel_concatenates_frames_and_skips_empty_ones() {
    let mut script = finished_query(&[b"hello ", b"world"]);
    script.inline_chunks = 2;
    script.insert_empty_frame = true;
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let rows = client
        .execute_query(&statement, "SELECT a FROM t", &[])
        .await
        .unwrap();
    let mut channel = ResultByteChannel::new(rows);
    let mut collected = Vec::new();
    let mut buf = [0u8; 5];
    loop {
        let n = channel.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
    }

    assert_eq!(collected, b"SCHEMAhello world".to_vec());
    // End-of-stream leaves the channel open until it is explicitly closed.
    assert!(channel.is_open());
    channel.close();
    assert!(matches!(
        channel.read(&mut buf).await,
        Err(Error::ChannelClosed)
    ));
}

#[tokio::test]
async fn a_31_mib_frame_streams_through_unchanged() {
    let payload = vec![b'x'; 31 * 1024 * 1024];
    let script = common::ScriptedQuery {
        chunks: vec![payload.clone()],
        rows_per_chunk: 1,
        inline_chunks: 1,
        ..common::ScriptedQuery::default()
    };
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let rows = client
        .execute_query(&statement, "SELECT rpad('', 31*1024*1024, 'x')", &[])
        .await
        .unwrap();
    let mut channel = ResultByteChannel::new(rows);
    let mut total = 0usize;
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = channel.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        assert!(buf[..n].iter().all(|b| *b == b'x'));
        total += n;
    }
    assert_eq!(total, payload.len());
}

#[tokio::test]
async fn a_frame_over_the_inbound_cap_fails_instead_of_truncating() {
    // One byte past the fixed 64 MiB inbound limit.
    let payload = vec![b'x'; 64 * 1024 * 1024 + 1];
    let script = common::ScriptedQuery {
        chunks: vec![payload],
        rows_per_chunk: 1,
        inline_chunks: 1,
        ..common::ScriptedQuery::default()
    };
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let mut rows = client
        .execute_query(&statement, "SELECT oversized", &[])
        .await
        .unwrap();
    let mut failed = false;
    loop {
        match rows.next().await {
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(err) => {
                assert!(err.server_error().is_none());
                failed = true;
                break;
            }
        }
    }
    assert!(failed, "an over-limit frame must not be delivered");
}

#[tokio::test]
async fn close_cancels_a_running_query_and_poisons_reads() {
    let mut script = finished_query(&[b"c0"]);
    script.run_for = Some(Duration::from_secs(30));
    script.inline_chunks = 1;
    script.inline_status = Some(grpc::QueryStatus {
        query_id: "q-1".to_string(),
        completion_status: grpc::CompletionStatus::RunningOrUnspecified as i32,
        chunk_count: 1,
        row_count: 1,
        progress: 0.0,
        error: None,
    });
    let server = start_server(script).await;
    let client = connect(&server, &[]).await;

    let statement = client.statement();
    let mut rows = client
        .execute_query(&statement, "SELECT pg_sleep(5000000)", &[])
        .await
        .unwrap();
    // Pull one frame so the machine learns the query id from the burst.
    assert!(rows.next().await.unwrap().is_some());

    rows.close().await;
    rows.close().await;
    let err = rows.next().await.unwrap_err();
    assert!(matches!(err, Error::Canceled(_)));
    assert_eq!(err.sqlstate(), "57014");
    assert_eq!(
        server.state.cancel_calls.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}
