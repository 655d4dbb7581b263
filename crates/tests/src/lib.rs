//! # Integration Tests
//!
//! End-to-end tests across crates.
//!
//! Covers:
//! - Contract smoke tests
//! - Routing precedence and channel isolation through full transfers
//! - Real file sinks and captured responses

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(contracts::Channel::ALL.len(), 2);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;

    use contracts::{ByteSink, Channel, TransferErrorKind, WriteOutcome};
    use dispatcher::{
        create_sink, perform, perform_reporting, resolve, BufferSink, CaptureSource,
        DispatcherError, FileSink, Route, ScriptedSource, TransferState, WriteOptions,
    };
    use tempfile::tempdir;

    const CAPTURE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n\
        HTTP/1.1 200 OK\r\n\
        Content-Type: text/plain\r\n\
        Content-Length: 7\r\n\
        \r\n\
        success";

    fn response() -> ScriptedSource {
        ScriptedSource::http_response(
            "HTTP/1.1 200 OK",
            &[("Content-Type", "text/plain"), ("Content-Length", "7")],
            b"success",
        )
    }

    /// Options whose defaults land in buffers instead of stdout
    fn quiet_options<'a>() -> (WriteOptions<'a>, BufferSink, BufferSink) {
        let body_default = BufferSink::new("body_default");
        let header_default = BufferSink::new("header_default");
        let mut options = WriteOptions::new();
        options.set_default_sink(Channel::Body, Box::new(body_default.clone()));
        options.set_default_sink(Channel::Header, Box::new(header_default.clone()));
        (options, body_default, header_default)
    }

    fn buffer_callback(
        sink: &BufferSink,
    ) -> impl FnMut(&[u8]) -> WriteOutcome + 'static {
        let mut sink = sink.clone();
        move |chunk: &[u8]| sink.write(chunk)
    }

    /// Callback body, object header: each lands in its own buffer
    #[tokio::test]
    async fn test_e2e_callback_body_object_header() {
        let a = BufferSink::new("a");
        let mut b = BufferSink::new("b");
        let reader_b = b.clone();
        let (mut options, body_default, header_default) = quiet_options();

        options.set_body_callback(buffer_callback(&a));
        options.set_header_object_sink(&mut b);

        let report = perform(&mut response(), &mut options).await.unwrap();
        assert_eq!(report.state, TransferState::Completed);

        assert_eq!(a.text(), "success");
        assert!(reader_b.text().to_lowercase().contains("content-type"));
        assert!(!reader_b.text().contains("success"));
        assert!(body_default.is_empty());
        assert!(header_default.is_empty());
    }

    /// Callback wins over object sink regardless of call order
    #[tokio::test]
    async fn test_callback_precedence_any_order() {
        for callback_first in [true, false] {
            let callback = BufferSink::new("callback");
            let mut object = BufferSink::new("object");
            let object_reader = object.clone();
            let (mut options, _, _) = quiet_options();

            if callback_first {
                options.set_body_callback(buffer_callback(&callback));
                options.set_body_object_sink(&mut object);
            } else {
                options.set_body_object_sink(&mut object);
                options.set_body_callback(buffer_callback(&callback));
            }

            let report = perform(&mut response(), &mut options).await.unwrap();
            assert_eq!(
                report.routing.map(|r| r.body),
                Some(Route::Callback(Channel::Body))
            );
            assert_eq!(callback.text(), "success");
            assert!(object_reader.is_empty());
        }
    }

    /// Header callback wins over header object sink regardless of call order
    #[tokio::test]
    async fn test_header_callback_precedence_any_order() {
        for callback_first in [true, false] {
            let callback = BufferSink::new("header_callback");
            let mut object = BufferSink::new("header_object");
            let object_reader = object.clone();
            let (mut options, body_default, header_default) = quiet_options();

            if callback_first {
                options.set_header_callback(buffer_callback(&callback));
                options.set_header_object_sink(&mut object);
            } else {
                options.set_header_object_sink(&mut object);
                options.set_header_callback(buffer_callback(&callback));
            }

            let report = perform(&mut response(), &mut options).await.unwrap();
            assert_eq!(
                report.routing.map(|r| r.header),
                Some(Route::Callback(Channel::Header))
            );
            assert!(callback.text().to_lowercase().contains("content-type"));
            assert!(object_reader.is_empty());
            assert!(header_default.is_empty());
            assert_eq!(body_default.text(), "success");
        }
    }

    #[tokio::test]
    async fn test_header_shares_body_object_sink() {
        let mut shared = BufferSink::new("shared");
        let reader = shared.clone();
        let (mut options, _, header_default) = quiet_options();

        options.set_body_object_sink(&mut shared);
        let report = perform(&mut response(), &mut options).await.unwrap();

        let routing = report.routing.unwrap();
        assert!(routing.is_shared());
        let text = reader.text();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\nsuccess"));
        assert!(header_default.is_empty());
    }

    #[tokio::test]
    async fn test_header_ignores_body_callback() {
        let body = BufferSink::new("body");
        let (mut options, _, header_default) = quiet_options();

        options.set_body_callback(buffer_callback(&body));
        perform(&mut response(), &mut options).await.unwrap();

        assert_eq!(body.text(), "success");
        assert!(header_default.text().contains("Content-Type: text/plain"));
    }

    /// Clearing a re-set callback reverts to the object sink on the next transfer
    #[tokio::test]
    async fn test_clear_callback_reverts_to_object() {
        let callback = BufferSink::new("callback");
        let mut object = BufferSink::new("object");
        let object_reader = object.clone();
        let (mut options, body_default, _) = quiet_options();

        options.set_body_object_sink(&mut object);
        options.set_body_callback(buffer_callback(&callback));
        perform(&mut response(), &mut options).await.unwrap();
        assert_eq!(callback.text(), "success");
        assert!(object_reader.is_empty());

        options.clear_callback(Channel::Body);
        assert_eq!(resolve(&options).body, Route::Object(Channel::Body));
        perform(&mut response(), &mut options).await.unwrap();
        assert_eq!(callback.text(), "success");
        assert!(object_reader.text().ends_with("success"));

        options.clear_body();
        perform(&mut response(), &mut options).await.unwrap();
        assert_eq!(body_default.text(), "success");
    }

    #[tokio::test]
    async fn test_short_write_stops_delivery() {
        let mut body = BufferSink::with_limit("body", 3);
        let reader = body.clone();
        let (mut options, _, header_default) = quiet_options();
        options.set_body_object_sink(&mut body);
        options.set_header_callback(buffer_callback(&header_default));

        let mut source = response().body("more").header("Trailer: x\r\n");
        let (report, result) = perform_reporting(&mut source, &mut options).await;

        match result {
            Err(DispatcherError::ShortWrite {
                channel,
                offered,
                accepted,
                ..
            }) => {
                assert_eq!(channel, Channel::Body);
                assert_eq!(offered, 7);
                assert_eq!(accepted, 3);
            }
            other => panic!("expected short write, got {other:?}"),
        }
        assert_eq!(report.state, TransferState::Aborted);
        assert_eq!(report.failure, Some(TransferErrorKind::Write));
        assert_eq!(reader.text(), "suc");
        assert!(!header_default.text().contains("Trailer"));
        assert_eq!(source.remaining(), 2);
    }

    #[tokio::test]
    async fn test_callback_abort_is_write_error() {
        let (mut options, _, _) = quiet_options();
        options.set_header_callback(|_: &[u8]| WriteOutcome::Abort);

        let err = perform(&mut response(), &mut options).await.unwrap_err();
        assert!(err.is_write_error());
    }

    #[tokio::test]
    async fn test_source_failure_reports_kind() {
        let (mut options, body_default, _) = quiet_options();
        let mut source = response().fail_after(2, TransferErrorKind::Timeout);

        let (report, result) = perform_reporting(&mut source, &mut options).await;
        assert!(result.is_err());
        assert_eq!(report.failure, Some(TransferErrorKind::Timeout));
        assert!(body_default.is_empty());
    }

    /// Body to one file, headers to another, then the body file is swapped
    #[tokio::test]
    async fn test_real_files_and_reuse() {
        let dir = tempdir().unwrap();
        let first_path = dir.path().join("first.bin");
        let second_path = dir.path().join("second.bin");
        let header_path = dir.path().join("headers.txt");

        {
            let mut first = FileSink::create("first", &first_path).unwrap();
            let mut second = FileSink::create("second", &second_path).unwrap();
            let mut headers = FileSink::create("headers", &header_path).unwrap();
            let (mut options, _, _) = quiet_options();

            options.set_body_object_sink(&mut first);
            options.set_header_object_sink(&mut headers);
            perform(&mut response(), &mut options).await.unwrap();

            options.set_body_object_sink(&mut second);
            let mut other = ScriptedSource::new("second").body("again");
            perform(&mut other, &mut options).await.unwrap();
        }

        assert_eq!(fs::read_to_string(&first_path).unwrap(), "success");
        assert_eq!(fs::read_to_string(&second_path).unwrap(), "again");
        let headers = fs::read_to_string(&header_path).unwrap();
        assert!(headers.contains("Content-Length: 7"));
        assert!(!headers.contains("success"));
    }

    /// Captured response with an interim 100 reply, replayed through configured sinks
    #[tokio::test]
    async fn test_capture_replay_with_configured_sinks() {
        let dir = tempdir().unwrap();
        let capture_path = dir.path().join("response.http");
        fs::write(&capture_path, CAPTURE).unwrap();
        let body_path = dir.path().join("out/body.bin");

        let toml = format!(
            r#"
[transfer]
name = "capture"
chunk_size = 2

[body.object]
name = "body_file"
sink_type = "file"
params = {{ path = "{}" }}

[header.callback]
name = "header_log"
sink_type = "log"

[defaults.body]
name = "null"
sink_type = "discard"
"#,
            body_path.display().to_string().replace('\\', "/")
        );
        let blueprint =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let mut body = create_sink(blueprint.body.object.as_ref().unwrap()).unwrap();
        let mut header_log = create_sink(blueprint.header.callback.as_ref().unwrap()).unwrap();
        let report = {
            let mut options = WriteOptions::new();
            options.set_default_sink(
                Channel::Body,
                Box::new(create_sink(&blueprint.defaults.body).unwrap()),
            );
            options.set_body_object_sink(&mut body);
            options.set_header_callback(move |chunk: &[u8]| header_log.write(chunk));

            let mut source = CaptureSource::open(&capture_path, blueprint.transfer.chunk_size)
                .await
                .unwrap();
            perform(&mut source, &mut options).await.unwrap()
        };
        drop(body);

        assert_eq!(fs::read_to_string(&body_path).unwrap(), "success");
        assert_eq!(report.body.byte_count, 7);
        assert_eq!(report.body.chunk_count, 4);
        assert!(report.header.chunk_count >= 4);
    }

    #[test]
    fn test_transfer_outcome_aggregation() {
        let mut stats = observability::TransferStatsAggregator::new();
        stats.update(&observability::TransferOutcome {
            completed: true,
            body_bytes: 7,
            header_bytes: 40,
            failure: None,
        });
        stats.update(&observability::TransferOutcome {
            completed: false,
            body_bytes: 3,
            header_bytes: 40,
            failure: Some(TransferErrorKind::Write),
        });
        let summary = stats.summary();
        assert_eq!(summary.total_transfers, 2);
        assert_eq!(summary.completed, 1);
    }
}
