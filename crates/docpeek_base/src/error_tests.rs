/* 📖 # Why use a separate file for these error tests?

Some of these tests look at span traces, which contain line numbers.
Keeping them apart from the error module keeps those numbers stable when the
error module changes.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{DocpeekError, DocpeekResult, ResultExt};
    use expect_test::expect;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use tracing::span;
    use tracing::warn_span;
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    /// Set up tracing with ErrorLayer for tests.
    /// Uses `try_init()` to handle multiple tests running concurrently.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    #[test]
    fn test_error_from_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = DocpeekError::file_error("docs/foo.md", io_err);

        match error.kind() {
            ErrorKind::FileError { path, .. } => {
                assert_eq!(path, &PathBuf::from("docs/foo.md"));
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_error_from_message() {
        let error = DocpeekError::message("something went wrong");

        match error.kind() {
            ErrorKind::Message { message } => {
                assert_eq!(message, "something went wrong");
            }
            _ => panic!("Expected Message variant"),
        }
    }

    #[test]
    fn test_error_context_attachment() {
        let error = DocpeekError::message("original error")
            .context("first context")
            .with_context(|| "second context".to_string());

        assert_eq!(error.get_context().len(), 2);
        assert_eq!(error.get_context()[0], "first context");
        assert_eq!(error.get_context()[1], "second context");
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = DocpeekError::message("root error")
            .context("first")
            .context("second")
            .context("third");
        assert_eq!(error.to_string(), "first: second: third: root error");
    }

    #[test]
    fn test_error_display_file_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let error = DocpeekError::file_error("/ws/docs/private", io_err);
        assert_eq!(
            error.to_string(),
            "File error at /ws/docs/private: permission denied"
        );
    }

    #[test]
    fn test_error_source_is_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let error = DocpeekError::file_error("docpeek.toml", io_err)
            .context("Failed to load configuration");

        let source = error.source().expect("file errors expose their io error");
        assert_eq!(source.to_string(), "not found");
    }

    #[test]
    fn test_error_source_message() {
        let error = DocpeekError::message("test");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_result_ext_context() {
        let ok: DocpeekResult<i32> = Ok(42);
        assert_eq!(ok.context("unused").unwrap(), 42);

        let result: DocpeekResult<i32> = Err(crate::err!("original {}", 1));
        let err = result
            .context("step 1")
            .with_context(|| "step 2".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "step 1: step 2: original 1");
    }

    #[test]
    fn test_bail_returns_early() {
        fn check(value: i32) -> DocpeekResult<i32> {
            if value < 0 {
                crate::bail!("negative value: {}", value);
            }
            Ok(value)
        }

        assert_eq!(check(3).unwrap(), 3);
        assert_eq!(check(-1).unwrap_err().to_string(), "negative value: -1");
    }

    #[test]
    fn test_debug_tree_without_span() {
        let error = DocpeekError::message("preview failed")
            .context("Failed to open preview of /ws/docs/foo.md")
            .context("while executing docsPreview.openForCurrentFile");

        expect![[r#"
            preview failed
            ├─ Failed to open preview of /ws/docs/foo.md
            └─ while executing docsPreview.openForCurrentFile
        "#]]
        .assert_eq(&format!("{:?}", error));
    }

    #[test]
    fn test_debug_includes_span_trace() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "resolve_operation", depth = 3);
        let _guard = operation_span.enter();
        let outer_span = warn_span!("outer span");
        let _outer_guard = outer_span.enter();

        let error = DocpeekError::message("lookup failed");
        let debug = format!("{:?}", error);

        assert!(debug.starts_with("lookup failed\n"));
        assert!(debug.contains("Trace:"));
        assert!(debug.contains("error_tests::tests::resolve_operation"));
        assert!(debug.contains("error_tests::tests::outer span"));
    }
}
