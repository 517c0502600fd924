use stoa_core::Retry;

/// Classifies a failed statement.
///
/// Lost connections, serialization failures and deadlocks are transient.
/// Duplicate objects mean a concurrent writer created the same schema
/// object first; retrying against the updated model reuses it.
pub(crate) fn classify(err: &tokio_postgres::Error) -> Retry {
    if err.is_closed() {
        return Retry::Retryable;
    }

    match err.code() {
        Some(code) => classify_sqlstate(code.code()),
        // No SQLSTATE: the error did not come from the server. I/O failures
        // are connection problems, anything else is a client-side bug.
        None => {
            let io = std::error::Error::source(err)
                .is_some_and(|source| source.downcast_ref::<std::io::Error>().is_some());
            if io {
                Retry::Retryable
            } else {
                Retry::Fatal
            }
        }
    }
}

pub(crate) fn classify_sqlstate(code: &str) -> Retry {
    match code {
        // connection_exception class
        code if code.starts_with("08") => Retry::Retryable,
        // serialization_failure, deadlock_detected
        "40001" | "40P01" => Retry::Retryable,
        // duplicate_schema, duplicate_table, duplicate_column, unique_violation
        "42P06" | "42P07" | "42701" | "23505" => Retry::Retryable,
        _ => Retry::Fatal,
    }
}
