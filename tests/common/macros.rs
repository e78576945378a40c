#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok(_), got Err({:?})", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!(concat!("Expected Ok(_): ", $($arg)+, ": {:?}"), err),
        }
    };
}

/// Unwraps the error, so callers can match on its variant.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("Expected Err(_), got Ok({:?})", val),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => panic!(concat!("Expected Err(_): ", $($arg)+, ": {:?}"), val),
            Err(err) => err,
        }
    };
}

/// Asserts the outcome variant and returns the carried error.
#[macro_export]
macro_rules! assert_outcome {
    ($outcome:expr, Applied) => {
        match $outcome {
            at_rollback::recovery::rollback_coordinator::RollbackOutcome::Applied(summary) => summary,
            other => panic!("Expected Applied, got {:?}", other),
        }
    };
    ($outcome:expr, $variant:ident) => {
        match $outcome {
            at_rollback::recovery::rollback_coordinator::RollbackOutcome::$variant(err) => err,
            other => panic!(concat!("Expected ", stringify!($variant), ", got {:?}"), other),
        }
    };
}
