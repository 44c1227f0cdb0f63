//! Operation lifecycle macros
//!
//! Every event carries `component`, `op` and `event`. Extra fields are
//! passed through to `tracing` unchanged, so `block_id = %id` and
//! `err = ?e` work as usual.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:expr, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Mark entry into a document operation at info level
///
/// ```
/// # use blockdoc_core::log_op_start;
/// log_op_start!("delete_block");
/// log_op_start!("delete_block", block_id = "0190a1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            tracing::Level::INFO,
            $op,
            $crate::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Mark successful completion; `duration_ms` is mandatory
///
/// ```
/// # use blockdoc_core::log_op_end;
/// log_op_end!("delete_block", duration_ms = 3, blocks = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            tracing::Level::INFO,
            $op,
            $crate::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Mark failure at error level with the stable kind and code of `$err`
///
/// `$err` is a `&BlockDocError`; it is cloned, not consumed.
///
/// ```
/// # use blockdoc_core::{log_op_error, errors::BlockDocError};
/// let err = BlockDocError::CycleDetected { op: "move".to_string() };
/// log_op_error!("move_block_after_block", &err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = ::std::clone::Clone::clone($err).into();
        $crate::__log_op_event!(
            tracing::Level::ERROR,
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
