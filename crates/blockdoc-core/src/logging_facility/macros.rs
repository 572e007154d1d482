//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use blockdoc_core::log_op_start;
/// log_op_start!("insert_blocks");
/// log_op_start!("insert_blocks", block_id = "b123");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = blockdoc_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = blockdoc_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use blockdoc_core::log_op_end;
/// log_op_end!("insert_blocks", duration_ms = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = blockdoc_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    }};
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = blockdoc_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    }};
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use blockdoc_core::{log_op_error, errors::BlockDocError};
/// let err = BlockDocError::BlockNotFound { block_id: "b1".to_string() };
/// log_op_error!("update_block", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err: &$crate::errors::BlockDocError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = blockdoc_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_code = err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err: &$crate::errors::BlockDocError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = blockdoc_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_code = err.code(),
            $($field)*
        );
    }};
}
