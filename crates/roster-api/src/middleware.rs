use std::time::Instant;

use crate::error::ApiResult;
use crate::procedure::Procedure;

/// Run `call` as `procedure`, logging its start and its outcome with the
/// elapsed wall-clock time. The result passes through untouched.
pub fn instrumented<T, F>(procedure: Procedure, call: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T>,
{
    let start = Instant::now();
    tracing::info!(
        procedure = procedure.name(),
        kind = %procedure.kind(),
        "procedure started"
    );

    let result = call();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(_) => tracing::info!(
            procedure = procedure.name(),
            elapsed_ms,
            "procedure succeeded"
        ),
        Err(err) => tracing::warn!(
            procedure = procedure.name(),
            code = %err.code(),
            error = %err,
            elapsed_ms,
            "procedure failed"
        ),
    }
    result
}
