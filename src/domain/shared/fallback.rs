use std::fmt::Display;
use std::future::Future;

/// Result of a capability call that may have been served by a fallback
/// provider. Callers may want to know who actually answered.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome<P, T> {
    pub provider: P,
    pub value: T,
    /// True when the primary provider failed and the fallback answered.
    pub recovered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackError<P> {
    /// The only available provider failed.
    Failed { provider: P, message: String },
    /// Both the selected provider and its fallback failed.
    Exhausted {
        primary: P,
        primary_message: String,
        fallback: P,
        fallback_message: String,
    },
}

/// Invoke a capability call against `primary`, retrying once against
/// `fallback` if the first attempt fails. Failure of both carries both
/// messages so operators can see which half of the failure mode is active.
pub async fn with_fallback<P, T, F, Fut>(
    primary: P,
    fallback: Option<P>,
    mut call: F,
) -> Result<FallbackOutcome<P, T>, FallbackError<P>>
where
    P: Copy + Display,
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    let primary_message = match call(primary).await {
        Ok(value) => {
            return Ok(FallbackOutcome {
                provider: primary,
                value,
                recovered: false,
            })
        }
        Err(message) => message,
    };

    let Some(next) = fallback else {
        return Err(FallbackError::Failed {
            provider: primary,
            message: primary_message,
        });
    };

    tracing::warn!(
        provider = %primary,
        fallback = %next,
        error = %primary_message,
        "capability call failed, retrying with fallback provider"
    );

    match call(next).await {
        Ok(value) => Ok(FallbackOutcome {
            provider: next,
            value,
            recovered: true,
        }),
        Err(fallback_message) => Err(FallbackError::Exhausted {
            primary,
            primary_message,
            fallback: next,
            fallback_message,
        }),
    }
}
