use crate::lifecycle;

/// `GET /quitquitquit`: exit the process at once. No response is guaranteed.
pub async fn quit() {
    tracing::warn!("Termination requested via /quitquitquit");
    lifecycle::terminate();
}
