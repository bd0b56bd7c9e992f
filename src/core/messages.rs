use crate::core::outreach::OutreachProgress;
use crate::models::{MessageResult, UserProfile, UserResult};
use crate::services::{MessageWriter, ServiceError};
use std::collections::BTreeMap;

pub const PLACEHOLDER_MESSAGE: &str = "Generating personalized message...";

/// The generation service answered with an error
pub const FAILED_MESSAGE: &str = "Failed to generate message.";

/// The generation call never completed
pub const ERROR_MESSAGE: &str = "Error generating message. Please try again.";

/// True once `body` is a drafted message rather than a placeholder or failure
pub fn is_finished_message(body: &str) -> bool {
    let body = body.trim();
    !body.is_empty()
        && body != PLACEHOLDER_MESSAGE
        && body != FAILED_MESSAGE
        && body != ERROR_MESSAGE
}

pub fn failure_message(err: &ServiceError) -> &'static str {
    if err.is_completed_call() {
        FAILED_MESSAGE
    } else {
        ERROR_MESSAGE
    }
}

async fn write_one(
    writer: &dyn MessageWriter,
    profile: &UserProfile,
    objective: &str,
    target: &UserResult,
) -> String {
    match writer.write_message(profile, objective, target).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Message generation failed for {}: {}", target.id(), e);
            failure_message(&e).to_string()
        }
    }
}

/// Draft one message per target, strictly one call at a time
///
/// `progress` sees the placeholder for each target before its call starts
/// and the final text (or failure string) once it ends. A failed target does
/// not stop the ones after it.
pub async fn generate_sequentially<P>(
    writer: &dyn MessageWriter,
    profile: &UserProfile,
    objective: &str,
    targets: &[UserResult],
    progress: &mut P,
) -> BTreeMap<String, String>
where
    P: OutreachProgress + ?Sized,
{
    let mut messages = BTreeMap::new();

    for target in targets {
        progress.message_updated(target.id(), PLACEHOLDER_MESSAGE).await;
        let message = write_one(writer, profile, objective, target).await;
        progress.message_updated(target.id(), &message).await;
        messages.insert(target.id().to_string(), message);
    }

    tracing::info!("Generated {} messages", messages.len());
    messages
}

/// Draft messages for every target, returned in input order
pub async fn generate_bulk(
    writer: &dyn MessageWriter,
    profile: &UserProfile,
    objective: &str,
    targets: &[UserResult],
) -> Vec<MessageResult> {
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let message = write_one(writer, profile, objective, target).await;
        results.push(MessageResult {
            profile: target.clone(),
            message,
        });
    }
    results
}
