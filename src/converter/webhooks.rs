//! Webhook notification handling.

use crate::types::{Event, TaskId};
use std::sync::Arc;

use super::DocumentConverter;

/// Parameters for triggering webhooks
pub struct TriggerWebhooksParams {
    /// The webhook event that occurred
    pub event_type: crate::config::WebhookEvent,
    /// The ID of the conversion task
    pub task_id: TaskId,
    /// Original filename of the uploaded document
    pub filename: String,
    /// Current task state as string
    pub state: String,
    /// Optional artifact file name (for completed conversions)
    pub audio_file: Option<String>,
    /// Optional error message (for failed conversions)
    pub error: Option<String>,
}

impl DocumentConverter {
    /// Trigger webhooks for conversion events
    ///
    /// Sends HTTP POST requests to all configured webhooks subscribed to the
    /// given event type. Webhooks are executed asynchronously (fire and
    /// forget) to avoid blocking the conversion pipeline.
    pub(crate) fn trigger_webhooks(&self, params: TriggerWebhooksParams) {
        let TriggerWebhooksParams {
            event_type,
            task_id,
            filename,
            state,
            audio_file,
            error,
        } = params;

        // Filter to only webhooks that match this event type before cloning
        let matching_webhooks: Vec<_> = self
            .config
            .notifications
            .webhooks
            .iter()
            .filter(|w| w.events.contains(&event_type))
            .cloned()
            .collect();

        if matching_webhooks.is_empty() {
            return;
        }

        let event_tx = self.event_tx.clone();

        // Spawn async task to send webhooks (fire and forget)
        tokio::spawn(async move {
            let timestamp = chrono::Utc::now().timestamp();

            let event_str: &'static str = match event_type {
                crate::config::WebhookEvent::OnComplete => "complete",
                crate::config::WebhookEvent::OnFailed => "failed",
                crate::config::WebhookEvent::OnCancelled => "cancelled",
                crate::config::WebhookEvent::OnSubmitted => "submitted",
            };

            // Build shared payload once - use Arc to share across webhooks
            let payload = Arc::new(crate::types::WebhookPayload {
                event: event_str.to_string(),
                task_id,
                filename,
                state,
                audio_file,
                error,
                timestamp,
            });

            for webhook in matching_webhooks {
                let client = reqwest::Client::new();
                let mut request = client
                    .post(&webhook.url)
                    .json(payload.as_ref())
                    .timeout(webhook.timeout);

                if let Some(auth) = &webhook.auth_header {
                    request = request.header("Authorization", auth);
                }

                let url = webhook.url;
                let timeout = webhook.timeout;
                let result = tokio::time::timeout(timeout, request.send()).await;

                match result {
                    Ok(Ok(response)) => {
                        if !response.status().is_success() {
                            let error_msg = format!(
                                "Webhook returned status {}: {}",
                                response.status(),
                                response.text().await.unwrap_or_default()
                            );
                            tracing::warn!(url = %url, error = %error_msg, "webhook failed");
                            event_tx
                                .send(Event::WebhookFailed {
                                    url,
                                    error: error_msg,
                                })
                                .ok();
                        } else {
                            tracing::debug!(url = %url, "webhook sent successfully");
                        }
                    }
                    Ok(Err(e)) => {
                        let error_msg = format!("Failed to send webhook: {}", e);
                        tracing::warn!(url = %url, error = %error_msg, "webhook failed");
                        event_tx
                            .send(Event::WebhookFailed {
                                url,
                                error: error_msg,
                            })
                            .ok();
                    }
                    Err(_) => {
                        let error_msg = format!("Webhook timed out after {:?}", timeout);
                        tracing::warn!(url = %url, error = %error_msg, "webhook timeout");
                        event_tx
                            .send(Event::WebhookFailed {
                                url,
                                error: error_msg,
                            })
                            .ok();
                    }
                }
            }
        });
    }
}
