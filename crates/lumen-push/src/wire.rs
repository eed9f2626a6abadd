//! Wire format for the push service's topic send endpoint

use serde::{Deserialize, Serialize};

use lumen_core::notification::{PushPayload, PushPriority};

/// Request envelope posted to the push service
#[derive(Debug, Serialize)]
pub struct WireRequest {
    pub message: WireMessage,
}

/// One message addressed to a broadcast topic
#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<WireNotification>,
    pub data: serde_json::Value,
    pub android: WireAndroid,
}

/// Visible notification fields
#[derive(Debug, Serialize)]
pub struct WireNotification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Android delivery options
#[derive(Debug, Serialize)]
pub struct WireAndroid {
    pub priority: &'static str,
    pub ttl: String,
    pub notification: WireAndroidNotification,
}

/// Android notification channel routing
#[derive(Debug, Serialize)]
pub struct WireAndroidNotification {
    pub channel_id: String,
    pub click_action: String,
}

/// Response body on success
#[derive(Debug, Deserialize)]
pub struct WireResponse {
    pub name: Option<String>,
}

impl WireRequest {
    /// Build the wire envelope for a payload and topic
    ///
    /// Rich payloads carry a visible notification; silent ones are
    /// data-only. Delivery options map straight through.
    pub fn build(payload: &PushPayload, topic: &str) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_value(payload.data())?;

        let message = match payload {
            PushPayload::Rich {
                notification,
                options,
                ..
            } => WireMessage {
                topic: topic.to_string(),
                notification: Some(WireNotification {
                    title: notification.title.clone(),
                    body: notification.body.clone(),
                    image: notification.image_url.clone(),
                }),
                data,
                android: WireAndroid {
                    priority: priority_str(options.priority),
                    ttl: format!("{}s", options.ttl_secs),
                    notification: WireAndroidNotification {
                        channel_id: options.channel.clone(),
                        click_action: notification.click_action.clone(),
                    },
                },
            },
            PushPayload::Silent { options, .. } => WireMessage {
                topic: topic.to_string(),
                notification: None,
                data,
                android: WireAndroid {
                    priority: priority_str(options.priority),
                    ttl: format!("{}s", options.ttl_secs),
                    notification: WireAndroidNotification {
                        channel_id: options.channel.clone(),
                        click_action: String::new(),
                    },
                },
            },
        };

        Ok(Self { message })
    }
}

fn priority_str(priority: PushPriority) -> &'static str {
    match priority {
        PushPriority::High => "HIGH",
        PushPriority::Normal => "NORMAL",
    }
}
