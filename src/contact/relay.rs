use std::io;
use std::io::ErrorKind;

use ntex::http::client::Client;
use serde_json::json;

use crate::contact::ContactMessage;

/// Hands an accepted message to whoever stores it.
#[allow(async_fn_in_trait)]
pub trait FormRelay {
    async fn relay(&self, message: &ContactMessage) -> io::Result<()>;
}

/// Posts the message as JSON to a third-party form collection endpoint.
/// The endpoint only lives in the server configuration.
pub struct HttpRelay {
    endpoint: String,
}

impl HttpRelay {
    pub fn new(endpoint: &str) -> Self {
        HttpRelay {
            endpoint: endpoint.to_string(),
        }
    }

    fn payload(message: &ContactMessage) -> serde_json::Value {
        let subject = if message.subject.is_empty() {
            format!("Portfolio contact from {}", message.name)
        } else {
            message.subject.clone()
        };

        json!({
            "name": message.name,
            "email": message.email,
            "subject": message.subject,
            "message": message.message,
            "_subject": subject,
        })
    }
}

impl FormRelay for HttpRelay {
    async fn relay(&self, message: &ContactMessage) -> io::Result<()> {
        let client = Client::new();
        let response = client.post(self.endpoint.as_str())
            .header("Accept", "application/json")
            .send_json(&Self::payload(message))
            .await
            .map_err(|e| io::Error::new(ErrorKind::Other, format!("Error posting to {}: {}", self.endpoint, e)))?;

        if !response.status().is_success() {
            return Err(io::Error::new(
                ErrorKind::Other,
                format!("Form endpoint {} answered {}", self.endpoint, response.status()),
            ));
        }
        Ok(())
    }
}

/// Used when no endpoint is configured: accepted messages are only logged.
pub struct LogRelay;

impl FormRelay for LogRelay {
    async fn relay(&self, message: &ContactMessage) -> io::Result<()> {
        spdlog::info!("Contact message from {} <{}>: {}", message.name, message.email, message.subject);
        Ok(())
    }
}
