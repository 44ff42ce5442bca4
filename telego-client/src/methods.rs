//! Typed wrappers for a few common API methods.
//!
//! These cover one JSON method with no parameters, one JSON method with
//! parameters and one upload. Any other method can be called through
//! [`Bot::perform`] with a custom [`MethodParams`] type.

use serde::{Deserialize, Serialize};

use crate::client::Bot;
use crate::error::BotError;
use crate::params::{Files, InputFile, MethodParams};
use crate::request::RequestConstructor;

/// A user or bot account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A sent document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

/// Target chat: a numeric id or a `@channelusername`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(username: &str) -> Self {
        ChatId::Username(username.to_string())
    }
}

impl From<String> for ChatId {
    fn from(username: String) -> Self {
        ChatId::Username(username)
    }
}

/// Parameters of `sendMessage`.
#[derive(Clone, Debug, Serialize)]
pub struct SendMessageParams {
    pub chat_id: ChatId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

impl SendMessageParams {
    pub fn new(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: None,
            disable_notification: false,
            reply_to_message_id: None,
        }
    }
}

impl MethodParams for SendMessageParams {}

/// Parameters of `sendDocument`.
///
/// The document travels as a form file part, every other field as a string
/// part.
#[derive(Clone, Debug, Serialize)]
pub struct SendDocumentParams {
    pub chat_id: ChatId,
    #[serde(skip)]
    pub document: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_notification: bool,
}

impl SendDocumentParams {
    pub fn new(chat_id: impl Into<ChatId>, document: InputFile) -> Self {
        Self {
            chat_id: chat_id.into(),
            document,
            caption: None,
            parse_mode: None,
            disable_notification: false,
        }
    }
}

impl MethodParams for SendDocumentParams {
    fn file_parameters(&self) -> Files {
        Files::from([("document".to_string(), self.document.clone())])
    }
}

/// `getMe` takes no parameters; it is sent as `{}`.
#[derive(Clone, Copy, Debug, Default, Serialize)]
struct GetMe {}

impl MethodParams for GetMe {}

impl<R: RequestConstructor> Bot<R> {
    /// Basic information about the bot.
    pub async fn get_me(&self) -> Result<User, BotError> {
        self.perform("getMe", &GetMe {}).await
    }

    /// Send a text message.
    pub async fn send_message(&self, params: &SendMessageParams) -> Result<Message, BotError> {
        self.perform("sendMessage", params).await
    }

    /// Upload and send a document.
    pub async fn send_document(&self, params: &SendDocumentParams) -> Result<Message, BotError> {
        self.perform("sendDocument", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{DefaultConstructor, flatten};

    #[test]
    fn test_send_message_json() {
        let mut params = SendMessageParams::new(42i64, "hello");
        params.parse_mode = Some("HTML".into());

        let payload = DefaultConstructor::new().build(&params).unwrap();
        assert!(payload.content_type().is_json());
        assert_eq!(
            &payload.body()[..],
            br#"{"chat_id":42,"text":"hello","parse_mode":"HTML"}"#
        );
    }

    #[test]
    fn test_send_document_multipart() {
        let mut params = SendDocumentParams::new(
            "@channel",
            InputFile::from_bytes("report.txt", &b"quarterly"[..]),
        );
        params.caption = Some("Q3".into());

        let fields = flatten(&params).unwrap();
        assert_eq!(
            fields,
            vec![
                ("chat_id".to_string(), "@channel".to_string()),
                ("caption".to_string(), "Q3".to_string()),
            ]
        );

        let payload = DefaultConstructor::new().build(&params).unwrap();
        assert!(payload.content_type().is_multipart());
        let body = std::str::from_utf8(payload.body()).unwrap();
        assert!(body.contains("name=\"document\"; filename=\"report.txt\""));
    }

    #[test]
    fn test_get_me_is_empty_object() {
        let payload = DefaultConstructor::new().build(&GetMe {}).unwrap();
        assert_eq!(&payload.body()[..], b"{}");
    }

    #[test]
    fn test_decode_message() {
        let message: Message = serde_json::from_str(
            r#"{"message_id":7,"date":1700000000,"chat":{"id":42,"type":"private"},"text":"hi"}"#,
        )
        .unwrap();
        assert_eq!(message.message_id, 7);
        assert_eq!(message.chat.kind, "private");
        assert_eq!(message.text.as_deref(), Some("hi"));
        assert!(message.from.is_none());
    }
}
