//! Responses of path lookups and controller invocations.

use crate::ContentEntity;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of result wrapped in an [`ActionResponse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    /// Result of a controller action.
    ActionResult,
    /// Any other response kind.
    #[default]
    #[serde(other)]
    Other,
}

/// Envelope around the result of invoking a server-side controller method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse<T = Value> {
    /// Name of the invoked action.
    pub action_name: String,

    /// The content the action was invoked on.
    pub current_content: ContentEntity,

    /// Kind of response.
    #[serde(default)]
    pub response_type: ResponseType,

    /// Action result.
    #[serde(rename = "data", alias = "payload")]
    pub payload: T,
}

impl<T> ActionResponse<T> {
    /// Whether the response wraps a controller action result.
    pub fn is_action_result(&self) -> bool {
        self.response_type == ResponseType::ActionResult
    }
}

/// Result of resolving a path: a bare entity or an action response.
///
/// The variant is fixed when the value is constructed; decoding looks at the
/// `actionName` key exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathResponse {
    /// A plain content entity.
    Content(ContentEntity),
    /// An action response wrapping the routed content.
    Action(Box<ActionResponse>),
}

impl PathResponse {
    /// Decode a JSON value into the matching variant.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let is_action = value
            .get("actionName")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.is_empty());

        if is_action {
            serde_json::from_value(value).map(|r| Self::Action(Box::new(r)))
        } else {
            serde_json::from_value(value).map(Self::Content)
        }
    }

    /// Whether this is a bare entity.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    /// Whether this is an action response.
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }

    /// The routed content.
    pub fn content(&self) -> &ContentEntity {
        match self {
            Self::Content(entity) => entity,
            Self::Action(response) => &response.current_content,
        }
    }

    /// Unwrap into the routed content.
    pub fn into_content(self) -> ContentEntity {
        match self {
            Self::Content(entity) => entity,
            Self::Action(response) => response.current_content,
        }
    }

    /// Decode the action payload, if this is an action response.
    pub fn payload<T: DeserializeOwned>(&self) -> Option<serde_json::Result<T>> {
        match self {
            Self::Content(_) => None,
            Self::Action(response) => Some(serde_json::from_value(response.payload.clone())),
        }
    }
}

impl From<ContentEntity> for PathResponse {
    fn from(entity: ContentEntity) -> Self {
        Self::Content(entity)
    }
}

impl From<ActionResponse> for PathResponse {
    fn from(response: ActionResponse) -> Self {
        Self::Action(Box::new(response))
    }
}

impl<'de> Deserialize<'de> for PathResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}
