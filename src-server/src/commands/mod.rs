//! RPC Commands
//!
//! These commands bridge the transport to the dispatcher. Each takes its
//! positional arguments as raw JSON values and returns a [`CommandResult`].

pub mod images;
pub mod segment;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tubeseg_core::{CoreError, Engine};

use crate::state::AppState;

pub const LOAD_FAILED: &str = "LOAD_FAILED";
pub const SESSION_NOT_FOUND: &str = "SESSION_NOT_FOUND";
pub const SCALE_TOO_SMALL: &str = "SCALE_TOO_SMALL";
pub const GEOMETRY_ERROR: &str = "GEOMETRY_ERROR";
pub const TUBE_NOT_FOUND: &str = "TUBE_NOT_FOUND";
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub code: &'static str,
    pub message: String,
}

impl CommandError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn session_not_found(image_id: i64) -> Self {
        Self::new(SESSION_NOT_FOUND, format!("Image session not found: {image_id}"))
    }
}

impl From<CoreError> for CommandError {
    fn from(e: CoreError) -> Self {
        let code = match &e {
            CoreError::Load(_) => LOAD_FAILED,
            CoreError::SessionNotFound(_) => SESSION_NOT_FOUND,
            CoreError::ScaleTooSmall { .. } => SCALE_TOO_SMALL,
            CoreError::Geometry(_) => GEOMETRY_ERROR,
            CoreError::TubeNotFound { .. } => TUBE_NOT_FOUND,
            CoreError::InvalidParams(_) => INVALID_PARAMS,
            CoreError::DuplicateUid(_)
            | CoreError::Config(_)
            | CoreError::Io(_)
            | CoreError::Serialization(_)
            | CoreError::Internal(_) => INTERNAL_ERROR,
        };
        Self::new(code, e.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<CommandError>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: CommandError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> CommandResult<T> {
    pub fn into_value(self) -> CommandResult<Value> {
        match (self.data, self.error) {
            (_, Some(error)) => CommandResult::err(error),
            (Some(data), None) => match serde_json::to_value(data) {
                Ok(value) => CommandResult::ok(value),
                Err(e) => CommandResult::err(CommandError::new(INTERNAL_ERROR, e.to_string())),
            },
            (None, None) => CommandResult::ok(Value::Null),
        }
    }
}

/// Deserialize positional argument `index`.
pub fn arg<T: DeserializeOwned>(
    args: &[Value],
    index: usize,
    name: &str,
) -> Result<T, CommandError> {
    let value = args
        .get(index)
        .ok_or_else(|| CommandError::invalid_params(format!("missing argument `{name}`")))?;

    serde_json::from_value(value.clone())
        .map_err(|e| CommandError::invalid_params(format!("invalid argument `{name}`: {e}")))
}

/// Route a method call to its command.
pub fn dispatch<E: Engine>(
    state: &AppState<E>,
    method: &str,
    args: &[Value],
) -> CommandResult<Value> {
    tracing::debug!(method = %method, args = args.len(), "Dispatching command");

    match method {
        "app.load_file" => images::load_file(state, args).into_value(),
        "app.unload_image" => images::unload_image(state, args).into_value(),
        "app.list_images" => images::list_images(state, args).into_value(),
        "app.segment" => segment::segment(state, args).into_value(),
        "app.get_tube" => segment::get_tube(state, args).into_value(),
        _ => {
            tracing::warn!(method = %method, "Unknown method");
            CommandResult::err(CommandError::new(
                METHOD_NOT_FOUND,
                format!("unknown method `{method}`"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tubeseg_core::{Config, ImageGeometry, ScriptedEngine, ScriptedVolume};

    fn state() -> AppState<ScriptedEngine> {
        let volume = ScriptedVolume::new(ImageGeometry::new([1.0; 3], [0.0; 3]), [8, 8, 8]);
        AppState::new(
            ScriptedEngine::new().with_volume("/a.mha", volume),
            Config::default(),
        )
    }

    #[test]
    fn test_unknown_method() {
        let result = dispatch(&state(), "app.save_tubes", &[]);
        assert!(!result.success);
        assert_eq!(result.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_missing_argument() {
        let result = dispatch(&state(), "app.load_file", &[]);
        let error = result.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("filename"));
    }

    #[test]
    fn test_wrong_argument_type() {
        let result = dispatch(&state(), "app.unload_image", &[json!("one")]);
        assert_eq!(result.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_load_failure_code() {
        let result = dispatch(&state(), "app.load_file", &[json!("/missing.mha")]);
        assert_eq!(result.error.unwrap().code, LOAD_FAILED);
    }

    #[test]
    fn test_result_serialization() {
        let result = dispatch(&state(), "app.load_file", &[json!("/a.mha")]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({ "success": true, "data": 1, "error": null }));
    }

    #[test]
    fn test_negative_image_id() {
        let state = state();

        let unloaded = dispatch(&state, "app.unload_image", &[json!(-1)]);
        assert!(unloaded.success);

        let segmented = dispatch(
            &state,
            "app.segment",
            &[json!(-1), json!([1, 1, 1]), json!({ "scale": 1.0 })],
        );
        assert_eq!(segmented.error.unwrap().code, SESSION_NOT_FOUND);
    }
}
