//! Image loading commands
use serde_json::Value;
use tubeseg_core::{Engine, ImageId, SessionSummary};

use super::{arg, CommandResult};
use crate::state::AppState;

pub fn load_file<E: Engine>(state: &AppState<E>, args: &[Value]) -> CommandResult<ImageId> {
    let filename: String = match arg(args, 0, "filename") {
        Ok(filename) => filename,
        Err(e) => return CommandResult::err(e),
    };

    match state.with_dispatcher(|dispatcher| dispatcher.load_file(&filename)) {
        Ok(image_id) => CommandResult::ok(image_id),
        Err(e) => CommandResult::err(e.into()),
    }
}

pub fn unload_image<E: Engine>(state: &AppState<E>, args: &[Value]) -> CommandResult<()> {
    let raw: i64 = match arg(args, 0, "imageId") {
        Ok(raw) => raw,
        Err(e) => return CommandResult::err(e),
    };
    let Ok(image_id) = ImageId::try_from(raw) else {
        tracing::debug!(image_id = raw, "Unload of unknown image ignored");
        return CommandResult::ok(());
    };

    match state.with_dispatcher(|dispatcher| {
        dispatcher.unload_image(image_id);
        Ok(())
    }) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.into()),
    }
}

pub fn list_images<E: Engine>(
    state: &AppState<E>,
    _args: &[Value],
) -> CommandResult<Vec<SessionSummary>> {
    match state.with_dispatcher(|dispatcher| Ok(dispatcher.list_images())) {
        Ok(images) => CommandResult::ok(images),
        Err(e) => CommandResult::err(e.into()),
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
    fn test_load_then_list() {
        let state = state();

        let first = load_file(&state, &[json!("/a.mha")]);
        let second = load_file(&state, &[json!("/a.mha")]);
        assert_eq!(first.data, Some(1));
        assert_eq!(second.data, Some(2));

        let listed = list_images(&state, &[]).data.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, 2);
    }

    #[test]
    fn test_unload_never_fails() {
        let state = state();
        load_file(&state, &[json!("/a.mha")]);

        assert!(unload_image(&state, &[json!(1)]).success);
        assert!(unload_image(&state, &[json!(1)]).success);
        assert!(unload_image(&state, &[json!(12345)]).success);
        assert!(unload_image(&state, &[json!(-1)]).success);
        assert!(unload_image(&state, &[json!(i64::MIN)]).success);
        assert!(list_images(&state, &[]).data.unwrap().is_empty());
    }

    #[test]
    fn test_load_volume_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let volume = ScriptedVolume::new(ImageGeometry::new([0.5; 3], [0.0; 3]), [4, 4, 4]);
        std::fs::write(file.path(), serde_json::to_string(&volume).unwrap()).unwrap();

        let state = state();
        let path = file.path().to_string_lossy().to_string();
        let result = load_file(&state, &[json!(path)]);
        assert!(result.success);
    }
}
