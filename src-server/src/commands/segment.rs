//! Tube extraction commands
use serde_json::Value;
use tubeseg_core::{Engine, ImageId, SegmentParams, SegmentResult};

use super::{arg, CommandError, CommandResult};
use crate::state::AppState;

pub fn segment<E: Engine>(state: &AppState<E>, args: &[Value]) -> CommandResult<SegmentResult> {
    let parsed = arg::<i64>(args, 0, "imageId").and_then(|raw| {
        let coord: [f64; 3] = arg(args, 1, "coord")?;
        let params: SegmentParams = arg(args, 2, "params")?;
        Ok((raw, coord, params))
    });
    let (raw, coord, params) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return CommandResult::err(e),
    };
    let Ok(image_id) = ImageId::try_from(raw) else {
        return CommandResult::err(CommandError::session_not_found(raw));
    };

    match state.with_dispatcher(|dispatcher| dispatcher.segment(image_id, coord, params)) {
        Ok(result) => CommandResult::ok(result),
        Err(e) => CommandResult::err(e.into()),
    }
}

pub fn get_tube<E: Engine>(state: &AppState<E>, args: &[Value]) -> CommandResult<SegmentResult> {
    let parsed =
        arg::<i64>(args, 0, "imageId").and_then(|raw| Ok((raw, arg::<u64>(args, 1, "uid")?)));
    let (raw, uid) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return CommandResult::err(e),
    };
    let Ok(image_id) = ImageId::try_from(raw) else {
        return CommandResult::err(CommandError::session_not_found(raw));
    };

    match state.with_dispatcher(|dispatcher| dispatcher.get_tube(image_id, uid)) {
        Ok(result) => CommandResult::ok(result),
        Err(e) => CommandResult::err(e.into()),
    }
}
