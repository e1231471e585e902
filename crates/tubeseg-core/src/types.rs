//! Request and response values

use serde::{Deserialize, Serialize};
use tubeseg_engine::{Point3, TubeHandle};
use tubeseg_tubes::TubeRecord;

use crate::error::CoreError;
use crate::Result;

/// Uid reported when an extraction finds no tube. Allocated uids are never
/// negative.
pub const NO_TUBE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Requested tube scale, in world units
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub uid: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point3>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
}

impl SegmentResult {
    pub fn no_tube() -> Self {
        Self {
            uid: NO_TUBE,
            points: None,
            radii: None,
        }
    }

    pub fn from_record<T: TubeHandle>(record: &TubeRecord<T>) -> Result<Self> {
        let uid = i64::try_from(record.uid()).map_err(|_| {
            CoreError::Internal(format!("tube uid {} exceeds the wire range", record.uid()))
        })?;

        Ok(Self {
            uid,
            points: Some(record.points().to_vec()),
            radii: Some(record.radii().to_vec()),
        })
    }

    pub fn found_tube(&self) -> bool {
        self.uid != NO_TUBE
    }
}
