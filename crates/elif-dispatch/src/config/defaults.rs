//! Default configuration values

use crate::template::{VariableType, DEFAULT_BACKTRACK_LIMIT};

pub struct DispatchDefaults;

impl DispatchDefaults {
    pub const DEFAULT_VARIABLE_TYPE: VariableType = VariableType::UriSegment;
    pub const BACKTRACK_LIMIT: usize = DEFAULT_BACKTRACK_LIMIT;
    pub const STRIP_MATRIX_PARAMS: bool = true;
    pub const FALLBACK_MEDIA_TYPE: &'static str = "application/octet-stream";
}
