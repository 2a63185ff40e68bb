//! Introspection bus types
//!
//! Components answer key-scoped get/set requests without holding direct
//! references to each other. A request carries a path of checksummed keys;
//! the first handler that recognises it fills in the data and marks it taken.
//! Handlers that do not recognise a request leave it untouched so another
//! component can answer.

use crate::checksum::checksum;

/// Namespace key for the tool manager
pub const TOOL_MANAGER_CHECKSUM: u16 = checksum("tool_manager");
/// "is tool X the active tool" query
pub const IS_ACTIVE_TOOL_CHECKSUM: u16 = checksum("is_active_tool");
/// "what is the active tool index" query
pub const GET_ACTIVE_TOOL_CHECKSUM: u16 = checksum("get_active_tool");

/// Payload carried by an introspection answer or a set request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublicData {
    /// A tool identifier
    ToolName(u16),
    /// A 1-based tool index, 0 meaning none
    ToolIndex(usize),
    /// A three-component offset
    Offset([f32; 3]),
}

/// A get or set request travelling over the introspection bus
#[derive(Debug, Clone)]
pub struct PublicDataRequest {
    path: Vec<u16>,
    data: Option<PublicData>,
    taken: bool,
}

impl PublicDataRequest {
    /// Create a request for the given key path
    pub fn new(path: &[u16]) -> Self {
        Self {
            path: path.to_vec(),
            data: None,
            taken: false,
        }
    }

    /// Create a set request carrying a value
    pub fn with_data(path: &[u16], data: PublicData) -> Self {
        Self {
            path: path.to_vec(),
            data: Some(data),
            taken: false,
        }
    }

    /// Check the namespace key
    pub fn starts_with(&self, key: u16) -> bool {
        self.path.first() == Some(&key)
    }

    pub fn second_element_is(&self, key: u16) -> bool {
        self.path.get(1) == Some(&key)
    }

    pub fn third_element_is(&self, key: u16) -> bool {
        self.path.get(2) == Some(&key)
    }

    pub fn data(&self) -> Option<PublicData> {
        self.data
    }

    /// Fill in the answer
    pub fn set_data(&mut self, data: PublicData) {
        self.data = Some(data);
    }

    pub fn set_taken(&mut self) {
        self.taken = true;
    }

    pub fn is_taken(&self) -> bool {
        self.taken
    }
}

/// A component that answers introspection requests
pub trait PublicDataHandler: Send {
    /// Answer a get request, or leave it untouched if it is not ours
    fn on_get_public_data(&self, request: &mut PublicDataRequest);

    /// Apply a set request, or leave it untouched if it is not ours
    fn on_set_public_data(&mut self, _request: &mut PublicDataRequest) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        assert_ne!(TOOL_MANAGER_CHECKSUM, IS_ACTIVE_TOOL_CHECKSUM);
        assert_ne!(TOOL_MANAGER_CHECKSUM, GET_ACTIVE_TOOL_CHECKSUM);
        assert_ne!(IS_ACTIVE_TOOL_CHECKSUM, GET_ACTIVE_TOOL_CHECKSUM);
    }

    #[test]
    fn test_path_matching() {
        let req = PublicDataRequest::new(&[TOOL_MANAGER_CHECKSUM, IS_ACTIVE_TOOL_CHECKSUM, 20]);
        assert!(req.starts_with(TOOL_MANAGER_CHECKSUM));
        assert!(req.second_element_is(IS_ACTIVE_TOOL_CHECKSUM));
        assert!(req.third_element_is(20));
        assert!(!req.third_element_is(21));
    }

    #[test]
    fn test_short_path_never_matches_missing_elements() {
        let req = PublicDataRequest::new(&[TOOL_MANAGER_CHECKSUM]);
        assert!(!req.second_element_is(GET_ACTIVE_TOOL_CHECKSUM));
        assert!(!req.third_element_is(0));
    }

    #[test]
    fn test_answer_lifecycle() {
        let mut req = PublicDataRequest::new(&[TOOL_MANAGER_CHECKSUM, GET_ACTIVE_TOOL_CHECKSUM]);
        assert!(!req.is_taken());
        assert!(req.data().is_none());
        req.set_data(PublicData::ToolIndex(2));
        req.set_taken();
        assert!(req.is_taken());
        assert_eq!(req.data(), Some(PublicData::ToolIndex(2)));
    }

    #[test]
    fn test_set_request_carries_value() {
        let req = PublicDataRequest::with_data(&[TOOL_MANAGER_CHECKSUM], PublicData::ToolName(20));
        assert_eq!(req.data(), Some(PublicData::ToolName(20)));
        assert!(!req.is_taken());
    }
}
