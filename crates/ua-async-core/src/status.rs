// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes.
//!
//! A status code is a 32-bit value whose two most significant bits encode
//! its severity:
//!
//! ```text
//! 00 → Good
//! 01 → Uncertain
//! 10 → Bad
//! 11 → Bad (reserved, treated as Bad)
//! ```
//!
//! # Examples
//!
//! ```
//! use ua_async_core::status::{Severity, StatusCode};
//!
//! let code = StatusCode::BAD_INTERNAL_ERROR;
//! assert!(code.is_bad());
//! assert_eq!(code.severity(), Severity::Bad);
//! assert_eq!(code.name(), "BadInternalError");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{UaError, UaResult};

const SEVERITY_SHIFT: u32 = 30;

// =============================================================================
// Raw code helpers
// =============================================================================

/// Returns `true` if the raw code has Good severity.
#[inline]
pub const fn is_good(code: u32) -> bool {
    (code >> SEVERITY_SHIFT) == 0x00
}

/// Returns `true` if the raw code has Uncertain severity.
#[inline]
pub const fn is_uncertain(code: u32) -> bool {
    (code >> SEVERITY_SHIFT) == 0x01
}

/// Returns `true` if the raw code has Bad severity.
#[inline]
pub const fn is_bad(code: u32) -> bool {
    (code >> SEVERITY_SHIFT) >= 0x02
}

/// Returns an error if `code` is bad.
///
/// `BadDisconnect` raises [`UaError::Disconnected`]; every other bad code
/// raises [`UaError::BadStatus`].
///
/// ```
/// use ua_async_core::status::{throw_if_bad, StatusCode};
/// use ua_async_core::UaError;
///
/// assert!(throw_if_bad(StatusCode::GOOD).is_ok());
/// assert!(matches!(
///     throw_if_bad(StatusCode::BAD_DISCONNECT),
///     Err(UaError::Disconnected)
/// ));
/// ```
#[inline]
pub fn throw_if_bad(code: StatusCode) -> UaResult<()> {
    if code.is_bad() {
        Err(UaError::from_status(code))
    } else {
        Ok(())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Severity class of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The operation succeeded.
    Good,

    /// The operation succeeded but the result may be unreliable.
    Uncertain,

    /// The operation failed.
    Bad,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Uncertain => write!(f, "Uncertain"),
            Self::Bad => write!(f, "Bad"),
        }
    }
}

// =============================================================================
// StatusCode
// =============================================================================

/// An OPC UA status code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u32);

impl StatusCode {
    /// The operation succeeded.
    pub const GOOD: Self = Self(0x0000_0000);
    /// The value is uncertain; the reference was not deleted.
    pub const UNCERTAIN_REFERENCE_NOT_DELETED: Self = Self(0x40BC_0000);
    /// An unexpected error occurred.
    pub const BAD_UNEXPECTED_ERROR: Self = Self(0x8001_0000);
    /// An internal error occurred as a result of a programming or configuration error.
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    /// A low level communication error occurred.
    pub const BAD_COMMUNICATION_ERROR: Self = Self(0x8005_0000);
    /// The operation timed out.
    pub const BAD_TIMEOUT: Self = Self(0x800A_0000);
    /// The operation was cancelled because the application is shutting down.
    pub const BAD_SHUTDOWN: Self = Self(0x800C_0000);
    /// The operation could not complete because the client is not connected to the server.
    pub const BAD_SERVER_NOT_CONNECTED: Self = Self(0x800D_0000);
    /// The request could not be processed because there are too many operations.
    pub const BAD_TOO_MANY_OPERATIONS: Self = Self(0x8010_0000);
    /// The node id refers to a node that does not exist in the server address space.
    pub const BAD_NODE_ID_UNKNOWN: Self = Self(0x8034_0000);
    /// The attribute is not supported for the specified node.
    pub const BAD_ATTRIBUTE_ID_INVALID: Self = Self(0x8035_0000);
    /// The access level does not allow writing to the node.
    pub const BAD_NOT_WRITABLE: Self = Self(0x803B_0000);
    /// A requested item was not found.
    pub const BAD_NOT_FOUND: Self = Self(0x803E_0000);
    /// The reference type id does not refer to a valid reference type node.
    pub const BAD_REFERENCE_TYPE_ID_INVALID: Self = Self(0x804C_0000);
    /// The parent node id does not refer to a valid node.
    pub const BAD_PARENT_NODE_ID_INVALID: Self = Self(0x805B_0000);
    /// The reference could not be created because it violates constraints
    /// imposed by the data model.
    pub const BAD_REFERENCE_NOT_ALLOWED: Self = Self(0x805C_0000);
    /// The requested node id is already used by another node.
    pub const BAD_NODE_ID_EXISTS: Self = Self(0x805E_0000);
    /// The node class is not valid.
    pub const BAD_NODE_CLASS_INVALID: Self = Self(0x805F_0000);
    /// The browse name is invalid.
    pub const BAD_BROWSE_NAME_INVALID: Self = Self(0x8060_0000);
    /// The node attributes are not valid for the node class.
    pub const BAD_NODE_ATTRIBUTES_INVALID: Self = Self(0x8062_0000);
    /// The type definition node id does not reference an appropriate type node.
    pub const BAD_TYPE_DEFINITION_INVALID: Self = Self(0x8063_0000);
    /// The source node id does not reference a valid node.
    pub const BAD_SOURCE_NODE_ID_INVALID: Self = Self(0x8064_0000);
    /// The target node id does not reference a valid node.
    pub const BAD_TARGET_NODE_ID_INVALID: Self = Self(0x8065_0000);
    /// The reference type between the nodes is already defined.
    pub const BAD_DUPLICATE_REFERENCE_NOT_ALLOWED: Self = Self(0x8066_0000);
    /// The value supplied for the attribute is not of the same type as the attribute's value.
    pub const BAD_TYPE_MISMATCH: Self = Self(0x8074_0000);
    /// There is a problem with the configuration that affects the usefulness of the value.
    pub const BAD_CONFIGURATION_ERROR: Self = Self(0x8089_0000);
    /// The server has disconnected from the client.
    pub const BAD_DISCONNECT: Self = Self(0x80AD_0000);
    /// The network connection has been closed.
    pub const BAD_CONNECTION_CLOSED: Self = Self(0x80AE_0000);

    /// Creates a status code from its raw value.
    #[inline]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the severity class.
    #[inline]
    pub const fn severity(self) -> Severity {
        if is_good(self.0) {
            Severity::Good
        } else if is_uncertain(self.0) {
            Severity::Uncertain
        } else {
            Severity::Bad
        }
    }

    /// Returns `true` if the severity is Good.
    #[inline]
    pub const fn is_good(self) -> bool {
        is_good(self.0)
    }

    /// Returns `true` if the severity is Uncertain.
    #[inline]
    pub const fn is_uncertain(self) -> bool {
        is_uncertain(self.0)
    }

    /// Returns `true` if the severity is Bad.
    #[inline]
    pub const fn is_bad(self) -> bool {
        is_bad(self.0)
    }

    /// Returns an error if this code is bad. See [`throw_if_bad`].
    #[inline]
    pub fn throw_if_bad(self) -> UaResult<()> {
        throw_if_bad(self)
    }

    /// Returns the symbolic name of this code.
    ///
    /// Unknown codes are named after their severity.
    pub fn name(self) -> &'static str {
        match self.0 {
            0x0000_0000 => "Good",
            0x40BC_0000 => "UncertainReferenceNotDeleted",
            0x8001_0000 => "BadUnexpectedError",
            0x8002_0000 => "BadInternalError",
            0x8003_0000 => "BadOutOfMemory",
            0x8004_0000 => "BadResourceUnavailable",
            0x8005_0000 => "BadCommunicationError",
            0x8006_0000 => "BadEncodingError",
            0x8007_0000 => "BadDecodingError",
            0x800A_0000 => "BadTimeout",
            0x800B_0000 => "BadServiceUnsupported",
            0x800C_0000 => "BadShutdown",
            0x800D_0000 => "BadServerNotConnected",
            0x800E_0000 => "BadServerHalted",
            0x800F_0000 => "BadNothingToDo",
            0x8010_0000 => "BadTooManyOperations",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8035_0000 => "BadAttributeIdInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803B_0000 => "BadNotWritable",
            0x803E_0000 => "BadNotFound",
            0x804C_0000 => "BadReferenceTypeIdInvalid",
            0x805B_0000 => "BadParentNodeIdInvalid",
            0x805C_0000 => "BadReferenceNotAllowed",
            0x805E_0000 => "BadNodeIdExists",
            0x805F_0000 => "BadNodeClassInvalid",
            0x8060_0000 => "BadBrowseNameInvalid",
            0x8062_0000 => "BadNodeAttributesInvalid",
            0x8063_0000 => "BadTypeDefinitionInvalid",
            0x8064_0000 => "BadSourceNodeIdInvalid",
            0x8065_0000 => "BadTargetNodeIdInvalid",
            0x8066_0000 => "BadDuplicateReferenceNotAllowed",
            0x8074_0000 => "BadTypeMismatch",
            0x8089_0000 => "BadConfigurationError",
            0x80AD_0000 => "BadDisconnect",
            0x80AE_0000 => "BadConnectionClosed",
            code if is_good(code) => "Good",
            code if is_uncertain(code) => "Uncertain",
            _ => "Bad",
        }
    }
}

impl From<u32> for StatusCode {
    #[inline]
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl From<StatusCode> for u32 {
    #[inline]
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl PartialEq<u32> for StatusCode {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({}, {:#010X})", self.name(), self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010X})", self.name(), self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severities_partition_code_space() {
        let samples = [
            0x0000_0000u32,
            0x0000_FFFF,
            0x3FFF_FFFF,
            0x4000_0000,
            0x40BC_0000,
            0x7FFF_FFFF,
            0x8000_0000,
            0x8002_0000,
            0xBFFF_FFFF,
            0xC000_0000,
            0xFFFF_FFFF,
        ];
        for code in samples {
            let hits = [is_good(code), is_uncertain(code), is_bad(code)]
                .iter()
                .filter(|hit| **hit)
                .count();
            assert_eq!(hits, 1, "code {code:#010X} must have exactly one severity");
        }

        // Walk the top byte to cover every severity boundary.
        for top in 0u32..=0xFF {
            let code = top << 24;
            let hits = [is_good(code), is_uncertain(code), is_bad(code)]
                .iter()
                .filter(|hit| **hit)
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_severity_classification() {
        assert_eq!(StatusCode::GOOD.severity(), Severity::Good);
        assert_eq!(
            StatusCode::UNCERTAIN_REFERENCE_NOT_DELETED.severity(),
            Severity::Uncertain
        );
        assert_eq!(StatusCode::BAD_INTERNAL_ERROR.severity(), Severity::Bad);
        assert_eq!(StatusCode::new(0xC000_0000).severity(), Severity::Bad);
    }

    #[test]
    fn test_throw_if_bad() {
        assert!(throw_if_bad(StatusCode::GOOD).is_ok());
        assert!(throw_if_bad(StatusCode::UNCERTAIN_REFERENCE_NOT_DELETED).is_ok());

        match throw_if_bad(StatusCode::BAD_TIMEOUT) {
            Err(UaError::BadStatus(code)) => assert_eq!(code, StatusCode::BAD_TIMEOUT),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            StatusCode::BAD_DISCONNECT.throw_if_bad(),
            Err(UaError::Disconnected)
        ));
    }

    #[test]
    fn test_names_and_display() {
        assert_eq!(StatusCode::BAD_DISCONNECT.name(), "BadDisconnect");
        assert_eq!(StatusCode::new(0x8FFF_0000).name(), "Bad");
        assert_eq!(StatusCode::new(0x0001_0000).name(), "Good");
        assert_eq!(
            StatusCode::BAD_INTERNAL_ERROR.to_string(),
            "BadInternalError (0x80020000)"
        );
    }

    #[test]
    fn test_raw_conversions() {
        let code: StatusCode = 0x8034_0000u32.into();
        assert_eq!(code, StatusCode::BAD_NODE_ID_UNKNOWN);
        assert_eq!(u32::from(code), 0x8034_0000);
        assert!(code == 0x8034_0000u32);
    }
}
