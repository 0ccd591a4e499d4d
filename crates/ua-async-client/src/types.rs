// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA value types carried by service requests and responses.
//!
//! - **NodeId**: Numeric and string node identifiers, plus the ns0 nodes the
//!   services refer to
//! - **QualifiedName / LocalizedText**: Browse and display names
//! - **NodeClass / AttributeId**: Node model enumerations
//! - **Variant / DataValue**: Attribute values with status and timestamps
//! - **ModellingRule**: Well-known modelling rule nodes
//!
//! # Examples
//!
//! ```
//! use ua_async_client::types::{NodeId, QualifiedName};
//!
//! let node_id = NodeId::string(2, "Boiler.Temperature");
//! assert_eq!(node_id.to_string(), "ns=2;s=Boiler.Temperature");
//!
//! let name = QualifiedName::new(0, "Objects");
//! assert_eq!(name.to_string(), "Objects");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ua_async_core::StatusCode;

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A NodeId uniquely identifies a node within an OPC UA server. It consists
/// of a namespace index and a numeric or string identifier.
///
/// # Examples
///
/// ```
/// use ua_async_client::types::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// assert_eq!(numeric.to_string(), "ns=2;i=1001");
/// assert_eq!(NodeId::numeric(0, 85), NodeId::OBJECTS_FOLDER);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

const fn ns0(value: u32) -> NodeId {
    NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(value),
    }
}

impl NodeId {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a numeric node ID.
    #[inline]
    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        ns0(0)
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Root folder (ns=0, i=84).
    pub const ROOT_FOLDER: NodeId = ns0(84);
    /// Objects folder (ns=0, i=85).
    pub const OBJECTS_FOLDER: NodeId = ns0(85);
    /// Types folder (ns=0, i=86).
    pub const TYPES_FOLDER: NodeId = ns0(86);
    /// Views folder (ns=0, i=87).
    pub const VIEWS_FOLDER: NodeId = ns0(87);

    /// BaseObjectType (ns=0, i=58).
    pub const BASE_OBJECT_TYPE: NodeId = ns0(58);
    /// FolderType (ns=0, i=61).
    pub const FOLDER_TYPE: NodeId = ns0(61);
    /// BaseDataVariableType (ns=0, i=63).
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = ns0(63);
    /// PropertyType (ns=0, i=68).
    pub const PROPERTY_TYPE: NodeId = ns0(68);
    /// ModellingRuleType (ns=0, i=77).
    pub const MODELLING_RULE_TYPE: NodeId = ns0(77);

    /// References (ns=0, i=31).
    pub const REFERENCES: NodeId = ns0(31);
    /// HierarchicalReferences (ns=0, i=33).
    pub const HIERARCHICAL_REFERENCES: NodeId = ns0(33);
    /// Organizes (ns=0, i=35).
    pub const ORGANIZES: NodeId = ns0(35);
    /// HasModellingRule (ns=0, i=37).
    pub const HAS_MODELLING_RULE: NodeId = ns0(37);
    /// HasTypeDefinition (ns=0, i=40).
    pub const HAS_TYPE_DEFINITION: NodeId = ns0(40);
    /// HasSubtype (ns=0, i=45).
    pub const HAS_SUBTYPE: NodeId = ns0(45);
    /// HasProperty (ns=0, i=46).
    pub const HAS_PROPERTY: NodeId = ns0(46);
    /// HasComponent (ns=0, i=47).
    pub const HAS_COMPONENT: NodeId = ns0(47);

    /// BaseDataType (ns=0, i=24).
    pub const BASE_DATA_TYPE: NodeId = ns0(24);

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this is a numeric identifier.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::Numeric(_))
    }

    /// Returns `true` if this is a null node ID (ns=0, i=0).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    /// `ns=<namespace>;{i|s}=<identifier>`, with the namespace omitted for
    /// namespace 0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "ns={};", self.namespace_index)?;
        }
        write!(f, "{}", self.identifier)
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// OPC UA node identifier types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),

    /// String identifier.
    String(String),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
        }
    }
}

// =============================================================================
// QualifiedName / LocalizedText
// =============================================================================

/// Name qualified by a namespace index, used as the browse name of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,
    /// Name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Returns `true` if the name is empty.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.namespace_index, self.name)
        }
    }
}

/// Human-readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale identifier such as `en-US`; empty if unspecified.
    pub locale: String,
    /// Text.
    pub text: String,
}

impl LocalizedText {
    /// Creates a localized text.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// Creates a text without locale.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new("", text)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// OPC UA node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Object node.
    Object,
    /// Variable node.
    Variable,
    /// Method node.
    Method,
    /// Object type node.
    ObjectType,
    /// Variable type node.
    VariableType,
    /// Reference type node.
    ReferenceType,
    /// Data type node.
    DataType,
    /// View node.
    View,
}

impl NodeClass {
    /// Returns the OPC UA bit mask value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }

    /// Returns `true` if nodes of this class carry a value attribute.
    pub const fn has_value(&self) -> bool {
        matches!(self, Self::Variable | Self::VariableType)
    }

    /// Returns `true` if nodes of this class carry an event notifier.
    pub const fn has_event_notifier(&self) -> bool {
        matches!(self, Self::Object | Self::View)
    }

    /// Returns `true` for the type node classes.
    pub const fn is_type(&self) -> bool {
        matches!(
            self,
            Self::ObjectType | Self::VariableType | Self::ReferenceType | Self::DataType
        )
    }
}

// =============================================================================
// AttributeId
// =============================================================================

/// OPC UA attribute IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    /// Node ID attribute.
    NodeId,
    /// Node class attribute.
    NodeClass,
    /// Browse name attribute.
    BrowseName,
    /// Display name attribute.
    DisplayName,
    /// Description attribute.
    Description,
    /// Write mask attribute.
    WriteMask,
    /// Event notifier attribute.
    EventNotifier,
    /// Value attribute.
    #[default]
    Value,
    /// Data type attribute.
    DataType,
    /// Value rank attribute.
    ValueRank,
    /// Access level attribute.
    AccessLevel,
}

impl AttributeId {
    /// Returns the OPC UA numeric value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::NodeId => 1,
            Self::NodeClass => 2,
            Self::BrowseName => 3,
            Self::DisplayName => 4,
            Self::Description => 5,
            Self::WriteMask => 6,
            Self::EventNotifier => 12,
            Self::Value => 13,
            Self::DataType => 14,
            Self::ValueRank => 15,
            Self::AccessLevel => 17,
        }
    }
}

// =============================================================================
// Variant
// =============================================================================

/// Attribute value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// No value.
    #[default]
    Empty,
    /// Boolean value.
    Boolean(bool),
    /// Signed byte.
    SByte(i8),
    /// Unsigned byte.
    Byte(u8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Date and time.
    DateTime(DateTime<Utc>),
    /// Byte string.
    ByteString(Vec<u8>),
    /// Node identifier.
    NodeId(NodeId),
    /// Qualified name.
    QualifiedName(QualifiedName),
    /// Localized text.
    LocalizedText(LocalizedText),
    /// Status code.
    StatusCode(StatusCode),
    /// One-dimensional array.
    Array(Vec<Variant>),
}

impl Variant {
    /// Returns `true` if no value is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the type name of the contained value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::ByteString(_) => "ByteString",
            Self::NodeId(_) => "NodeId",
            Self::QualifiedName(_) => "QualifiedName",
            Self::LocalizedText(_) => "LocalizedText",
            Self::StatusCode(_) => "StatusCode",
            Self::Array(_) => "Array",
        }
    }

    /// Returns the contained qualified name.
    pub fn as_qualified_name(&self) -> Option<&QualifiedName> {
        match self {
            Self::QualifiedName(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_variant_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_variant_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime<Utc> => DateTime,
    NodeId => NodeId,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    StatusCode => StatusCode,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

// =============================================================================
// DataValue
// =============================================================================

/// Value with status and timestamps, as returned by the Read service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValue {
    /// The value.
    pub value: Variant,

    /// Status of the value.
    pub status: StatusCode,

    /// Source timestamp.
    pub source_timestamp: Option<DateTime<Utc>>,

    /// Server timestamp.
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a good data value.
    pub fn new(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Creates a data value carrying only a status.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Sets the server timestamp.
    pub fn with_server_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.server_timestamp = Some(timestamp);
        self
    }

    /// Returns `true` if the status is good.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }
}

// =============================================================================
// ModellingRule
// =============================================================================

/// Modelling rules attached to instance declarations with
/// `HasModellingRule` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModellingRule {
    /// Mandatory (i=78).
    Mandatory,
    /// Optional (i=80).
    Optional,
    /// ExposesItsArray (i=83).
    ExposesItsArray,
    /// OptionalPlaceholder (i=11508).
    OptionalPlaceholder,
    /// MandatoryPlaceholder (i=11510).
    MandatoryPlaceholder,
}

impl ModellingRule {
    /// All modelling rules.
    pub const ALL: [ModellingRule; 5] = [
        Self::Mandatory,
        Self::Optional,
        Self::ExposesItsArray,
        Self::OptionalPlaceholder,
        Self::MandatoryPlaceholder,
    ];

    /// Returns the node of this modelling rule.
    pub const fn node_id(&self) -> NodeId {
        ns0(match self {
            Self::Mandatory => 78,
            Self::Optional => 80,
            Self::ExposesItsArray => 83,
            Self::OptionalPlaceholder => 11508,
            Self::MandatoryPlaceholder => 11510,
        })
    }

    /// Returns the browse name of the modelling rule node.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::Optional => "Optional",
            Self::ExposesItsArray => "ExposesItsArray",
            Self::OptionalPlaceholder => "OptionalPlaceholder",
            Self::MandatoryPlaceholder => "MandatoryPlaceholder",
        }
    }
}

impl fmt::Display for ModellingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Tests
// =============================================================================
