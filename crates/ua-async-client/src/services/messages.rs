// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request and response messages of the supported service sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ua_async_core::StatusCode;

use crate::client::ServiceKind;
use crate::types::{
    AttributeId, DataValue, LocalizedText, NodeClass, NodeId, QualifiedName, Variant,
};

// =============================================================================
// Service traits
// =============================================================================

/// A request message of one service.
pub trait ServiceRequest: Sized + 'static {
    /// The response message of the same service.
    type Response: ServiceResponse + Default + 'static;

    /// Service the request belongs to.
    const KIND: ServiceKind;

    /// Returns the request header.
    fn request_header_mut(&mut self) -> &mut RequestHeader;
}

/// A response message carrying a list of per-item results.
pub trait ServiceResponse {
    /// Per-item result type.
    type Result;

    /// Returns the response header.
    fn response_header(&self) -> &ResponseHeader;

    /// Returns the per-item results.
    fn results_mut(&mut self) -> &mut Vec<Self::Result>;
}

macro_rules! service_messages {
    ($($request:ident => $response:ident, $kind:ident, $result:ty;)*) => {
        $(
            impl ServiceRequest for $request {
                type Response = $response;
                const KIND: ServiceKind = ServiceKind::$kind;

                fn request_header_mut(&mut self) -> &mut RequestHeader {
                    &mut self.header
                }
            }

            impl ServiceResponse for $response {
                type Result = $result;

                fn response_header(&self) -> &ResponseHeader {
                    &self.header
                }

                fn results_mut(&mut self) -> &mut Vec<$result> {
                    &mut self.results
                }
            }
        )*
    };
}

service_messages! {
    ReadRequest => ReadResponse, Read, DataValue;
    WriteRequest => WriteResponse, Write, StatusCode;
    AddNodesRequest => AddNodesResponse, AddNodes, AddNodesResult;
    AddReferencesRequest => AddReferencesResponse, AddReferences, StatusCode;
    DeleteNodesRequest => DeleteNodesResponse, DeleteNodes, StatusCode;
    DeleteReferencesRequest => DeleteReferencesResponse, DeleteReferences, StatusCode;
}

// =============================================================================
// Headers
// =============================================================================

/// Common header of every request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestHeader {
    /// Client-assigned handle echoed in the response.
    pub request_handle: u32,
    /// Time the request was sent.
    pub timestamp: DateTime<Utc>,
    /// Timeout hint in milliseconds (0 = none).
    pub timeout_hint: u32,
}

/// Common header of every response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseHeader {
    /// Handle of the request this response answers.
    pub request_handle: u32,
    /// Time the response was produced.
    pub timestamp: DateTime<Utc>,
    /// Overall result of the service call.
    pub service_result: StatusCode,
}

impl ResponseHeader {
    /// Creates a header answering `request`.
    pub fn answering(request: &RequestHeader, service_result: StatusCode) -> Self {
        Self {
            request_handle: request.request_handle,
            timestamp: Utc::now(),
            service_result,
        }
    }
}

// =============================================================================
// Attribute service set
// =============================================================================

/// Attribute to read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadValueId {
    /// Node to read.
    pub node_id: NodeId,
    /// Attribute to read.
    pub attribute_id: AttributeId,
}

impl ReadValueId {
    /// Creates a read item.
    pub fn new(node_id: NodeId, attribute_id: AttributeId) -> Self {
        Self {
            node_id,
            attribute_id,
        }
    }
}

/// Read service request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Request header.
    pub header: RequestHeader,
    /// Maximum age of cached values in milliseconds.
    pub max_age: f64,
    /// Attributes to read.
    pub nodes_to_read: Vec<ReadValueId>,
}

impl ReadRequest {
    /// Creates a request reading `nodes_to_read`.
    pub fn new(nodes_to_read: Vec<ReadValueId>) -> Self {
        Self {
            nodes_to_read,
            ..Default::default()
        }
    }
}

/// Read service response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadResponse {
    /// Response header.
    pub header: ResponseHeader,
    /// One value per requested attribute.
    pub results: Vec<DataValue>,
}

/// Attribute to write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WriteValue {
    /// Node to write.
    pub node_id: NodeId,
    /// Attribute to write.
    pub attribute_id: AttributeId,
    /// Value to write.
    pub value: DataValue,
}

impl WriteValue {
    /// Creates a write item.
    pub fn new(node_id: NodeId, attribute_id: AttributeId, value: DataValue) -> Self {
        Self {
            node_id,
            attribute_id,
            value,
        }
    }
}

/// Write service request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WriteRequest {
    /// Request header.
    pub header: RequestHeader,
    /// Attributes to write.
    pub nodes_to_write: Vec<WriteValue>,
}

impl WriteRequest {
    /// Creates a request writing `nodes_to_write`.
    pub fn new(nodes_to_write: Vec<WriteValue>) -> Self {
        Self {
            nodes_to_write,
            ..Default::default()
        }
    }
}

/// Write service response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Response header.
    pub header: ResponseHeader,
    /// One status per written attribute.
    pub results: Vec<StatusCode>,
}

// =============================================================================
// NodeManagement service set
// =============================================================================

/// Attributes of a node to add.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Display name; the browse name is used if empty.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
    /// Initial value (variables and variable types).
    pub value: Option<Variant>,
    /// Data type (variables and variable types).
    pub data_type: Option<NodeId>,
    /// Value rank (variables and variable types).
    pub value_rank: Option<i32>,
    /// Event notifier (objects and views).
    pub event_notifier: Option<u8>,
}

/// Node to add.
///
/// The constructors fill in the type definition and the reference from the
/// parent the way the corresponding node class is normally modelled.
///
/// # Examples
///
/// ```
/// use ua_async_client::services::AddNodesItem;
/// use ua_async_client::types::NodeId;
///
/// let item = AddNodesItem::variable(
///     &NodeId::OBJECTS_FOLDER,
///     &NodeId::numeric(1, 1000),
///     "Temperature",
/// )
/// .with_value(21.5)
/// .with_display_name("Boiler temperature");
/// assert_eq!(item.reference_type_id, NodeId::HAS_COMPONENT);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNodesItem {
    /// Parent node.
    pub parent_node_id: NodeId,
    /// Reference from the parent.
    pub reference_type_id: NodeId,
    /// Requested node id; null lets the server assign one.
    pub requested_new_node_id: NodeId,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Node class.
    pub node_class: NodeClass,
    /// Node attributes.
    pub attributes: NodeAttributes,
    /// Type definition (objects and variables).
    pub type_definition: NodeId,
}

impl AddNodesItem {
    /// Creates an item with explicit node class, type and reference.
    ///
    /// The browse name lives in the namespace of `id`.
    pub fn new(
        node_class: NodeClass,
        parent_id: &NodeId,
        id: &NodeId,
        browse_name: &str,
        type_definition: NodeId,
        reference_type: NodeId,
    ) -> Self {
        Self {
            parent_node_id: parent_id.clone(),
            reference_type_id: reference_type,
            requested_new_node_id: id.clone(),
            browse_name: QualifiedName::new(id.namespace_index, browse_name),
            node_class,
            attributes: NodeAttributes::default(),
            type_definition,
        }
    }

    /// Object of `BaseObjectType`, referenced with `HasComponent`.
    pub fn object(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::Object,
            parent_id,
            id,
            browse_name,
            NodeId::BASE_OBJECT_TYPE,
            NodeId::HAS_COMPONENT,
        )
    }

    /// Object of `FolderType`, referenced with `Organizes`.
    pub fn folder(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::Object,
            parent_id,
            id,
            browse_name,
            NodeId::FOLDER_TYPE,
            NodeId::ORGANIZES,
        )
    }

    /// Variable of `BaseDataVariableType`, referenced with `HasComponent`.
    pub fn variable(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::Variable,
            parent_id,
            id,
            browse_name,
            NodeId::BASE_DATA_VARIABLE_TYPE,
            NodeId::HAS_COMPONENT,
        )
    }

    /// Variable of `PropertyType`, referenced with `HasProperty`.
    pub fn property(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::Variable,
            parent_id,
            id,
            browse_name,
            NodeId::PROPERTY_TYPE,
            NodeId::HAS_PROPERTY,
        )
    }

    /// Object type, referenced from its supertype with `HasSubtype`.
    pub fn object_type(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::ObjectType,
            parent_id,
            id,
            browse_name,
            NodeId::null(),
            NodeId::HAS_SUBTYPE,
        )
    }

    /// Variable type of `BaseDataVariableType`, referenced from its supertype
    /// with `HasSubtype`.
    pub fn variable_type(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::VariableType,
            parent_id,
            id,
            browse_name,
            NodeId::BASE_DATA_VARIABLE_TYPE,
            NodeId::HAS_SUBTYPE,
        )
    }

    /// Reference type, referenced from its supertype with `HasSubtype`.
    pub fn reference_type(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::ReferenceType,
            parent_id,
            id,
            browse_name,
            NodeId::null(),
            NodeId::HAS_SUBTYPE,
        )
    }

    /// Data type, referenced from its supertype with `HasSubtype`.
    pub fn data_type(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::DataType,
            parent_id,
            id,
            browse_name,
            NodeId::null(),
            NodeId::HAS_SUBTYPE,
        )
    }

    /// View, referenced with `Organizes`.
    pub fn view(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::View,
            parent_id,
            id,
            browse_name,
            NodeId::null(),
            NodeId::ORGANIZES,
        )
    }

    /// Method, referenced with `HasComponent`.
    ///
    /// Clients cannot attach a callback; servers bind one afterwards.
    pub fn method(parent_id: &NodeId, id: &NodeId, browse_name: &str) -> Self {
        Self::new(
            NodeClass::Method,
            parent_id,
            id,
            browse_name,
            NodeId::null(),
            NodeId::HAS_COMPONENT,
        )
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, text: impl Into<String>) -> Self {
        self.attributes.display_name = LocalizedText::text(text);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.attributes.description = LocalizedText::text(text);
        self
    }

    /// Sets the initial value.
    pub fn with_value(mut self, value: impl Into<Variant>) -> Self {
        self.attributes.value = Some(value.into());
        self
    }

    /// Sets the data type.
    pub fn with_data_type(mut self, data_type: NodeId) -> Self {
        self.attributes.data_type = Some(data_type);
        self
    }

    /// Replaces all attributes.
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Overrides the type definition.
    pub fn with_type_definition(mut self, type_definition: NodeId) -> Self {
        self.type_definition = type_definition;
        self
    }

    /// Overrides the reference from the parent.
    pub fn with_reference_type(mut self, reference_type: NodeId) -> Self {
        self.reference_type_id = reference_type;
        self
    }
}

/// Outcome of adding one node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddNodesResult {
    /// Status of the operation.
    pub status_code: StatusCode,
    /// Id of the added node (null on failure).
    pub added_node_id: NodeId,
}

/// AddNodes service request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddNodesRequest {
    /// Request header.
    pub header: RequestHeader,
    /// Nodes to add.
    pub nodes_to_add: Vec<AddNodesItem>,
}

/// AddNodes service response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddNodesResponse {
    /// Response header.
    pub header: ResponseHeader,
    /// One result per node.
    pub results: Vec<AddNodesResult>,
}

/// Reference to add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddReferencesItem {
    /// Source node.
    pub source_node_id: NodeId,
    /// Reference type.
    pub reference_type_id: NodeId,
    /// Direction as seen from the source.
    pub is_forward: bool,
    /// Target node.
    pub target_node_id: NodeId,
    /// Node class of the target, if known.
    pub target_node_class: Option<NodeClass>,
}

impl AddReferencesItem {
    /// Creates a reference item.
    pub fn new(
        source_id: &NodeId,
        target_id: &NodeId,
        reference_type: &NodeId,
        is_forward: bool,
    ) -> Self {
        Self {
            source_node_id: source_id.clone(),
            reference_type_id: reference_type.clone(),
            is_forward,
            target_node_id: target_id.clone(),
            target_node_class: None,
        }
    }
}

/// AddReferences service request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddReferencesRequest {
    /// Request header.
    pub header: RequestHeader,
    /// References to add.
    pub references_to_add: Vec<AddReferencesItem>,
}

/// AddReferences service response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddReferencesResponse {
    /// Response header.
    pub header: ResponseHeader,
    /// One status per reference.
    pub results: Vec<StatusCode>,
}

/// Node to delete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteNodesItem {
    /// Node to delete.
    pub node_id: NodeId,
    /// Also delete references pointing at the node.
    pub delete_target_references: bool,
}

/// DeleteNodes service request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteNodesRequest {
    /// Request header.
    pub header: RequestHeader,
    /// Nodes to delete.
    pub nodes_to_delete: Vec<DeleteNodesItem>,
}

/// DeleteNodes service response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteNodesResponse {
    /// Response header.
    pub header: ResponseHeader,
    /// One status per node.
    pub results: Vec<StatusCode>,
}

/// Reference to delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteReferencesItem {
    /// Source node.
    pub source_node_id: NodeId,
    /// Reference type.
    pub reference_type_id: NodeId,
    /// Direction as seen from the source.
    pub is_forward: bool,
    /// Target node.
    pub target_node_id: NodeId,
    /// Also delete the opposite direction.
    pub delete_bidirectional: bool,
}

/// DeleteReferences service request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteReferencesRequest {
    /// Request header.
    pub header: RequestHeader,
    /// References to delete.
    pub references_to_delete: Vec<DeleteReferencesItem>,
}

/// DeleteReferences service response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteReferencesResponse {
    /// Response header.
    pub header: ResponseHeader,
    /// One status per reference.
    pub results: Vec<StatusCode>,
}

// =============================================================================
// Tests
// =============================================================================
