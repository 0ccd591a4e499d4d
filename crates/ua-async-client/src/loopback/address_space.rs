// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory address space served by the loopback transport.
//!
//! References are stored in their forward direction only; an inverse
//! reference is the same record looked at from the target.

use std::collections::HashMap;

use chrono::Utc;
use tracing::trace;

use ua_async_core::StatusCode;

use crate::services::messages::{
    AddNodesItem, AddNodesResult, AddReferencesItem, DeleteNodesItem, DeleteReferencesItem,
    ReadValueId, WriteValue,
};
use crate::types::{
    AttributeId, DataValue, LocalizedText, ModellingRule, NodeClass, NodeId, QualifiedName, Variant,
};

/// Namespace of nodes added without a requested id.
const SERVER_NAMESPACE: u16 = 1;

/// First numeric identifier handed out in [`SERVER_NAMESPACE`].
const FIRST_ASSIGNED_ID: u32 = 50_000;

/// Access level reported for variables: readable and writable.
const ACCESS_READ_WRITE: u8 = 0x03;

// =============================================================================
// Node
// =============================================================================

/// A node of the address space.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node id.
    pub node_id: NodeId,
    /// Node class.
    pub node_class: NodeClass,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
    /// Current value (variables and variable types).
    pub value: Option<DataValue>,
    /// Data type (variables and variable types).
    pub data_type: Option<NodeId>,
    /// Value rank (variables and variable types).
    pub value_rank: Option<i32>,
    /// Event notifier (objects).
    pub event_notifier: Option<u8>,
}

impl Node {
    fn new(node_id: NodeId, node_class: NodeClass, browse_name: QualifiedName) -> Self {
        let display_name = LocalizedText::text(browse_name.name.clone());
        let is_variable = node_class.has_value();
        Self {
            node_id,
            node_class,
            browse_name,
            display_name,
            description: LocalizedText::default(),
            value: is_variable.then(|| DataValue::new(Variant::Empty)),
            data_type: is_variable.then_some(NodeId::BASE_DATA_TYPE),
            value_rank: is_variable.then_some(-1),
            event_notifier: node_class.has_event_notifier().then_some(0),
        }
    }

    fn read(&self, attribute_id: AttributeId) -> Result<Variant, StatusCode> {
        let variable_only = || StatusCode::BAD_ATTRIBUTE_ID_INVALID;
        match attribute_id {
            AttributeId::NodeId => Ok(Variant::NodeId(self.node_id.clone())),
            AttributeId::NodeClass => Ok(Variant::Int32(self.node_class.value() as i32)),
            AttributeId::BrowseName => Ok(Variant::QualifiedName(self.browse_name.clone())),
            AttributeId::DisplayName => Ok(Variant::LocalizedText(self.display_name.clone())),
            AttributeId::Description => Ok(Variant::LocalizedText(self.description.clone())),
            AttributeId::WriteMask => Ok(Variant::UInt32(0)),
            AttributeId::EventNotifier => self
                .event_notifier
                .map(Variant::Byte)
                .ok_or(StatusCode::BAD_ATTRIBUTE_ID_INVALID),
            AttributeId::Value => self
                .value
                .as_ref()
                .map(|value| value.value.clone())
                .ok_or_else(variable_only),
            AttributeId::DataType => self
                .data_type
                .clone()
                .map(Variant::NodeId)
                .ok_or_else(variable_only),
            AttributeId::ValueRank => self.value_rank.map(Variant::Int32).ok_or_else(variable_only),
            AttributeId::AccessLevel => {
                if self.node_class == NodeClass::Variable {
                    Ok(Variant::Byte(ACCESS_READ_WRITE))
                } else {
                    Err(variable_only())
                }
            }
        }
    }
}

// =============================================================================
// Reference
// =============================================================================

/// A forward reference between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Source node.
    pub source: NodeId,
    /// Reference type.
    pub reference_type: NodeId,
    /// Target node.
    pub target: NodeId,
}

impl Reference {
    fn new(source: &NodeId, reference_type: &NodeId, target: &NodeId) -> Self {
        Self {
            source: source.clone(),
            reference_type: reference_type.clone(),
            target: target.clone(),
        }
    }

    /// Forward view of a reference given from either end.
    fn oriented(
        source: &NodeId,
        reference_type: &NodeId,
        target: &NodeId,
        is_forward: bool,
    ) -> Self {
        if is_forward {
            Self::new(source, reference_type, target)
        } else {
            Self::new(target, reference_type, source)
        }
    }
}

// =============================================================================
// AddressSpace
// =============================================================================

/// Nodes and references of the loopback server.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    nodes: HashMap<NodeId, Node>,
    references: Vec<Reference>,
    next_id: u32,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    /// Creates an address space holding the standard namespace 0 nodes.
    pub fn new() -> Self {
        let mut space = Self::empty();
        space.seed_namespace_zero();
        space
    }

    /// Creates an address space without any node.
    pub fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
            references: Vec::new(),
            next_id: FIRST_ASSIGNED_ID,
        }
    }

    fn seed_namespace_zero(&mut self) {
        use NodeClass::*;

        let reference_types = [
            (NodeId::REFERENCES, "References"),
            (NodeId::HIERARCHICAL_REFERENCES, "HierarchicalReferences"),
            (NodeId::ORGANIZES, "Organizes"),
            (NodeId::HAS_MODELLING_RULE, "HasModellingRule"),
            (NodeId::HAS_TYPE_DEFINITION, "HasTypeDefinition"),
            (NodeId::HAS_SUBTYPE, "HasSubtype"),
            (NodeId::HAS_PROPERTY, "HasProperty"),
            (NodeId::HAS_COMPONENT, "HasComponent"),
        ];
        for (id, name) in reference_types {
            self.seed(id, ReferenceType, name);
        }
        for subtype in &[
            NodeId::HIERARCHICAL_REFERENCES,
            NodeId::HAS_TYPE_DEFINITION,
            NodeId::HAS_MODELLING_RULE,
        ] {
            self.link(&NodeId::REFERENCES, &NodeId::HAS_SUBTYPE, subtype);
        }
        for subtype in &[
            NodeId::ORGANIZES,
            NodeId::HAS_SUBTYPE,
            NodeId::HAS_PROPERTY,
            NodeId::HAS_COMPONENT,
        ] {
            self.link(&NodeId::HIERARCHICAL_REFERENCES, &NodeId::HAS_SUBTYPE, subtype);
        }

        self.seed(NodeId::BASE_DATA_TYPE, DataType, "BaseDataType");
        self.seed(NodeId::BASE_OBJECT_TYPE, ObjectType, "BaseObjectType");
        self.seed(NodeId::FOLDER_TYPE, ObjectType, "FolderType");
        self.seed(NodeId::MODELLING_RULE_TYPE, ObjectType, "ModellingRuleType");
        self.seed(NodeId::BASE_DATA_VARIABLE_TYPE, VariableType, "BaseDataVariableType");
        self.seed(NodeId::PROPERTY_TYPE, VariableType, "PropertyType");
        self.link(&NodeId::BASE_OBJECT_TYPE, &NodeId::HAS_SUBTYPE, &NodeId::FOLDER_TYPE);
        self.link(&NodeId::BASE_OBJECT_TYPE, &NodeId::HAS_SUBTYPE, &NodeId::MODELLING_RULE_TYPE);

        let folders = [
            (NodeId::ROOT_FOLDER, "Root"),
            (NodeId::OBJECTS_FOLDER, "Objects"),
            (NodeId::TYPES_FOLDER, "Types"),
            (NodeId::VIEWS_FOLDER, "Views"),
        ];
        for (id, name) in folders {
            self.seed(id.clone(), Object, name);
            self.link(&id, &NodeId::HAS_TYPE_DEFINITION, &NodeId::FOLDER_TYPE);
            if id != NodeId::ROOT_FOLDER {
                self.link(&NodeId::ROOT_FOLDER, &NodeId::ORGANIZES, &id);
            }
        }

        for rule in ModellingRule::ALL {
            let id = rule.node_id();
            self.seed(id.clone(), Object, rule.name());
            self.link(&id, &NodeId::HAS_TYPE_DEFINITION, &NodeId::MODELLING_RULE_TYPE);
        }
    }

    fn seed(&mut self, id: NodeId, node_class: NodeClass, name: &str) {
        let browse_name = QualifiedName::new(id.namespace_index, name);
        self.nodes.insert(id.clone(), Node::new(id, node_class, browse_name));
    }

    fn link(&mut self, source: &NodeId, reference_type: &NodeId, target: &NodeId) {
        self.references.push(Reference::new(source, reference_type, target));
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of references.
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns a node.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns `true` if the forward reference exists.
    pub fn has_reference(&self, source: &NodeId, reference_type: &NodeId, target: &NodeId) -> bool {
        self.references
            .contains(&Reference::new(source, reference_type, target))
    }

    /// Returns the forward references leaving `source`.
    pub fn references_from<'a>(&'a self, source: &'a NodeId) -> impl Iterator<Item = &'a Reference> {
        self.references.iter().filter(move |r| &r.source == source)
    }

    /// Inserts a variable below `parent` without validation.
    ///
    /// Replaces any node already registered under `id`.
    pub fn insert_variable(&mut self, parent: &NodeId, id: &NodeId, name: &str, value: Variant) {
        let mut node = Node::new(
            id.clone(),
            NodeClass::Variable,
            QualifiedName::new(id.namespace_index, name),
        );
        node.value = Some(DataValue::new(value).with_server_timestamp(Utc::now()));
        self.nodes.insert(id.clone(), node);
        self.link(parent, &NodeId::HAS_COMPONENT, id);
        self.link(id, &NodeId::HAS_TYPE_DEFINITION, &NodeId::BASE_DATA_VARIABLE_TYPE);
    }

    fn is_reference_type(&self, id: &NodeId) -> bool {
        self.node(id)
            .is_some_and(|node| node.node_class == NodeClass::ReferenceType)
    }

    fn assign_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::numeric(SERVER_NAMESPACE, self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    // =========================================================================
    // Attribute services
    // =========================================================================

    /// Reads one attribute.
    pub fn read(&self, item: &ReadValueId) -> DataValue {
        let now = Utc::now();
        let Some(node) = self.node(&item.node_id) else {
            return DataValue::from_status(StatusCode::BAD_NODE_ID_UNKNOWN).with_server_timestamp(now);
        };
        match node.read(item.attribute_id) {
            Ok(value) => {
                let source_timestamp = match (item.attribute_id, &node.value) {
                    (AttributeId::Value, Some(current)) => current.source_timestamp,
                    _ => None,
                };
                DataValue {
                    value,
                    status: StatusCode::GOOD,
                    source_timestamp,
                    server_timestamp: Some(now),
                }
            }
            Err(status) => DataValue::from_status(status).with_server_timestamp(now),
        }
    }

    /// Writes one attribute. Only variable values are writable.
    pub fn write(&mut self, item: &WriteValue) -> StatusCode {
        let Some(node) = self.nodes.get_mut(&item.node_id) else {
            return StatusCode::BAD_NODE_ID_UNKNOWN;
        };
        if item.attribute_id != AttributeId::Value || node.node_class != NodeClass::Variable {
            return StatusCode::BAD_NOT_WRITABLE;
        }

        let current = node.value.get_or_insert_with(DataValue::default);
        let incoming = &item.value.value;
        if !current.value.is_empty()
            && !incoming.is_empty()
            && current.value.type_name() != incoming.type_name()
        {
            return StatusCode::BAD_TYPE_MISMATCH;
        }

        let now = Utc::now();
        current.value = incoming.clone();
        current.status = item.value.status;
        current.source_timestamp = item.value.source_timestamp.or(Some(now));
        current.server_timestamp = Some(now);
        StatusCode::GOOD
    }

    // =========================================================================
    // NodeManagement services
    // =========================================================================

    /// Adds one node together with its parent reference and type definition.
    pub fn add_node(&mut self, item: &AddNodesItem) -> AddNodesResult {
        match self.validate_new_node(item) {
            Ok(id) => {
                let mut node = Node::new(id.clone(), item.node_class, item.browse_name.clone());
                let attributes = &item.attributes;
                if !attributes.display_name.text.is_empty() {
                    node.display_name = attributes.display_name.clone();
                }
                node.description = attributes.description.clone();
                if let Some(value) = &attributes.value {
                    node.value = Some(DataValue::new(value.clone()).with_server_timestamp(Utc::now()));
                }
                if attributes.data_type.is_some() {
                    node.data_type = attributes.data_type.clone();
                }
                if attributes.value_rank.is_some() {
                    node.value_rank = attributes.value_rank;
                }
                if attributes.event_notifier.is_some() {
                    node.event_notifier = attributes.event_notifier;
                }

                self.nodes.insert(id.clone(), node);
                self.link(&item.parent_node_id, &item.reference_type_id, &id);
                if !item.type_definition.is_null() {
                    self.link(&id, &NodeId::HAS_TYPE_DEFINITION, &item.type_definition);
                }
                trace!(node_id = %id, "node added");
                AddNodesResult {
                    status_code: StatusCode::GOOD,
                    added_node_id: id,
                }
            }
            Err(status_code) => AddNodesResult {
                status_code,
                added_node_id: NodeId::null(),
            },
        }
    }

    /// Checks an add request and returns the id the node will get.
    fn validate_new_node(&mut self, item: &AddNodesItem) -> Result<NodeId, StatusCode> {
        if !self.contains(&item.parent_node_id) {
            return Err(StatusCode::BAD_PARENT_NODE_ID_INVALID);
        }
        if !self.is_reference_type(&item.reference_type_id) {
            return Err(StatusCode::BAD_REFERENCE_TYPE_ID_INVALID);
        }
        self.check_parent_reference(item)?;
        if !item.requested_new_node_id.is_null() && self.contains(&item.requested_new_node_id) {
            return Err(StatusCode::BAD_NODE_ID_EXISTS);
        }
        if item.browse_name.is_null() {
            return Err(StatusCode::BAD_BROWSE_NAME_INVALID);
        }

        let expected_type_class = match item.node_class {
            NodeClass::Object => Some(NodeClass::ObjectType),
            NodeClass::Variable | NodeClass::VariableType => Some(NodeClass::VariableType),
            _ => None,
        };
        match expected_type_class {
            Some(class) => {
                let type_class = self.node(&item.type_definition).map(|node| node.node_class);
                if type_class != Some(class) {
                    return Err(StatusCode::BAD_TYPE_DEFINITION_INVALID);
                }
            }
            None if !item.type_definition.is_null() => {
                return Err(StatusCode::BAD_TYPE_DEFINITION_INVALID);
            }
            None => {}
        }

        let attributes = &item.attributes;
        let has_variable_attributes = attributes.value.is_some()
            || attributes.data_type.is_some()
            || attributes.value_rank.is_some();
        if (has_variable_attributes && !item.node_class.has_value())
            || (attributes.event_notifier.is_some() && !item.node_class.has_event_notifier())
        {
            return Err(StatusCode::BAD_NODE_ATTRIBUTES_INVALID);
        }

        if item.requested_new_node_id.is_null() {
            Ok(self.assign_id())
        } else {
            Ok(item.requested_new_node_id.clone())
        }
    }

    /// Type nodes hang below a supertype of their own class through
    /// `HasSubtype`; `HasSubtype` links nothing else.
    fn check_parent_reference(&self, item: &AddNodesItem) -> Result<(), StatusCode> {
        let is_subtype = item.reference_type_id == NodeId::HAS_SUBTYPE;
        if !item.node_class.is_type() {
            return if is_subtype {
                Err(StatusCode::BAD_REFERENCE_NOT_ALLOWED)
            } else {
                Ok(())
            };
        }

        let parent_class = self.node(&item.parent_node_id).map(|node| node.node_class);
        if parent_class != Some(item.node_class) {
            return Err(StatusCode::BAD_PARENT_NODE_ID_INVALID);
        }
        if !is_subtype {
            return Err(StatusCode::BAD_REFERENCE_NOT_ALLOWED);
        }
        Ok(())
    }

    /// Adds one reference.
    pub fn add_reference(&mut self, item: &AddReferencesItem) -> StatusCode {
        if !self.contains(&item.source_node_id) {
            return StatusCode::BAD_SOURCE_NODE_ID_INVALID;
        }
        if !self.is_reference_type(&item.reference_type_id) {
            return StatusCode::BAD_REFERENCE_TYPE_ID_INVALID;
        }
        let Some(target) = self.node(&item.target_node_id) else {
            return StatusCode::BAD_TARGET_NODE_ID_INVALID;
        };
        if item
            .target_node_class
            .is_some_and(|class| class != target.node_class)
        {
            return StatusCode::BAD_NODE_CLASS_INVALID;
        }

        let reference = Reference::oriented(
            &item.source_node_id,
            &item.reference_type_id,
            &item.target_node_id,
            item.is_forward,
        );
        if self.references.contains(&reference) {
            return StatusCode::BAD_DUPLICATE_REFERENCE_NOT_ALLOWED;
        }
        self.references.push(reference);
        StatusCode::GOOD
    }

    /// Deletes one node and the references leaving it.
    ///
    /// References pointing at the node are removed only when
    /// `delete_target_references` is set; otherwise they are kept and the
    /// result is `UncertainReferenceNotDeleted`.
    pub fn delete_node(&mut self, item: &DeleteNodesItem) -> StatusCode {
        let id = &item.node_id;
        if self.nodes.remove(id).is_none() {
            return StatusCode::BAD_NODE_ID_UNKNOWN;
        }

        self.references.retain(|r| &r.source != id);
        if item.delete_target_references {
            self.references.retain(|r| &r.target != id);
            StatusCode::GOOD
        } else if self.references.iter().any(|r| &r.target == id) {
            StatusCode::UNCERTAIN_REFERENCE_NOT_DELETED
        } else {
            StatusCode::GOOD
        }
    }

    /// Deletes one reference.
    pub fn delete_reference(&mut self, item: &DeleteReferencesItem) -> StatusCode {
        let reference = Reference::oriented(
            &item.source_node_id,
            &item.reference_type_id,
            &item.target_node_id,
            item.is_forward,
        );
        let before = self.references.len();
        self.references.retain(|r| r != &reference);
        if self.references.len() == before {
            StatusCode::BAD_NOT_FOUND
        } else {
            StatusCode::GOOD
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
