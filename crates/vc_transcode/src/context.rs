use core::any::Any;
use core::mem;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_object::{Class, NodeId, ObjectRef, Value, WeakNode};

use crate::error::TranscodeError;
use crate::graph::ExposeGraph;
use crate::link::ObjectLinkCodec;
use crate::options::ResolvedOptions;
use crate::pipeline::Pipeline;
use crate::registry::{PropertyDescriptor, Registry, TypeDescriptor, TypeHint};

// -----------------------------------------------------------------------------
// Direction

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Typed graph to plain data.
    Serialize,
    /// Plain data to typed graph.
    Deserialize,
}

// -----------------------------------------------------------------------------
// Frame

/// Per-node traversal state.
pub(crate) struct Frame<'a> {
    pub(crate) parent: Option<WeakNode>,
    pub(crate) property_key: Option<String>,
    /// Dot separated, e.g. `books.0.name`.
    pub(crate) path: String,
    pub(crate) depth: usize,
    pub(crate) type_hint: TypeHint,
    pub(crate) class: Option<&'static Class>,
    pub(crate) type_desc: Option<&'a TypeDescriptor>,
    /// Descriptor of the object owning the current property.
    pub(crate) owner_desc: Option<&'a TypeDescriptor>,
    pub(crate) prop_desc: Option<Arc<PropertyDescriptor>>,
    /// Type level default visibility inherited from the owner.
    pub(crate) default_visibility: Option<bool>,
    pub(crate) groups: Vec<String>,
    pub(crate) graph: Option<ExposeGraph>,
    pub(crate) force_expose: bool,
    /// Nodes on the path from the root, current node excluded.
    pub(crate) circular: Vec<NodeId>,
    pub(crate) stopped: bool,
}

impl<'a> Frame<'a> {
    fn root(options: &ResolvedOptions) -> Self {
        Self {
            parent: None,
            property_key: None,
            path: String::new(),
            depth: 0,
            type_hint: options.root_hint,
            class: None,
            type_desc: None,
            owner_desc: None,
            prop_desc: None,
            default_visibility: None,
            groups: options.groups.clone(),
            graph: options.expose_graph.clone(),
            force_expose: options.force_expose,
            circular: Vec::new(),
            stopped: false,
        }
    }

    fn push_path(&mut self, segment: &str) {
        if !self.path.is_empty() {
            self.path.push('.');
        }
        self.path.push_str(segment);
    }
}

impl Clone for Frame<'_> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            property_key: self.property_key.clone(),
            path: self.path.clone(),
            depth: self.depth,
            type_hint: self.type_hint,
            class: self.class,
            type_desc: self.type_desc,
            owner_desc: self.owner_desc,
            prop_desc: self.prop_desc.clone(),
            default_visibility: self.default_visibility,
            groups: self.groups.clone(),
            graph: self.graph.clone(),
            force_expose: self.force_expose,
            circular: self.circular.clone(),
            stopped: self.stopped,
        }
    }

    /// Reuses the buffers of `self`.
    fn clone_from(&mut self, source: &Self) {
        self.parent.clone_from(&source.parent);
        self.property_key.clone_from(&source.property_key);
        self.path.clone_from(&source.path);
        self.depth = source.depth;
        self.type_hint = source.type_hint;
        self.class = source.class;
        self.type_desc = source.type_desc;
        self.owner_desc = source.owner_desc;
        self.prop_desc.clone_from(&source.prop_desc);
        self.default_visibility = source.default_visibility;
        self.groups.clone_from(&source.groups);
        self.graph.clone_from(&source.graph);
        self.force_expose = source.force_expose;
        self.circular.clone_from(&source.circular);
        self.stopped = source.stopped;
    }
}

// -----------------------------------------------------------------------------
// Context

/// Mutable state of one traversal.
///
/// The context describes the node currently being transcoded. Stages
/// descend into children with [`fork`](Context::fork): the state is saved,
/// the body adjusts it for the child and recurses through
/// [`transcode`](Context::transcode), and the saved state is restored
/// afterwards. Saved frames live in a pool that grows with the nesting
/// depth and is reused by siblings.
pub struct Context<'a> {
    registry: &'a Registry,
    pipeline: &'a Pipeline,
    options: &'a ResolvedOptions,
    direction: Direction,
    frame: Frame<'a>,
    backups: Vec<Frame<'a>>,
    forks: usize,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        pipeline: &'a Pipeline,
        options: &'a ResolvedOptions,
        direction: Direction,
    ) -> Self {
        Self {
            registry,
            pipeline,
            options,
            direction,
            frame: Frame::root(options),
            backups: Vec::new(),
            forks: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Traversal

    /// Runs `body` on a scratch copy of the current state and restores the
    /// state afterwards, whatever `body` changed.
    pub fn fork<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        if self.forks == self.backups.len() {
            log::trace!("traversal frame pool grows to {}", self.forks + 1);
            self.backups.push(self.frame.clone());
        } else {
            self.backups[self.forks].clone_from(&self.frame);
        }
        self.forks += 1;

        let result = body(self);

        self.forks -= 1;
        mem::swap(&mut self.frame, &mut self.backups[self.forks]);
        result
    }

    /// Runs the pipeline on `value` in the current state.
    #[inline]
    pub fn transcode(&mut self, value: Value) -> Result<Value, TranscodeError> {
        let pipeline = self.pipeline;
        pipeline.run(value, self)
    }

    /// Ends the pipeline for the current node after the running stage.
    #[inline]
    pub fn stop(&mut self) {
        self.frame.stopped = true;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.frame.stopped
    }

    #[inline]
    pub(crate) fn resume(&mut self) {
        self.frame.stopped = false;
    }

    /// Prepares the state for the property `key` of `owner`.
    pub fn enter_property(
        &mut self,
        owner: &ObjectRef,
        key: &str,
        descriptor: Arc<PropertyDescriptor>,
    ) {
        let frame = &mut self.frame;
        frame.parent = Some(owner.downgrade());
        let property_key = frame.property_key.get_or_insert_with(String::new);
        property_key.clear();
        property_key.push_str(key);
        frame.push_path(key);
        frame.depth += 1;
        frame.circular.push(owner.id());
        frame.type_hint = descriptor.type_hint;
        frame.owner_desc = frame.type_desc;
        if let Some(visibility) = frame
            .type_desc
            .and_then(|desc| desc.modifiers().default_visibility)
        {
            frame.default_visibility = Some(visibility);
        }
        frame.class = None;
        frame.type_desc = None;
        frame.prop_desc = Some(descriptor);
        frame.graph = frame.graph.as_ref().map(|graph| graph.child(key));
    }

    /// Prepares the state for an item of a list or map.
    ///
    /// Depth, graph and property descriptor stay those of the container.
    pub fn enter_item(&mut self, container: &Value, segment: &str, hint: TypeHint) {
        let frame = &mut self.frame;
        frame.parent = match container {
            Value::Object(o) => Some(o.downgrade()),
            Value::List(l) => Some(l.downgrade()),
            _ => None,
        };
        frame.property_key = None;
        frame.push_path(segment);
        if let Some(id) = container.node_id() {
            frame.circular.push(id);
        }
        frame.type_hint = hint;
        frame.class = None;
        frame.type_desc = None;
    }

    // -------------------------------------------------------------------------
    // Current node

    #[inline]
    pub fn set_type_hint(&mut self, hint: TypeHint) {
        self.frame.type_hint = hint;
    }

    /// Sets the resolved class and looks up its descriptor.
    pub fn set_class(&mut self, class: Option<&'static Class>) {
        self.frame.class = class;
        self.frame.type_desc = class.and_then(|class| self.registry.type_descriptor(class));
    }

    /// Activates groups for the current branch.
    pub fn add_groups<'g>(&mut self, groups: impl IntoIterator<Item = &'g String>) {
        for group in groups {
            if !self.frame.groups.contains(group) {
                self.frame.groups.push(group.clone());
            }
        }
    }

    /// Exposes the current branch regardless of rules.
    #[inline]
    pub fn set_force_expose(&mut self) {
        self.frame.force_expose = true;
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    pub fn options(&self) -> &'a ResolvedOptions {
        self.options
    }

    #[inline]
    pub fn links(&self) -> ObjectLinkCodec<'a> {
        ObjectLinkCodec::new(self.registry)
    }

    /// Caller payload of the current call, if it is a `T`.
    #[inline]
    pub fn ctx_data<T: Any>(&self) -> Option<&T> {
        self.options.ctx_data.as_deref()?.downcast_ref()
    }

    /// Object or list holding the current node, if still alive.
    #[inline]
    pub fn parent(&self) -> Option<Value> {
        self.frame.parent.as_ref().and_then(WeakNode::upgrade)
    }

    #[inline]
    pub fn property_key(&self) -> Option<&str> {
        self.frame.property_key.as_deref()
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.frame.path
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.frame.groups
    }

    #[inline]
    pub fn type_hint(&self) -> TypeHint {
        self.frame.type_hint
    }

    #[inline]
    pub fn class(&self) -> Option<&'static Class> {
        self.frame.class
    }

    #[inline]
    pub fn type_descriptor(&self) -> Option<&'a TypeDescriptor> {
        self.frame.type_desc
    }

    #[inline]
    pub fn owner_descriptor(&self) -> Option<&'a TypeDescriptor> {
        self.frame.owner_desc
    }

    #[inline]
    pub fn property_descriptor(&self) -> Option<Arc<PropertyDescriptor>> {
        self.frame.prop_desc.clone()
    }

    #[inline]
    pub fn graph(&self) -> Option<&ExposeGraph> {
        self.frame.graph.as_ref()
    }

    #[inline]
    pub fn is_force_expose(&self) -> bool {
        self.frame.force_expose
    }

    /// Default visibility declared by the owning type, if any.
    #[inline]
    pub fn type_default_visibility(&self) -> Option<bool> {
        self.frame.default_visibility
    }

    /// Returns `true` if the node is an ancestor of the current node.
    #[inline]
    pub fn is_circular(&self, id: NodeId) -> bool {
        self.frame.circular.contains(&id)
    }
}

// -----------------------------------------------------------------------------
// Tests
