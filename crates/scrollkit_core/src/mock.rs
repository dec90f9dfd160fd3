//! In-memory host document
//!
//! [`MockDom`] implements [`Dom`] over a slotmap-backed element tree. It is
//! the test double for the whole workspace and doubles as a headless
//! embedding target: a UI layer keeps the node metrics in sync with its real
//! layout and scrollkit does the rest.
//!
//! Nodes carry their layout rect at zero scroll; bounding rects shift
//! upward by the accumulated `scroll_top` of ancestors, which is what a live
//! DOM reports. `set_scroll_top` clamps to the scrollable range and
//! dispatches a [`ScrollEvent`] to listeners registered on the element.

use std::sync::{Arc, Mutex};

use slotmap::SlotMap;

use crate::dom::{
    ComputedStyle, Display, Dom, ElementId, ListenerId, ScrollEvent, ScrollListener,
};
use crate::error::HostError;
use crate::geometry::Rect;

/// Initial metrics for a node inserted into a [`MockDom`]
///
/// `new` derives the size-like metrics from the layout rect; override the
/// ones a scenario cares about.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    rect: Rect,
    offset_left: f32,
    offset_top: f32,
    scroll_height: f32,
    client_width: f32,
    client_height: f32,
    offset_width: f32,
    offset_height: f32,
    style: ComputedStyle,
}

impl NodeConfig {
    /// Config for a node laid out at `rect` (viewport coordinates at zero
    /// scroll), with content exactly filling it and no scrollbars
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            offset_left: 0.0,
            offset_top: 0.0,
            scroll_height: rect.height,
            client_width: rect.width,
            client_height: rect.height,
            offset_width: rect.width,
            offset_height: rect.height,
            style: ComputedStyle::default(),
        }
    }

    /// Offset relative to the offset parent
    pub fn offset(mut self, left: f32, top: f32) -> Self {
        self.offset_left = left;
        self.offset_top = top;
        self
    }

    pub fn scroll_height(mut self, height: f32) -> Self {
        self.scroll_height = height;
        self
    }

    pub fn client_width(mut self, width: f32) -> Self {
        self.client_width = width;
        self
    }

    pub fn client_height(mut self, height: f32) -> Self {
        self.client_height = height;
        self
    }

    pub fn offset_width(mut self, width: f32) -> Self {
        self.offset_width = width;
        self
    }

    pub fn offset_height(mut self, height: f32) -> Self {
        self.offset_height = height;
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.style.display = display;
        self
    }

    pub fn margin_bottom(mut self, margin: f32) -> Self {
        self.style.margin_bottom = margin;
        self
    }
}

struct Node {
    parent: Option<ElementId>,
    offset_parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Layout rect at zero scroll, viewport coordinates
    layout: Rect,
    offset_left: f32,
    offset_top: f32,
    scroll_top: f32,
    scroll_height: f32,
    client_width: f32,
    client_height: f32,
    offset_width: f32,
    offset_height: f32,
    style: ComputedStyle,
}

impl Node {
    fn from_config(config: NodeConfig, parent: Option<ElementId>) -> Self {
        Self {
            parent,
            offset_parent: parent,
            children: Vec::new(),
            layout: config.rect,
            offset_left: config.offset_left,
            offset_top: config.offset_top,
            scroll_top: 0.0,
            scroll_height: config.scroll_height,
            client_width: config.client_width,
            client_height: config.client_height,
            offset_width: config.offset_width,
            offset_height: config.offset_height,
            style: config.style,
        }
    }

    fn max_scroll(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

struct ListenerEntry {
    target: ElementId,
    callback: ScrollListener,
}

struct MockInner {
    nodes: SlotMap<ElementId, Node>,
    listeners: SlotMap<ListenerId, ListenerEntry>,
    root: Option<ElementId>,
    body: Option<ElementId>,
    /// Native scrollbar thickness simulated for probe elements
    scrollbar_width: f32,
    probe_insertions: u32,
}

/// In-memory [`Dom`] implementation
pub struct MockDom {
    inner: Mutex<MockInner>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Create a document with a root element and a body, both at zero rects
    pub fn new() -> Self {
        Self::with_scrollbar(15.0)
    }

    /// Create a document whose probe elements report the given native
    /// scrollbar thickness
    pub fn with_scrollbar(scrollbar_width: f32) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::from_config(NodeConfig::new(Rect::ZERO), None));
        let body = nodes.insert(Node::from_config(NodeConfig::new(Rect::ZERO), Some(root)));
        nodes[body].offset_parent = None;
        nodes[root].children.push(body);

        Self {
            inner: Mutex::new(MockInner {
                nodes,
                listeners: SlotMap::with_key(),
                root: Some(root),
                body: Some(body),
                scrollbar_width,
                probe_insertions: 0,
            }),
        }
    }

    /// Create an environment with no renderable document
    ///
    /// Document accessors and probe insertion fail with
    /// [`HostError::DocumentUnavailable`].
    pub fn detached() -> Self {
        Self {
            inner: Mutex::new(MockInner {
                nodes: SlotMap::with_key(),
                listeners: SlotMap::with_key(),
                root: None,
                body: None,
                scrollbar_width: 15.0,
                probe_insertions: 0,
            }),
        }
    }

    /// Insert an element under `parent`
    pub fn insert(&self, parent: ElementId, config: NodeConfig) -> ElementId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.nodes.insert(Node::from_config(config, Some(parent)));
        if let Some(node) = inner.nodes.get_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Number of probe elements inserted so far (for cache assertions)
    pub fn probe_insertions(&self) -> u32 {
        self.inner.lock().unwrap().probe_insertions
    }

    // =========================================================================
    // Metric mutation (simulating reflow between queries)
    // =========================================================================

    pub fn set_layout_rect(&self, el: ElementId, rect: Rect) {
        if let Some(node) = self.inner.lock().unwrap().nodes.get_mut(el) {
            node.layout = rect;
        }
    }

    pub fn set_scroll_height(&self, el: ElementId, height: f32) {
        if let Some(node) = self.inner.lock().unwrap().nodes.get_mut(el) {
            node.scroll_height = height;
        }
    }

    pub fn set_client_width(&self, el: ElementId, width: f32) {
        if let Some(node) = self.inner.lock().unwrap().nodes.get_mut(el) {
            node.client_width = width;
        }
    }

    pub fn set_client_height(&self, el: ElementId, height: f32) {
        if let Some(node) = self.inner.lock().unwrap().nodes.get_mut(el) {
            node.client_height = height;
        }
    }
}

impl Dom for MockDom {
    fn bounding_rect(&self, el: ElementId) -> Rect {
        let inner = self.inner.lock().unwrap();
        let Some(node) = inner.nodes.get(el) else {
            return Rect::ZERO;
        };
        // A live DOM reports rects shifted up by however far ancestors have
        // scrolled; reproduce that from the zero-scroll layout rect.
        let mut scrolled = 0.0;
        let mut cursor = node.parent;
        while let Some(id) = cursor {
            let Some(ancestor) = inner.nodes.get(id) else {
                break;
            };
            scrolled += ancestor.scroll_top;
            cursor = ancestor.parent;
        }
        node.layout.offset(0.0, -scrolled)
    }

    fn offset_left(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.offset_left)
    }

    fn offset_top(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.offset_top)
    }

    fn offset_parent(&self, el: ElementId) -> Option<ElementId> {
        self.inner.lock().unwrap().nodes.get(el)?.offset_parent
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.inner.lock().unwrap().nodes.get(el)?.parent
    }

    fn last_child(&self, el: ElementId) -> Option<ElementId> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)?
            .children
            .last()
            .copied()
    }

    fn scroll_top(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.scroll_top)
    }

    fn set_scroll_top(&self, el: ElementId, value: f32) {
        // Collect listeners under the lock, invoke after releasing it so
        // listeners can re-enter the document.
        let dispatch: Vec<ScrollListener>;
        let event;
        {
            let mut inner = self.inner.lock().unwrap();
            let Some(node) = inner.nodes.get_mut(el) else {
                return;
            };
            let clamped = value.clamp(0.0, node.max_scroll());
            if node.scroll_top == clamped {
                return;
            }
            node.scroll_top = clamped;
            event = ScrollEvent {
                target: el,
                scroll_top: clamped,
            };
            dispatch = inner
                .listeners
                .values()
                .filter(|entry| entry.target == el)
                .map(|entry| Arc::clone(&entry.callback))
                .collect();
        }
        for listener in dispatch {
            listener(&event);
        }
    }

    fn scroll_height(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.scroll_height)
    }

    fn client_width(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.client_width)
    }

    fn client_height(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.client_height)
    }

    fn offset_width(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.offset_width)
    }

    fn offset_height(&self, el: ElementId) -> f32 {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or(0.0, |n| n.offset_height)
    }

    fn computed_style(&self, el: ElementId) -> ComputedStyle {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(el)
            .map_or_else(ComputedStyle::default, |n| n.style)
    }

    fn body(&self) -> Result<ElementId, HostError> {
        self.inner
            .lock()
            .unwrap()
            .body
            .ok_or(HostError::DocumentUnavailable)
    }

    fn root_element(&self) -> Result<ElementId, HostError> {
        self.inner
            .lock()
            .unwrap()
            .root
            .ok_or(HostError::DocumentUnavailable)
    }

    fn insert_probe(&self, size: f32) -> Result<ElementId, HostError> {
        let mut inner = self.inner.lock().unwrap();
        let body = inner.body.ok_or(HostError::DocumentUnavailable)?;
        let bar = inner.scrollbar_width;
        let config = NodeConfig::new(Rect::new(0.0, 0.0, size, size))
            .client_width(size - bar)
            .client_height(size - bar);
        let probe = inner.nodes.insert(Node::from_config(config, Some(body)));
        if let Some(node) = inner.nodes.get_mut(body) {
            node.children.push(probe);
        }
        inner.probe_insertions += 1;
        tracing::trace!(?probe, size, "inserted scrollbar probe");
        Ok(probe)
    }

    fn remove_probe(&self, el: ElementId) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(parent) = inner.nodes.get(el).and_then(|n| n.parent) {
            if let Some(node) = inner.nodes.get_mut(parent) {
                node.children.retain(|&c| c != el);
            }
        }
        inner.nodes.remove(el);
    }

    fn add_scroll_listener(&self, el: ElementId, listener: ScrollListener) -> ListenerId {
        self.inner.lock().unwrap().listeners.insert(ListenerEntry {
            target: el,
            callback: listener,
        })
    }

    fn remove_scroll_listener(&self, _el: ElementId, id: ListenerId) {
        self.inner.lock().unwrap().listeners.remove(id);
    }
}
