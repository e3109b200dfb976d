//! Headless document used as the render substrate.
//!
//! Elements live in an arena addressed by [`NodeId`]. Templates are element
//! trees registered by name and cloned into the arena on import, mirroring a
//! browser's `<template>` + `importNode` flow closely enough for the board's
//! components to run and be tested without a browser.

use crate::error::{BoardError, Result};
use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Write as _},
    rc::Rc,
};

/// Document shared between the board's components
pub type SharedDocument = Rc<RefCell<Document>>;

/// Handle to an element slot. The generation tells a live element apart from
/// a freed one whose slot has since been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}.{}", self.index, self.generation)
    }
}

/// Where to insert an element relative to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    AfterBegin,
    BeforeEnd,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    /// Current value of form controls
    pub value: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Detached element tree used as template content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    /// Indices of freed slots, reused before the arena grows
    free: Vec<usize>,
    body: NodeId,
    templates: HashMap<String, Fragment>,
    alerts: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only a body
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            ..Element::default()
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                element: Some(body),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
            templates: HashMap::new(),
            alerts: Vec::new(),
        }
    }

    /// Creates a document with an `app` host and the board's templates
    pub fn with_board_templates() -> Self {
        let mut doc = Self::new();
        let app = doc.create_element("div");
        doc.insert_id(app, "app");
        doc.adopt(doc.body, app, InsertPosition::BeforeEnd);

        let field = |label: &str, control: &str, id: &str| {
            Fragment::new("div")
                .class("form-control")
                .child(Fragment::new("label").text(label))
                .child(Fragment::new(control).id(id))
        };
        doc.register_template(
            "project-input",
            Fragment::new("form")
                .child(field("Title", "input", "title"))
                .child(field("Description", "textarea", "description"))
                .child(field("People", "input", "people"))
                .child(Fragment::new("button")),
        );
        doc.register_template(
            "single-project",
            Fragment::new("li")
                .child(Fragment::new("h2"))
                .child(Fragment::new("h3"))
                .child(Fragment::new("p")),
        );
        doc.register_template(
            "project-list",
            Fragment::new("section")
                .class("projects")
                .child(Fragment::new("header").child(Fragment::new("h2")))
                .child(Fragment::new("ul")),
        );
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn register_template(&mut self, template_id: impl Into<String>, content: Fragment) {
        self.templates.insert(template_id.into(), content);
    }

    /// Clones a template's content into the document, detached
    pub fn import_template(&mut self, template_id: &str) -> Result<NodeId> {
        let content = self
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| BoardError::TemplateNotFound(template_id.to_string()))?;
        Ok(self.instantiate(&content))
    }

    /// Creates a detached element, reusing a freed slot when one is available
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let element = Element {
            tag: tag.to_string(),
            ..Element::default()
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = Some(element);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Inserts `node` into `host`, detaching it from any previous parent.
    ///
    /// Fails with [`BoardError::InvalidInsert`] when `host` is `node` itself or
    /// one of its descendants.
    pub fn insert(&mut self, host: NodeId, position: InsertPosition, node: NodeId) -> Result<()> {
        self.element(node)?;
        let mut cursor = Some(host);
        while let Some(current) = cursor {
            if current == node {
                return Err(BoardError::InvalidInsert(format!(
                    "{} cannot be inserted into itself or its own subtree",
                    node
                )));
            }
            cursor = self.element(current)?.parent;
        }

        if let Some(old_parent) = self.element(node)?.parent {
            if let Ok(parent) = self.element_mut(old_parent) {
                parent.children.retain(|child| *child != node);
            }
        }
        self.adopt(host, node, position);
        Ok(())
    }

    pub fn element(&self, node: NodeId) -> Result<&Element> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
            .ok_or_else(|| BoardError::ElementNotFound(node.to_string()))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
            .ok_or_else(|| BoardError::ElementNotFound(node.to_string()))
    }

    /// Number of element slots allocated, live or free
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of live elements, attached or detached
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Finds an element attached to the body by id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_descendant(self.body, &|el| el.id.as_deref() == Some(id))
    }

    /// Like [`get_element_by_id`](Self::get_element_by_id) but fails when missing
    pub fn require_element_by_id(&self, id: &str) -> Result<NodeId> {
        self.get_element_by_id(id)
            .ok_or_else(|| BoardError::ElementNotFound(format!("#{}", id)))
    }

    /// First descendant of `root` matching `#id` or a tag name
    pub fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        match selector.strip_prefix('#') {
            Some(id) => self.find_descendant(root, &|el| el.id.as_deref() == Some(id)),
            None => self.find_descendant(root, &|el| el.tag == selector),
        }
    }

    pub fn require_selector(&self, root: NodeId, selector: &str) -> Result<NodeId> {
        self.query_selector(root, selector)
            .ok_or_else(|| BoardError::ElementNotFound(selector.to_string()))
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> Result<()> {
        self.element_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<()> {
        self.element_mut(node)?.text = text.into();
        Ok(())
    }

    pub fn text(&self, node: NodeId) -> Result<&str> {
        Ok(self.element(node)?.text.as_str())
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) -> Result<()> {
        self.element_mut(node)?.value = value.into();
        Ok(())
    }

    pub fn value(&self, node: NodeId) -> Result<&str> {
        Ok(self.element(node)?.value.as_str())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> Result<bool> {
        Ok(self.element(node)?.has_class(class))
    }

    pub fn children(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(self.element(node)?.children())
    }

    /// Removes and frees every descendant of `node`
    pub fn clear_children(&mut self, node: NodeId) -> Result<()> {
        let mut stack = std::mem::take(&mut self.element_mut(node)?.children);
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.free_slot(child) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    fn free_slot(&mut self, node: NodeId) -> Option<Element> {
        let slot = self
            .slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)?;
        let removed = slot.element.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(node.index);
        Some(removed)
    }

    /// Records a blocking alert shown to the user
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Renders `node` and its subtree as indented HTML-like text
    pub fn render_html(&self, node: NodeId) -> Result<String> {
        let mut out = String::new();
        self.render_into(node, 0, &mut out)?;
        Ok(out)
    }

    fn render_into(&self, node: NodeId, depth: usize, out: &mut String) -> Result<()> {
        let element = self.element(node)?;
        let indent = "  ".repeat(depth);

        let _ = write!(out, "{}<{}", indent, element.tag);
        if let Some(id) = &element.id {
            let _ = write!(out, " id=\"{}\"", id);
        }
        if !element.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", element.classes.join(" "));
        }
        if !element.value.is_empty() {
            let _ = write!(out, " value=\"{}\"", element.value);
        }
        out.push('>');

        if element.children.is_empty() {
            let _ = writeln!(out, "{}</{}>", element.text, element.tag);
            return Ok(());
        }

        out.push('\n');
        if !element.text.is_empty() {
            let _ = writeln!(out, "{}  {}", indent, element.text);
        }
        for child in &element.children {
            self.render_into(*child, depth + 1, out)?;
        }
        let _ = writeln!(out, "{}</{}>", indent, element.tag);
        Ok(())
    }

    fn instantiate(&mut self, fragment: &Fragment) -> NodeId {
        let node = self.create_element(&fragment.tag);
        if let Ok(el) = self.element_mut(node) {
            el.id = fragment.id.clone();
            el.classes = fragment.classes.clone();
            el.text = fragment.text.clone();
        }
        for child in &fragment.children {
            let child_node = self.instantiate(child);
            self.adopt(node, child_node, InsertPosition::BeforeEnd);
        }
        node
    }

    fn insert_id(&mut self, node: NodeId, id: &str) {
        if let Ok(el) = self.element_mut(node) {
            el.id = Some(id.to_string());
        }
    }

    fn adopt(&mut self, host: NodeId, node: NodeId, position: InsertPosition) {
        if let Ok(el) = self.element_mut(node) {
            el.parent = Some(host);
        }
        if let Ok(host) = self.element_mut(host) {
            match position {
                InsertPosition::AfterBegin => host.children.insert(0, node),
                InsertPosition::BeforeEnd => host.children.push(node),
            }
        }
    }

    fn find_descendant(&self, root: NodeId, matches: &dyn Fn(&Element) -> bool) -> Option<NodeId> {
        let root = self.element(root).ok()?;
        for child in &root.children {
            if let Ok(element) = self.element(*child) {
                if matches(element) {
                    return Some(*child);
                }
            }
            if let Some(found) = self.find_descendant(*child, matches) {
                return Some(found);
            }
        }
        None
    }
}
