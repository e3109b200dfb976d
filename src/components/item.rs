use crate::{
    components::{attach, Component},
    dom::{InsertPosition, NodeId, SharedDocument},
    domain::Project,
    drag::{DragEvent, Draggable, DropEffect, TEXT_PLAIN},
    error::Result,
};
use log::{debug, trace};

/// Class marking an element the user can pick up
pub const DRAGGABLE: &str = "draggable";

/// A single project rendered as a draggable list entry
#[derive(Debug, Clone)]
pub struct ProjectItem {
    doc: SharedDocument,
    element: NodeId,
    project: Project,
}

impl ProjectItem {
    /// Renders `project` at the end of the element with id `host_id`
    pub fn new(doc: SharedDocument, host_id: &str, project: Project) -> Result<Self> {
        let element = attach(
            &mut doc.borrow_mut(),
            "single-project",
            host_id,
            InsertPosition::BeforeEnd,
            Some(project.id().as_str()),
        )?;

        let mut item = Self {
            doc,
            element,
            project,
        };
        item.configure()?;
        item.render_content()?;
        Ok(item)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn element(&self) -> NodeId {
        self.element
    }
}

impl Component for ProjectItem {
    fn configure(&mut self) -> Result<()> {
        self.doc.borrow_mut().add_class(self.element, DRAGGABLE)?;
        trace!("item {} ready for dragging", self.project.id());
        Ok(())
    }

    fn render_content(&mut self) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        let title = doc.require_selector(self.element, "h2")?;
        let people = doc.require_selector(self.element, "h3")?;
        let description = doc.require_selector(self.element, "p")?;

        doc.set_text(title, self.project.title())?;
        doc.set_text(people, format!("{} assigned", self.project.persons_label()))?;
        doc.set_text(description, self.project.description())?;
        Ok(())
    }
}

impl Draggable for ProjectItem {
    fn drag_start(&self, event: &mut DragEvent) -> Result<()> {
        if let Some(transfer) = event.data_transfer_mut() {
            transfer.set_data(TEXT_PLAIN, self.project.id().as_str());
            transfer.set_effect_allowed(DropEffect::Move);
        }
        Ok(())
    }

    fn drag_end(&self, _event: &DragEvent) -> Result<()> {
        debug!("drag end for project {}", self.project.id());
        Ok(())
    }
}
