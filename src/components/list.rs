use crate::{
    components::{attach, Component, ProjectItem},
    dom::{InsertPosition, NodeId, SharedDocument},
    domain::{Column, Project, ProjectId, ProjectStatus},
    drag::{DragEvent, DragTarget, TEXT_PLAIN},
    error::Result,
    store::ProjectStore,
};
use log::{debug, trace};
use std::{cell::RefCell, rc::Rc};

const DROPPABLE: &str = "droppable";

/// A status column listing every project with that status.
///
/// The column subscribes to the store on construction and rebuilds all of
/// its items on every notification.
pub struct ProjectList {
    doc: SharedDocument,
    store: Rc<ProjectStore>,
    column: Column,
    element: NodeId,
    assigned: Rc<RefCell<Vec<Project>>>,
    items: Rc<RefCell<Vec<ProjectItem>>>,
}

impl ProjectList {
    /// Appends the column to `host_id` and subscribes it to `store`
    pub fn new(
        doc: SharedDocument,
        store: Rc<ProjectStore>,
        host_id: &str,
        column: Column,
    ) -> Result<Self> {
        let element_id = format!("{}-projects", column.status.slug());
        let element = attach(
            &mut doc.borrow_mut(),
            "project-list",
            host_id,
            InsertPosition::BeforeEnd,
            Some(&element_id),
        )?;

        let mut list = Self {
            doc,
            store,
            column,
            element,
            assigned: Rc::new(RefCell::new(Vec::new())),
            items: Rc::new(RefCell::new(Vec::new())),
        };
        list.configure()?;
        list.render_content()?;
        Ok(list)
    }

    pub fn status(&self) -> ProjectStatus {
        self.column.status
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Id of the `ul` holding this column's items
    pub fn list_id(&self) -> String {
        list_id(self.column.status)
    }

    /// Projects shown after the latest notification
    pub fn assigned(&self) -> Vec<Project> {
        self.assigned.borrow().clone()
    }

    /// Handle to the rendered item for `id`, if this column shows it
    pub fn item(&self, id: &ProjectId) -> Option<ProjectItem> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.project().id() == id)
            .cloned()
    }

    pub fn is_droppable(&self) -> Result<bool> {
        let doc = self.doc.borrow();
        let ul = doc.require_selector(self.element, "ul")?;
        doc.has_class(ul, DROPPABLE)
    }

    fn set_droppable(&self, droppable: bool) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        let ul = doc.require_selector(self.element, "ul")?;
        if droppable {
            doc.add_class(ul, DROPPABLE)
        } else {
            doc.remove_class(ul, DROPPABLE)
        }
    }
}

fn list_id(status: ProjectStatus) -> String {
    format!("{}-project-ulist", status.slug())
}

/// Replaces every item in the list `list_id` with freshly rendered `projects`
fn render_projects(
    doc: &SharedDocument,
    list_id: &str,
    projects: &[Project],
) -> Result<Vec<ProjectItem>> {
    {
        let mut doc = doc.borrow_mut();
        let ul = doc.require_element_by_id(list_id)?;
        doc.clear_children(ul)?;
    }

    projects
        .iter()
        .map(|project| ProjectItem::new(Rc::clone(doc), list_id, project.clone()))
        .collect()
}

impl Component for ProjectList {
    fn configure(&mut self) -> Result<()> {
        let doc = Rc::clone(&self.doc);
        let assigned = Rc::clone(&self.assigned);
        let items = Rc::clone(&self.items);
        let status = self.column.status;
        let list_id = self.list_id();

        self.store.subscribe(move |projects| {
            let relevant: Vec<Project> = projects
                .into_iter()
                .filter(|project| project.status() == status)
                .collect();
            trace!("{} column now shows {} projects", status, relevant.len());

            let rendered = render_projects(&doc, &list_id, &relevant)?;
            *assigned.borrow_mut() = relevant;
            *items.borrow_mut() = rendered;
            Ok(())
        });
        Ok(())
    }

    fn render_content(&mut self) -> Result<()> {
        let list_id = self.list_id();
        let mut doc = self.doc.borrow_mut();
        let ul = doc.require_selector(self.element, "ul")?;
        doc.set_id(ul, &list_id)?;
        let heading = doc.require_selector(self.element, "h2")?;
        doc.set_text(heading, self.column.heading())?;
        Ok(())
    }
}

impl DragTarget for ProjectList {
    fn drag_over(&self, event: &mut DragEvent) -> Result<()> {
        let is_text = event
            .data_transfer()
            .and_then(|transfer| transfer.primary_type())
            == Some(TEXT_PLAIN);
        if is_text {
            event.prevent_default();
            self.set_droppable(true)?;
        }
        Ok(())
    }

    fn drag_drop(&self, event: &mut DragEvent) -> Result<()> {
        self.set_droppable(false)?;

        let payload = event
            .data_transfer()
            .and_then(|transfer| transfer.get_data(TEXT_PLAIN))
            .unwrap_or_default();
        let id: ProjectId = match payload.parse() {
            Ok(id) => id,
            Err(_) => {
                debug!("drop on {} column without a project id", self.column.status);
                return Ok(());
            }
        };

        // The document must not be borrowed here: subscribers re-render into it
        self.store.transition(&id, self.column.status)?;
        Ok(())
    }

    fn drag_leave(&self, _event: &DragEvent) -> Result<()> {
        self.set_droppable(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dom::Document, drag::DataTransfer};

    struct Fixture {
        doc: SharedDocument,
        store: Rc<ProjectStore>,
        active: ProjectList,
        finished: ProjectList,
    }

    fn fixture() -> Fixture {
        let doc = Rc::new(RefCell::new(Document::with_board_templates()));
        let store = Rc::new(ProjectStore::new());
        let active = ProjectList::new(
            Rc::clone(&doc),
            Rc::clone(&store),
            "app",
            Column::new("active", ProjectStatus::Active),
        )
        .unwrap();
        let finished = ProjectList::new(
            Rc::clone(&doc),
            Rc::clone(&store),
            "app",
            Column::new("finished", ProjectStatus::Finished),
        )
        .unwrap();
        Fixture {
            doc,
            store,
            active,
            finished,
        }
    }

    fn titles(list: &ProjectList) -> Vec<String> {
        list.assigned()
            .iter()
            .map(|project| project.title().to_string())
            .collect()
    }

    fn text_event(data: &str) -> DragEvent {
        let mut transfer = DataTransfer::new();
        transfer.set_data(TEXT_PLAIN, data);
        DragEvent::new(transfer)
    }

    #[test]
    fn test_list_renders_heading_and_ids() {
        let fx = fixture();
        let doc = fx.doc.borrow();

        assert_eq!(doc.get_element_by_id("active-projects"), Some(fx.active.element()));
        let ul = doc.get_element_by_id("finished-project-ulist").unwrap();
        assert_eq!(doc.element(ul).unwrap().tag, "ul");
        let heading = doc.query_selector(fx.finished.element(), "h2").unwrap();
        assert_eq!(doc.text(heading).unwrap(), "FINISHED PROJECTS");
        assert_eq!(fx.store.subscriber_count(), 2);
    }

    #[test]
    fn test_columns_filter_by_status() {
        let fx = fixture();
        fx.store.create("A", "desc1", 2).unwrap();
        let b = fx.store.create("B", "desc2", 3).unwrap();
        fx.store.transition(&b, ProjectStatus::Finished).unwrap();

        assert_eq!(titles(&fx.active), vec!["A"]);
        assert_eq!(titles(&fx.finished), vec!["B"]);

        let doc = fx.doc.borrow();
        let active_ul = doc.get_element_by_id("active-project-ulist").unwrap();
        let finished_ul = doc.get_element_by_id("finished-project-ulist").unwrap();
        assert_eq!(doc.children(active_ul).unwrap().len(), 1);
        assert_eq!(doc.children(finished_ul).unwrap().len(), 1);
        assert!(doc.get_element_by_id(b.as_str()).is_some());
    }

    #[test]
    fn test_rerender_replaces_items() {
        let fx = fixture();
        let a = fx.store.create("A", "desc1", 2).unwrap();
        let first = fx.active.item(&a).unwrap().element();

        fx.store.create("B", "desc2", 2).unwrap();
        let second = fx.active.item(&a).unwrap().element();

        assert_ne!(first, second);
        let doc = fx.doc.borrow();
        assert!(doc.element(first).is_err());
        let ul = doc.get_element_by_id("active-project-ulist").unwrap();
        assert_eq!(doc.children(ul).unwrap().len(), 2);
    }

    #[test]
    fn test_drag_over_marks_droppable_for_text() {
        let fx = fixture();

        let mut event = text_event("whatever");
        fx.finished.drag_over(&mut event).unwrap();
        assert!(event.default_prevented());
        assert!(fx.finished.is_droppable().unwrap());

        fx.finished.drag_leave(&event).unwrap();
        assert!(!fx.finished.is_droppable().unwrap());
    }

    #[test]
    fn test_drag_over_ignores_other_payloads() {
        let fx = fixture();

        let mut transfer = DataTransfer::new();
        transfer.set_data("text/html", "<p>x</p>");
        transfer.set_data(TEXT_PLAIN, "x");
        let mut event = DragEvent::new(transfer);
        fx.finished.drag_over(&mut event).unwrap();
        assert!(!event.default_prevented());

        let mut bare = DragEvent::without_transfer();
        fx.finished.drag_over(&mut bare).unwrap();
        assert!(!bare.default_prevented());
        assert!(!fx.finished.is_droppable().unwrap());
    }

    #[test]
    fn test_drop_moves_project() {
        let fx = fixture();
        let a = fx.store.create("A", "desc1", 2).unwrap();

        fx.finished.drag_drop(&mut text_event(a.as_str())).unwrap();

        assert_eq!(fx.store.get(&a).unwrap().status(), ProjectStatus::Finished);
        assert!(titles(&fx.active).is_empty());
        assert_eq!(titles(&fx.finished), vec!["A"]);
        assert!(fx.finished.item(&a).is_some());
    }

    #[test]
    fn test_drop_on_own_column_does_not_notify() {
        let fx = fixture();
        let a = fx.store.create("A", "desc1", 2).unwrap();
        fx.store.transition(&a, ProjectStatus::Finished).unwrap();

        let notified = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&notified);
        fx.store.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        fx.finished.drag_drop(&mut text_event(a.as_str())).unwrap();
        assert_eq!(*notified.borrow(), 0);
        assert_eq!(titles(&fx.finished), vec!["A"]);
    }

    #[test]
    fn test_drop_with_stale_or_missing_id_is_ignored() {
        let fx = fixture();
        fx.store.create("A", "desc1", 2).unwrap();

        fx.finished.drag_drop(&mut text_event("stale-id")).unwrap();
        fx.finished.drag_drop(&mut DragEvent::without_transfer()).unwrap();

        assert_eq!(titles(&fx.active), vec!["A"]);
        assert!(titles(&fx.finished).is_empty());
    }
}
