//! Board assembly: one store, one document, the form and a column per status.

use crate::{
    components::{ProjectInput, ProjectList, SubmitOutcome},
    dom::{Document, SharedDocument},
    domain::{BoardConfig, ProjectId, ProjectStatus},
    drag::DragGesture,
    error::{BoardError, Result},
    store::ProjectStore,
};
use log::{debug, info};
use std::{cell::RefCell, rc::Rc};

pub struct ProjectBoard {
    config: BoardConfig,
    doc: SharedDocument,
    store: Rc<ProjectStore>,
    input: ProjectInput,
    lists: Vec<ProjectList>,
}

impl ProjectBoard {
    /// Builds a board on a fresh document with the standard templates
    pub fn new(config: BoardConfig) -> Result<Self> {
        Self::with_document(config, Document::with_board_templates())
    }

    pub fn with_document(config: BoardConfig, document: Document) -> Result<Self> {
        config.validate()?;

        let doc = Rc::new(RefCell::new(document));
        let store = Rc::new(ProjectStore::new());

        let input = ProjectInput::new(
            Rc::clone(&doc),
            Rc::clone(&store),
            &config.host_id,
            config.form.clone(),
            config.alert_message.clone(),
        )?;
        let lists = config
            .columns
            .iter()
            .map(|column| {
                ProjectList::new(
                    Rc::clone(&doc),
                    Rc::clone(&store),
                    &config.host_id,
                    column.clone(),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        info!("board {:?} ready with {} columns", config.name, lists.len());
        Ok(Self {
            config,
            doc,
            store,
            input,
            lists,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &Rc<ProjectStore> {
        &self.store
    }

    pub fn document(&self) -> &SharedDocument {
        &self.doc
    }

    pub fn input(&self) -> &ProjectInput {
        &self.input
    }

    pub fn lists(&self) -> &[ProjectList] {
        &self.lists
    }

    pub fn column(&self, status: ProjectStatus) -> Option<&ProjectList> {
        self.lists.iter().find(|list| list.status() == status)
    }

    /// Fills in the form and submits it
    pub fn submit_project(
        &self,
        title: &str,
        description: &str,
        people: &str,
    ) -> Result<SubmitOutcome> {
        self.input.fill(title, description, people)?;
        self.input.submit()
    }

    /// Drags project `id` from its column and drops it on the `target` column.
    ///
    /// Returns whether the project's status changed.
    pub fn drag_project(&self, id: &ProjectId, target: ProjectStatus) -> Result<bool> {
        let source = self
            .lists
            .iter()
            .find_map(|list| list.item(id))
            .ok_or_else(|| BoardError::ElementNotFound(format!("#{}", id)))?;
        let target_list = self.column(target).ok_or_else(|| {
            BoardError::ConfigError(format!("no column shows {} projects", target))
        })?;
        let before = source.project().status();

        let mut gesture = DragGesture::new();
        gesture.start(&source)?;
        gesture.over(target_list)?;
        let dropped = gesture.drop(target_list)?;
        gesture.end(&source)?;

        let moved = dropped
            && before != target
            && self.store.get(id).map(|project| project.status()) == Some(target);
        debug!("dragged {} onto {} column, moved={}", id, target, moved);
        Ok(moved)
    }

    /// Renders the host element and everything attached to it
    pub fn render_html(&self) -> Result<String> {
        let doc = self.doc.borrow();
        let host = doc.require_element_by_id(&self.config.host_id)?;
        doc.render_html(host)
    }
}
