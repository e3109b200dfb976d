use crate::{
    components::{attach, Component},
    dom::{InsertPosition, NodeId, SharedDocument},
    domain::ProjectId,
    error::Result,
    store::ProjectStore,
    validation::{validate_project_input, FormRules, ValidationError},
};
use log::{info, trace, warn};
use std::rc::Rc;

/// Label of the form's submit button
pub const SUBMIT_LABEL: &str = "ADD PROJECT";

/// Result of submitting the project form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(ProjectId),
    /// Input failed validation; fields are left as entered
    Rejected(ValidationError),
}

/// The "new project" form
pub struct ProjectInput {
    doc: SharedDocument,
    store: Rc<ProjectStore>,
    rules: FormRules,
    alert_message: String,
    element: NodeId,
    title_input: NodeId,
    description_input: NodeId,
    people_input: NodeId,
    submit_button: NodeId,
}

impl ProjectInput {
    /// Prepends the form to `host_id`
    pub fn new(
        doc: SharedDocument,
        store: Rc<ProjectStore>,
        host_id: &str,
        rules: FormRules,
        alert_message: impl Into<String>,
    ) -> Result<Self> {
        let (element, title_input, description_input, people_input, submit_button) = {
            let mut d = doc.borrow_mut();
            let element = attach(
                &mut d,
                "project-input",
                host_id,
                InsertPosition::AfterBegin,
                Some("user-input"),
            )?;
            (
                element,
                d.require_selector(element, "#title")?,
                d.require_selector(element, "#description")?,
                d.require_selector(element, "#people")?,
                d.require_selector(element, "button")?,
            )
        };

        let mut input = Self {
            doc,
            store,
            rules,
            alert_message: alert_message.into(),
            element,
            title_input,
            description_input,
            people_input,
            submit_button,
        };
        input.configure()?;
        input.render_content()?;
        Ok(input)
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Types values into the three fields
    pub fn fill(&self, title: &str, description: &str, people: &str) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        doc.set_value(self.title_input, title)?;
        doc.set_value(self.description_input, description)?;
        doc.set_value(self.people_input, people)?;
        Ok(())
    }

    /// Current field values as `(title, description, people)`
    pub fn values(&self) -> Result<(String, String, String)> {
        let doc = self.doc.borrow();
        Ok((
            doc.value(self.title_input)?.to_string(),
            doc.value(self.description_input)?.to_string(),
            doc.value(self.people_input)?.to_string(),
        ))
    }

    /// Validates the form and creates a project from it.
    ///
    /// Invalid input raises an alert and keeps the fields. A valid submission
    /// clears them once the store has notified every subscriber.
    pub fn submit(&self) -> Result<SubmitOutcome> {
        let (title, description, people) = self.values()?;

        let input = match validate_project_input(&title, &description, &people, &self.rules) {
            Ok(input) => input,
            Err(err) => {
                warn!("project form rejected: {}", err);
                self.doc.borrow_mut().alert(self.alert_message.clone());
                return Ok(SubmitOutcome::Rejected(err));
            }
        };

        let id = self
            .store
            .create(input.title, input.description, input.people)?;
        info!("project {} added from form", id);

        self.clear_inputs()?;
        Ok(SubmitOutcome::Created(id))
    }

    fn clear_inputs(&self) -> Result<()> {
        self.fill("", "", "")
    }
}

impl Component for ProjectInput {
    fn configure(&mut self) -> Result<()> {
        self.clear_inputs()?;
        trace!("project form bound to store");
        Ok(())
    }

    fn render_content(&mut self) -> Result<()> {
        self.doc
            .borrow_mut()
            .set_text(self.submit_button, SUBMIT_LABEL)
    }
}
