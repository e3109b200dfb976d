//! Presentation components rendered into a [`Document`].

use crate::{
    dom::{Document, InsertPosition, NodeId},
    error::Result,
};

pub mod input;
pub mod item;
pub mod list;

pub use input::{ProjectInput, SubmitOutcome};
pub use item::ProjectItem;
pub use list::ProjectList;

/// Lifecycle shared by every board component.
///
/// Constructors call `configure` and then `render_content` once, after the
/// element is attached.
pub trait Component {
    /// Wires the component to its collaborators and puts its element in the
    /// state events expect
    fn configure(&mut self) -> Result<()>;

    /// Writes the component's static content into its element
    fn render_content(&mut self) -> Result<()>;
}

/// Imports `template_id` into the element with id `host_id` and returns the
/// new root element, optionally giving it `element_id`.
pub fn attach(
    doc: &mut Document,
    template_id: &str,
    host_id: &str,
    position: InsertPosition,
    element_id: Option<&str>,
) -> Result<NodeId> {
    let host = doc.require_element_by_id(host_id)?;
    let element = doc.import_template(template_id)?;
    if let Some(id) = element_id {
        doc.set_id(element, id)?;
    }
    doc.insert(host, position, element)?;
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;

    #[test]
    fn test_attach_places_element_in_host() {
        let mut doc = Document::with_board_templates();
        let form = attach(
            &mut doc,
            "project-input",
            "app",
            InsertPosition::AfterBegin,
            Some("user-input"),
        )
        .unwrap();

        assert_eq!(doc.get_element_by_id("user-input"), Some(form));
        let app = doc.get_element_by_id("app").unwrap();
        assert_eq!(doc.children(app).unwrap(), &[form]);
    }

    #[test]
    fn test_attach_reports_missing_host_and_template() {
        let mut doc = Document::with_board_templates();
        assert!(matches!(
            attach(&mut doc, "project-input", "nowhere", InsertPosition::BeforeEnd, None),
            Err(BoardError::ElementNotFound(_))
        ));
        assert!(matches!(
            attach(&mut doc, "nothing", "app", InsertPosition::BeforeEnd, None),
            Err(BoardError::TemplateNotFound(_))
        ));
    }
}
