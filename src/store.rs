//! The authoritative in-memory project collection.
//!
//! A [`ProjectStore`] is constructed explicitly and shared through `Rc`. Every
//! successful mutation pushes a copy of the full project list to each
//! subscriber, synchronously and in registration order.

use crate::{
    domain::{Project, ProjectId, ProjectStatus},
    error::{BoardError, Result},
};
use log::{debug, trace};
use std::{cell::RefCell, fmt, rc::Rc};

/// Callback receiving a snapshot of every project after a mutation.
///
/// Returning an error stops delivery to the remaining subscribers and surfaces
/// as [`BoardError::Subscriber`] from the mutating call.
pub type Listener = Rc<dyn Fn(Vec<Project>) -> anyhow::Result<()>>;

#[derive(Default)]
pub struct ProjectStore {
    projects: RefCell<Vec<Project>>,
    listeners: RefCell<Vec<Listener>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for all future notifications
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(Vec<Project>) -> anyhow::Result<()> + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
        trace!("subscriber registered, total={}", self.subscriber_count());
    }

    /// Adds a new active project and notifies subscribers.
    ///
    /// The caller is responsible for validating the fields. If a subscriber
    /// fails the project is still stored.
    pub fn create(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        people: u32,
    ) -> Result<ProjectId> {
        let id = self.fresh_id();
        let project = Project::new(id.clone(), title.into(), description.into(), people);
        debug!(
            "project created id={} title={:?} people={}",
            id,
            project.title(),
            people
        );
        self.projects.borrow_mut().push(project);

        self.notify()?;
        Ok(id)
    }

    /// Moves a project to `status`.
    ///
    /// Returns `Ok(false)` without notifying when the id is unknown or the
    /// project already has that status.
    pub fn transition(&self, id: &ProjectId, status: ProjectStatus) -> Result<bool> {
        let changed = {
            let mut projects = self.projects.borrow_mut();
            match projects.iter_mut().find(|project| project.id() == id) {
                Some(project) if project.status() != status => {
                    debug!(
                        "project moved id={} from={} to={}",
                        id,
                        project.status(),
                        status
                    );
                    project.set_status(status);
                    true
                }
                Some(_) => {
                    trace!("project {} already {}, nothing to do", id, status);
                    false
                }
                None => {
                    debug!("ignoring move of unknown project {}", id);
                    false
                }
            }
        };

        if changed {
            self.notify()?;
        }
        Ok(changed)
    }

    /// Returns a copy of all projects in insertion order
    pub fn projects(&self) -> Vec<Project> {
        self.projects.borrow().clone()
    }

    pub fn get(&self, id: &ProjectId) -> Option<Project> {
        self.projects
            .borrow()
            .iter()
            .find(|project| project.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.projects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.borrow().is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn fresh_id(&self) -> ProjectId {
        let projects = self.projects.borrow();
        loop {
            let id = ProjectId::generate();
            if projects.iter().all(|project| project.id() != &id) {
                return id;
            }
        }
    }

    fn notify(&self) -> Result<()> {
        // No borrow is held while listeners run so they may use the store
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        trace!("notifying {} subscribers", listeners.len());

        for (index, listener) in listeners.iter().enumerate() {
            let snapshot = self.projects();
            listener(snapshot).map_err(|err| {
                debug!("subscriber #{} failed: {:#}", index, err);
                BoardError::Subscriber(err)
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("projects", &self.projects.borrow())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
