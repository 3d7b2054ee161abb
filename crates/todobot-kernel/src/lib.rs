//! todobot kernel.
//!
//! This crate owns everything that talks to the remote task service through
//! an abstract capability:
//!
//! - **[`service`]** -- the [`TaskService`] trait the kernel consumes.
//! - **[`model`]** -- projects, sections, tasks and pages as the service
//!   returns them.
//! - **[`sanitize`]** -- emoji/punctuation-insensitive category names.
//! - **[`pagination`]** -- cursor-driven scanning of listings.
//! - **[`reconciler`]** -- get-or-create resolution of projects and sections.
//! - **[`tasks`]** -- create/find/update/delete/complete built on top.
//! - **[`error`]** -- [`ServiceError`] via [`thiserror`].

pub mod error;
pub mod model;
pub mod pagination;
pub mod reconciler;
pub mod sanitize;
pub mod service;
pub mod tasks;

pub use error::{Result, ServiceError};
pub use model::{Due, NewTask, Page, Project, Section, Task, TaskDraft};
pub use reconciler::CategoryReconciler;
pub use sanitize::{comparison_key, same_category, sanitize_name};
pub use service::TaskService;
pub use tasks::TaskManager;
