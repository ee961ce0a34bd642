//! Personal task boards: today, weekly, monthly and special-day views, each
//! split into todo / in-process / done columns and kept in step with either
//! the remote to-do API or a local key/value file.

pub mod api;
pub mod auth;
pub mod columns;
pub mod config;
pub mod error;
pub mod kanban_board;
pub mod special_day;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use columns::Columns;
pub use error::{ApiError, AuthError, BoardError, ConfigError, StorageError, StoreError, ValidationError};
pub use kanban_board::TaskBoard;
pub use task::{Bucket, StatusNames, Task, TaskDraft, TaskId, TaskRecord};
pub use view::View;
