//! List view state and its async controller

pub mod controller;
pub mod state;

pub use controller::ListController;
pub use state::{
    FetchOutcome, ListSnapshot, ListViewState, LoadState, Notice, NoticeKind, RequestToken,
    ViewEvent,
};
