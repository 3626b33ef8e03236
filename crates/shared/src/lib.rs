pub mod domain;
pub mod error;
pub mod event;
pub mod protocol;
pub mod selectors;
pub mod state;
