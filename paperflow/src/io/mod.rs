//! Collaborators at the edge of the workflow: files, clocks, directories.

pub mod board;
pub mod clock;
pub mod config;
pub mod directory;
pub mod init;
