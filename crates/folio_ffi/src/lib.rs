//! Front-end bridge for the Folio contact pipeline.

pub mod api;
