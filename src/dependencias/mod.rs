//! Dependency-resolution protocol shared by docentes, estudiantes y grupos.
//!
//! Destructive operations never fail outright nor cascade silently: the
//! handler reports what would be affected (409 plus a structured report)
//! and only a re-submission with the confirmation flag applies the change,
//! recounting inside the transaction so the confirmed payload reflects what
//! was actually removed.

pub mod aggregator;
pub mod catalog;
pub mod model;
