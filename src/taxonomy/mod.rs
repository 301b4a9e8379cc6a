//! The class/slot directory taxonomy.
//!
//! * [`Alphabet`] - the class labels per category
//! * [`TaxonomyManager`] - creates the directory tree and prunes classes to capacity
//! * [`reconcile_class`] / [`list_slot_dirs`] - slot listing and pruning

mod alphabet;
mod layout;
mod reconcile;

pub use alphabet::Alphabet;
pub use layout::{LayoutReport, TaxonomyManager};
pub use reconcile::{ReconcileReport, list_slot_dirs, reconcile_class};
