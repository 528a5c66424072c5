//! Matrix storage, selection (view/copy) semantics, and broadcasting.

pub mod broadcast;
pub mod models;
pub mod selection;

pub use broadcast::{broadcast_add, broadcast_shape};
pub use models::{demo_image, demo_matrix, Matrix};
pub use selection::{classify_selection, Selection, SelectionReport};
