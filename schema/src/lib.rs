// PvP Schema - Shared type definitions
// Move and buff descriptions handed to the decision engine by the data layer.
// Everything here is plain data; the engine crate owns the logic.

pub use buff_data::*;
pub use move_types::*;

pub mod buff_data;
pub mod move_types;
