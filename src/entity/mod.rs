//! SeaORM entity definitions

pub mod release;
pub mod system_status;
