//! Board address field layout constants
//!
//! A board address packs its fields as
//! `(master << 30) | (node_id * 0x10000)` where the node ID itself is
//! `instance | (board_type << 8)`.

/// Bit position of the master index within a board address
pub const MASTER_SHIFT: u32 = 30;
/// Mask of the master index field
pub const MASTER_MASK: u32 = 0xC000_0000;
/// Bit position of the node ID within a board address
pub const NODE_ID_SHIFT: u32 = 16;
/// Mask of the node ID field
pub const NODE_ID_MASK: u32 = 0x3FFF_0000;
/// Bit position of the board type within a node ID
pub const BOARD_TYPE_SHIFT: u32 = 8;
/// Mask of the instance number within a node ID
pub const INSTANCE_MASK: u32 = 0x0000_00FF;
