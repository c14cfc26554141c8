//! Typed node IDs and board addresses
//!
//! The types in this module encode the addressing convention documented in
//! [`crate::consts`].  Construction is `const fn` throughout, so a board map
//! can be expressed as computed constants (see [`crate::boards`]).
//!
//! The untyped `*_raw` functions reproduce the original preprocessor
//! arithmetic on plain `u32` values.  They perform no range validation at
//! all: an out-of-range master or board type silently produces a wrong but
//! well-defined address.  The typed constructors rule those cases out by
//! construction and should be preferred.

use crate::consts;
use crate::Master;
use core::fmt;

/// Board device class
///
/// The board type occupies the high byte of a [`NodeId`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[repr(u8)]
pub enum BoardType {
    /// Common/safety board (`BDTYPE_ECAT_CMN`)
    Common = 0x01,
    /// I/O board (`BDTYPE_ECAT_IO`)
    Io = 0x02,
    /// Motion board (`BDTYPE_ECAT_MOT`)
    Motion = 0x03,
    /// Sensor board (`BDTYPE_ECAT_SEN`)
    Sensor = 0x04,
}

impl BoardType {
    pub const fn from_u8(b: u8) -> Option<BoardType> {
        match b {
            0x01 => Some(BoardType::Common),
            0x02 => Some(BoardType::Io),
            0x03 => Some(BoardType::Motion),
            0x04 => Some(BoardType::Sensor),
            _ => None,
        }
    }
}

/// Per-device node ID
///
/// Combines a [`BoardType`] with a per-type instance number:
/// `instance | (board_type << 8)`.  Node IDs must be unique within one
/// installation; this is a convention the integrator upholds, not something
/// the type enforces.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct NodeId(u16);

impl NodeId {
    pub const fn new(board_type: BoardType, instance: u8) -> NodeId {
        NodeId(((board_type as u16) << consts::BOARD_TYPE_SHIFT) | instance as u16)
    }

    /// Construct from a raw value without validating the board type field.
    ///
    /// The node field of a [`BoardAddress`] is 14 bits wide: a raw node ID
    /// of 0x4000 or above overflows into the master bits when composed via
    /// [`BoardAddress::new`], an inherited limit of the address layout.
    /// [`NodeId::new`] cannot produce such values.
    pub const fn from_raw(raw: u16) -> NodeId {
        NodeId(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Board type field, `None` if the high byte is not a known type.
    pub const fn board_type(self) -> Option<BoardType> {
        BoardType::from_u8((self.0 >> consts::BOARD_TYPE_SHIFT) as u8)
    }

    /// Per-type instance number (low byte).
    #[inline(always)]
    pub const fn instance(self) -> u8 {
        (self.0 as u32 & consts::INSTANCE_MASK) as u8
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Full network-addressable board address
///
/// `(master << 30) | (node_id * 0x10000)`: the top two bits select the
/// master, the node ID sits in a 16-bit-aligned slot below them.  A zero
/// node field is the reserved broadcast address of the master.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct BoardAddress(u32);

impl BoardAddress {
    /// Node IDs obtained from [`NodeId::from_raw`] with a value of 0x4000 or
    /// above do not fit the 14-bit node field and bleed into the master
    /// bits; [`BoardAddress::node_id`] later truncates them.
    pub const fn new(master: Master, node: NodeId) -> BoardAddress {
        BoardAddress(
            ((master as u32) << consts::MASTER_SHIFT) | ((node.0 as u32) << consts::NODE_ID_SHIFT),
        )
    }

    /// Broadcast address of `master`, targeting all of its nodes.
    pub const fn broadcast(master: Master) -> BoardAddress {
        BoardAddress((master as u32) << consts::MASTER_SHIFT)
    }

    /// Construct from a raw value without any validation.
    pub const fn from_raw(raw: u32) -> BoardAddress {
        BoardAddress(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Master selected by the top two bits.
    pub const fn master(self) -> Master {
        match self.0 >> consts::MASTER_SHIFT {
            0 => Master::Master0,
            1 => Master::Master1,
            2 => Master::Master2,
            _ => Master::Master3,
        }
    }

    /// Node ID field.  Addresses constructed via [`BoardAddress::from_raw`]
    /// may carry a node ID whose board type is unknown.
    pub const fn node_id(self) -> NodeId {
        NodeId(((self.0 & consts::NODE_ID_MASK) >> consts::NODE_ID_SHIFT) as u16)
    }

    /// Whether this is the reserved "all nodes on this master" address.
    pub const fn is_broadcast(self) -> bool {
        self.0 & !consts::MASTER_MASK == 0
    }
}

impl fmt::Display for BoardAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// `instance | (board_type << 8)` on raw values, no validation.
///
/// An `instance` wider than a byte overflows into the board type field, a
/// latent defect inherited from the original header format.
pub const fn node_id_raw(board_type: u32, instance: u32) -> u32 {
    instance | (board_type << consts::BOARD_TYPE_SHIFT)
}

/// `(master << 30) | (node_id * 0x10000)` on raw values, no validation.
pub const fn board_address_raw(master: u32, node_id: u32) -> u32 {
    (master << consts::MASTER_SHIFT) | node_id.wrapping_mul(1 << consts::NODE_ID_SHIFT)
}

/// `master << 30`, the broadcast address of a master, no validation.
pub const fn broadcast_raw(master: u32) -> u32 {
    master << consts::MASTER_SHIFT
}
