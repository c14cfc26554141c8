//! # `ecatmap` - EtherCAT board addressing scheme
//!
//! _ecatmap_ models the addressing convention used to identify boards on a
//! multi-master EtherCAT installation:
//!
//! - A [`Master`] selects one of up to four EtherCAT master controllers.
//! - A [`NodeId`] combines a [`BoardType`] (device class) with a per-type
//!   instance number.
//! - A [`BoardAddress`] places a node ID under a master, yielding the full
//!   32-bit network-addressable value.  Each master additionally has a
//!   reserved broadcast address targeting all of its nodes.
//!
//! The [`boards`] module carries a template board map for a typical
//! installation.  It is meant to be copied and adapted per machine; all
//! derived constants are computed from their base components, so edits
//! propagate.
//!
//! # Example
//! ```
//! use ecatmap::{Master, BoardType, NodeId, BoardAddress};
//!
//! // First motion board, instance 0x10:
//! let node = NodeId::new(BoardType::Motion, 0x10);
//! assert_eq!(node.raw(), 0x0310);
//!
//! // ...addressed through master 0:
//! let addr = BoardAddress::new(Master::Master0, node);
//! assert_eq!(addr.raw(), 0x0310_0000);
//! assert_eq!(addr.master(), Master::Master0);
//! assert_eq!(addr.node_id(), node);
//!
//! // "All nodes on master 1":
//! let bcast = BoardAddress::broadcast(Master::Master1);
//! assert_eq!(bcast.raw(), 0x4000_0000);
//! assert!(bcast.is_broadcast());
//! ```
#![cfg_attr(not(test), no_std)]

pub mod addr;
pub mod boards;
pub mod consts;

pub use addr::{BoardAddress, BoardType, NodeId};

/// EtherCAT master controller
///
/// Up to four masters can coexist in one installation.  The master index
/// occupies the top two bits of a [`BoardAddress`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[repr(u8)]
pub enum Master {
    /// Master 0 (`ECAT_MASTER0`)
    Master0 = 0,
    /// Master 1 (`ECAT_MASTER1`)
    Master1 = 1,
    /// Master 2 (`ECAT_MASTER2`)
    Master2 = 2,
    /// Master 3 (`ECAT_MASTER3`)
    Master3 = 3,
}

impl Master {
    pub const fn from_index(index: u8) -> Option<Master> {
        match index {
            0 => Some(Master::Master0),
            1 => Some(Master::Master1),
            2 => Some(Master::Master2),
            3 => Some(Master::Master3),
            _ => None,
        }
    }

    /// Numeric master index (0..=3).
    #[inline(always)]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// This master as a [`MasterSet`] bit.
    pub const fn bit(self) -> MasterSet {
        match self {
            Master::Master0 => MasterSet::MASTER0,
            Master::Master1 => MasterSet::MASTER1,
            Master::Master2 => MasterSet::MASTER2,
            Master::Master3 => MasterSet::MASTER3,
        }
    }
}

impl core::fmt::Display for Master {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "master {}", self.index())
    }
}

bitflags::bitflags! {
    /// Set of EtherCAT masters, e.g. the masters referenced by a board map.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MasterSet: u8 {
        const MASTER0 = 1 << 0;
        const MASTER1 = 1 << 1;
        const MASTER2 = 1 << 2;
        const MASTER3 = 1 << 3;
    }
}

impl Default for MasterSet {
    fn default() -> Self {
        MasterSet::empty()
    }
}
