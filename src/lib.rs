// trap-verify
//
// Inspects a deployed trap contract over JSON-RPC: verifies bytecode exists,
// simulates its read-only collect() method, and decodes the returned
// (uint256 balance, string tag) tuple. A standalone decode path handles
// arbitrary hex payloads of the same shape without touching the network.

pub mod abi;
pub mod check;
pub mod collect;
pub mod config;
pub mod error;
pub mod gate;
pub mod provider;
