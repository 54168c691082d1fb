//! RFM69 packet driver
//!
//! Drives an already configured RFM69 through its register interface:
//! - [`Radio::send`] and [`Radio::send_headered`] stream a framed packet through the 66 byte FIFO,
//!   refilling it while the chip transmits so that packets up to 115 framed bytes can be sent.
//! - [`Radio::receive`] and [`Radio::receive_headered`] listen for a single packet for a bounded time.
//!
//! The register access itself is provided through the [`ctrl::traits::Hardware`] trait.
#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate num_derive;

pub mod config;
pub mod ctrl;
pub mod frame;
pub mod regs;

pub use config::Config;
pub use ctrl::{traits::Hardware, Error, Mode, Radio, Reception, Rssi};
pub use frame::{Framing, Header, Packet, MAX_FRAME, MAX_PAYLOAD, MAX_TX_FRAME};
