/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hardware seams: discrete output lines and the outbound serial channel.
//!
//! The pipeline only needs two capabilities from the platform, so they are
//! expressed as two small traits.  Ownership encodes the exclusive-use rule:
//! the blinker owns `OUT0`, the reporter owns `L0`–`L2`, and a line value is
//! moved into exactly one task, so two tasks can never race on one line.
//!
//! * [`sim`]  – host implementations (lines traced through `tracing`, serial
//!   written to any `io::Write`).
//! * [`mock`] – observable test doubles.

pub mod mock;
pub mod sim;

use crate::error::HalError;

/// One digital output.
pub trait OutputLine: Send {
    /// Drive the line to the asserted (`true`) or deasserted level.
    fn set(&mut self, asserted: bool) -> Result<(), HalError>;

    /// Human-readable identifier used in log events.
    fn name(&self) -> &str;

    fn assert_line(&mut self) -> Result<(), HalError> {
        self.set(true)
    }

    fn deassert_line(&mut self) -> Result<(), HalError> {
        self.set(false)
    }
}

/// Outbound byte channel.  `transmit` returns once every byte is accepted.
pub trait SerialPort: Send {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), HalError>;
}

/// Lets the sink be chosen at runtime (`Box<dyn SerialPort>`).
impl<P: SerialPort + ?Sized> SerialPort for Box<P> {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), HalError> {
        (**self).transmit(bytes)
    }
}
