//! `Max7219Sink`: cascaded MAX7219 8x8 LED modules on an SPI bus.
//!
//! The chain is a shift register: each transaction clocks two bytes
//! (register, data) per module, and the bytes sent first end up in the
//! module farthest from the controller. Module 0 sits next to the
//! controller and shows the leftmost 8 columns of the frame.
//!
//! On Linux the bus is a spidev node; each `write()` on it is one
//! chip-select-framed transfer, which is what latches the registers.

use super::{check_size, FrameSink};
use crate::buffer::Bitmap;
use crate::config::{DisplayConfig, MODULE_SIZE};
use crate::error::SinkError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// MAX7219 register addresses.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// First row register. Rows 0..8 are `0x01..=0x08`.
    Digit0 = 0x01,
    /// BCD decode per digit (0 = raw segments).
    DecodeMode = 0x09,
    /// LED intensity 0..=15.
    Intensity = 0x0A,
    /// Number of scanned digits minus one.
    ScanLimit = 0x0B,
    /// 0 = shutdown, 1 = normal operation.
    Shutdown = 0x0C,
    /// 1 = all LEDs on for testing.
    DisplayTest = 0x0F,
}

impl Register {
    /// Address of row register `row` (0..8).
    #[inline]
    pub const fn digit(row: usize) -> u8 {
        Self::Digit0 as u8 + row as u8
    }
}

/// Sink driving a MAX7219 chain.
pub struct Max7219Sink<W: Write> {
    /// SPI device (or any writer in tests).
    out: W,
    /// Modules in the chain.
    cascaded: usize,
    /// Quarter turns applied to the whole frame.
    rotate: u8,
    /// Quarter turns applied to each 8x8 block to undo module mounting.
    block_turns: u8,
    /// Logical frame size the renderer draws.
    width: usize,
    height: usize,
    /// Reused transaction buffer.
    tx: Vec<u8>,
}

impl Max7219Sink<File> {
    /// Open a spidev node and initialise the chain.
    pub fn open(path: &Path, config: &DisplayConfig) -> Result<Self, SinkError> {
        let file = OpenOptions::new().write(true).open(path)?;
        let modules = config.cascaded;
        info!(device = %path.display(), modules, "opened MAX7219 chain");
        Self::new(file, config)
    }
}

impl<W: Write> Max7219Sink<W> {
    /// Initialise the chain behind `out`.
    pub fn new(out: W, config: &DisplayConfig) -> Result<Self, SinkError> {
        let (width, height) = config.frame_size();
        // Modules mounted at -90 degrees need their content turned +90.
        let block_turns = match config.block_orientation {
            -90 => 1,
            90 => 3,
            180 => 2,
            _ => 0,
        };

        let mut sink = Self {
            out,
            cascaded: config.cascaded,
            rotate: config.rotate % 4,
            block_turns,
            width,
            height,
            tx: Vec::with_capacity(config.cascaded * 2),
        };

        sink.broadcast(Register::DisplayTest as u8, 0)?;
        sink.broadcast(Register::ScanLimit as u8, 7)?;
        sink.broadcast(Register::DecodeMode as u8, 0)?;
        sink.broadcast(Register::Intensity as u8, config.brightness.min(15))?;
        sink.clear()?;
        sink.broadcast(Register::Shutdown as u8, 1)?;
        debug!("MAX7219 chain initialised");
        Ok(sink)
    }

    /// Get a reference to the underlying writer.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Write the same register value to every module.
    fn broadcast(&mut self, register: u8, data: u8) -> Result<(), SinkError> {
        self.tx.clear();
        for _ in 0..self.cascaded {
            self.tx.extend_from_slice(&[register, data]);
        }
        self.transfer()
    }

    /// Turn every LED off.
    fn clear(&mut self) -> Result<(), SinkError> {
        for row in 0..MODULE_SIZE {
            self.broadcast(Register::digit(row), 0)?;
        }
        Ok(())
    }

    fn transfer(&mut self) -> Result<(), SinkError> {
        self.out.write_all(&self.tx)?;
        self.out.flush()?;
        Ok(())
    }

    /// Row bytes for every module, indexed `[module][row]`, bit 7 leftmost.
    fn module_rows(&self, frame: &Bitmap) -> Vec<[u8; MODULE_SIZE]> {
        let device = frame.rotated(self.rotate);
        (0..self.cascaded)
            .map(|module| {
                let block = device
                    .crop(module * MODULE_SIZE, 0, MODULE_SIZE, MODULE_SIZE)
                    .rotated(self.block_turns);
                let mut rows = [0u8; MODULE_SIZE];
                for (y, row) in rows.iter_mut().enumerate() {
                    for x in 0..MODULE_SIZE {
                        if block.get(x, y) {
                            *row |= 0x80 >> x;
                        }
                    }
                }
                rows
            })
            .collect()
    }
}

impl<W: Write + Send> FrameSink for Max7219Sink<W> {
    fn render_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError> {
        check_size(frame, self.width, self.height)?;
        let modules = self.module_rows(frame);

        for row in 0..MODULE_SIZE {
            self.tx.clear();
            // Farthest module first.
            for rows in modules.iter().rev() {
                self.tx.extend_from_slice(&[Register::digit(row), rows[row]]);
            }
            self.transfer()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for Max7219Sink<W> {
    fn drop(&mut self) {
        let _ = self.clear();
        let _ = self.broadcast(Register::Shutdown as u8, 0);
    }
}
