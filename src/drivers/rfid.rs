//! MFRC522 badge reader driver.
//!
//! The protocol logic (ISO 14443A REQA + anticollision) sits behind a
//! small register-bus trait so it runs identically over the real I²C unit
//! and a scripted bus in host tests. Only single-size (4-byte) UIDs are
//! selected — the site fobs are all classic 4-byte cards, so the cascade
//! levels for 7/10-byte UIDs are not implemented.
//!
//! A successful read arms a cooldown window during which further
//! presentations are ignored, so one badge held against the panel does not
//! spam the card topic.

use log::debug;

use crate::app::ports::{BadgeReader, CredentialId};
use crate::error::BadgeError;

/// Bounded IRQ poll iterations per transceive.
const POLL_LIMIT: u32 = 50;

// ── Register map (subset) ─────────────────────────────────────

mod reg {
    pub const COMMAND: u8 = 0x01;
    pub const COM_IRQ: u8 = 0x04;
    pub const ERROR: u8 = 0x06;
    pub const FIFO_DATA: u8 = 0x09;
    pub const FIFO_LEVEL: u8 = 0x0A;
    pub const BIT_FRAMING: u8 = 0x0D;
    pub const MODE: u8 = 0x11;
    pub const TX_CONTROL: u8 = 0x14;
    pub const TX_ASK: u8 = 0x15;
    pub const T_MODE: u8 = 0x2A;
    pub const T_PRESCALER: u8 = 0x2B;
    pub const T_RELOAD_H: u8 = 0x2C;
    pub const T_RELOAD_L: u8 = 0x2D;
}

mod cmd {
    pub const IDLE: u8 = 0x00;
    pub const TRANSCEIVE: u8 = 0x0C;
    pub const SOFT_RESET: u8 = 0x0F;
}

mod picc {
    pub const REQA: u8 = 0x26;
    pub const SEL_CL1: u8 = 0x93;
    pub const NVB_FULL: u8 = 0x20;
}

// ── Bus trait ─────────────────────────────────────────────────

/// Register-level access to the MFRC522.
pub trait Mfrc522Bus {
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), BadgeError>;
    fn read_reg(&mut self, reg: u8) -> Result<u8, BadgeError>;
    fn write_fifo(&mut self, data: &[u8]) -> Result<(), BadgeError>;
    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), BadgeError>;
}

/// MFRC522 over any `embedded-hal` I²C bus (the panel unit sits at 0x28).
pub struct I2cBus<I> {
    i2c: I,
    addr: u8,
}

impl<I: embedded_hal::i2c::I2c> I2cBus<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self { i2c, addr }
    }
}

impl<I: embedded_hal::i2c::I2c> Mfrc522Bus for I2cBus<I> {
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), BadgeError> {
        self.i2c
            .write(self.addr, &[reg, value])
            .map_err(|_| BadgeError::BusFailed)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, BadgeError> {
        let mut out = [0u8];
        self.i2c
            .write_read(self.addr, &[reg], &mut out)
            .map_err(|_| BadgeError::BusFailed)?;
        Ok(out[0])
    }

    fn write_fifo(&mut self, data: &[u8]) -> Result<(), BadgeError> {
        let mut frame: heapless::Vec<u8, 17> = heapless::Vec::new();
        frame.push(reg::FIFO_DATA).map_err(|_| BadgeError::BusFailed)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| BadgeError::BusFailed)?;
        self.i2c
            .write(self.addr, &frame)
            .map_err(|_| BadgeError::BusFailed)
    }

    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), BadgeError> {
        for byte in buf.iter_mut() {
            *byte = self.read_reg(reg::FIFO_DATA)?;
        }
        Ok(())
    }
}

// ── Protocol core ─────────────────────────────────────────────

pub struct Mfrc522<B> {
    bus: B,
}

impl<B: Mfrc522Bus> Mfrc522<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Soft-reset and configure timer/modulation; call once at boot.
    pub fn init(&mut self) -> Result<(), BadgeError> {
        self.bus.write_reg(reg::COMMAND, cmd::SOFT_RESET)?;

        // Timeout timer: ~25 ms (TAuto, prescaler 169, reload 1000).
        self.bus.write_reg(reg::T_MODE, 0x80)?;
        self.bus.write_reg(reg::T_PRESCALER, 0xA9)?;
        self.bus.write_reg(reg::T_RELOAD_H, 0x03)?;
        self.bus.write_reg(reg::T_RELOAD_L, 0xE8)?;

        // 100% ASK modulation, CRC preset 0x6363.
        self.bus.write_reg(reg::TX_ASK, 0x40)?;
        self.bus.write_reg(reg::MODE, 0x3D)?;

        self.antenna_on()
    }

    fn antenna_on(&mut self) -> Result<(), BadgeError> {
        let ctrl = self.bus.read_reg(reg::TX_CONTROL)?;
        if ctrl & 0x03 != 0x03 {
            self.bus.write_reg(reg::TX_CONTROL, ctrl | 0x03)?;
        }
        Ok(())
    }

    /// Is a card answering in the field? (REQA, 7-bit framing.)
    pub fn request_a(&mut self) -> Result<(), BadgeError> {
        let mut atqa = [0u8; 2];
        let n = self.transceive(&[picc::REQA], &mut atqa, 0x07)?;
        if n != 2 {
            return Err(BadgeError::ProtocolError);
        }
        Ok(())
    }

    /// Anticollision cascade level 1: read a 4-byte UID + check byte.
    pub fn read_uid(&mut self) -> Result<CredentialId, BadgeError> {
        let mut frame = [0u8; 8];
        let n = self.transceive(&[picc::SEL_CL1, picc::NVB_FULL], &mut frame, 0)?;
        if n != 5 {
            return Err(BadgeError::ProtocolError);
        }
        let bcc = frame[0] ^ frame[1] ^ frame[2] ^ frame[3];
        if bcc != frame[4] {
            return Err(BadgeError::BadChecksum);
        }

        let mut uid = CredentialId::new();
        // 4 bytes always fit the 10-byte credential buffer.
        let _ = uid.extend_from_slice(&frame[..4]);
        Ok(uid)
    }

    /// One transceive cycle with a bounded IRQ poll.
    fn transceive(
        &mut self,
        data: &[u8],
        rx: &mut [u8],
        tx_last_bits: u8,
    ) -> Result<usize, BadgeError> {
        self.bus.write_reg(reg::COMMAND, cmd::IDLE)?;
        self.bus.write_reg(reg::COM_IRQ, 0x7F)?; // clear IRQ flags
        self.bus.write_reg(reg::FIFO_LEVEL, 0x80)?; // flush FIFO
        self.bus.write_fifo(data)?;
        self.bus.write_reg(reg::BIT_FRAMING, tx_last_bits & 0x07)?;
        self.bus.write_reg(reg::COMMAND, cmd::TRANSCEIVE)?;

        let framing = self.bus.read_reg(reg::BIT_FRAMING)?;
        self.bus.write_reg(reg::BIT_FRAMING, framing | 0x80)?; // StartSend

        let mut waited = 0u32;
        loop {
            let irq = self.bus.read_reg(reg::COM_IRQ)?;
            if irq & 0x30 != 0 {
                break; // RxIRq or IdleIRq
            }
            if irq & 0x01 != 0 {
                return Err(BadgeError::Timeout); // TimerIRq — no card
            }
            waited += 1;
            if waited >= POLL_LIMIT {
                return Err(BadgeError::Timeout);
            }
        }

        let err = self.bus.read_reg(reg::ERROR)?;
        if err & 0x13 != 0 {
            // BufferOvfl | ParityErr | ProtocolErr
            return Err(BadgeError::ProtocolError);
        }

        let available = usize::from(self.bus.read_reg(reg::FIFO_LEVEL)?);
        let n = available.min(rx.len());
        self.bus.read_fifo(&mut rx[..n])?;
        Ok(n)
    }
}

// ── BadgeReader port implementation ───────────────────────────

pub struct Mfrc522Reader<B> {
    chip: Mfrc522<B>,
    cooldown_ms: u32,
    last_read_ms: Option<u32>,
}

impl<B: Mfrc522Bus> Mfrc522Reader<B> {
    pub fn new(bus: B, cooldown_ms: u32) -> Self {
        Self {
            chip: Mfrc522::new(bus),
            cooldown_ms,
            last_read_ms: None,
        }
    }

    pub fn init(&mut self) -> Result<(), BadgeError> {
        self.chip.init()
    }
}

impl<B: Mfrc522Bus> BadgeReader for Mfrc522Reader<B> {
    fn poll_new_credential(&mut self, now_ms: u32) -> Option<CredentialId> {
        if let Some(last) = self.last_read_ms {
            if now_ms.wrapping_sub(last) < self.cooldown_ms {
                return None;
            }
        }

        // Timeout just means no card in the field; anything else is a
        // transient read problem — either way, "no credential" this tick.
        if self.chip.request_a().is_err() {
            return None;
        }
        match self.chip.read_uid() {
            Ok(uid) if !uid.is_empty() => {
                self.last_read_ms = Some(now_ms.max(1));
                Some(uid)
            }
            Ok(_) => None,
            Err(e) => {
                debug!("rfid: discarded read: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Emulates the register protocol well enough for the driver: queued
    /// response frames are delivered on each StartSend.
    struct ScriptedBus {
        regs: [u8; 64],
        fifo: VecDeque<u8>,
        responses: VecDeque<Vec<u8>>,
        armed: bool,
    }

    impl ScriptedBus {
        fn new(responses: Vec<Vec<u8>>) -> Self {
            Self {
                regs: [0; 64],
                fifo: VecDeque::new(),
                responses: responses.into(),
                armed: false,
            }
        }
    }

    impl Mfrc522Bus for ScriptedBus {
        fn write_reg(&mut self, r: u8, value: u8) -> Result<(), BadgeError> {
            if r == reg::COMMAND {
                self.armed = value == cmd::TRANSCEIVE;
            }
            if r == reg::BIT_FRAMING && value & 0x80 != 0 && self.armed {
                match self.responses.pop_front() {
                    Some(frame) => {
                        self.regs[usize::from(reg::FIFO_LEVEL)] = frame.len() as u8;
                        self.fifo = frame.into();
                        self.regs[usize::from(reg::COM_IRQ)] = 0x30;
                        self.regs[usize::from(reg::ERROR)] = 0;
                    }
                    None => {
                        // No card: the timeout timer fires.
                        self.regs[usize::from(reg::COM_IRQ)] = 0x01;
                    }
                }
                return Ok(());
            }
            self.regs[usize::from(r)] = value;
            Ok(())
        }

        fn read_reg(&mut self, r: u8) -> Result<u8, BadgeError> {
            Ok(self.regs[usize::from(r)])
        }

        fn write_fifo(&mut self, _data: &[u8]) -> Result<(), BadgeError> {
            Ok(())
        }

        fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), BadgeError> {
            for byte in buf.iter_mut() {
                *byte = self.fifo.pop_front().unwrap_or(0);
            }
            Ok(())
        }
    }

    fn card_frames(uid: [u8; 4]) -> Vec<Vec<u8>> {
        let bcc = uid[0] ^ uid[1] ^ uid[2] ^ uid[3];
        vec![
            vec![0x04, 0x00], // ATQA
            vec![uid[0], uid[1], uid[2], uid[3], bcc],
        ]
    }

    #[test]
    fn reads_a_four_byte_uid() {
        let bus = ScriptedBus::new(card_frames([0x12, 0x34, 0x56, 0x78]));
        let mut reader = Mfrc522Reader::new(bus, 2_000);
        reader.init().unwrap();

        let uid = reader.poll_new_credential(1_000).unwrap();
        assert_eq!(&uid[..], &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn empty_field_yields_no_credential() {
        let bus = ScriptedBus::new(Vec::new());
        let mut reader = Mfrc522Reader::new(bus, 2_000);
        reader.init().unwrap();
        assert!(reader.poll_new_credential(1_000).is_none());
    }

    #[test]
    fn corrupt_check_byte_is_discarded() {
        let mut frames = card_frames([0xDE, 0xAD, 0xBE, 0xEF]);
        frames[1][4] ^= 0xFF; // break the BCC
        let bus = ScriptedBus::new(frames);
        let mut reader = Mfrc522Reader::new(bus, 2_000);
        reader.init().unwrap();
        assert!(reader.poll_new_credential(1_000).is_none());
    }

    #[test]
    fn cooldown_suppresses_rereads() {
        let mut frames = card_frames([0x01, 0x02, 0x03, 0x04]);
        frames.extend(card_frames([0x01, 0x02, 0x03, 0x04]));
        frames.extend(card_frames([0x01, 0x02, 0x03, 0x04]));
        let bus = ScriptedBus::new(frames);
        let mut reader = Mfrc522Reader::new(bus, 2_000);
        reader.init().unwrap();

        assert!(reader.poll_new_credential(1_000).is_some());
        // Still inside the cooldown window.
        assert!(reader.poll_new_credential(1_500).is_none());
        assert!(reader.poll_new_credential(2_900).is_none());
        // Window elapsed — the next presentation reads again.
        assert!(reader.poll_new_credential(3_100).is_some());
    }
}
