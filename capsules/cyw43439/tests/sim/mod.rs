// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! A simulated CYW43439 behind simulated pins and a simulated counter.
//!
//! The chip follows chip-select edges: the first four bytes of a window are
//! the command, then either payload bytes (committed when chip-select goes
//! high) or response bytes. A read whose window closes right after the
//! command keeps its response for the next window.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use capsules_cyw43439::cmd::{swap16, Command};
use capsules_cyw43439::hil::gpio::{self, Configuration, FloatingState};
use capsules_cyw43439::hil::gspi::ByteTransfer;
use capsules_cyw43439::hil::time::{Freq1MHz, Time};
use capsules_cyw43439::registers::{REG_BUS_INTERRUPT, REG_BUS_TEST_RO, TEST_PATTERN};
use capsules_cyw43439::{ErrorCode, FunctionSpace};

/// Ticks (microseconds) one byte takes on the wire.
pub const BYTE_TICKS: u32 = 8;
/// What an unpowered or unready bus reads as.
pub const UNREADY: u32 = 0xFFFF_FFFF;
/// Filler the chip sends for backplane read padding.
pub const PADDING_BYTE: u8 = 0xEE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinId {
    Pwr,
    Cs,
    Dio,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Level(PinId, bool, u32),
    Config(PinId, Configuration),
    Byte(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Write {
    pub func: FunctionSpace,
    pub addr: u32,
    pub value: u32,
}

enum Phase {
    Idle,
    Command(Vec<u8>),
    Payload(Command, Vec<u8>),
    Response(Vec<u8>, usize),
}

pub struct Chip {
    regs: HashMap<(u32, u32), u32>,
    phase: Phase,
    pending: Option<Vec<u8>>,
    /// The bus is still in 16-bit word mode.
    pub swapped: bool,
    /// Polls answered with [`UNREADY`] before the test pattern shows up.
    pub ready_after: usize,
    pub polls: usize,
    pub commands: Vec<Command>,
    pub writes: Vec<Write>,
}

impl Chip {
    fn new() -> Self {
        Chip {
            regs: HashMap::new(),
            phase: Phase::Idle,
            pending: None,
            swapped: false,
            ready_after: 0,
            polls: 0,
            commands: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn get(&self, func: FunctionSpace, addr: u32) -> Option<u32> {
        self.regs.get(&(func as u32, addr)).copied()
    }

    pub fn set(&mut self, func: FunctionSpace, addr: u32, value: u32) {
        self.regs.insert((func as u32, addr), value);
    }

    fn cs_edge(&mut self, high: bool) {
        if !high {
            self.phase = match self.pending.take() {
                Some(data) => Phase::Response(data, 0),
                None => Phase::Command(Vec::new()),
            };
            return;
        }
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Payload(cmd, data) => self.commit(cmd, &data),
            Phase::Response(data, 0) => self.pending = Some(data),
            _ => {}
        }
    }

    fn byte(&mut self, out: u8) -> u8 {
        match &mut self.phase {
            Phase::Idle => 0xff,
            Phase::Command(buf) => {
                buf.push(out);
                if buf.len() == 4 {
                    let mut word = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
                    if self.swapped {
                        word = swap16(word);
                    }
                    let cmd = Command::from(word);
                    self.commands.push(cmd);
                    self.phase = if cmd.is_write() {
                        Phase::Payload(cmd, Vec::new())
                    } else {
                        Phase::Response(self.respond(cmd), 0)
                    };
                }
                0
            }
            Phase::Payload(_, data) => {
                data.push(out);
                0
            }
            Phase::Response(data, pos) => {
                let b = data.get(*pos).copied().unwrap_or(0xff);
                *pos += 1;
                b
            }
        }
    }

    fn respond(&mut self, cmd: Command) -> Vec<u8> {
        let func = cmd.function();
        let padding = func.read_padding();
        let width = (cmd.size() as usize).saturating_sub(padding).min(4);
        let value = if func == FunctionSpace::Bus && cmd.address() == REG_BUS_TEST_RO {
            self.polls += 1;
            if self.polls > self.ready_after {
                TEST_PATTERN
            } else {
                UNREADY
            }
        } else {
            self.get(func, cmd.address()).unwrap_or(0)
        };
        let word = if self.swapped { swap16(value) } else { value };
        let mut data = word.to_le_bytes()[..width].to_vec();
        data.extend(std::iter::repeat(PADDING_BYTE).take(padding));
        data
    }

    fn commit(&mut self, cmd: Command, data: &[u8]) {
        let value = if self.swapped {
            let mut word = [0u8; 4];
            for (dst, src) in word.iter_mut().zip(data) {
                *dst = *src;
            }
            swap16(u32::from_le_bytes(word))
        } else {
            data.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
        };
        let func = cmd.function();
        let addr = cmd.address();
        self.writes.push(Write { func, addr, value });
        if func == FunctionSpace::Bus && addr == REG_BUS_INTERRUPT {
            let latched = self.get(func, addr).unwrap_or(0);
            self.set(func, addr, latched & !value);
        } else {
            self.set(func, addr, value);
        }
    }
}

pub struct Sim {
    pub chip: RefCell<Chip>,
    pub log: RefCell<Vec<Event>>,
    pub now: Cell<u32>,
    /// Fail every byte transfer with `NOACK`.
    pub fail: Cell<bool>,
}

impl Sim {
    pub fn new() -> Self {
        Sim {
            chip: RefCell::new(Chip::new()),
            log: RefCell::new(Vec::new()),
            now: Cell::new(0),
            fail: Cell::new(false),
        }
    }

    pub fn pin(&self, id: PinId) -> SimPin<'_> {
        SimPin {
            id,
            sim: self,
            level: Cell::new(false),
            config: Cell::new(Configuration::Unknown),
            pull: Cell::new(FloatingState::PullNone),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Byte(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
        self.chip.borrow_mut().commands.clear();
        self.chip.borrow_mut().writes.clear();
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

pub struct SimPin<'a> {
    id: PinId,
    sim: &'a Sim,
    level: Cell<bool>,
    config: Cell<Configuration>,
    pull: Cell<FloatingState>,
}

impl gpio::Configure for SimPin<'_> {
    fn configuration(&self) -> Configuration {
        self.config.get()
    }

    fn make_output(&self) -> Configuration {
        self.config.set(Configuration::Output);
        self.sim.push(Event::Config(self.id, Configuration::Output));
        Configuration::Output
    }

    fn make_input(&self) -> Configuration {
        self.config.set(Configuration::Input);
        self.sim.push(Event::Config(self.id, Configuration::Input));
        Configuration::Input
    }

    fn set_floating_state(&self, state: FloatingState) {
        self.pull.set(state);
    }

    fn floating_state(&self) -> FloatingState {
        self.pull.get()
    }
}

impl gpio::Output for SimPin<'_> {
    fn set(&self) {
        self.level.set(true);
        self.sim.push(Event::Level(self.id, true, self.sim.now.get()));
        if self.id == PinId::Cs {
            self.sim.chip.borrow_mut().cs_edge(true);
        }
    }

    fn clear(&self) {
        self.level.set(false);
        self.sim.push(Event::Level(self.id, false, self.sim.now.get()));
        if self.id == PinId::Cs {
            self.sim.chip.borrow_mut().cs_edge(false);
        }
    }

    fn toggle(&self) -> bool {
        if self.level.get() {
            gpio::Output::clear(self);
        } else {
            gpio::Output::set(self);
        }
        self.level.get()
    }
}

impl gpio::Input for SimPin<'_> {
    fn read(&self) -> bool {
        self.level.get()
    }
}

pub struct SimSpi<'a> {
    pub sim: &'a Sim,
}

impl ByteTransfer for SimSpi<'_> {
    fn transfer_byte(&self, out: u8) -> Result<u8, ErrorCode> {
        if self.sim.fail.get() {
            return Err(ErrorCode::NOACK);
        }
        self.sim.now.set(self.sim.now.get().wrapping_add(BYTE_TICKS));
        self.sim.push(Event::Byte(out));
        Ok(self.sim.chip.borrow_mut().byte(out))
    }
}

/// A 1 MHz counter that advances one tick per read.
pub struct SimClock<'a> {
    pub sim: &'a Sim,
}

impl Time for SimClock<'_> {
    type Frequency = Freq1MHz;

    fn now(&self) -> u32 {
        let now = self.sim.now.get();
        self.sim.now.set(now.wrapping_add(1));
        now
    }
}
