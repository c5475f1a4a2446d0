// src/mock.rs

//! Test doubles for the bus driver, the host framework and controller storage.

use crate::common::{
    command::BusCommand,
    hal_traits::{BusTimer, NonVolatileStorage, OneWireBus},
    host::{ControllerSettings, HostFramework},
    line::LineId,
    packet::{Packet, PACKET_SIZE},
    types::{Reading, StateKind},
};
use core::time::Duration;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);
impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}
impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

// --- Mock Module ---
#[derive(Debug, Clone)]
pub(crate) struct MockModule {
    pub scratchpad: [u8; PACKET_SIZE],
    pub eeprom: Option<[u8; PACKET_SIZE]>,
    pub measurements: u32,
    pub commits: u32,
    pub writes: u32,
}

impl MockModule {
    pub fn with_packet(packet: &Packet) -> Self {
        MockModule {
            scratchpad: packet.to_bytes(),
            eeprom: None,
            measurements: 0,
            commits: 0,
            writes: 0,
        }
    }

    /// Flips a payload bit so the checksum no longer matches.
    pub fn corrupt(&mut self) {
        self.scratchpad[4] ^= 0x01;
    }

    pub fn packet(&self) -> Packet {
        Packet::from_bytes(&self.scratchpad).unwrap()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitSkip,
    AwaitCommand,
    Reading(usize),
    Writing(usize),
}

#[derive(Debug, Clone)]
struct MockLine {
    line: LineId,
    module: Option<MockModule>,
    phase: Phase,
}

// --- Mock Bus ---
#[derive(Debug, Clone)]
pub(crate) struct MockBus {
    lines: Vec<MockLine>,
    pub now_us: u64,
    pub resets: u32,
    /// Every byte written, tagged with the line pin.
    pub written: Vec<(u8, u8)>,
    /// `WouldBlock` answers to give before each read completes.
    pub read_stalls: u32,
    stalls_left: u32,
    /// Makes every operation fail with `MockCommError`.
    pub fail_io: bool,
}

impl MockBus {
    pub fn new() -> Self {
        MockBus {
            lines: Vec::new(),
            now_us: 0,
            resets: 0,
            written: Vec::new(),
            read_stalls: 0,
            stalls_left: 0,
            fail_io: false,
        }
    }

    pub fn attach(&mut self, line: LineId, module: MockModule) {
        self.detach(line);
        self.lines.push(MockLine {
            line,
            module: Some(module),
            phase: Phase::Idle,
        });
    }

    pub fn detach(&mut self, line: LineId) {
        self.lines.retain(|l| l.line != line);
    }

    pub fn module(&self, line: LineId) -> Option<&MockModule> {
        self.lines
            .iter()
            .find(|l| l.line == line)
            .and_then(|l| l.module.as_ref())
    }

    pub fn module_mut(&mut self, line: LineId) -> Option<&mut MockModule> {
        self.lines
            .iter_mut()
            .find(|l| l.line == line)
            .and_then(|l| l.module.as_mut())
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us = self.now_us.saturating_add(ms * 1000);
    }

    pub fn commands_on(&self, line: LineId) -> Vec<u8> {
        self.written
            .iter()
            .filter(|(pin, _)| *pin == line.pin())
            .map(|(_, b)| *b)
            .collect()
    }

    fn slot(&mut self, line: LineId) -> Option<&mut MockLine> {
        self.lines.iter_mut().find(|l| l.line == line)
    }
}

impl BusTimer for MockBus {
    type Instant = MockInstant;
    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(us as u64);
    }
    fn delay_ms(&mut self, ms: u32) {
        self.advance_ms(ms as u64);
    }
    fn now(&self) -> Self::Instant {
        MockInstant(self.now_us)
    }
}

impl OneWireBus for MockBus {
    type Error = MockCommError;

    fn reset(&mut self, line: LineId) -> nb::Result<bool, Self::Error> {
        if self.fail_io {
            return Err(nb::Error::Other(MockCommError));
        }
        self.resets += 1;
        self.now_us += 1_000;
        match self.slot(line) {
            Some(l) if l.module.is_some() => {
                l.phase = Phase::AwaitSkip;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn write_byte(&mut self, line: LineId, byte: u8) -> nb::Result<(), Self::Error> {
        if self.fail_io {
            return Err(nb::Error::Other(MockCommError));
        }
        self.written.push((line.pin(), byte));
        let Some(l) = self.slot(line) else {
            return Ok(());
        };
        let Some(module) = l.module.as_mut() else {
            return Ok(());
        };

        l.phase = match (l.phase, BusCommand::from_u8(byte)) {
            (Phase::AwaitSkip, Some(BusCommand::SkipRom)) => Phase::AwaitCommand,
            (Phase::AwaitCommand, Some(BusCommand::ReadScratchpad)) => Phase::Reading(0),
            (Phase::AwaitCommand, Some(BusCommand::WriteScratchpad)) => Phase::Writing(0),
            (Phase::AwaitCommand, Some(BusCommand::StartMeasurement)) => {
                module.measurements += 1;
                Phase::Idle
            }
            (Phase::AwaitCommand, Some(BusCommand::SaveToEeprom)) => {
                module.commits += 1;
                module.eeprom = Some(module.scratchpad);
                Phase::Idle
            }
            (Phase::Writing(pos), _) => {
                module.scratchpad[pos] = byte;
                if pos + 1 == PACKET_SIZE {
                    module.writes += 1;
                    Phase::Idle
                } else {
                    Phase::Writing(pos + 1)
                }
            }
            _ => Phase::Idle,
        };
        Ok(())
    }

    fn read_byte(&mut self, line: LineId) -> nb::Result<u8, Self::Error> {
        if self.fail_io {
            return Err(nb::Error::Other(MockCommError));
        }
        if self.stalls_left > 0 {
            self.stalls_left -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.stalls_left = self.read_stalls;

        let Some(l) = self.slot(line) else {
            return Ok(0xFF);
        };
        let Some(module) = l.module.as_ref() else {
            return Ok(0xFF);
        };
        match l.phase {
            Phase::Reading(pos) if pos < PACKET_SIZE => {
                let byte = module.scratchpad[pos];
                l.phase = Phase::Reading(pos + 1);
                Ok(byte)
            }
            _ => Ok(0xFF),
        }
    }
}

// --- Mock Host ---
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockState {
    pub kind: StateKind,
    pub index: u8,
    pub reading: Option<Reading>,
}

impl MockState {
    fn empty(kind: StateKind, index: u8) -> Self {
        MockState {
            kind,
            index,
            reading: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockHostModule {
    pub name: &'static str,
    pub states: heapless::Vec<MockState, 256>,
}

#[derive(Debug, Clone)]
pub(crate) struct MockHost {
    pub modules: heapless::Vec<MockHostModule, 8>,
    pub controller_id: u8,
    pub pushes: u32,
}

impl MockHost {
    pub fn new(controller_id: u8) -> Self {
        MockHost {
            modules: heapless::Vec::new(),
            controller_id,
            pushes: 0,
        }
    }

    /// Adds a module with `count` hardcoded states of each listed kind
    /// (indices `0..count`).
    pub fn with_module(mut self, name: &'static str, hardcoded: &[(StateKind, u8)]) -> Self {
        let mut module = MockHostModule {
            name,
            states: heapless::Vec::new(),
        };
        for &(kind, count) in hardcoded {
            for index in 0..count {
                module.states.push(MockState::empty(kind, index)).unwrap();
            }
        }
        self.modules.push(module).unwrap();
        self
    }

    /// A host with every category module present and no hardcoded sensors.
    pub fn full(controller_id: u8) -> Self {
        MockHost::new(controller_id)
            .with_module("STATE", &[])
            .with_module("HUMIDITY", &[])
            .with_module("LIGHT", &[])
            .with_module("SOIL", &[])
    }

    pub fn module(&self, name: &str) -> &MockHostModule {
        self.modules.iter().find(|m| m.name == name).unwrap()
    }

    pub fn states_of(&self, name: &str, kind: StateKind) -> Vec<u8> {
        self.module(name)
            .states
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.index)
            .collect()
    }

    pub fn reading(&self, name: &str, kind: StateKind, index: u8) -> Option<Reading> {
        self.module(name)
            .states
            .iter()
            .find(|s| s.kind == kind && s.index == index)
            .and_then(|s| s.reading)
    }
}

impl HostFramework for MockHost {
    type Module = usize;
    type State = (usize, usize);

    fn module_by_name(&self, name: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.name == name)
    }

    fn allocate_state(&mut self, module: usize, kind: StateKind, index: u8) {
        let state = MockState::empty(kind, index);
        self.modules[module].states.push(state).unwrap();
    }

    fn get_state(&self, module: usize, kind: StateKind, index: u8) -> Option<(usize, usize)> {
        self.modules[module]
            .states
            .iter()
            .position(|s| s.kind == kind && s.index == index)
            .map(|pos| (module, pos))
    }

    fn count_states(&self, module: usize, kind: StateKind) -> u8 {
        let states = &self.modules[module].states;
        states.iter().filter(|s| s.kind == kind).count() as u8
    }

    fn push_reading(&mut self, state: (usize, usize), reading: Reading) {
        self.pushes += 1;
        self.modules[state.0].states[state.1].reading = Some(reading);
    }
}

impl ControllerSettings for MockHost {
    fn controller_id(&self) -> u8 {
        self.controller_id
    }
}

// --- Mock Storage ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockStorageError;

#[derive(Debug, Clone)]
pub(crate) struct MockStorage {
    pub bytes: [u8; 1024],
    pub writes: u32,
    pub fail: bool,
}

impl MockStorage {
    /// Erased storage, every byte `0xFF`.
    pub fn blank() -> Self {
        MockStorage {
            bytes: [0xFF; 1024],
            writes: 0,
            fail: false,
        }
    }
}

impl NonVolatileStorage for MockStorage {
    type Error = MockStorageError;

    fn read_byte(&mut self, address: u16) -> Result<u8, Self::Error> {
        if self.fail {
            return Err(MockStorageError);
        }
        let value = self.bytes.get(address as usize).copied();
        value.ok_or(MockStorageError)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockStorageError);
        }
        let Some(slot) = self.bytes.get_mut(address as usize) else {
            return Err(MockStorageError);
        };
        *slot = value;
        self.writes += 1;
        Ok(())
    }
}

pub(crate) fn line(pin: u8) -> LineId {
    LineId::new(pin).unwrap()
}
