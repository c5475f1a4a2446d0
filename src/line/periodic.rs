// src/line/periodic.rs

use crate::client::ClientKind;
use crate::common::{
    hal_traits::{BusTimer, NonVolatileStorage, OneWireBus},
    host::{ControllerSettings, HostFramework},
    line::LineId,
    packet::Packet,
};
use crate::system::UniSystem;
use core::time::Duration;
use log::{debug, trace, warn};
use rand::{Rng, RngCore};

/// What one call to [`PeriodicLine::tick`] did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PollOutcome {
    /// The poll interval has not elapsed yet.
    Waiting,
    /// Nothing answered on the line, or the packet was corrupt.
    Absent,
    /// A module answered but is registered to another controller.
    Foreign,
    /// The module's packet was handed to its client.
    Updated(ClientKind),
}

/// A line with a module wired to it, polled every `poll_interval`.
#[derive(Debug, Clone)]
pub struct PeriodicLine {
    line: LineId,
    poll_interval: Duration,
    elapsed: Duration,
    last_client: Option<ClientKind>,
    last_packet: Packet,
}

impl PeriodicLine {
    /// Creates a line whose first poll happens after a random fraction of
    /// the interval, so that lines created together are polled apart.
    pub fn new<R: RngCore>(line: LineId, poll_interval: Duration, rng: &mut R) -> Self {
        let span_ms = poll_interval.as_millis() as u64;
        let phase_ms = if span_ms == 0 {
            0
        } else {
            rng.gen_range(0..span_ms)
        };
        Self::with_phase(line, poll_interval, Duration::from_millis(phase_ms))
    }

    /// Creates a line whose interval timer starts at `phase`.
    pub fn with_phase(line: LineId, poll_interval: Duration, phase: Duration) -> Self {
        PeriodicLine {
            line,
            poll_interval,
            elapsed: phase,
            last_client: None,
            last_packet: Packet::blank(),
        }
    }

    #[inline]
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Time accumulated towards the next poll.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Client of the last packet read from this line.
    #[inline]
    pub fn last_client(&self) -> Option<ClientKind> {
        self.last_client
    }

    #[inline]
    pub fn last_packet(&self) -> &Packet {
        &self.last_packet
    }

    /// True once a module registered to this controller has been seen here.
    pub fn is_registered(&self, controller_id: u8) -> bool {
        self.last_client.is_some() && self.last_packet.is_owned_by(controller_id)
    }

    /// Advances the line's timer by `dt` and polls the module when the
    /// interval is up.
    ///
    /// Every poll first gives the last known client an offline update from
    /// the last packet, so that a module pulled off the line shows "no data"
    /// until it answers again.
    pub fn tick<IF, H, S>(&mut self, system: &mut UniSystem<IF, H, S>, dt: Duration) -> PollOutcome
    where
        IF: OneWireBus + BusTimer,
        H: HostFramework + ControllerSettings,
        S: NonVolatileStorage,
    {
        self.elapsed += dt;
        if self.elapsed < self.poll_interval {
            return PollOutcome::Waiting;
        }
        self.elapsed -= self.poll_interval;

        if let Some(kind) = self.last_client {
            system.update_client(kind, &self.last_packet, false);
        }

        let packet = match system.read_packet(self.line) {
            Ok(packet) => packet,
            Err(e) => {
                if e.is_transient() {
                    trace!("{}: no module: {:?}", self.line, e);
                } else {
                    warn!("{}: read failed: {:?}", self.line, e);
                }
                return PollOutcome::Absent;
            }
        };

        if !packet.is_owned_by(system.controller_id()) {
            debug!(
                "{}: module belongs to controller {}, ignoring",
                self.line, packet.header.controller_id
            );
            return PollOutcome::Foreign;
        }

        let kind = ClientKind::for_packet(&packet);
        system.bind_client(kind, self.line);
        system.update_client(kind, &packet, true);

        self.last_client = Some(kind);
        self.last_packet = packet;
        PollOutcome::Updated(kind)
    }
}
