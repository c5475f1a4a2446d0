// src/client/mod.rs

//! Packet-type specific behaviour.
//!
//! A packet's type byte selects a client. Clients are shared: one instance of
//! each variant serves every line, and [`ClientFactory::bind`] points it at the
//! line currently being serviced.

pub mod sensors;

pub use sensors::SensorsClient;

use crate::common::{
    hal_traits::{BusInstant, BusTimer, NonVolatileStorage, OneWireBus},
    host::HostFramework,
    line::LineId,
    packet::Packet,
};
use crate::registry::IndexRegistry;
use crate::transport::SyncTransport;
use core::time::Duration;

/// Packet type of modules carrying up to three sensors.
pub const SENSORS_PACKET_TYPE: u8 = 1;

/// The closed set of clients. Unknown packet types get [`ClientKind::Dummy`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClientKind {
    Sensors,
    Dummy,
}

impl ClientKind {
    pub fn from_packet_type(packet_type: u8) -> Self {
        match packet_type {
            SENSORS_PACKET_TYPE => ClientKind::Sensors,
            _ => ClientKind::Dummy,
        }
    }

    #[inline]
    pub fn for_packet(packet: &Packet) -> Self {
        Self::from_packet_type(packet.packet_type())
    }
}

/// Everything a client may touch while handling one packet.
pub struct ClientContext<'a, IF, H, S>
where
    IF: OneWireBus + BusTimer,
    H: HostFramework,
{
    pub transport: &'a mut SyncTransport<IF>,
    pub registry: &'a mut IndexRegistry<H::Module>,
    pub host: &'a mut H,
    pub storage: &'a mut S,
}

/// Hooks every client implements.
pub trait UniClient<I: BusInstant> {
    /// Selects the line subsequent hooks act on.
    fn bind(&mut self, line: LineId);

    /// One-time pairing of a module with this controller. Must be idempotent.
    fn register<IF, H, S>(&mut self, ctx: &mut ClientContext<'_, IF, H, S>, packet: &Packet)
    where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage;

    /// Called on every poll. `is_online` is false when `packet` is the line's
    /// last known packet and the module is being polled again.
    fn update<IF, H, S>(
        &mut self,
        ctx: &mut ClientContext<'_, IF, H, S>,
        packet: &Packet,
        is_online: bool,
    ) where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage;
}

/// Client for packet types this controller does not understand.
#[derive(Debug, Default, Copy, Clone)]
pub struct DummyClient;

impl<I: BusInstant> UniClient<I> for DummyClient {
    fn bind(&mut self, _line: LineId) {}

    fn register<IF, H, S>(&mut self, _ctx: &mut ClientContext<'_, IF, H, S>, _packet: &Packet)
    where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage,
    {
    }

    fn update<IF, H, S>(
        &mut self,
        _ctx: &mut ClientContext<'_, IF, H, S>,
        _packet: &Packet,
        _is_online: bool,
    ) where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage,
    {
    }
}

/// Owns one instance of every client and dispatches on [`ClientKind`].
#[derive(Debug)]
pub struct ClientFactory<I> {
    sensors: SensorsClient<I>,
    dummy: DummyClient,
}

impl<I: BusInstant> ClientFactory<I> {
    pub fn new(measurement_cooldown: Duration) -> Self {
        ClientFactory {
            sensors: SensorsClient::new(measurement_cooldown),
            dummy: DummyClient,
        }
    }

    pub fn sensors(&self) -> &SensorsClient<I> {
        &self.sensors
    }

    pub fn bind(&mut self, kind: ClientKind, line: LineId) {
        match kind {
            ClientKind::Sensors => UniClient::<I>::bind(&mut self.sensors, line),
            ClientKind::Dummy => UniClient::<I>::bind(&mut self.dummy, line),
        }
    }

    pub fn register<IF, H, S>(
        &mut self,
        kind: ClientKind,
        ctx: &mut ClientContext<'_, IF, H, S>,
        packet: &Packet,
    ) where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage,
    {
        match kind {
            ClientKind::Sensors => self.sensors.register(ctx, packet),
            ClientKind::Dummy => UniClient::<I>::register(&mut self.dummy, ctx, packet),
        }
    }

    pub fn update<IF, H, S>(
        &mut self,
        kind: ClientKind,
        ctx: &mut ClientContext<'_, IF, H, S>,
        packet: &Packet,
        is_online: bool,
    ) where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage,
    {
        match kind {
            ClientKind::Sensors => self.sensors.update(ctx, packet, is_online),
            ClientKind::Dummy => UniClient::<I>::update(&mut self.dummy, ctx, packet, is_online),
        }
    }
}
